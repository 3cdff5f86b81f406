use serde::{Deserialize, Serialize};

use crate::ItemId;

/// Axis-aligned rectangle in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Zero-threshold intersection: any overlapping area counts.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }

    pub fn center_x(&self) -> f32 {
        self.left + self.width / 2.0
    }
}

/// Scroll geometry of the main container, as reported by a scroll event.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollMetrics {
    pub scroll_left: f32,
    pub scroll_top: f32,
    pub client_width: f32,
    pub client_height: f32,
    pub scroll_width: f32,
    pub scroll_height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

/// Post-layout geometry queries answered by the rendering collaborator.
///
/// Every query may come back empty: the node may not be painted yet or may
/// have been removed since the request was scheduled.
pub trait LayoutProbe {
    /// Bounding box of the card rendered for `id` in the horizontal content
    /// container.
    fn card_rect(&self, id: &ItemId) -> Option<Rect>;

    /// Bounding box of the horizontal content container.
    fn content_rect(&self) -> Option<Rect>;

    /// Bounding box of a vertical row.
    fn row_rect(&self, id: &ItemId) -> Option<Rect>;

    /// Visible area of the scrollable main container.
    fn viewport_rect(&self) -> Option<Rect>;

    fn scroll_metrics(&self) -> Option<ScrollMetrics>;
}
