use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{ItemId, LayoutMode, LayoutProbe, Rect, ScrollBehavior, ScrollMetrics};

/// Deltas smaller than this are treated as "already in place".
const SETTLED_EPSILON: f32 = 0.5;
/// Distance from the trailing edge that still counts as the end.
const SCROLL_END_TOLERANCE: f32 = 1.0;

/// Scroll side effects applied by the rendering collaborator.
pub trait ScrollSurface: LayoutProbe {
    /// Scrolls the horizontal content container by `delta` pixels.
    fn scroll_content_by(&mut self, delta: f32, behavior: ScrollBehavior);

    /// Sets the main container's horizontal scroll offset.
    fn set_scroll_left(&mut self, offset: f32);

    /// Sets the main container's vertical scroll offset.
    fn set_scroll_top(&mut self, offset: f32);
}

/// Last scroll adjustment applied for the active item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrollAnchor {
    pub mode: LayoutMode,
    pub offset: f32,
    pub behavior: ScrollBehavior,
}

/// Partial scroll information reported by a renderer while dragging,
/// wheeling, or bringing a point into view. Every field is optional.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollDelta {
    pub scroll_left: Option<f32>,
    pub scroll_top: Option<f32>,
    pub point_offset: Option<f32>,
    pub point_width: Option<f32>,
    pub content_height: Option<f32>,
    pub content_offset: Option<f32>,
}

/// Keeps the active card in view.
#[derive(Debug, Clone)]
pub struct ScrollSynchronizer {
    item_width: f32,
    offset: f32,
    anchor: Option<ScrollAnchor>,
}

impl ScrollSynchronizer {
    pub fn new(item_width: f32) -> Self {
        Self {
            item_width,
            offset: 0.0,
            anchor: None,
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn anchor(&self) -> Option<ScrollAnchor> {
        self.anchor
    }

    /// Horizontal distance that moves `card` to the middle of `container`.
    pub fn center_delta(card: Rect, container: Rect) -> f32 {
        (card.left - container.left) + card.width / 2.0 - container.width / 2.0
    }

    /// Measures the active card and scrolls the horizontal content container
    /// so that it is centred. Vertical layouts scroll themselves into view,
    /// so nothing happens there. Missing geometry skips the adjustment.
    pub fn center_active<S: ScrollSurface + ?Sized>(
        &mut self,
        mode: LayoutMode,
        id: &ItemId,
        surface: &mut S,
    ) -> Option<ScrollAnchor> {
        if !mode.is_horizontal() {
            return None;
        }

        let (Some(card), Some(container)) = (surface.card_rect(id), surface.content_rect()) else {
            trace!(item = %id, "no geometry for active card, skipping scroll");
            return None;
        };

        let delta = Self::center_delta(card, container);
        if delta.abs() < SETTLED_EPSILON {
            trace!(item = %id, "active card already centred");
            return None;
        }

        trace!(item = %id, delta, "centring active card");
        surface.scroll_content_by(delta, ScrollBehavior::Smooth);
        let anchor = ScrollAnchor {
            mode,
            offset: delta,
            behavior: ScrollBehavior::Smooth,
        };
        self.anchor = Some(anchor);
        Some(anchor)
    }

    /// Merges a renderer-reported delta into the tracked offset. Returns the
    /// new offset when it changed.
    pub fn merge(
        &mut self,
        mode: LayoutMode,
        delta: &ScrollDelta,
        metrics: Option<ScrollMetrics>,
    ) -> Option<f32> {
        let candidate = if mode.is_horizontal() {
            delta
                .scroll_left
                .or_else(|| self.horizontal_target(delta, metrics))
        } else {
            delta
                .scroll_top
                .or_else(|| Self::vertical_target(delta, metrics))
        };

        let candidate = candidate?.max(0.0);
        if (candidate - self.offset).abs() < SETTLED_EPSILON {
            return None;
        }
        self.offset = candidate;
        Some(candidate)
    }

    /// Applies the tracked offset to the main container.
    pub fn apply<S: ScrollSurface + ?Sized>(&mut self, mode: LayoutMode, surface: &mut S) {
        self.anchor = Some(ScrollAnchor {
            mode,
            offset: self.offset,
            behavior: ScrollBehavior::Instant,
        });
        if mode.is_horizontal() {
            surface.set_scroll_left(self.offset);
        } else {
            surface.set_scroll_top(self.offset);
        }
    }

    fn horizontal_target(&self, delta: &ScrollDelta, metrics: Option<ScrollMetrics>) -> Option<f32> {
        let point_offset = delta.point_offset?;
        let point_width = delta.point_width.unwrap_or(0.0);
        let metrics = metrics?;

        let visible_end = metrics.scroll_left + metrics.client_width;
        if point_offset >= metrics.scroll_left && point_offset + point_width <= visible_end {
            return None;
        }
        Some(point_offset - self.item_width)
    }

    fn vertical_target(delta: &ScrollDelta, metrics: Option<ScrollMetrics>) -> Option<f32> {
        let content_offset = delta.content_offset?;
        let content_height = delta.content_height.unwrap_or(0.0);
        let metrics = metrics?;

        let visible_end = metrics.scroll_top + metrics.client_height;
        if content_offset >= metrics.scroll_top && content_offset + content_height <= visible_end {
            return None;
        }
        Some(content_offset - (metrics.client_height - content_height) / 2.0)
    }
}

/// Whether the main container reached its trailing edge.
pub fn is_scroll_end(mode: LayoutMode, flip_layout: bool, metrics: &ScrollMetrics) -> bool {
    if mode.is_vertical() {
        let scrolled = metrics.scroll_top + metrics.client_height;
        return metrics.scroll_height - scrolled < SCROLL_END_TOLERANCE;
    }

    if flip_layout {
        metrics.scroll_left.abs() <= SCROLL_END_TOLERANCE && metrics.scroll_width > metrics.client_width
    } else {
        metrics.scroll_left + metrics.client_width >= metrics.scroll_width - SCROLL_END_TOLERANCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeSurface {
        card: Option<Rect>,
        content: Option<Rect>,
        content_scrolls: Vec<f32>,
        left: Vec<f32>,
        top: Vec<f32>,
    }

    impl LayoutProbe for FakeSurface {
        fn card_rect(&self, _id: &ItemId) -> Option<Rect> {
            self.card
        }
        fn content_rect(&self) -> Option<Rect> {
            self.content
        }
        fn row_rect(&self, _id: &ItemId) -> Option<Rect> {
            None
        }
        fn viewport_rect(&self) -> Option<Rect> {
            None
        }
        fn scroll_metrics(&self) -> Option<ScrollMetrics> {
            None
        }
    }

    impl ScrollSurface for FakeSurface {
        fn scroll_content_by(&mut self, delta: f32, _behavior: ScrollBehavior) {
            self.content_scrolls.push(delta);
            if let Some(card) = self.card.as_mut() {
                card.left -= delta;
            }
        }
        fn set_scroll_left(&mut self, offset: f32) {
            self.left.push(offset);
        }
        fn set_scroll_top(&mut self, offset: f32) {
            self.top.push(offset);
        }
    }

    #[test]
    fn centres_card_within_container() {
        let card = Rect::new(700.0, 0.0, 200.0, 100.0);
        let container = Rect::new(100.0, 0.0, 800.0, 100.0);
        assert_eq!(ScrollSynchronizer::center_delta(card, container), 300.0);
    }

    #[test]
    fn centring_twice_does_not_jitter() {
        let mut surface = FakeSurface {
            card: Some(Rect::new(700.0, 0.0, 200.0, 100.0)),
            content: Some(Rect::new(100.0, 0.0, 800.0, 100.0)),
            ..Default::default()
        };
        let mut sync = ScrollSynchronizer::new(200.0);
        let id = ItemId::from("a");

        assert!(sync.center_active(LayoutMode::Horizontal, &id, &mut surface).is_some());
        assert!(sync.center_active(LayoutMode::Horizontal, &id, &mut surface).is_none());
        assert_eq!(surface.content_scrolls, vec![300.0]);
    }

    #[test]
    fn missing_geometry_is_skipped() {
        let mut surface = FakeSurface::default();
        let mut sync = ScrollSynchronizer::new(200.0);
        let anchor = sync.center_active(LayoutMode::HorizontalAll, &ItemId::from("a"), &mut surface);
        assert!(anchor.is_none());
        assert!(surface.content_scrolls.is_empty());
    }

    #[test]
    fn vertical_modes_do_not_centre() {
        let mut surface = FakeSurface {
            card: Some(Rect::new(700.0, 0.0, 200.0, 100.0)),
            content: Some(Rect::new(0.0, 0.0, 100.0, 100.0)),
            ..Default::default()
        };
        let mut sync = ScrollSynchronizer::new(200.0);
        assert!(sync
            .center_active(LayoutMode::Vertical, &ItemId::from("a"), &mut surface)
            .is_none());
    }

    #[test]
    fn merges_explicit_and_derived_offsets() {
        let mut sync = ScrollSynchronizer::new(200.0);
        let delta = ScrollDelta {
            scroll_top: Some(120.0),
            ..Default::default()
        };
        assert_eq!(sync.merge(LayoutMode::Vertical, &delta, None), Some(120.0));
        assert_eq!(sync.merge(LayoutMode::Vertical, &delta, None), None);

        let metrics = ScrollMetrics {
            scroll_top: 0.0,
            client_height: 400.0,
            ..Default::default()
        };
        let below = ScrollDelta {
            content_offset: Some(900.0),
            content_height: Some(200.0),
            ..Default::default()
        };
        assert_eq!(sync.merge(LayoutMode::Vertical, &below, Some(metrics)), Some(800.0));

        let mut surface = FakeSurface::default();
        sync.apply(LayoutMode::Vertical, &mut surface);
        assert_eq!(surface.top, vec![800.0]);
    }

    #[test]
    fn horizontal_point_in_view_keeps_offset() {
        let mut sync = ScrollSynchronizer::new(200.0);
        let metrics = ScrollMetrics {
            scroll_left: 0.0,
            client_width: 1000.0,
            ..Default::default()
        };
        let visible = ScrollDelta {
            point_offset: Some(100.0),
            point_width: Some(20.0),
            ..Default::default()
        };
        assert_eq!(sync.merge(LayoutMode::Horizontal, &visible, Some(metrics)), None);

        let beyond = ScrollDelta {
            point_offset: Some(1500.0),
            point_width: Some(20.0),
            ..Default::default()
        };
        assert_eq!(sync.merge(LayoutMode::Horizontal, &beyond, Some(metrics)), Some(1300.0));
    }

    #[test]
    fn detects_trailing_edge() {
        let vertical = ScrollMetrics {
            scroll_top: 599.5,
            client_height: 400.0,
            scroll_height: 1000.0,
            ..Default::default()
        };
        assert!(is_scroll_end(LayoutMode::Vertical, false, &vertical));

        let horizontal = ScrollMetrics {
            scroll_left: 600.0,
            client_width: 400.0,
            scroll_width: 1000.0,
            ..Default::default()
        };
        assert!(is_scroll_end(LayoutMode::Horizontal, false, &horizontal));
        assert!(!is_scroll_end(LayoutMode::Horizontal, true, &horizontal));

        let flipped = ScrollMetrics {
            scroll_left: 0.0,
            ..horizontal
        };
        assert!(is_scroll_end(LayoutMode::Horizontal, true, &flipped));
    }
}
