//! Deterministic, headless collaborators for driving the engine without a
//! real renderer: a fixed-size layout that places cards side by side and
//! rows on top of each other, and a host that records every notification.

use std::collections::HashMap;

use tracing::debug;

use crate::{
    ItemDescriptor, ItemId, ItemSelection, LayoutMode, LayoutProbe, MediaSink, Rect,
    RenderSurface, Result, ScrollBehavior, ScrollMetrics, ScrollSurface, TextDensity,
    TimelineHost, TimelineItem,
};

/// Builds `count` titled descriptors with detailed text.
pub fn sample_descriptors(count: usize) -> Vec<ItemDescriptor> {
    (0..count)
        .map(|index| ItemDescriptor {
            card_title: Some(format!("Card {index}")),
            card_detailed_text: Some(format!("Details for item {index}")),
            ..ItemDescriptor::titled(format!("Item {index}"))
        })
        .collect()
}

/// Host that keeps every notification it receives.
#[derive(Debug, Default, Clone)]
pub struct RecordingHost {
    pub selected: Vec<ItemSelection>,
    pub scroll_ends: usize,
    pub all_cards: Vec<bool>,
    pub densities: Vec<TextDensity>,
}

impl RecordingHost {
    pub fn selected_indices(&self) -> Vec<usize> {
        self.selected.iter().map(|selection| selection.index).collect()
    }
}

impl TimelineHost for RecordingHost {
    fn item_selected(&mut self, selection: &ItemSelection) {
        debug!(index = selection.index, title = %selection.title, "item selected");
        self.selected.push(selection.clone());
    }

    fn scroll_end(&mut self) {
        debug!("scroll end reached");
        self.scroll_ends += 1;
    }

    fn horizontal_all_cards(&mut self, shown: bool) {
        self.all_cards.push(shown);
    }

    fn text_density(&mut self, density: TextDensity) {
        self.densities.push(density);
    }
}

/// Fixed-geometry layout.
///
/// Horizontal cards are `card_width` wide and laid out left to right inside
/// the content container; vertical rows are `row_height` tall and stacked
/// inside the main container. Both containers share `viewport`.
#[derive(Debug, Clone)]
pub struct SimulatedSurface {
    pub viewport: Rect,
    pub card_width: f32,
    pub row_height: f32,
    pub content_scroll: f32,
    pub scroll_left: f32,
    pub scroll_top: f32,
    pub content_scrolls: Vec<f32>,
    pub scroll_left_writes: Vec<f32>,
    pub scroll_top_writes: Vec<f32>,
    pub media_visible: HashMap<ItemId, bool>,
    pub stop_commands: Vec<ItemId>,
    ids: Vec<ItemId>,
    mode: Option<LayoutMode>,
}

impl Default for SimulatedSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedSurface {
    pub fn new() -> Self {
        Self {
            viewport: Rect::new(0.0, 0.0, 600.0, 400.0),
            card_width: 200.0,
            row_height: 300.0,
            content_scroll: 0.0,
            scroll_left: 0.0,
            scroll_top: 0.0,
            content_scrolls: Vec::new(),
            scroll_left_writes: Vec::new(),
            scroll_top_writes: Vec::new(),
            media_visible: HashMap::new(),
            stop_commands: Vec::new(),
            ids: Vec::new(),
            mode: None,
        }
    }

    pub fn mode(&self) -> Option<LayoutMode> {
        self.mode
    }

    /// Simulates the user scrolling the main container vertically and
    /// returns the metrics a scroll event would carry.
    pub fn scroll_vertically_to(&mut self, top: f32) -> ScrollMetrics {
        let max = (self.content_height() - self.viewport.height).max(0.0);
        self.scroll_top = top.clamp(0.0, max);
        self.metrics()
    }

    /// Simulates the user scrolling the main container horizontally.
    pub fn scroll_horizontally_to(&mut self, left: f32) -> ScrollMetrics {
        let max = (self.content_width() - self.viewport.width).max(0.0);
        self.scroll_left = left.clamp(0.0, max);
        self.metrics()
    }

    /// Whether the media in `row` is currently shown. Rows never touched by
    /// the lifecycle default to shown.
    pub fn is_media_visible(&self, row: &ItemId) -> bool {
        self.media_visible.get(row).copied().unwrap_or(true)
    }

    fn content_width(&self) -> f32 {
        self.ids.len() as f32 * self.card_width
    }

    fn content_height(&self) -> f32 {
        self.ids.len() as f32 * self.row_height
    }

    fn index_of(&self, id: &ItemId) -> Option<usize> {
        self.ids.iter().position(|candidate| candidate == id)
    }

    fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            scroll_left: self.scroll_left,
            scroll_top: self.scroll_top,
            client_width: self.viewport.width,
            client_height: self.viewport.height,
            scroll_width: self.content_width().max(self.viewport.width),
            scroll_height: self.content_height().max(self.viewport.height),
        }
    }
}

impl LayoutProbe for SimulatedSurface {
    fn card_rect(&self, id: &ItemId) -> Option<Rect> {
        let index = self.index_of(id)?;
        Some(Rect::new(
            self.viewport.left + index as f32 * self.card_width - self.content_scroll,
            self.viewport.top,
            self.card_width,
            self.viewport.height,
        ))
    }

    fn content_rect(&self) -> Option<Rect> {
        Some(self.viewport)
    }

    fn row_rect(&self, id: &ItemId) -> Option<Rect> {
        let index = self.index_of(id)?;
        Some(Rect::new(
            self.viewport.left,
            self.viewport.top + index as f32 * self.row_height - self.scroll_top,
            self.viewport.width,
            self.row_height,
        ))
    }

    fn viewport_rect(&self) -> Option<Rect> {
        Some(self.viewport)
    }

    fn scroll_metrics(&self) -> Option<ScrollMetrics> {
        Some(self.metrics())
    }
}

impl ScrollSurface for SimulatedSurface {
    fn scroll_content_by(&mut self, delta: f32, _behavior: ScrollBehavior) {
        let max = (self.content_width() - self.viewport.width).max(0.0);
        self.content_scroll = (self.content_scroll + delta).clamp(0.0, max);
        self.content_scrolls.push(delta);
    }

    fn set_scroll_left(&mut self, offset: f32) {
        self.scroll_left = offset;
        self.scroll_left_writes.push(offset);
    }

    fn set_scroll_top(&mut self, offset: f32) {
        self.scroll_top = offset;
        self.scroll_top_writes.push(offset);
    }
}

impl MediaSink for SimulatedSurface {
    fn set_media_visible(&mut self, row: &ItemId, visible: bool) {
        self.media_visible.insert(row.clone(), visible);
    }

    fn post_stop_command(&mut self, row: &ItemId, _command: &str) -> Result<()> {
        self.stop_commands.push(row.clone());
        Ok(())
    }
}

impl RenderSurface for SimulatedSurface {
    fn layout_changed(&mut self, items: &[TimelineItem], mode: LayoutMode) {
        if self.ids.len() != items.len() || self.ids.iter().zip(items).any(|(id, item)| id != &item.id) {
            self.ids = items.iter().map(|item| item.id.clone()).collect();
        }
        self.mode = Some(mode);
    }
}
