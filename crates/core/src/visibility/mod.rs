//! Viewport-driven media lifecycle for vertical layouts.
//!
//! Only rows intersecting the scroll container render live media. Rows that
//! leave the viewport get their media hidden and embedded players stopped.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::{ItemId, LayoutMode, LayoutProbe, Result};

/// Message posted to embedded video frames that scroll out of view.
pub const STOP_VIDEO_COMMAND: &str = r#"{"event":"command","func":"stopVideo","args":""}"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityChange {
    pub row: ItemId,
    pub visible: bool,
}

/// Viewport-intersection primitive.
///
/// Freshly observed rows report their first state on the next poll, like a
/// platform intersection observer does on registration.
pub trait VisibilityObserver {
    fn observe(&mut self, row: ItemId);
    fn unobserve(&mut self, row: &ItemId);
    /// Releases every observation.
    fn disconnect(&mut self);
    fn observed_count(&self) -> usize;
    /// Re-evaluates observed rows against the current layout and drains the
    /// transitions since the last poll.
    fn poll(&mut self, layout: &dyn LayoutProbe) -> Vec<VisibilityChange>;
}

/// Media controls exposed by the row renderer.
pub trait MediaSink {
    /// Shows or hides images and videos inside `row`.
    fn set_media_visible(&mut self, row: &ItemId, visible: bool);

    /// Posts `command` to embedded frames inside `row`. Delivery is best
    /// effort.
    fn post_stop_command(&mut self, row: &ItemId, command: &str) -> Result<()>;
}

/// [`VisibilityObserver`] that tracks rows against the container viewport
/// with a zero threshold.
#[derive(Debug, Default, Clone)]
pub struct ViewportTracker {
    rows: Vec<(ItemId, Option<bool>)>,
}

impl ViewportTracker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VisibilityObserver for ViewportTracker {
    fn observe(&mut self, row: ItemId) {
        if !self.rows.iter().any(|(id, _)| id == &row) {
            self.rows.push((row, None));
        }
    }

    fn unobserve(&mut self, row: &ItemId) {
        self.rows.retain(|(id, _)| id != row);
    }

    fn disconnect(&mut self) {
        self.rows.clear();
    }

    fn observed_count(&self) -> usize {
        self.rows.len()
    }

    fn poll(&mut self, layout: &dyn LayoutProbe) -> Vec<VisibilityChange> {
        let Some(viewport) = layout.viewport_rect() else {
            return Vec::new();
        };

        let mut changes = Vec::new();
        for (row, last) in &mut self.rows {
            // Rows without geometry keep their previous state.
            let Some(rect) = layout.row_rect(row) else {
                continue;
            };
            let visible = rect.intersects(&viewport);
            if *last != Some(visible) {
                *last = Some(visible);
                changes.push(VisibilityChange {
                    row: row.clone(),
                    visible,
                });
            }
        }
        changes
    }
}

/// Owns the observer for the current row set and mode.
#[derive(Debug, Default)]
pub struct MediaLifecycle<O> {
    observer: O,
    hidden: HashSet<ItemId>,
}

impl<O: VisibilityObserver> MediaLifecycle<O> {
    pub fn new(observer: O) -> Self {
        Self {
            observer,
            hidden: HashSet::new(),
        }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn hidden_rows(&self) -> impl Iterator<Item = &ItemId> + '_ {
        self.hidden.iter()
    }

    /// Tears down the previous observation and, for vertical layouts,
    /// observes every row in `rows`.
    pub fn attach<'a, M>(
        &mut self,
        mode: LayoutMode,
        rows: impl IntoIterator<Item = &'a ItemId>,
        sink: &mut M,
    ) where
        M: MediaSink + ?Sized,
    {
        self.detach(sink);
        if !mode.is_vertical() {
            return;
        }
        for row in rows {
            self.observer.observe(row.clone());
        }
        debug!(
            mode = mode.as_str(),
            rows = self.observer.observed_count(),
            "observing rows for media visibility"
        );
    }

    /// Releases every observation and restores media hidden by it.
    pub fn detach<M: MediaSink + ?Sized>(&mut self, sink: &mut M) {
        self.observer.disconnect();
        for row in self.hidden.drain() {
            sink.set_media_visible(&row, true);
        }
    }

    /// Drops every observation without touching the media, for teardown
    /// when the sink is going away as well.
    pub fn release(&mut self) {
        self.observer.disconnect();
        self.hidden.clear();
    }

    pub fn poll(&mut self, layout: &dyn LayoutProbe) -> Vec<VisibilityChange> {
        self.observer.poll(layout)
    }

    /// Applies visibility transitions to the media sink.
    pub fn apply<M: MediaSink + ?Sized>(&mut self, changes: Vec<VisibilityChange>, sink: &mut M) {
        for change in changes {
            sink.set_media_visible(&change.row, change.visible);
            if change.visible {
                self.hidden.remove(&change.row);
                continue;
            }

            if let Err(err) = sink.post_stop_command(&change.row, STOP_VIDEO_COMMAND) {
                warn!(row = %change.row, %err, "could not stop embedded video");
            }
            self.hidden.insert(change.row);
        }
    }
}
