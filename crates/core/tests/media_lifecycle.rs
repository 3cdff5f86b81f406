//! Observer lifecycle across row-set changes and engine teardown.

use std::cell::Cell;
use std::rc::Rc;

use chrono_timeline_core::{
    sample_descriptors, ItemId, LayoutProbe, RecordingHost, SimulatedSurface, TimelineConfig,
    TimelineEngine, TimelineMode, ViewportTracker, VisibilityChange, VisibilityObserver,
};

/// Tracker that also counts how often it was disconnected.
struct CountingObserver {
    inner: ViewportTracker,
    disconnects: Rc<Cell<usize>>,
}

impl VisibilityObserver for CountingObserver {
    fn observe(&mut self, row: ItemId) {
        self.inner.observe(row);
    }

    fn unobserve(&mut self, row: &ItemId) {
        self.inner.unobserve(row);
    }

    fn disconnect(&mut self) {
        self.disconnects.set(self.disconnects.get() + 1);
        self.inner.disconnect();
    }

    fn observed_count(&self) -> usize {
        self.inner.observed_count()
    }

    fn poll(&mut self, layout: &dyn LayoutProbe) -> Vec<VisibilityChange> {
        self.inner.poll(layout)
    }
}

fn vertical_engine(
    disconnects: &Rc<Cell<usize>>,
) -> TimelineEngine<RecordingHost, SimulatedSurface, CountingObserver> {
    let observer = CountingObserver {
        inner: ViewportTracker::new(),
        disconnects: Rc::clone(disconnects),
    };
    TimelineEngine::with_observer(
        TimelineConfig {
            mode: TimelineMode::Vertical,
            allow_dynamic_update: true,
            ..TimelineConfig::default()
        },
        RecordingHost::default(),
        SimulatedSurface::new(),
        observer,
    )
    .unwrap()
}

#[test]
fn dropping_the_engine_disconnects_the_observer() {
    let disconnects = Rc::new(Cell::new(0));
    let mut engine = vertical_engine(&disconnects);
    engine.load_items(Some(&sample_descriptors(3)), 0);
    let before = disconnects.get();

    drop(engine);

    assert_eq!(disconnects.get(), before + 1);
}

#[test]
fn observation_follows_growth_in_vertical_mode() {
    let disconnects = Rc::new(Cell::new(0));
    let mut engine = vertical_engine(&disconnects);
    engine.load_items(Some(&sample_descriptors(3)), 0);
    engine.tick();
    assert_eq!(engine.visibility_observer().observed_count(), 3);

    engine.load_items(Some(&sample_descriptors(6)), 0);
    assert_eq!(engine.visibility_observer().observed_count(), 6);
    engine.tick();

    // Rows 300px tall in a 400px viewport: rows 0 and 1 intersect.
    let ids: Vec<_> = engine.items().iter().map(|item| item.id.clone()).collect();
    let surface = engine.surface();
    assert!(surface.is_media_visible(&ids[1]));
    assert!(!surface.is_media_visible(&ids[5]));
    assert!(surface.stop_commands.contains(&ids[5]));

    let metrics = engine.surface_mut().scroll_vertically_to(1500.0);
    engine.on_scroll(metrics);
    assert!(engine.surface().is_media_visible(&ids[5]));
}
