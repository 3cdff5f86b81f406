//! The timeline engine: owns the item store and routes every navigation
//! intent through one commit path.
//!
//! The engine runs on a cooperative loop. Public methods apply their
//! synchronous effects before returning and may queue deferred work that
//! only runs on the next [`TimelineEngine::tick`].

use std::collections::VecDeque;
use std::time::Duration;

use tracing::{debug, info};

use crate::{
    is_scroll_end, map_key, resolve, Advance, ItemDescriptor, ItemId, ItemSelection, ItemStore,
    Key, LayoutMode, MediaLifecycle, MediaSink, ModeSwitch, NavigationIntent, NavigationState,
    Result, ScrollAnchor, ScrollDelta, ScrollMetrics, ScrollSurface, ScrollSynchronizer,
    Slideshow, SlideshowState, TextDensity, TimelineConfig, TimelineItem, ToolbarState,
    ViewportTracker, VisibilityObserver,
};

/// Notifications the engine sends to the host application.
pub trait TimelineHost {
    /// Fired on every resolved active-item change, including re-commits of
    /// the same index.
    fn item_selected(&mut self, _selection: &ItemSelection) {}

    /// Fired when the main container reaches its trailing edge.
    fn scroll_end(&mut self) {}

    /// Tracks whether every horizontal card is shown at once.
    fn horizontal_all_cards(&mut self, _shown: bool) {}

    fn text_density(&mut self, _density: TextDensity) {}
}

/// Everything the engine needs from the rendering collaborator.
pub trait RenderSurface: ScrollSurface + MediaSink {
    /// Called after the item flags or the layout mode changed, before any
    /// geometry is queried for the new state.
    fn layout_changed(&mut self, _items: &[TimelineItem], _mode: LayoutMode) {}
}

/// Work scheduled for a later tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deferred {
    /// Second phase of a slideshow restart.
    StartSlideshow,
    /// Centre the given card once layout has settled.
    MeasureScroll(ItemId),
    /// Deliver the first intersection results after (re)attaching.
    RefreshVisibility,
}

pub struct TimelineEngine<H, S, O: VisibilityObserver = ViewportTracker> {
    config: TimelineConfig,
    timeline_id: String,
    store: ItemStore,
    populated: bool,
    last_descriptors: Option<Vec<ItemDescriptor>>,
    nav: NavigationState,
    slideshow: Slideshow,
    modes: ModeSwitch,
    scroll: ScrollSynchronizer,
    media: MediaLifecycle<O>,
    queue: VecDeque<Deferred>,
    host: H,
    surface: S,
}

impl<H: TimelineHost, S: RenderSurface> TimelineEngine<H, S, ViewportTracker> {
    pub fn new(config: TimelineConfig, host: H, surface: S) -> Result<Self> {
        Self::with_observer(config, host, surface, ViewportTracker::new())
    }
}

impl<H: TimelineHost, S: RenderSurface, O: VisibilityObserver> TimelineEngine<H, S, O> {
    pub fn with_observer(config: TimelineConfig, host: H, surface: S, observer: O) -> Result<Self> {
        config.validate()?;
        let timeline_id = match &config.unique_id {
            Some(id) => format!("timeline-{id}"),
            None => format!("timeline-{}", ItemId::generate()),
        };

        Ok(Self {
            timeline_id,
            store: ItemStore::new(),
            populated: false,
            last_descriptors: None,
            nav: NavigationState::new(config.active_item_index),
            slideshow: Slideshow::new(),
            modes: ModeSwitch::new(config.mode, config.show_all_cards_horizontal),
            scroll: ScrollSynchronizer::new(config.item_width),
            media: MediaLifecycle::new(observer),
            queue: VecDeque::new(),
            host,
            surface,
            config,
        })
    }

    // ----- item collection -------------------------------------------------

    /// Feeds the externally supplied item collection. `None` or an empty
    /// collection derives `child_count` placeholder items instead.
    ///
    /// After the first population, updates are ignored unless dynamic
    /// updates are enabled.
    pub fn load_items(&mut self, items: Option<&[ItemDescriptor]>, child_count: usize) {
        if self.populated && !self.config.allow_dynamic_update {
            debug!(timeline = %self.timeline_id, "dynamic updates disabled, ignoring items");
            return;
        }

        let initial = self.config.active_item_index;
        let active = match items.filter(|items| !items.is_empty()) {
            None => {
                self.last_descriptors = None;
                self.store.derive_from_children(child_count, initial)
            }
            Some(items) => {
                if self.last_descriptors.as_deref() == Some(items) {
                    return;
                }
                let previous_len = self.store.len();
                let active = if previous_len > 0 && items.len() > previous_len {
                    debug!(previous_len, len = items.len(), "appending timeline items");
                    self.store.grow(items, previous_len)
                } else {
                    debug!(len = items.len(), "replacing timeline items");
                    self.store.replace(items, initial)
                };
                self.last_descriptors = Some(items.to_vec());
                active
            }
        };

        self.populated = true;
        self.reattach_media();
        self.commit(active);
    }

    pub fn items(&self) -> &[TimelineItem] {
        self.store.items()
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    // ----- navigation ------------------------------------------------------

    pub fn next(&mut self) -> Option<usize> {
        self.navigate(NavigationIntent::Next)
    }

    pub fn previous(&mut self) -> Option<usize> {
        self.navigate(NavigationIntent::Previous)
    }

    pub fn first(&mut self) -> Option<usize> {
        self.navigate(NavigationIntent::First)
    }

    pub fn last(&mut self) -> Option<usize> {
        self.navigate(NavigationIntent::Last)
    }

    /// Outline, quick-jump and card selection. Out-of-range indices clamp.
    pub fn jump_to(&mut self, index: usize) -> Option<usize> {
        self.navigate(NavigationIntent::JumpTo(index))
    }

    pub fn on_outline_selection(&mut self, index: usize) -> Option<usize> {
        self.jump_to(index)
    }

    /// Resolves `intent` against the internal index and commits the result.
    pub fn navigate(&mut self, intent: NavigationIntent) -> Option<usize> {
        let Some(target) = resolve(intent, self.nav.internal, self.store.len(), self.nav.has_focus)
        else {
            debug!(?intent, focus = self.nav.has_focus, "navigation ignored");
            return None;
        };

        self.nav.internal = target;
        self.commit(Some(target))
    }

    /// Host-driven change of the active index. Always re-emits the
    /// selection, even when the index did not change.
    pub fn set_active_index(&mut self, index: usize) -> Option<usize> {
        if self.store.is_empty() {
            return None;
        }
        self.commit(Some(index))
    }

    /// Card click or quick-jump by id. With `from_slideshow`, the item after
    /// `id` becomes active unless `id` is the last item.
    pub fn activate_item(&mut self, id: &ItemId, from_slideshow: bool) -> Option<usize> {
        let Some(index) = self.store.position(id) else {
            debug!(item = %id, "activation for unknown item ignored");
            return None;
        };

        self.nav.internal = index;
        let target = if from_slideshow && index + 1 < self.store.len() {
            index + 1
        } else {
            index
        };
        self.commit(Some(target))
    }

    /// Renderer signal that the dwell time of `id` has elapsed.
    pub fn on_elapsed(&mut self, id: &ItemId) -> Option<usize> {
        let index = self.store.position(id)?;
        match self.slideshow.on_elapsed(index, self.store.len()) {
            Advance::To(_) => self.activate_item(id, true),
            Advance::Complete => {
                info!(timeline = %self.timeline_id, "slideshow complete");
                self.slideshow.stop();
                None
            }
            Advance::Ignored => {
                debug!(item = %id, "elapsed signal outside slideshow ignored");
                None
            }
        }
    }

    // ----- input -----------------------------------------------------------

    pub fn pointer_down(&mut self) {
        self.nav.grant_focus();
    }

    /// A key press grants focus and is mapped for the current layout.
    pub fn key_down(&mut self, key: Key) -> Option<usize> {
        if self.config.disable_nav_on_key || self.slideshow.is_running() {
            return None;
        }
        self.nav.grant_focus();
        let intent = map_key(key, self.modes.current(), self.config.flip_layout)?;
        self.navigate(intent)
    }

    /// Escape pauses autoplay, but only while the timeline holds focus.
    pub fn key_up(&mut self, key: Key) {
        if key == Key::Escape && self.nav.has_focus {
            self.pause();
        }
    }

    // ----- slideshow -------------------------------------------------------

    /// Blanks the active item now and starts autoplay from the first item on
    /// the next tick.
    pub fn restart_slideshow(&mut self) {
        if !self.slideshow.begin_restart(self.store.len()) {
            debug!("slideshow cannot start without items");
            return;
        }
        self.commit(None);
        self.queue.push_back(Deferred::StartSlideshow);
    }

    pub fn pause(&mut self) {
        if self.slideshow.is_running() {
            info!(timeline = %self.timeline_id, "slideshow paused");
        }
        self.slideshow.pause();
    }

    pub fn slideshow_state(&self) -> SlideshowState {
        self.slideshow.state()
    }

    // ----- mode & passthrough ----------------------------------------------

    pub fn switch_mode(&mut self, mode: LayoutMode) {
        debug!(from = self.modes.current().as_str(), to = mode.as_str(), "switching mode");
        if let Some(shown) = self.modes.switch_to(mode) {
            self.host.horizontal_all_cards(shown);
        }
        self.reattach_media();
        self.schedule_measure();
    }

    pub fn mode(&self) -> LayoutMode {
        self.modes.current()
    }

    pub fn set_text_density(&mut self, density: TextDensity) {
        self.config.text_density = density;
        self.host.text_density(density);
    }

    // ----- scrolling & visibility ------------------------------------------

    /// Merges a renderer-reported partial scroll and re-applies the offset.
    pub fn auto_scroll(&mut self, delta: ScrollDelta) {
        let mode = self.modes.current();
        let metrics = self.surface.scroll_metrics();
        if self.scroll.merge(mode, &delta, metrics).is_some() {
            self.scroll.apply(mode, &mut self.surface);
        }
    }

    /// Scroll event from the main container.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) {
        if is_scroll_end(self.modes.current(), self.config.flip_layout, &metrics) {
            self.host.scroll_end();
        }
        self.refresh_visibility();
    }

    pub fn refresh_visibility(&mut self) {
        let changes = self.media.poll(&self.surface);
        self.media.apply(changes, &mut self.surface);
    }

    pub fn scroll_anchor(&self) -> Option<ScrollAnchor> {
        self.scroll.anchor()
    }

    /// User scrolling is disabled while the slideshow runs.
    pub fn is_scrollable(&self) -> bool {
        !self.slideshow.is_running() && self.config.scrollable
    }

    // ----- scheduling ------------------------------------------------------

    /// Runs the tasks queued before this call. Tasks they queue wait for the
    /// next tick. Returns how many tasks ran.
    pub fn tick(&mut self) -> usize {
        let batch = self.queue.len();
        for _ in 0..batch {
            let Some(task) = self.queue.pop_front() else {
                break;
            };
            self.run(task);
        }
        batch
    }

    pub fn pending(&self) -> impl Iterator<Item = &Deferred> + '_ {
        self.queue.iter()
    }

    /// Deferral hosts may wait before calling [`TimelineEngine::tick`] so
    /// that card geometry has settled.
    pub fn scroll_settle(&self) -> Duration {
        Duration::from_millis(self.config.scroll_settle_ms)
    }

    fn run(&mut self, task: Deferred) {
        match task {
            Deferred::StartSlideshow => {
                if let Some(index) = self.slideshow.start(self.store.len()) {
                    info!(timeline = %self.timeline_id, "slideshow running");
                    self.nav.internal = index;
                    self.commit(Some(index));
                }
            }
            Deferred::MeasureScroll(id) => {
                if self.store.position(&id).is_none() {
                    debug!(item = %id, "stale scroll measurement skipped");
                    return;
                }
                let mode = self.modes.current();
                self.scroll.center_active(mode, &id, &mut self.surface);
            }
            Deferred::RefreshVisibility => self.refresh_visibility(),
        }
    }

    // ----- state -----------------------------------------------------------

    /// Externally visible active index; `None` while blanked or empty.
    pub fn active_index(&self) -> Option<usize> {
        self.nav.external
    }

    pub fn navigation(&self) -> NavigationState {
        self.nav
    }

    pub fn has_focus(&self) -> bool {
        self.nav.has_focus
    }

    pub fn toolbar(&self) -> ToolbarState {
        ToolbarState::derive(
            &self.config,
            self.store.items(),
            self.nav.external,
            self.modes.current(),
            self.slideshow.is_running(),
        )
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn timeline_id(&self) -> &str {
        &self.timeline_id
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn visibility_observer(&self) -> &O {
        self.media.observer()
    }

    /// The single place where the active index changes.
    fn commit(&mut self, index: Option<usize>) -> Option<usize> {
        let resolved = self.store.set_active(index);
        self.nav.commit(resolved);
        self.surface.layout_changed(self.store.items(), self.modes.current());

        let active = resolved?;

        if self.slideshow.observe_index(active, self.store.len()) {
            info!(timeline = %self.timeline_id, "slideshow reached the last item");
        }

        if let Some(item) = self.store.get(active) {
            let selection = ItemSelection::new(item, self.nav.internal);
            self.host.item_selected(&selection);
        }
        self.schedule_measure();
        resolved
    }

    fn schedule_measure(&mut self) {
        if !self.modes.current().is_horizontal() {
            return;
        }
        if let Some(item) = self.store.active_item() {
            self.queue.push_back(Deferred::MeasureScroll(item.id.clone()));
        }
    }

    fn reattach_media(&mut self) {
        let mode = self.modes.current();
        self.surface.layout_changed(self.store.items(), mode);
        self.media.attach(mode, self.store.ids(), &mut self.surface);
        if mode.is_vertical() && !self.store.is_empty() {
            self.queue.push_back(Deferred::RefreshVisibility);
        }
    }
}

impl<H, S, O: VisibilityObserver> Drop for TimelineEngine<H, S, O> {
    fn drop(&mut self) {
        self.media.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{sample_descriptors, RecordingHost, SimulatedSurface};

    fn engine(config: TimelineConfig, count: usize) -> TimelineEngine<RecordingHost, SimulatedSurface> {
        let mut engine =
            TimelineEngine::new(config, RecordingHost::default(), SimulatedSurface::new()).unwrap();
        engine.load_items(Some(&sample_descriptors(count)), 0);
        engine
    }

    #[test]
    fn population_emits_initial_selection() {
        let engine = engine(TimelineConfig::default(), 3);
        assert_eq!(engine.active_index(), Some(0));
        assert_eq!(engine.host().selected_indices(), vec![0]);
    }

    #[test]
    fn steps_need_focus() {
        let mut engine = engine(TimelineConfig::default(), 3);
        assert_eq!(engine.next(), None);
        engine.pointer_down();
        assert_eq!(engine.next(), Some(1));
        assert!(engine.navigation().is_converged());
    }

    #[test]
    fn reselecting_same_index_re_emits() {
        let mut engine = engine(TimelineConfig::default(), 3);
        engine.set_active_index(0);
        engine.set_active_index(0);
        assert_eq!(engine.host().selected_indices(), vec![0, 0, 0]);
    }

    #[test]
    fn empty_collection_suppresses_everything() {
        let mut engine =
            TimelineEngine::new(TimelineConfig::default(), RecordingHost::default(), SimulatedSurface::new())
                .unwrap();
        engine.load_items(None, 0);
        engine.pointer_down();
        assert_eq!(engine.next(), None);
        assert_eq!(engine.last(), None);
        engine.restart_slideshow();
        assert_eq!(engine.tick(), 0);
        assert!(engine.host().selected.is_empty());
        assert_eq!(engine.slideshow_state(), SlideshowState::Idle);
    }

    #[test]
    fn static_collection_ignores_later_updates() {
        let mut engine = engine(TimelineConfig::default(), 3);
        engine.load_items(Some(&sample_descriptors(5)), 0);
        assert_eq!(engine.items().len(), 3);
    }

    #[test]
    fn slideshow_click_advances_past_item() {
        let mut engine = engine(TimelineConfig::default(), 3);
        let id = engine.items()[0].id.clone();
        assert_eq!(engine.activate_item(&id, true), Some(1));
        let last = engine.items()[2].id.clone();
        assert_eq!(engine.activate_item(&last, true), Some(2));
        assert_eq!(engine.activate_item(&ItemId::from("missing"), false), None);
    }

    #[test]
    fn keys_are_ignored_while_slideshow_runs() {
        let mut engine = engine(TimelineConfig::default(), 3);
        engine.restart_slideshow();
        engine.tick();
        assert_eq!(engine.key_down(Key::End), None);
        engine.pointer_down();
        engine.key_up(Key::Escape);
        assert_eq!(engine.slideshow_state(), SlideshowState::Paused);
        assert_eq!(engine.active_index(), Some(0));
        assert_eq!(engine.key_down(Key::End), Some(2));
    }

    #[test]
    fn escape_without_focus_keeps_slideshow_running() {
        let mut engine = engine(TimelineConfig::default(), 3);
        engine.restart_slideshow();
        engine.tick();
        engine.key_up(Key::Escape);
        assert_eq!(engine.slideshow_state(), SlideshowState::Running);
    }

    #[test]
    fn disabled_key_navigation_does_not_grant_focus() {
        let config = TimelineConfig {
            disable_nav_on_key: true,
            ..TimelineConfig::default()
        };
        let mut engine = engine(config, 3);
        assert_eq!(engine.key_down(Key::ArrowRight), None);
        assert!(!engine.has_focus());
    }

    #[test]
    fn horizontal_commits_centre_after_tick() {
        let mut engine = engine(TimelineConfig::default(), 5);
        engine.tick();
        engine.surface_mut().content_scrolls.clear();

        engine.jump_to(4);
        assert!(engine.surface().content_scrolls.is_empty());
        assert_eq!(
            engine.pending().cloned().collect::<Vec<_>>(),
            vec![Deferred::MeasureScroll(engine.items()[4].id.clone())]
        );
        engine.tick();
        assert_eq!(engine.surface().content_scrolls.len(), 1);
        assert!(engine.scroll_anchor().is_some());
    }

    #[test]
    fn scroll_end_is_reported() {
        let config = TimelineConfig {
            mode: crate::TimelineMode::Vertical,
            ..TimelineConfig::default()
        };
        let mut engine = engine(config, 3);
        engine.on_scroll(ScrollMetrics {
            scroll_top: 600.0,
            client_height: 400.0,
            scroll_height: 1000.0,
            ..Default::default()
        });
        assert_eq!(engine.host().scroll_ends, 1);
    }

    #[test]
    fn auto_scroll_applies_vertical_offset() {
        let config = TimelineConfig {
            mode: crate::TimelineMode::Vertical,
            ..TimelineConfig::default()
        };
        let mut engine = engine(config, 3);
        engine.auto_scroll(ScrollDelta {
            scroll_top: Some(250.0),
            ..Default::default()
        });
        engine.auto_scroll(ScrollDelta {
            scroll_top: Some(250.0),
            ..Default::default()
        });
        assert_eq!(engine.surface().scroll_top_writes, vec![250.0]);
    }

    #[test]
    fn density_passes_through() {
        let mut engine = engine(TimelineConfig::default(), 2);
        engine.set_text_density(TextDensity::Low);
        assert_eq!(engine.host().densities, vec![TextDensity::Low]);
        assert_eq!(engine.toolbar().text_density, TextDensity::Low);
    }

    #[test]
    fn scrollable_only_outside_slideshow() {
        let mut engine = engine(TimelineConfig::default(), 3);
        assert!(engine.is_scrollable());
        engine.restart_slideshow();
        engine.tick();
        assert!(!engine.is_scrollable());
    }

    #[test]
    fn fixed_unique_id_is_used() {
        let config = TimelineConfig {
            unique_id: Some("history".to_string()),
            ..TimelineConfig::default()
        };
        let engine = engine(config, 1);
        assert_eq!(engine.timeline_id(), "timeline-history");
    }
}
