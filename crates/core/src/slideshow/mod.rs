use serde::Serialize;

/// Autoplay state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SlideshowState {
    #[default]
    Idle,
    Running,
    Paused,
}

/// What the engine should do with an "elapsed" signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Activate the given index.
    To(usize),
    /// The last item was reached; autoplay stops.
    Complete,
    /// Autoplay is not running; the signal is dropped.
    Ignored,
}

/// Autoplay state machine. Never wraps: reaching the last item stops it.
#[derive(Debug, Default, Clone)]
pub struct Slideshow {
    state: SlideshowState,
    restart_pending: bool,
}

impl Slideshow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SlideshowState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SlideshowState::Running
    }

    pub fn is_restart_pending(&self) -> bool {
        self.restart_pending
    }

    /// First phase of a restart. The caller blanks the active item and
    /// schedules [`Slideshow::start`] for a later tick.
    pub fn begin_restart(&mut self, item_count: usize) -> bool {
        if item_count == 0 {
            return false;
        }
        self.state = SlideshowState::Idle;
        self.restart_pending = true;
        true
    }

    /// Second phase of a restart. Returns the index to activate, or `None`
    /// when the restart was abandoned in between.
    pub fn start(&mut self, item_count: usize) -> Option<usize> {
        if !std::mem::take(&mut self.restart_pending) || item_count == 0 {
            return None;
        }
        self.state = SlideshowState::Running;
        Some(0)
    }

    pub fn pause(&mut self) {
        self.restart_pending = false;
        if self.state == SlideshowState::Running {
            self.state = SlideshowState::Paused;
        }
    }

    pub fn stop(&mut self) {
        self.restart_pending = false;
        self.state = SlideshowState::Idle;
    }

    /// Decides how to react to an item's dwell time elapsing.
    pub fn on_elapsed(&self, elapsed_index: usize, item_count: usize) -> Advance {
        if !self.is_running() {
            return Advance::Ignored;
        }
        if elapsed_index + 1 < item_count {
            Advance::To(elapsed_index + 1)
        } else {
            Advance::Complete
        }
    }

    /// Called after every committed index change.
    pub fn observe_index(&mut self, index: usize, item_count: usize) -> bool {
        if self.is_running() && index + 1 >= item_count {
            self.state = SlideshowState::Idle;
            return true;
        }
        false
    }
}
