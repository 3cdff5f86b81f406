use serde::{Deserialize, Serialize};

/// Layout requested by the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimelineMode {
    #[default]
    Horizontal,
    Vertical,
    VerticalAlternating,
}

/// Layout the engine is currently rendering.
///
/// `HorizontalAll` is an internal refinement of [`TimelineMode::Horizontal`]
/// that shows every card at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutMode {
    Horizontal,
    HorizontalAll,
    Vertical,
    VerticalAlternating,
}

impl LayoutMode {
    /// Derives the initial layout from the configured mode and the
    /// "show all cards" setting.
    pub fn initial(mode: TimelineMode, show_all_cards_horizontal: bool) -> Self {
        match mode {
            TimelineMode::Horizontal if show_all_cards_horizontal => Self::HorizontalAll,
            TimelineMode::Horizontal => Self::Horizontal,
            TimelineMode::Vertical => Self::Vertical,
            TimelineMode::VerticalAlternating => Self::VerticalAlternating,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Horizontal | Self::HorizontalAll)
    }

    pub fn is_vertical(self) -> bool {
        !self.is_horizontal()
    }

    /// Lower-case name used in class names and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::HorizontalAll => "horizontal_all",
            Self::Vertical => "vertical",
            Self::VerticalAlternating => "vertical_alternating",
        }
    }
}

impl std::str::FromStr for LayoutMode {
    type Err = crate::TimelineError;

    fn from_str(value: &str) -> crate::Result<Self> {
        match value.to_ascii_lowercase().replace('-', "_").as_str() {
            "horizontal" => Ok(Self::Horizontal),
            "horizontal_all" => Ok(Self::HorizontalAll),
            "vertical" => Ok(Self::Vertical),
            "vertical_alternating" => Ok(Self::VerticalAlternating),
            other => Err(crate::TimelineError::msg(format!(
                "unknown layout mode `{other}`"
            ))),
        }
    }
}

/// Owns the authoritative rendering mode.
///
/// The mode is derived once at creation; later changes only happen through
/// [`ModeSwitch::switch_to`].
#[derive(Debug, Clone)]
pub struct ModeSwitch {
    current: LayoutMode,
}

impl ModeSwitch {
    pub fn new(mode: TimelineMode, show_all_cards_horizontal: bool) -> Self {
        Self {
            current: LayoutMode::initial(mode, show_all_cards_horizontal),
        }
    }

    pub fn current(&self) -> LayoutMode {
        self.current
    }

    /// Updates the current mode and returns the value the external
    /// "all cards shown" flag must be set to, if the switch touches it.
    pub fn switch_to(&mut self, mode: LayoutMode) -> Option<bool> {
        self.current = mode;
        match mode {
            LayoutMode::HorizontalAll => Some(true),
            LayoutMode::Horizontal => Some(false),
            LayoutMode::Vertical | LayoutMode::VerticalAlternating => None,
        }
    }
}
