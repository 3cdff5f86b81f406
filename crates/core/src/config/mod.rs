use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Result, TimelineError, TimelineMode};

/// Text density forwarded to the content collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextDensity {
    Low,
    #[default]
    High,
}

/// Top-level configuration for a timeline instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub mode: TimelineMode,
    pub show_all_cards_horizontal: bool,
    pub flip_layout: bool,
    pub disable_nav_on_key: bool,
    pub scrollable: bool,
    pub item_width: f32,
    /// Index that becomes active when the collection is first populated.
    pub active_item_index: usize,
    pub slideshow: bool,
    /// Item updates after the first population are ignored unless set.
    pub allow_dynamic_update: bool,
    pub card_less: bool,
    pub enable_quick_jump: bool,
    pub enable_layout_switch: bool,
    pub disable_toolbar: bool,
    /// Set for timelines nested inside another timeline's card.
    pub is_child: bool,
    pub text_density: TextDensity,
    /// Deferral hosts use before measuring card geometry after a change.
    pub scroll_settle_ms: u64,
    pub unique_id: Option<String>,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            mode: TimelineMode::Horizontal,
            show_all_cards_horizontal: false,
            flip_layout: false,
            disable_nav_on_key: false,
            scrollable: true,
            item_width: 200.0,
            active_item_index: 0,
            slideshow: false,
            allow_dynamic_update: false,
            card_less: false,
            enable_quick_jump: true,
            enable_layout_switch: true,
            disable_toolbar: false,
            is_child: false,
            text_density: TextDensity::High,
            scroll_settle_ms: 100,
            unique_id: None,
        }
    }
}

impl TimelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.item_width.is_finite() || self.item_width <= 0.0 {
            return Err(TimelineError::InvalidConfig(format!(
                "item_width must be a positive number, got {}",
                self.item_width
            )));
        }
        Ok(())
    }
}
