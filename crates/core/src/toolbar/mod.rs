use serde::Serialize;

use crate::{LayoutMode, TextDensity, TimelineConfig, TimelineItem};

/// Derived state for the toolbar collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolbarState {
    pub visible: bool,
    pub disable_left: bool,
    pub disable_right: bool,
    pub slideshow_enabled: bool,
    pub slideshow_running: bool,
    pub hide_extra_controls: bool,
    pub show_quick_jump: bool,
    pub show_layout_switch: bool,
    pub can_show_density: bool,
    pub text_density: TextDensity,
    pub mode: LayoutMode,
    pub total_items: usize,
}

impl ToolbarState {
    pub fn derive(
        config: &TimelineConfig,
        items: &[TimelineItem],
        active: Option<usize>,
        mode: LayoutMode,
        slideshow_running: bool,
    ) -> Self {
        let total_items = items.len();
        let at_first = active == Some(0);
        let at_last = total_items > 0 && active == Some(total_items - 1);
        let (disable_left, disable_right) = if config.flip_layout {
            (at_last, at_first)
        } else {
            (at_first, at_last)
        };

        Self {
            visible: !config.disable_toolbar && !config.is_child,
            disable_left,
            disable_right,
            slideshow_enabled: config.slideshow,
            slideshow_running,
            hide_extra_controls: config.card_less || slideshow_running,
            show_quick_jump: config.enable_quick_jump,
            show_layout_switch: !config.card_less && config.enable_layout_switch,
            can_show_density: items.iter().all(|item| item.card_detailed_text.is_some()),
            text_density: config.text_density,
            mode,
            total_items,
        }
    }
}
