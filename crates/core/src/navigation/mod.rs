//! Translation of navigation intents into a bounded target index.
//!
//! Everything here is pure: the engine feeds in the current index and item
//! count and applies whatever index comes back.

use serde::Serialize;

use crate::{LayoutMode, TimelineItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationIntent {
    Next,
    Previous,
    First,
    Last,
    JumpTo(usize),
}

impl NavigationIntent {
    /// Stepping intents only act once the timeline has received focus.
    pub fn requires_focus(self) -> bool {
        matches!(self, Self::Next | Self::Previous)
    }
}

/// Both views of "the current index".
///
/// `internal` moves synchronously when an intent is resolved and is the
/// authority for the next computation. `external` is what consumers observe;
/// it is reconciled to `internal` by [`NavigationState::commit`] in the same
/// tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationState {
    pub external: Option<usize>,
    pub internal: usize,
    pub has_focus: bool,
}

impl NavigationState {
    pub fn new(initial: usize) -> Self {
        Self {
            external: Some(initial),
            internal: initial,
            has_focus: false,
        }
    }

    pub fn grant_focus(&mut self) {
        self.has_focus = true;
    }

    /// Publishes `index` as the externally visible active index. Blanking
    /// (`None`) leaves the internal index where it was.
    pub fn commit(&mut self, index: Option<usize>) {
        if let Some(index) = index {
            self.internal = index;
        }
        self.external = index;
    }

    pub fn is_converged(&self) -> bool {
        self.external == Some(self.internal)
    }
}

/// Resolves `intent` against the current position. Returns `None` when the
/// intent is a no-op: empty collection, or a step issued without focus.
pub fn resolve(
    intent: NavigationIntent,
    current: usize,
    item_count: usize,
    has_focus: bool,
) -> Option<usize> {
    if item_count == 0 {
        return None;
    }
    if intent.requires_focus() && !has_focus {
        return None;
    }

    let last = item_count - 1;
    let current = current.min(last);
    let target = match intent {
        NavigationIntent::Next => (current + 1).min(last),
        NavigationIntent::Previous => current.saturating_sub(1),
        NavigationIntent::First => 0,
        NavigationIntent::Last => last,
        NavigationIntent::JumpTo(index) => index.min(last),
    };
    Some(target)
}

/// Keys the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowRight,
    ArrowLeft,
    ArrowDown,
    ArrowUp,
    Home,
    End,
    Escape,
    Other,
}

impl Key {
    /// Parses DOM-style key names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowRight" => Self::ArrowRight,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowDown" => Self::ArrowDown,
            "ArrowUp" => Self::ArrowUp,
            "Home" => Self::Home,
            "End" => Self::End,
            "Escape" => Self::Escape,
            _ => Self::Other,
        }
    }
}

/// Maps a key press to a navigation intent for the given layout.
///
/// Flip only inverts the horizontal arrows; vertical arrows and Home/End are
/// unaffected.
pub fn map_key(key: Key, mode: LayoutMode, flip_layout: bool) -> Option<NavigationIntent> {
    match key {
        Key::ArrowRight if mode.is_horizontal() => Some(if flip_layout {
            NavigationIntent::Previous
        } else {
            NavigationIntent::Next
        }),
        Key::ArrowLeft if mode.is_horizontal() => Some(if flip_layout {
            NavigationIntent::Next
        } else {
            NavigationIntent::Previous
        }),
        Key::ArrowDown if mode.is_vertical() => Some(NavigationIntent::Next),
        Key::ArrowUp if mode.is_vertical() => Some(NavigationIntent::Previous),
        Key::Home => Some(NavigationIntent::First),
        Key::End => Some(NavigationIntent::Last),
        _ => None,
    }
}

/// Payload of the "item selected" notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSelection {
    pub title: String,
    pub card_title: Option<String>,
    pub card_subtitle: Option<String>,
    pub card_detailed_text: Option<String>,
    pub index: usize,
}

impl ItemSelection {
    pub fn new(item: &TimelineItem, index: usize) -> Self {
        Self {
            title: item.title.clone(),
            card_title: item.card_title.clone(),
            card_subtitle: item.card_subtitle.clone(),
            card_detailed_text: item.card_detailed_text.clone(),
            index,
        }
    }
}
