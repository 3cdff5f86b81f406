//! Core library for the Chrono timeline.
//!
//! The crate owns "what is current" for an interactive timeline: which item
//! is active, how navigation intents resolve, where the scroll containers
//! should sit, which rows may render live media, and whether autoplay is
//! running. Rendering itself stays with the collaborators behind
//! [`TimelineHost`] and [`RenderSurface`].

pub mod config;
pub mod engine;
pub mod error;
pub mod items;
pub mod layout;
pub mod mode;
pub mod navigation;
pub mod scroll;
pub mod simulation;
pub mod slideshow;
pub mod toolbar;
pub mod visibility;

pub use config::{TextDensity, TimelineConfig};
pub use engine::{Deferred, RenderSurface, TimelineEngine, TimelineHost};
pub use error::{Result, TimelineError};
pub use items::{ItemDescriptor, ItemId, ItemStore, TimelineItem};
pub use layout::{LayoutProbe, Rect, ScrollBehavior, ScrollMetrics};
pub use mode::{LayoutMode, ModeSwitch, TimelineMode};
pub use navigation::{map_key, resolve, ItemSelection, Key, NavigationIntent, NavigationState};
pub use scroll::{is_scroll_end, ScrollAnchor, ScrollDelta, ScrollSurface, ScrollSynchronizer};
pub use simulation::{sample_descriptors, RecordingHost, SimulatedSurface};
pub use slideshow::{Advance, Slideshow, SlideshowState};
pub use toolbar::ToolbarState;
pub use visibility::{
    MediaLifecycle, MediaSink, VisibilityChange, VisibilityObserver, ViewportTracker,
    STOP_VIDEO_COMMAND,
};
