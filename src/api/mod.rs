//! Compass runtime API
//!
//! This module holds the position state, the compass face renderer, status
//! reporting, and the event-driven controller tying them together.

pub mod state;
pub mod render;
pub mod status;
pub mod compass;

pub use state::{PositionState, StateSnapshot};
pub use render::{Cardinal, CompassRenderer, Element, IconAnchor, RenderSink, Transform};
pub use status::{EnglishCatalog, MessageKey, StatusChannel, StatusSink, TextCatalog};
pub use compass::{CompassPipeline, LandmarkCompass};
