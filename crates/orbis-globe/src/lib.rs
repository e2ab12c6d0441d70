//! Globe assembly: markers, idle animation, texture readiness and the
//! interaction glue that turns pointer frames into hover, selection and
//! fly-to.
//!
//! Everything here is CPU state. `orbis-render` reads it to draw a frame.

pub mod arena;
pub mod collab;
pub mod globe;
pub mod marker;
pub mod scene;

pub use arena::{MarkerArena, MarkerHandle};
pub use collab::{
    Category, CursorHint, CursorSink, Item, ItemCatalog, ItemId, LoadingSink, SelectionSink, UnknownCategory,
};
pub use globe::{CloudLayer, Globe, GlobeMaterial, MarkerDraw};
pub use marker::{Marker, MarkerEvent, MarkerState, MarkerStyle, MarkerVisual, Pulse};
pub use scene::Scene;
