//! Pointer input for orbit navigation and marker picking.

pub mod pointer;

pub use pointer::{PointerFrame, PointerState};
