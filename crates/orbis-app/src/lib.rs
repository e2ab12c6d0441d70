//! Orbis desktop application.
//!
//! Owns the window, the event loop and the in-process collaborators the
//! globe talks to: the item list, the selection store and the cursor.

pub mod clock;
pub mod items;
pub mod platform;
pub mod store;
pub mod window;
