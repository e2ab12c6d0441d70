//! Globe texture loading.
//!
//! Image files are decoded to RGBA8 on worker threads. The main thread polls
//! finished decodes once per frame and collects them into a [`TextureSet`],
//! which substitutes a neutral texel for any channel that failed.

mod channel;
mod error;
mod loader;
mod set;

pub use channel::{DecodedImage, TextureChannel, TextureSource};
pub use error::AssetError;
pub use loader::{LoadResult, TextureLoader};
pub use set::TextureSet;
