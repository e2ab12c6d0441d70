//! Collected globe textures with neutral fallbacks.

use crate::channel::{DecodedImage, TextureChannel};
use crate::loader::LoadResult;

/// The five globe textures as they resolve.
///
/// A channel is resolved once it has either loaded or failed. Failed
/// channels read back as their 1×1 neutral image.
#[derive(Debug, Default)]
pub struct TextureSet {
    images: [Option<DecodedImage>; TextureChannel::COUNT],
    failed: [bool; TextureChannel::COUNT],
}

impl TextureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a finished decode. A later result for the same channel is
    /// ignored, since textures are read-only once resolved.
    pub fn record(&mut self, result: LoadResult) {
        let i = result.channel.index();
        if self.images[i].is_some() {
            tracing::debug!(channel = %result.channel, "duplicate texture result ignored");
            return;
        }
        match result.image {
            Ok(image) => {
                tracing::info!(
                    channel = %result.channel,
                    width = image.width,
                    height = image.height,
                    decode_us = result.decode_time_us,
                    "texture loaded"
                );
                self.images[i] = Some(image);
            }
            Err(err) => {
                tracing::warn!(
                    channel = %result.channel,
                    error = %err,
                    "texture failed to load, using neutral fallback"
                );
                self.images[i] = Some(DecodedImage::neutral(result.channel));
                self.failed[i] = true;
            }
        }
    }

    pub fn is_resolved(&self, channel: TextureChannel) -> bool {
        self.images[channel.index()].is_some()
    }

    /// Every channel has loaded or fallen back.
    pub fn is_complete(&self) -> bool {
        self.images.iter().all(Option::is_some)
    }

    pub fn has_failed(&self, channel: TextureChannel) -> bool {
        self.failed[channel.index()]
    }

    pub fn failed_channels(&self) -> impl Iterator<Item = TextureChannel> + '_ {
        TextureChannel::ALL.into_iter().filter(|c| self.has_failed(*c))
    }

    /// The resolved image, if any.
    pub fn get(&self, channel: TextureChannel) -> Option<&DecodedImage> {
        self.images[channel.index()].as_ref()
    }

    /// Take the resolved image out for upload, leaving the neutral image.
    pub fn take(&mut self, channel: TextureChannel) -> DecodedImage {
        match &mut self.images[channel.index()] {
            Some(image) => std::mem::replace(image, DecodedImage::neutral(channel)),
            None => DecodedImage::neutral(channel),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::error::AssetError;

    fn ok(channel: TextureChannel) -> LoadResult {
        LoadResult {
            channel,
            path: PathBuf::from("ok.png"),
            image: Ok(DecodedImage {
                width: 2,
                height: 1,
                pixels: vec![9; 8],
            }),
            decode_time_us: 10,
        }
    }

    fn failed(channel: TextureChannel) -> LoadResult {
        LoadResult {
            channel,
            path: PathBuf::from("bad.png"),
            image: Err(AssetError::ZeroSized {
                path: PathBuf::from("bad.png"),
            }),
            decode_time_us: 1,
        }
    }

    #[test]
    fn test_complete_after_all_channels_resolve() {
        let mut set = TextureSet::new();
        for c in TextureChannel::ALL {
            assert!(!set.is_complete());
            set.record(if c == TextureChannel::Bump { failed(c) } else { ok(c) });
        }
        assert!(set.is_complete(), "partial failure still completes");
        assert_eq!(set.failed_channels().collect::<Vec<_>>(), vec![TextureChannel::Bump]);
    }

    #[test]
    fn test_failed_channel_uses_neutral() {
        let mut set = TextureSet::new();
        set.record(failed(TextureChannel::Clouds));
        let img = set.get(TextureChannel::Clouds).unwrap();
        assert_eq!(img.pixels, vec![0, 0, 0, 0]);
        assert!(set.has_failed(TextureChannel::Clouds));
    }

    #[test]
    fn test_first_result_wins() {
        let mut set = TextureSet::new();
        set.record(ok(TextureChannel::Diffuse));
        set.record(failed(TextureChannel::Diffuse));
        assert!(!set.has_failed(TextureChannel::Diffuse));
        assert_eq!(set.get(TextureChannel::Diffuse).unwrap().width, 2);
    }

    #[test]
    fn test_take_leaves_neutral() {
        let mut set = TextureSet::new();
        set.record(ok(TextureChannel::Specular));
        let img = set.take(TextureChannel::Specular);
        assert_eq!(img.width, 2);
        assert_eq!(set.get(TextureChannel::Specular).unwrap().width, 1);
        // Unresolved channels hand out the neutral image.
        assert_eq!(set.take(TextureChannel::Bump).pixels, vec![128, 128, 255, 255]);
        assert!(!set.is_resolved(TextureChannel::Bump));
    }
}
