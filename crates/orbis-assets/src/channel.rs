//! Texture channels, their sources and decoded pixel data.

use std::fmt;
use std::path::{Path, PathBuf};

use orbis_config::TextureConfig;

use crate::error::AssetError;

/// One texture layer of the globe material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureChannel {
    /// Daytime surface colour.
    Diffuse,
    /// Tangent-space normal map.
    Bump,
    /// Water mask; bright means glossy.
    Specular,
    /// City lights.
    NightLights,
    /// Cloud cover with alpha.
    Clouds,
}

impl TextureChannel {
    pub const COUNT: usize = 5;

    pub const ALL: [TextureChannel; Self::COUNT] = [
        TextureChannel::Diffuse,
        TextureChannel::Bump,
        TextureChannel::Specular,
        TextureChannel::NightLights,
        TextureChannel::Clouds,
    ];

    /// Dense index in `0..COUNT`, matching [`ALL`](Self::ALL).
    pub const fn index(self) -> usize {
        match self {
            TextureChannel::Diffuse => 0,
            TextureChannel::Bump => 1,
            TextureChannel::Specular => 2,
            TextureChannel::NightLights => 3,
            TextureChannel::Clouds => 4,
        }
    }

    /// The texel used when the channel cannot be loaded. Each value makes
    /// its shading stage a no-op (or a flat grey surface for diffuse).
    pub const fn neutral_texel(self) -> [u8; 4] {
        match self {
            TextureChannel::Diffuse => [128, 128, 128, 255],
            TextureChannel::Bump => [128, 128, 255, 255],
            TextureChannel::Specular => [0, 0, 0, 255],
            TextureChannel::NightLights => [0, 0, 0, 255],
            TextureChannel::Clouds => [0, 0, 0, 0],
        }
    }

    /// Colour channels are stored sRGB; data channels are linear.
    pub const fn is_srgb(self) -> bool {
        matches!(self, TextureChannel::Diffuse | TextureChannel::NightLights)
    }

    pub const fn label(self) -> &'static str {
        match self {
            TextureChannel::Diffuse => "diffuse",
            TextureChannel::Bump => "bump",
            TextureChannel::Specular => "specular",
            TextureChannel::NightLights => "night",
            TextureChannel::Clouds => "clouds",
        }
    }
}

impl fmt::Display for TextureChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where each channel is read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureSource {
    paths: [PathBuf; TextureChannel::COUNT],
}

impl TextureSource {
    pub fn from_config(config: &TextureConfig) -> Self {
        Self {
            paths: [
                config.resolve(&config.diffuse),
                config.resolve(&config.bump),
                config.resolve(&config.specular),
                config.resolve(&config.night),
                config.resolve(&config.clouds),
            ],
        }
    }

    pub fn path(&self, channel: TextureChannel) -> &Path {
        &self.paths[channel.index()]
    }

    pub fn set_path(&mut self, channel: TextureChannel, path: impl Into<PathBuf>) {
        self.paths[channel.index()] = path.into();
    }

    pub fn iter(&self) -> impl Iterator<Item = (TextureChannel, &Path)> {
        TextureChannel::ALL.into_iter().map(|c| (c, self.path(c)))
    }
}

/// Tightly packed RGBA8 pixels.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

impl DecodedImage {
    /// A 1×1 image holding the channel's neutral texel.
    pub fn neutral(channel: TextureChannel) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: channel.neutral_texel().to_vec(),
        }
    }

    /// Decode an encoded PNG/JPEG buffer. `path` is only used for errors.
    pub fn decode(bytes: &[u8], path: &Path) -> Result<Self, AssetError> {
        let image = image::load_from_memory(bytes).map_err(|source| AssetError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(AssetError::ZeroSized {
                path: path.to_path_buf(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    /// Read and decode a file.
    pub fn open(path: &Path) -> Result<Self, AssetError> {
        let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::decode(&bytes, path)
    }

    /// Bytes per row.
    pub fn stride(&self) -> u32 {
        self.width * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_indices_are_dense() {
        for (i, c) in TextureChannel::ALL.iter().enumerate() {
            assert_eq!(c.index(), i, "{c}");
        }
    }

    #[test]
    fn test_neutral_texels() {
        assert_eq!(TextureChannel::Bump.neutral_texel(), [128, 128, 255, 255]);
        assert_eq!(TextureChannel::Specular.neutral_texel()[..3], [0, 0, 0]);
        assert_eq!(TextureChannel::Clouds.neutral_texel()[3], 0, "clouds must be transparent");
        let img = DecodedImage::neutral(TextureChannel::Diffuse);
        assert_eq!((img.width, img.height, img.pixels.len()), (1, 1, 4));
    }

    #[test]
    fn test_source_resolves_against_directory() {
        let source = TextureSource::from_config(&TextureConfig::default());
        assert_eq!(
            source.path(TextureChannel::NightLights),
            Path::new("assets/textures/earth_lights_2048.png")
        );
        assert_eq!(source.iter().count(), TextureChannel::COUNT);
    }

    #[test]
    fn test_decode_garbage_is_decode_error() {
        let err = DecodedImage::decode(b"not an image", Path::new("x.png")).unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }), "{err}");
    }

    #[test]
    fn test_open_missing_is_io_error() {
        let err = DecodedImage::open(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }), "{err}");
    }

    #[test]
    fn test_open_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 40]))
            .save(&path)
            .unwrap();
        let img = DecodedImage::open(&path).unwrap();
        assert_eq!((img.width, img.height), (3, 2));
        assert_eq!(img.stride(), 12);
        assert_eq!(&img.pixels[..4], &[10, 20, 30, 40]);
    }
}
