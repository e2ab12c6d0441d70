//! The globe's five texture layers and their shared bind group (group 2).
//!
//! Every channel starts as its 1×1 neutral texel, so the realistic material
//! is always drawable. Uploading a decoded image replaces one texture and
//! rebuilds the bind group.

use orbis_assets::{DecodedImage, TextureChannel};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    #[error("texture data size ({actual}) does not match expected ({expected}) for {width}x{height}")]
    DataSizeMismatch {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
    },

    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    #[error("texture {width}x{height} exceeds the device limit of {limit}")]
    TooLarge { width: u32, height: u32, limit: u32 },
}

/// sRGB for colour layers so sampling yields linear values; data layers
/// stay linear.
pub fn channel_format(channel: TextureChannel) -> wgpu::TextureFormat {
    if channel.is_srgb() {
        wgpu::TextureFormat::Rgba8UnormSrgb
    } else {
        wgpu::TextureFormat::Rgba8Unorm
    }
}

pub fn validate_image(image: &DecodedImage, max_dimension: u32) -> Result<(), TextureError> {
    let (width, height) = (image.width, image.height);
    if width == 0 || height == 0 {
        return Err(TextureError::ZeroDimensions { width, height });
    }
    if width > max_dimension || height > max_dimension {
        return Err(TextureError::TooLarge {
            width,
            height,
            limit: max_dimension,
        });
    }
    let expected = width as usize * height as usize * 4;
    if image.pixels.len() != expected {
        return Err(TextureError::DataSizeMismatch {
            actual: image.pixels.len(),
            expected,
            width,
            height,
        });
    }
    Ok(())
}

pub struct GlobeTextures {
    textures: Vec<wgpu::Texture>,
    views: Vec<wgpu::TextureView>,
    sampler: wgpu::Sampler,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl GlobeTextures {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let layout = Self::create_layout(device);
        // Wraps around the globe in u, clamps at the poles in v.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("globe-sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let textures: Vec<wgpu::Texture> = TextureChannel::ALL
            .iter()
            .map(|&ch| create_texture(device, queue, ch, &DecodedImage::neutral(ch)))
            .collect();
        let views: Vec<wgpu::TextureView> = textures
            .iter()
            .map(|t| t.create_view(&wgpu::TextureViewDescriptor::default()))
            .collect();
        let bind_group = Self::create_bind_group(device, &layout, &views, &sampler);

        Self {
            textures,
            views,
            sampler,
            layout,
            bind_group,
        }
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    pub fn size(&self, channel: TextureChannel) -> (u32, u32) {
        let size = self.textures[channel.index()].size();
        (size.width, size.height)
    }

    /// Replace one channel with a decoded image.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        channel: TextureChannel,
        image: &DecodedImage,
    ) -> Result<(), TextureError> {
        validate_image(image, device.limits().max_texture_dimension_2d)?;
        let texture = create_texture(device, queue, channel, image);
        self.views[channel.index()] = texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.textures[channel.index()] = texture;
        self.bind_group = Self::create_bind_group(device, &self.layout, &self.views, &self.sampler);
        log::info!(
            "Uploaded {channel} texture ({}x{}, {:?})",
            image.width,
            image.height,
            channel_format(channel)
        );
        Ok(())
    }

    fn create_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        let mut entries: Vec<wgpu::BindGroupLayoutEntry> = (0..TextureChannel::COUNT as u32)
            .map(|binding| wgpu::BindGroupLayoutEntry {
                binding,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            })
            .collect();
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: TextureChannel::COUNT as u32,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        });
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globe-textures-layout"),
            entries: &entries,
        })
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        views: &[wgpu::TextureView],
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        let mut entries: Vec<wgpu::BindGroupEntry> = views
            .iter()
            .enumerate()
            .map(|(i, view)| wgpu::BindGroupEntry {
                binding: i as u32,
                resource: wgpu::BindingResource::TextureView(view),
            })
            .collect();
        entries.push(wgpu::BindGroupEntry {
            binding: TextureChannel::COUNT as u32,
            resource: wgpu::BindingResource::Sampler(sampler),
        });
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globe-textures"),
            layout,
            entries: &entries,
        })
    }
}

/// Callers validate `image` first.
fn create_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    channel: TextureChannel,
    image: &DecodedImage,
) -> wgpu::Texture {
    let size = wgpu::Extent3d {
        width: image.width,
        height: image.height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(channel.label()),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: channel_format(channel),
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &image.pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(image.stride()),
            rows_per_image: None,
        },
        size,
    );
    texture
}
