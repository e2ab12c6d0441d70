//! Frame orchestration for the globe view.
//!
//! Draw order inside the scene pass: globe surface, cloud shells, inner
//! glow, outer shell, markers, stars. Opaque surface first so the
//! transparent passes depth-test against it. The scene pass writes the HDR
//! target; bloom and vignette then carry it to the surface.

use bytemuck::Pod;
use orbis_assets::{DecodedImage, TextureChannel};
use orbis_config::{EffectsConfig, RenderConfig};
use orbis_globe::{GlobeMaterial, Scene};
use orbis_shading::PostParams;
use wgpu::util::DeviceExt;

use crate::camera::CameraUniform;
use crate::depth::DepthBuffer;
use crate::gpu::{RenderContext, SurfaceError};
use crate::marker::MarkerPipeline;
use crate::mesh::{MeshBuffer, SphereMesh};
use crate::pass::{FrameEncoder, RenderPassBuilder, clear_color};
use crate::pipeline::SpherePipelines;
use crate::post::{HDR_FORMAT, PostProcess};
use crate::stars::StarfieldPipeline;
use crate::texture::{GlobeTextures, TextureError};

/// A uniform buffer and the bind group exposing it.
struct UniformSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl UniformSlot {
    fn new<T: Pod>(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str, value: &T) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(value),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self { buffer, bind_group }
    }

    fn write<T: Pod>(&self, queue: &wgpu::Queue, value: &T) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(value));
    }
}

pub struct GlobeRenderer {
    pipelines: SpherePipelines,
    markers: MarkerPipeline,
    stars: StarfieldPipeline,
    post: PostProcess,
    effects: EffectsConfig,
    textures: GlobeTextures,
    globe_mesh: MeshBuffer,
    shell_mesh: MeshBuffer,
    depth: DepthBuffer,
    camera: UniformSlot,
    globe: UniformSlot,
    shell: UniformSlot,
    glow: UniformSlot,
    clouds: Vec<UniformSlot>,
    active_clouds: usize,
    material: GlobeMaterial,
    clear_color: wgpu::Color,
}

impl GlobeRenderer {
    pub fn new(ctx: &RenderContext, config: &RenderConfig, effects: &EffectsConfig, scene: &Scene) -> Self {
        let device = &ctx.device;
        let textures = GlobeTextures::new(device, &ctx.queue);
        let pipelines = SpherePipelines::new(device, HDR_FORMAT, textures.layout());
        let markers = MarkerPipeline::new(device, HDR_FORMAT, &pipelines.camera_layout);
        let stars = StarfieldPipeline::new(device, HDR_FORMAT, &pipelines.camera_layout, effects);

        let globe_mesh = SphereMesh::uv_sphere(config.sphere_width_segments, config.sphere_height_segments)
            .upload(device, "globe-sphere");
        let shell_mesh = SphereMesh::uv_sphere(config.cloud_width_segments, config.cloud_height_segments)
            .upload(device, "shell-sphere");

        let (width, height) = ctx.size();
        let depth = DepthBuffer::new(device, width, height);
        let post = PostProcess::new(device, ctx.surface_format, width, height, PostParams::from(effects));

        let camera = UniformSlot::new(
            device,
            &pipelines.camera_layout,
            "camera-uniform",
            &camera_uniform(scene),
        );
        let globe = UniformSlot::new(
            device,
            &pipelines.globe_layout,
            "globe-uniform",
            &scene.shading.globe_uniform(scene.globe.model_matrix()),
        );
        let shell = UniformSlot::new(
            device,
            &pipelines.atmosphere_layout,
            "shell-uniform",
            &scene.shading.shell_uniform(scene.globe.shell_model()),
        );
        let glow = UniformSlot::new(
            device,
            &pipelines.atmosphere_layout,
            "glow-uniform",
            &scene.shading.glow_uniform(scene.globe.glow_model()),
        );

        let mut renderer = Self {
            pipelines,
            markers,
            stars,
            post,
            effects: effects.clone(),
            textures,
            globe_mesh,
            shell_mesh,
            depth,
            camera,
            globe,
            shell,
            glow,
            clouds: Vec::new(),
            active_clouds: 0,
            material: scene.globe.material(),
            clear_color: clear_color(config.clear_color),
        };
        renderer.ensure_cloud_slots(device, scene.globe.clouds().len());
        log::info!(
            "Globe renderer ready ({}x{} sphere, {} cloud layers, {} stars)",
            config.sphere_width_segments,
            config.sphere_height_segments,
            scene.globe.clouds().len(),
            renderer.stars.star_count()
        );
        renderer
    }

    fn ensure_cloud_slots(&mut self, device: &wgpu::Device, layers: usize) {
        while self.clouds.len() < layers {
            let label = format!("cloud-uniform-{}", self.clouds.len());
            let value = orbis_shading::CloudUniform {
                model: glam::Mat4::IDENTITY.to_cols_array_2d(),
                sun_direction: [0.0; 4],
                params: [0.0; 4],
            };
            self.clouds
                .push(UniformSlot::new(device, &self.pipelines.cloud_layout, &label, &value));
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth.resize(device, width, height);
        self.post.resize(device, width, height);
    }

    /// Apply reloaded starfield and post settings. The sky is only
    /// regenerated when its seed, layers or brightness changed.
    pub fn set_effects(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, effects: &EffectsConfig) {
        if sky_changed(&self.effects, effects) {
            self.stars.rebuild(device, effects);
        }
        self.post.set_params(device, queue, PostParams::from(effects));
        self.effects = effects.clone();
    }

    pub fn upload_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        channel: TextureChannel,
        image: &DecodedImage,
    ) -> Result<(), TextureError> {
        self.textures.upload(device, queue, channel, image)
    }

    /// Write this frame's uniforms and marker instances.
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, scene: &mut Scene) {
        self.camera.write(queue, &camera_uniform(scene));

        let globe = &scene.globe;
        let shading = &scene.shading;
        self.globe.write(queue, &shading.globe_uniform(globe.model_matrix()));
        self.shell.write(queue, &shading.shell_uniform(globe.shell_model()));
        self.glow.write(queue, &shading.glow_uniform(globe.glow_model()));

        let layers = globe.clouds().len();
        self.ensure_cloud_slots(device, layers);
        for (slot, layer) in self.clouds.iter().zip(globe.clouds()) {
            slot.write(queue, &shading.cloud_uniform(globe.cloud_model(layer), layer.opacity));
        }
        self.active_clouds = layers;
        self.material = globe.material();

        let star_uniform = shading.star_uniform(self.depth.width(), self.depth.height());
        self.stars.prepare(queue, &star_uniform);

        let elapsed = shading.elapsed_time();
        let base_radius = globe.style().base_radius;
        let draws = scene.globe.marker_draws(elapsed);
        self.markers.prepare(device, queue, draws, base_radius);
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        let camera = &self.camera.bind_group;
        let textures = self.textures.bind_group();

        let surface = match self.material {
            GlobeMaterial::Placeholder => &self.pipelines.placeholder,
            GlobeMaterial::Realistic => &self.pipelines.realistic,
        };
        pass.set_pipeline(surface);
        pass.set_bind_group(0, camera, &[]);
        pass.set_bind_group(1, &self.globe.bind_group, &[]);
        pass.set_bind_group(2, textures, &[]);
        self.globe_mesh.draw(pass);

        pass.set_pipeline(&self.pipelines.clouds);
        for slot in &self.clouds[..self.active_clouds] {
            pass.set_bind_group(1, &slot.bind_group, &[]);
            self.shell_mesh.draw(pass);
        }

        pass.set_pipeline(&self.pipelines.glow);
        pass.set_bind_group(1, &self.glow.bind_group, &[]);
        self.shell_mesh.draw(pass);

        pass.set_pipeline(&self.pipelines.shell);
        pass.set_bind_group(1, &self.shell.bind_group, &[]);
        self.shell_mesh.draw(pass);

        self.markers.draw(pass, camera);
        self.stars.draw(pass, camera);
    }

    /// Acquire, record, submit and present one frame.
    pub fn render(&mut self, ctx: &RenderContext, scene: &mut Scene) -> Result<(), SurfaceError> {
        let surface_texture = ctx.get_current_texture()?;
        self.prepare(&ctx.device, &ctx.queue, scene);

        let mut frame = FrameEncoder::new(&ctx.device, surface_texture);
        {
            let builder = RenderPassBuilder::new(self.clear_color)
                .depth(&self.depth.view, DepthBuffer::CLEAR_VALUE)
                .label("globe-pass");
            let mut pass = frame.begin_render_pass(&builder, self.post.scene_view());
            self.draw(&mut pass);
        }
        let (encoder, surface) = frame.encoder_and_surface();
        self.post.execute(encoder, surface);
        frame.present(&ctx.queue);
        Ok(())
    }
}

fn sky_changed(old: &EffectsConfig, new: &EffectsConfig) -> bool {
    old.star_seed != new.star_seed
        || old.star_layers != new.star_layers
        || old.star_brightness != new.star_brightness
}

fn camera_uniform(scene: &Scene) -> CameraUniform {
    CameraUniform::new(
        scene.camera.view_matrix(),
        scene.camera.projection_matrix(),
        scene.camera.position(),
    )
}
