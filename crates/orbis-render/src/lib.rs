//! wgpu rendering for the globe: device and surface management, the sphere
//! passes, instanced markers, the starfield, bloom and vignette, and the
//! WGSL shaders.

pub mod camera;
pub mod depth;
pub mod gpu;
pub mod marker;
pub mod mesh;
pub mod pass;
pub mod pipeline;
pub mod post;
pub mod renderer;
pub mod shader;
pub mod stars;
pub mod texture;

pub use camera::CameraUniform;
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use marker::{MarkerInstance, MarkerPipeline};
pub use mesh::{MeshBuffer, SphereMesh, SphereVertex};
pub use pass::{FrameEncoder, RenderPassBuilder};
pub use post::{HDR_FORMAT, PostProcess};
pub use renderer::GlobeRenderer;
pub use stars::{StarInstance, StarfieldPipeline};
pub use texture::{GlobeTextures, TextureError};
