//! wgpu rendering for the day/night globe: terminator shading, marker
//! columns, the detail panel backdrop, and background texture loading.

pub mod depth;
pub mod globe;
pub mod gpu;
pub mod markers;
pub mod mesh;
pub mod panel;
pub mod pass;
pub mod scene;
pub mod terminator;
pub mod texture;

pub use depth::DepthBuffer;
pub use globe::{CameraUniform, GlobePass, camera_bind_group_layout};
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use markers::{MARKER_SHADER_SOURCE, MarkerInstance, MarkerPass};
pub use mesh::{GlobeMesh, GlobeVertex, generate_globe_mesh};
pub use panel::{PANEL_COLOR, PanelPass, PanelUniform};
pub use pass::{RenderPassBuilder, SPACE_BLACK};
pub use scene::{SceneFrame, SceneOptions, SceneRenderer};
pub use terminator::{
    DEFAULT_HALF_WIDTH, ShaderUniforms, TERMINATOR_SHADER_SOURCE, TerminatorUniform, blend_factor,
    shade,
};
pub use texture::{DecodedImage, TextureLoadError, TextureLoader, TextureSet, load_image};
