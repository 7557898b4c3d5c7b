//! Aggregate renderer: globe, markers, and the detail panel backdrop.

use std::sync::Arc;

use glam::Mat4;
use terra_markers::{MarkerDescriptor, PanelBounds};
use tracing::{debug, info};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::depth::DepthBuffer;
use crate::globe::{CameraUniform, GlobePass, camera_bind_group_layout};
use crate::gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
use crate::markers::MarkerPass;
use crate::mesh::generate_globe_mesh;
use crate::panel::PanelPass;
use crate::pass::RenderPassBuilder;
use crate::terminator::{DEFAULT_HALF_WIDTH, ShaderUniforms};
use crate::texture::TextureSet;

/// Settings fixed at renderer creation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneOptions {
    pub vsync: bool,
    /// Smoothstep half-width of the day/night band.
    pub transition_half_width: f32,
    /// Marker column radius in globe radii.
    pub marker_radius: f32,
    /// Icosphere subdivision level.
    pub mesh_subdivisions: u32,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            vsync: true,
            transition_half_width: DEFAULT_HALF_WIDTH,
            marker_radius: 0.008,
            mesh_subdivisions: 5,
        }
    }
}

/// Everything the renderer needs for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneFrame {
    pub view_proj: Mat4,
    pub view: Mat4,
    pub shader: ShaderUniforms,
    /// Detail panel rectangle in window pixels, if one is open.
    pub panel: Option<PanelBounds>,
}

/// Owns the GPU context and every pass of the globe scene.
pub struct SceneRenderer {
    context: RenderContext,
    depth: DepthBuffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    globe: GlobePass,
    markers: MarkerPass,
    panel: PanelPass,
}

impl SceneRenderer {
    pub fn new(window: Arc<Window>, options: SceneOptions) -> Result<Self, RenderContextError> {
        let context = init_render_context_blocking(window, options.vsync)?;
        let device = &context.device;
        let (width, height) = context.size();

        let depth = DepthBuffer::new(device, width, height);

        let camera_layout = camera_bind_group_layout(device);
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera-uniform"),
            contents: bytemuck::bytes_of(&CameraUniform::new(Mat4::IDENTITY, Mat4::IDENTITY)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera-bg"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let mesh = generate_globe_mesh(options.mesh_subdivisions);
        debug!(
            vertices = mesh.vertices.len(),
            indices = mesh.indices.len(),
            "globe mesh generated"
        );

        let globe = GlobePass::new(
            device,
            &context.queue,
            context.surface_format,
            &camera_layout,
            &mesh,
            options.transition_half_width,
        );
        let markers = MarkerPass::new(
            device,
            context.surface_format,
            &camera_layout,
            options.marker_radius,
        );
        let panel = PanelPass::new(device, context.surface_format);

        info!(
            width,
            height,
            format = ?context.surface_format,
            "scene renderer ready"
        );

        Ok(Self {
            context,
            depth,
            camera_buffer,
            camera_bind_group,
            globe,
            markers,
            panel,
        })
    }

    /// Resize the surface and depth target. Zero extents are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.context.resize(width, height);
        self.depth.resize(&self.context.device, width, height);
    }

    pub fn size(&self) -> (u32, u32) {
        self.context.size()
    }

    /// Replace the placeholder imagery.
    pub fn set_textures(&mut self, textures: &TextureSet) {
        self.globe
            .set_textures(&self.context.device, &self.context.queue, textures);
    }

    /// Smoothstep half-width used from the next frame on.
    pub fn set_transition_half_width(&mut self, half_width: f32) {
        self.globe.set_half_width(half_width);
    }

    pub fn is_textured(&self) -> bool {
        self.globe.is_textured()
    }

    /// Replace all marker instances.
    pub fn upload_markers(&mut self, markers: &[MarkerDescriptor]) {
        self.markers
            .upload(&self.context.device, &self.context.queue, markers);
        debug!(count = self.markers.instance_count(), "marker instances uploaded");
    }

    /// Write uniforms for `frame` and draw it to the surface.
    pub fn render(&mut self, frame: &SceneFrame) -> Result<(), SurfaceError> {
        let queue = &self.context.queue;
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform::new(frame.view_proj, frame.view)),
        );
        self.globe.write_uniforms(queue, frame.shader);
        if let Some(bounds) = frame.panel {
            self.panel.write_bounds(queue, bounds, self.context.size());
        }

        let output = self.context.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene-encoder"),
            });

        {
            let builder = RenderPassBuilder::new()
                .depth(&self.depth.view)
                .label("scene-pass");
            let mut pass = builder.begin(&mut encoder, &view);
            self.globe.draw(&mut pass, &self.camera_bind_group);
            self.markers.draw(&mut pass, &self.camera_bind_group);
            if frame.panel.is_some() {
                self.panel.draw(&mut pass);
            }
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
