//! Detail panel backdrop drawn over the scene in window space.

use bytemuck::{Pod, Zeroable};
use terra_markers::PanelBounds;
use wgpu::util::DeviceExt;

/// WGSL source for the panel backdrop.
pub const PANEL_SHADER_SOURCE: &str = include_str!("shaders/panel.wgsl");

/// Black at 80% opacity.
pub const PANEL_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 0.8];

const CORNER_RADIUS_PX: f32 = 8.0;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct PanelUniform {
    pub rect: [f32; 4],
    pub viewport: [f32; 2],
    pub corner_radius: f32,
    pub _padding: f32,
    pub color: [f32; 4],
}

static_assertions::assert_eq_size!(PanelUniform, [u8; 48]);

impl PanelUniform {
    pub fn new(bounds: PanelBounds, viewport: (u32, u32)) -> Self {
        Self {
            rect: [bounds.x, bounds.y, bounds.width, bounds.height],
            viewport: [viewport.0.max(1) as f32, viewport.1.max(1) as f32],
            corner_radius: CORNER_RADIUS_PX,
            _padding: 0.0,
            color: PANEL_COLOR,
        }
    }
}

/// Pipeline for the panel quad.
pub struct PanelPass {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl PanelPass {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("panel-shader"),
            source: wgpu::ShaderSource::Wgsl(PANEL_SHADER_SOURCE.into()),
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("panel-bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<PanelUniform>() as u64
                    ),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("panel-pipeline-layout"),
            bind_group_layouts: &[&layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("panel-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_panel"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            // Drawn last over the depth-tested scene without touching depth.
            depth_stencil: Some(wgpu::DepthStencilState {
                format: crate::depth::DepthBuffer::FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_panel"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("panel-uniform"),
            contents: bytemuck::bytes_of(&PanelUniform::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("panel-bg"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            pipeline,
            uniform_buffer,
            bind_group,
        }
    }

    /// Place the panel for this frame.
    pub fn write_bounds(&self, queue: &wgpu::Queue, bounds: PanelBounds, viewport: (u32, u32)) {
        let data = PanelUniform::new(bounds, viewport);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&data));
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..6, 0..1);
    }
}
