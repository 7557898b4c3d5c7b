//! Marker pass: one instanced column per event.

use bytemuck::{Pod, Zeroable};
use terra_markers::MarkerDescriptor;
use wgpu::util::DeviceExt;

use crate::depth::DepthBuffer;

/// WGSL source for the marker columns.
pub const MARKER_SHADER_SOURCE: &str = include_str!("shaders/markers.wgsl");

/// Sides of the column prism.
const COLUMN_SEGMENTS: usize = 6;

/// Per-marker instance data.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MarkerInstance {
    /// Unit surface normal under the marker.
    pub direction: [f32; 3],
    /// Column height in globe radii.
    pub altitude: f32,
    pub color: [f32; 4],
    /// Column radius in globe radii.
    pub radius: f32,
    pub _padding: [f32; 3],
}

static_assertions::assert_eq_size!(MarkerInstance, [u8; 48]);

impl MarkerInstance {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<MarkerInstance>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &[
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 1,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32,
                offset: 12,
                shader_location: 2,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x4,
                offset: 16,
                shader_location: 3,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32,
                offset: 32,
                shader_location: 4,
            },
        ],
    };

    pub fn from_descriptor(marker: &MarkerDescriptor, radius: f32) -> Self {
        Self {
            direction: marker.surface_normal().to_array(),
            altitude: marker.altitude as f32,
            color: marker.color,
            radius,
            _padding: [0.0; 3],
        }
    }
}

const COLUMN_VERTEX_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &[wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x3,
        offset: 0,
        shader_location: 0,
    }],
};

/// Unit column as a triangle list: side walls plus a top cap.
pub fn column_vertices(segments: usize) -> Vec<[f32; 3]> {
    let ring: Vec<(f32, f32)> = (0..segments)
        .map(|i| {
            let a = i as f32 / segments as f32 * std::f32::consts::TAU;
            (a.cos(), a.sin())
        })
        .collect();

    let mut out = Vec::with_capacity(segments * 9);
    for i in 0..segments {
        let (x0, z0) = ring[i];
        let (x1, z1) = ring[(i + 1) % segments];
        out.extend_from_slice(&[
            [x0, 0.0, z0],
            [x1, 0.0, z1],
            [x1, 1.0, z1],
            [x0, 0.0, z0],
            [x1, 1.0, z1],
            [x0, 1.0, z0],
            [0.0, 1.0, 0.0],
            [x0, 1.0, z0],
            [x1, 1.0, z1],
        ]);
    }
    out
}

/// Pipeline and buffers for the marker columns.
pub struct MarkerPass {
    pipeline: wgpu::RenderPipeline,
    column_buffer: wgpu::Buffer,
    column_vertex_count: u32,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    instance_count: u32,
    radius: f32,
}

impl MarkerPass {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        camera_layout: &wgpu::BindGroupLayout,
        radius: f32,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("marker-shader"),
            source: wgpu::ShaderSource::Wgsl(MARKER_SHADER_SOURCE.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("marker-pipeline-layout"),
            bind_group_layouts: &[camera_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("marker-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_marker"),
                buffers: &[COLUMN_VERTEX_LAYOUT, MarkerInstance::LAYOUT],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(DepthBuffer::stencil_state(true)),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_marker"),
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

        let column = column_vertices(COLUMN_SEGMENTS);
        let column_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("marker-column"),
            contents: bytemuck::cast_slice(&column),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let instance_capacity = 64;
        let instance_buffer = Self::create_instance_buffer(device, instance_capacity);

        Self {
            pipeline,
            column_buffer,
            column_vertex_count: column.len() as u32,
            instance_buffer,
            instance_capacity,
            instance_count: 0,
            radius,
        }
    }

    fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("marker-instances"),
            size: (capacity * std::mem::size_of::<MarkerInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Replace every instance with `markers`.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        markers: &[MarkerDescriptor],
    ) {
        let instances: Vec<MarkerInstance> = markers
            .iter()
            .map(|m| MarkerInstance::from_descriptor(m, self.radius))
            .collect();
        if instances.len() > self.instance_capacity {
            self.instance_capacity = instances.len().next_power_of_two();
            self.instance_buffer = Self::create_instance_buffer(device, self.instance_capacity);
        }
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }
        self.instance_count = instances.len() as u32;
    }

    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, camera_bind_group: &wgpu::BindGroup) {
        if self.instance_count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, camera_bind_group, &[]);
        pass.set_vertex_buffer(0, self.column_buffer.slice(..));
        pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        pass.draw(0..self.column_vertex_count, 0..self.instance_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terra_markers::colors;

    #[test]
    fn test_column_geometry() {
        let verts = column_vertices(6);
        assert_eq!(verts.len(), 6 * 9);
        assert!(verts.iter().all(|v| v[1] == 0.0 || v[1] == 1.0));
        for v in &verts {
            let r = (v[0] * v[0] + v[2] * v[2]).sqrt();
            assert!(r < 1e-6 || (r - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_instance_from_descriptor() {
        let marker = MarkerDescriptor {
            lat: 0.0,
            lng: 90.0,
            color: colors::ORANGE,
            altitude: 0.30,
        };
        let inst = MarkerInstance::from_descriptor(&marker, 0.01);
        assert!((glam::Vec3::from(inst.direction) - glam::Vec3::X).length() < 1e-5);
        assert!((inst.altitude - 0.30).abs() < 1e-6);
        assert_eq!(inst.color, colors::ORANGE);
        assert_eq!(inst.radius, 0.01);
    }
}
