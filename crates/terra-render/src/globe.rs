//! Globe pass: icosphere shaded by the terminator shader.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::depth::DepthBuffer;
use crate::mesh::{GlobeMesh, GlobeVertex};
use crate::terminator::{ShaderUniforms, TERMINATOR_SHADER_SOURCE, TerminatorUniform};
use crate::texture::{DecodedImage, TextureSet, upload_texture};

/// Camera matrices shared by the globe and marker passes (group 0).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
}

static_assertions::assert_eq_size!(CameraUniform, [u8; 128]);

impl CameraUniform {
    pub fn new(view_proj: Mat4, view: Mat4) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
        }
    }
}

/// Layout of the shared camera bind group.
pub fn camera_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("camera-bgl"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(
                    std::mem::size_of::<CameraUniform>() as u64
                ),
            },
            count: None,
        }],
    })
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

/// Placeholder day texel before imagery arrives.
const PLACEHOLDER_DAY: [u8; 4] = [40, 60, 90, 255];
/// Placeholder night texel before imagery arrives.
const PLACEHOLDER_NIGHT: [u8; 4] = [5, 8, 16, 255];

/// Pipeline, mesh, and material for the globe.
pub struct GlobePass {
    pipeline: wgpu::RenderPipeline,
    material_layout: wgpu::BindGroupLayout,
    material_bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    uniform_buffer: wgpu::Buffer,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    textured: bool,
    half_width: f32,
}

impl GlobePass {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        camera_layout: &wgpu::BindGroupLayout,
        mesh: &GlobeMesh,
        half_width: f32,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("terminator-shader"),
            source: wgpu::ShaderSource::Wgsl(TERMINATOR_SHADER_SOURCE.into()),
        });

        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globe-material-bgl"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<TerminatorUniform>() as u64,
                        ),
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("globe-pipeline-layout"),
            bind_group_layouts: &[camera_layout, &material_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("globe-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_globe"),
                buffers: &[GlobeVertex::LAYOUT],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(DepthBuffer::stencil_state(true)),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_globe"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("globe-sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            ..Default::default()
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("terminator-uniform"),
            contents: bytemuck::bytes_of(&TerminatorUniform::new(
                ShaderUniforms::default(),
                half_width,
                false,
            )),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globe-vertices"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globe-indices"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let placeholder = TextureSet {
            day: DecodedImage::solid(PLACEHOLDER_DAY),
            night: DecodedImage::solid(PLACEHOLDER_NIGHT),
        };
        let material_bind_group = Self::material_bind_group(
            device,
            queue,
            &material_layout,
            &sampler,
            &uniform_buffer,
            &placeholder,
        );

        Self {
            pipeline,
            material_layout,
            material_bind_group,
            sampler,
            uniform_buffer,
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            textured: false,
            half_width,
        }
    }

    fn material_bind_group(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        uniform_buffer: &wgpu::Buffer,
        textures: &TextureSet,
    ) -> wgpu::BindGroup {
        let day = upload_texture(device, queue, &textures.day, "globe-day");
        let night = upload_texture(device, queue, &textures.night, "globe-night");
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globe-material-bg"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&day),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&night),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: uniform_buffer.as_entire_binding(),
                },
            ],
        })
    }

    /// Swap the placeholder for real imagery.
    pub fn set_textures(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, set: &TextureSet) {
        self.material_bind_group = Self::material_bind_group(
            device,
            queue,
            &self.material_layout,
            &self.sampler,
            &self.uniform_buffer,
            set,
        );
        self.textured = true;
    }

    /// Change the day/night band width from the next frame on.
    pub fn set_half_width(&mut self, half_width: f32) {
        self.half_width = half_width;
    }

    /// Whether real imagery is bound.
    pub fn is_textured(&self) -> bool {
        self.textured
    }

    /// Write this frame's sun position and globe rotation.
    pub fn write_uniforms(&self, queue: &wgpu::Queue, uniforms: ShaderUniforms) {
        let data = TerminatorUniform::new(uniforms, self.half_width, self.textured);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&data));
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, camera_bind_group: &wgpu::BindGroup) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, camera_bind_group, &[]);
        pass.set_bind_group(1, &self.material_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}
