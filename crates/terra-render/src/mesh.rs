//! Icosphere mesh for the globe.
//!
//! UVs are equirectangular and follow the same geographic mapping as
//! [`terra_camera::polar_to_cartesian`]: longitude 0 sits at `u = 0.5` on
//! +Z and longitude 90 east lies on +X.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Vertex layout for the globe: position, normal, uv.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GlobeVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(GlobeVertex, [u8; 32]);

impl GlobeVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<GlobeVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 0,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 12,
                shader_location: 1,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 24,
                shader_location: 2,
            },
        ],
    };
}

/// Unit-sphere triangle mesh.
#[derive(Debug, Clone)]
pub struct GlobeMesh {
    pub vertices: Vec<GlobeVertex>,
    pub indices: Vec<u32>,
}

/// Equirectangular texture coordinate for a unit direction.
pub fn uv_for_direction(dir: Vec3) -> [f32; 2] {
    let u = 0.5 + dir.x.atan2(dir.z) / std::f32::consts::TAU;
    let v = 0.5 - dir.y.clamp(-1.0, 1.0).asin() / std::f32::consts::PI;
    [u, v]
}

/// Build an icosphere with `subdivisions` rounds of 4-way splitting.
///
/// Triangles that straddle the antimeridian get duplicated vertices with
/// `u` shifted past 1.0 so the texture does not smear across the seam; the
/// sampler must repeat in `u`.
pub fn generate_globe_mesh(subdivisions: u32) -> GlobeMesh {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let mut positions: Vec<Vec3> = [
        (-1.0, t, 0.0),
        (1.0, t, 0.0),
        (-1.0, -t, 0.0),
        (1.0, -t, 0.0),
        (0.0, -1.0, t),
        (0.0, 1.0, t),
        (0.0, -1.0, -t),
        (0.0, 1.0, -t),
        (t, 0.0, -1.0),
        (t, 0.0, 1.0),
        (-t, 0.0, -1.0),
        (-t, 0.0, 1.0),
    ]
    .iter()
    .map(|&(x, y, z)| Vec3::new(x, y, z).normalize())
    .collect();

    let mut indices: Vec<u32> = vec![
        0, 11, 5, 0, 5, 1, 0, 1, 7, 0, 7, 10, 0, 10, 11, 1, 5, 9, 5, 11, 4, 11, 10, 2, 10, 7, 6, 7,
        1, 8, 3, 9, 4, 3, 4, 2, 3, 2, 6, 3, 6, 8, 3, 8, 9, 4, 9, 5, 2, 4, 11, 6, 2, 10, 8, 6, 7, 9,
        8, 1,
    ];

    for _ in 0..subdivisions {
        indices = subdivide(&mut positions, &indices);
    }

    let mut vertices: Vec<GlobeVertex> = positions
        .iter()
        .map(|p| GlobeVertex {
            position: p.to_array(),
            normal: p.to_array(),
            uv: uv_for_direction(*p),
        })
        .collect();
    fix_seam(&mut vertices, &mut indices);

    GlobeMesh { vertices, indices }
}

fn subdivide(positions: &mut Vec<Vec3>, indices: &[u32]) -> Vec<u32> {
    let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
    let mut midpoint = |a: u32, b: u32, positions: &mut Vec<Vec3>| -> u32 {
        let key = (a.min(b), a.max(b));
        *midpoints.entry(key).or_insert_with(|| {
            let mid = (positions[a as usize] + positions[b as usize]).normalize();
            positions.push(mid);
            (positions.len() - 1) as u32
        })
    };

    let mut out = Vec::with_capacity(indices.len() * 4);
    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0], tri[1], tri[2]);
        let ab = midpoint(a, b, positions);
        let bc = midpoint(b, c, positions);
        let ca = midpoint(c, a, positions);
        out.extend_from_slice(&[a, ab, ca, b, bc, ab, c, ca, bc, ab, bc, ca]);
    }
    out
}

fn fix_seam(vertices: &mut Vec<GlobeVertex>, indices: &mut [u32]) {
    let mut wrapped: HashMap<u32, u32> = HashMap::new();
    for tri in indices.chunks_exact_mut(3) {
        let us = [0, 1, 2].map(|k| vertices[tri[k] as usize].uv[0]);
        let min = us.iter().copied().fold(f32::INFINITY, f32::min);
        let max = us.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        if max - min <= 0.5 {
            continue;
        }
        for (k, &u) in us.iter().enumerate() {
            if u >= 0.5 {
                continue;
            }
            let original = tri[k];
            tri[k] = *wrapped.entry(original).or_insert_with(|| {
                let mut v = vertices[original as usize];
                v.uv[0] += 1.0;
                vertices.push(v);
                (vertices.len() - 1) as u32
            });
        }
    }
}
