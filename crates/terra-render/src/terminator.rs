//! Day/night terminator math.
//!
//! [`TERMINATOR_SHADER_SOURCE`] runs these formulas per fragment on the GPU.
//! The functions here are the same formulas on the CPU, step for step, so the
//! lighting model can be tested without a device.

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Vec2, Vec3};

/// WGSL source for the globe shader.
pub const TERMINATOR_SHADER_SOURCE: &str = include_str!("shaders/terminator.wgsl");

/// Default half-width of the twilight band, in units of the sun/normal dot product.
pub const DEFAULT_HALF_WIDTH: f32 = 0.1;

/// Per-frame lighting inputs, both as `(longitude, latitude)` in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShaderUniforms {
    /// Sub-solar point.
    pub sun_position: Vec2,
    /// Point the camera is looking down on.
    pub globe_rotation: Vec2,
}

/// GPU layout of the terminator uniform (group 1, binding 3).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct TerminatorUniform {
    pub sun_position: [f32; 2],
    pub globe_rotation: [f32; 2],
    pub half_width: f32,
    /// 1 once both textures are bound, 0 while showing the placeholder.
    pub textured: u32,
    pub _padding: [f32; 2],
}

static_assertions::assert_eq_size!(TerminatorUniform, [u8; 32]);

impl TerminatorUniform {
    pub fn new(uniforms: ShaderUniforms, half_width: f32, textured: bool) -> Self {
        Self {
            sun_position: uniforms.sun_position.to_array(),
            globe_rotation: uniforms.globe_rotation.to_array(),
            half_width,
            textured: u32::from(textured),
            _padding: [0.0; 2],
        }
    }
}

/// Unit vector for a `(longitude, latitude)` pair in degrees.
pub fn sun_vector(sun_position: Vec2) -> Vec3 {
    let theta = (90.0 - sun_position.x).to_radians();
    let phi = (90.0 - sun_position.y).to_radians();
    Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin())
}

/// Rotation into the camera frame for a globe viewed from `globe_rotation`.
///
/// Undoes the view orientation: spin by `-lng` about Y, then tilt by `lat`
/// about X.
pub fn globe_rotation_matrix(globe_rotation: Vec2) -> Mat3 {
    let lng = globe_rotation.x.to_radians();
    let lat = globe_rotation.y.to_radians();
    Mat3::from_rotation_x(lat) * Mat3::from_rotation_y(-lng)
}

/// Sun direction in the camera frame.
pub fn rotated_sun(uniforms: ShaderUniforms) -> Vec3 {
    globe_rotation_matrix(uniforms.globe_rotation) * sun_vector(uniforms.sun_position)
}

/// Hermite smoothstep, matching the WGSL builtin.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Day weight for a sun/normal dot product: 0 is full night, 1 is full day.
pub fn blend_factor(intensity: f32, half_width: f32) -> f32 {
    if half_width <= 0.0 {
        return if intensity >= 0.0 { 1.0 } else { 0.0 };
    }
    smoothstep(-half_width, half_width, intensity)
}

/// Dot product between a camera-frame surface normal and the rotated sun.
pub fn intensity(view_normal: Vec3, uniforms: ShaderUniforms) -> f32 {
    view_normal.normalize().dot(rotated_sun(uniforms).normalize())
}

/// Final color for one surface sample.
pub fn shade(
    view_normal: Vec3,
    day: Vec3,
    night: Vec3,
    uniforms: ShaderUniforms,
    half_width: f32,
) -> Vec3 {
    let blend = blend_factor(intensity(view_normal, uniforms), half_width);
    night.lerp(day, blend)
}
