//! Orbit camera looking at the globe center from a geographic direction.

use glam::{DMat3, DVec3, Mat4, Quat, Vec2, Vec3, Vec4};

use crate::motion::GlobeOrientation;

/// Radius of the rendered globe in world units.
pub const GLOBE_RADIUS: f32 = 1.0;

/// Unit vector for a geographic point.
///
/// Longitude 0 / latitude 0 maps to +Z, the north pole to +Y, and
/// longitude 90 to +X.
pub fn polar_to_cartesian(lng_deg: f64, lat_deg: f64) -> DVec3 {
    let theta = (90.0 - lng_deg).to_radians();
    let phi = (90.0 - lat_deg).to_radians();
    DVec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin())
}

/// Rotation taking the camera from its rest pose (on +Z looking at the
/// origin) to the pose above `orientation`.
pub fn orientation_rotation(orientation: GlobeOrientation) -> DMat3 {
    DMat3::from_rotation_y(orientation.lng.to_radians())
        * DMat3::from_rotation_x(-orientation.lat.to_radians())
}

/// Projection type for the camera.
#[derive(Debug, Clone)]
pub enum Projection {
    /// Perspective projection.
    Perspective {
        /// Vertical field of view in radians.
        fov_y: f32,
        /// Width / height.
        aspect_ratio: f32,
    },
}

/// Camera that generates view and projection matrices for the globe scene.
#[derive(Debug, Clone)]
pub struct Camera {
    /// World-space position.
    pub position: Vec3,
    /// Rotation as a unit quaternion.
    pub rotation: Quat,
    /// Projection parameters.
    pub projection: Projection,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
}

impl Camera {
    /// Place the camera `altitude` globe radii above the surface point under
    /// `orientation`, looking at the globe center.
    pub fn look_at_globe(&mut self, orientation: GlobeOrientation, altitude: f64) {
        let distance = f64::from(GLOBE_RADIUS) * (1.0 + altitude);
        let rotation = orientation_rotation(orientation);
        self.position = (polar_to_cartesian(orientation.lng, orientation.lat) * distance).as_vec3();
        self.rotation = Quat::from_mat3(&rotation.as_mat3()).normalize();
    }

    /// Compute the view matrix (inverse of camera transform).
    pub fn view_matrix(&self) -> Mat4 {
        (Mat4::from_translation(self.position) * Mat4::from_quat(self.rotation)).inverse()
    }

    /// Compute the projection matrix with reverse-Z.
    pub fn projection_matrix(&self) -> Mat4 {
        match &self.projection {
            Projection::Perspective {
                fov_y,
                aspect_ratio,
            } => Mat4::perspective_rh(*fov_y, *aspect_ratio, self.far, self.near),
        }
    }

    /// Compute the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// The forward direction vector (-Z in camera space).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Update the aspect ratio for perspective projection.
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        let Projection::Perspective { aspect_ratio, .. } = &mut self.projection;
        *aspect_ratio = width / height.max(1.0);
    }

    /// Project a world-space point to window pixels (origin top-left).
    ///
    /// Returns `None` for points behind the camera.
    pub fn project_to_screen(&self, world: Vec3, width: f32, height: f32) -> Option<Vec2> {
        let clip = self.view_projection_matrix() * Vec4::new(world.x, world.y, world.z, 1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * width,
            (1.0 - ndc.y) * 0.5 * height,
        ))
    }

    /// Whether a point on the globe surface faces the camera.
    pub fn sees_surface_point(&self, surface_normal: Vec3) -> bool {
        let to_camera = self.position - surface_normal * GLOBE_RADIUS;
        surface_normal.dot(to_camera) > 0.0
    }
}

impl Default for Camera {
    fn default() -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            projection: Projection::Perspective {
                fov_y: 50.0_f32.to_radians(),
                aspect_ratio: 16.0 / 9.0,
            },
            near: 0.01,
            far: 100.0,
        };
        camera.look_at_globe(GlobeOrientation::default(), 2.5);
        camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polar_mapping_axes() {
        let origin = polar_to_cartesian(0.0, 0.0);
        assert!((origin - DVec3::Z).length() < 1e-12);
        let east = polar_to_cartesian(90.0, 0.0);
        assert!((east - DVec3::X).length() < 1e-12);
        let north = polar_to_cartesian(0.0, 90.0);
        assert!((north - DVec3::Y).length() < 1e-12);
    }

    #[test]
    fn test_rotation_matches_polar_mapping() {
        for &(lng, lat) in &[(0.0, 0.0), (45.0, 10.0), (200.0, -35.0), (359.0, 60.0)] {
            let rot = orientation_rotation(GlobeOrientation::new(lng, lat));
            let dir = rot * DVec3::Z;
            let expected = polar_to_cartesian(lng, lat);
            assert!((dir - expected).length() < 1e-9, "lng {lng} lat {lat}");
        }
    }

    #[test]
    fn test_camera_looks_at_center() {
        let mut camera = Camera::default();
        camera.look_at_globe(GlobeOrientation::new(120.0, 25.0), 2.5);
        let to_center = (-camera.position).normalize();
        assert!((camera.forward() - to_center).length() < 1e-5);
        assert!((camera.position.length() - 3.5).abs() < 1e-5);
    }

    #[test]
    fn test_point_below_camera_projects_to_center() {
        let mut camera = Camera::default();
        let o = GlobeOrientation::new(-122.42, 37.77);
        camera.look_at_globe(o, 2.5);
        let surface = polar_to_cartesian(o.lng, o.lat).as_vec3();
        let screen = camera.project_to_screen(surface, 800.0, 600.0).unwrap();
        assert!((screen - Vec2::new(400.0, 300.0)).length() < 1e-2);
    }

    #[test]
    fn test_far_side_not_visible() {
        let camera = Camera::default();
        assert!(camera.sees_surface_point(Vec3::Z));
        assert!(!camera.sees_surface_point(Vec3::NEG_Z));
    }

    #[test]
    fn test_aspect_ratio_update() {
        let mut camera = Camera::default();
        camera.set_aspect_ratio(1920.0, 1080.0);
        let Projection::Perspective { aspect_ratio, .. } = camera.projection;
        assert!((aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
    }
}
