//! Inertial globe motion: auto-rotation, hover pause, and return-to-equator.
//!
//! The controller is a two-state machine. While [`MotionState::Rotating`],
//! every frame spins the view westward by a constant step and eases the
//! latitude back toward the equator. While [`MotionState::Paused`] (pointer
//! hovering the globe) the orientation is left untouched.

use tracing::debug;

/// Default longitude step per frame in degrees.
pub const DEFAULT_ROTATE_SPEED: f64 = -0.1;

/// Default fraction of the remaining latitude removed per frame.
pub const DEFAULT_RETURN_SPEED: f64 = 0.02;

/// Highest latitude a pan can reach, in degrees.
const MAX_PAN_LATITUDE: f64 = 89.0;

/// Direction the camera looks at the globe from, in geographic degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlobeOrientation {
    /// Longitude in degrees.
    pub lng: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl GlobeOrientation {
    /// Create an orientation from longitude and latitude in degrees.
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

/// Whether the controller is currently animating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    /// Auto-rotating and levelling each frame.
    Rotating,
    /// Frozen while the pointer hovers the globe.
    Paused,
}

/// Tuning for the per-frame motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionConfig {
    /// Degrees of longitude added per frame.
    pub rotate_speed: f64,
    /// Fraction of latitude removed per frame, in `(0, 1]`.
    pub return_speed: f64,
    /// Camera altitude bounds in globe radii.
    pub min_altitude: f64,
    /// Camera altitude bounds in globe radii.
    pub max_altitude: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            rotate_speed: DEFAULT_ROTATE_SPEED,
            return_speed: DEFAULT_RETURN_SPEED,
            min_altitude: 0.5,
            max_altitude: 8.0,
        }
    }
}

/// Per-frame camera orientation controller.
#[derive(Debug, Clone)]
pub struct CameraMotionController {
    orientation: GlobeOrientation,
    altitude: f64,
    hovered: bool,
    config: MotionConfig,
}

impl CameraMotionController {
    /// Create a controller at `orientation` and `altitude` (globe radii above the surface).
    pub fn new(config: MotionConfig, orientation: GlobeOrientation, altitude: f64) -> Self {
        Self {
            orientation,
            altitude: altitude.clamp(config.min_altitude, config.max_altitude),
            hovered: false,
            config,
        }
    }

    /// Advance one frame. Does nothing while hovered.
    pub fn update(&mut self) -> GlobeOrientation {
        if self.hovered {
            return self.orientation;
        }

        let GlobeOrientation { lng, lat } = self.orientation;
        self.orientation = GlobeOrientation {
            lng: (lng + self.config.rotate_speed).rem_euclid(360.0),
            lat: lat + (0.0 - lat) * self.config.return_speed,
        };
        self.orientation
    }

    /// Pointer entered the globe surface.
    pub fn on_hover_enter(&mut self) {
        if !self.hovered {
            debug!(lng = self.orientation.lng, lat = self.orientation.lat, "rotation paused");
        }
        self.hovered = true;
    }

    /// Pointer left the globe surface.
    pub fn on_hover_leave(&mut self) {
        if self.hovered {
            debug!("rotation resumed");
        }
        self.hovered = false;
    }

    /// Overwrite the orientation from explicit user input.
    pub fn set_orientation(&mut self, orientation: GlobeOrientation) {
        self.orientation = GlobeOrientation {
            lng: orientation.lng.rem_euclid(360.0),
            lat: orientation.lat.clamp(-MAX_PAN_LATITUDE, MAX_PAN_LATITUDE),
        };
    }

    /// Drag the globe by `(d_lng, d_lat)` degrees.
    pub fn pan_by(&mut self, d_lng: f64, d_lat: f64) -> GlobeOrientation {
        let GlobeOrientation { lng, lat } = self.orientation;
        self.set_orientation(GlobeOrientation::new(lng + d_lng, lat + d_lat));
        self.orientation
    }

    /// Scale the altitude by `factor`, clamped to the configured bounds.
    pub fn zoom_by(&mut self, factor: f64) -> f64 {
        if factor.is_finite() && factor > 0.0 {
            self.altitude =
                (self.altitude * factor).clamp(self.config.min_altitude, self.config.max_altitude);
        }
        self.altitude
    }

    /// Replace the tuning. The altitude is re-clamped to the new bounds.
    pub fn set_config(&mut self, config: MotionConfig) {
        self.config = config;
        self.altitude = self.altitude.clamp(config.min_altitude, config.max_altitude);
    }

    pub fn config(&self) -> MotionConfig {
        self.config
    }

    /// Current orientation.
    pub fn orientation(&self) -> GlobeOrientation {
        self.orientation
    }

    /// Camera altitude above the surface in globe radii.
    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    /// Whether the pointer is over the globe.
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Current state of the machine.
    pub fn state(&self) -> MotionState {
        if self.hovered {
            MotionState::Paused
        } else {
            MotionState::Rotating
        }
    }
}

impl Default for CameraMotionController {
    fn default() -> Self {
        Self::new(MotionConfig::default(), GlobeOrientation::default(), 2.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latitude_decays_toward_equator() {
        let mut ctrl = CameraMotionController::new(
            MotionConfig::default(),
            GlobeOrientation::new(0.0, 30.0),
            2.5,
        );
        let mut prev = ctrl.orientation().lat.abs();
        for frame in 0..500 {
            let lat = ctrl.update().lat.abs();
            assert!(lat < prev, "frame {frame}: |lat| {lat} did not shrink from {prev}");
            prev = lat;
        }
        assert!(prev < 30.0 * 0.98_f64.powi(499));
    }

    #[test]
    fn test_negative_latitude_also_levels() {
        let mut ctrl = CameraMotionController::new(
            MotionConfig::default(),
            GlobeOrientation::new(0.0, -45.0),
            2.5,
        );
        ctrl.update();
        let lat = ctrl.orientation().lat;
        assert!(lat > -45.0 && lat < 0.0);
    }

    #[test]
    fn test_full_revolution_after_3600_frames() {
        let start = GlobeOrientation::new(42.0, 0.0);
        let mut ctrl = CameraMotionController::new(MotionConfig::default(), start, 2.5);
        for _ in 0..3600 {
            ctrl.update();
        }
        let lng = ctrl.orientation().lng;
        let diff = (lng - start.lng).abs();
        assert!(diff < 1e-6 || (360.0 - diff) < 1e-6, "lng {lng}");
    }

    #[test]
    fn test_longitude_stays_in_range() {
        let mut ctrl = CameraMotionController::default();
        for _ in 0..10 {
            let lng = ctrl.update().lng;
            assert!((0.0..360.0).contains(&lng), "lng {lng}");
        }
        // First westward step from 0 wraps to just under 360.
        let mut ctrl = CameraMotionController::default();
        assert!((ctrl.update().lng - 359.9).abs() < 1e-9);
    }

    #[test]
    fn test_hover_freezes_orientation() {
        let mut ctrl = CameraMotionController::new(
            MotionConfig::default(),
            GlobeOrientation::new(100.0, 20.0),
            2.5,
        );
        ctrl.update();
        ctrl.on_hover_enter();
        assert_eq!(ctrl.state(), MotionState::Paused);
        let frozen = ctrl.orientation();
        for _ in 0..120 {
            assert_eq!(ctrl.update(), frozen);
        }
        ctrl.on_hover_leave();
        assert_eq!(ctrl.state(), MotionState::Rotating);
        let resumed = ctrl.update();
        assert!((resumed.lng - (frozen.lng - 0.1)).abs() < 1e-9);
    }

    #[test]
    fn test_user_input_overwrites_immediately() {
        let mut ctrl = CameraMotionController::default();
        ctrl.on_hover_enter();
        ctrl.set_orientation(GlobeOrientation::new(-30.0, 10.0));
        assert_eq!(ctrl.orientation(), GlobeOrientation::new(330.0, 10.0));
    }

    #[test]
    fn test_pan_clamps_latitude() {
        let mut ctrl = CameraMotionController::default();
        let o = ctrl.pan_by(5.0, 200.0);
        assert_eq!(o.lat, 89.0);
        assert_eq!(o.lng, 5.0);
    }

    #[test]
    fn test_zoom_clamped_to_bounds() {
        let mut ctrl = CameraMotionController::default();
        assert_eq!(ctrl.zoom_by(100.0), 8.0);
        assert_eq!(ctrl.zoom_by(0.0001), 0.5);
        assert_eq!(ctrl.zoom_by(f64::NAN), 0.5);
    }

    #[test]
    fn test_set_config_keeps_orientation() {
        let mut ctrl = CameraMotionController::default();
        ctrl.zoom_by(100.0);
        let before = ctrl.orientation();
        ctrl.set_config(MotionConfig {
            rotate_speed: 1.0,
            max_altitude: 4.0,
            ..MotionConfig::default()
        });
        assert_eq!(ctrl.orientation(), before);
        assert_eq!(ctrl.altitude(), 4.0);
        assert_eq!(ctrl.config().rotate_speed, 1.0);
    }
}
