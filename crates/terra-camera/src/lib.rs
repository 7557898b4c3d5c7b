//! Globe camera: orientation state machine and the view/projection it drives.

pub mod camera;
pub mod motion;

pub use camera::{Camera, GLOBE_RADIUS, Projection, orientation_rotation, polar_to_cartesian};
pub use motion::{
    CameraMotionController, DEFAULT_RETURN_SPEED, DEFAULT_ROTATE_SPEED, GlobeOrientation,
    MotionConfig, MotionState,
};
