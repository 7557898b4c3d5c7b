//! Sun position and simulated time for the day/night globe.
//!
//! [`SimulatedClock`] advances a virtual millisecond timestamp by a fixed step
//! every frame, and [`compute_sub_solar_point`] turns that timestamp into the
//! geographic point directly beneath the sun.

pub mod clock;
pub mod solar;

pub use clock::{DEFAULT_TIME_STEP_MS, SimulatedClock};
pub use solar::{
    MS_PER_DAY, SolarError, SubSolarPoint, compute_sub_solar_point, declination,
    equation_of_time, julian_century,
};
