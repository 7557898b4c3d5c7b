//! Low-precision solar ephemeris: sub-solar point from a UTC timestamp.
//!
//! Uses the NOAA series for the equation of time and solar declination.
//! Accuracy is a fraction of a degree, which is plenty for drawing a
//! terminator on a globe.

/// Milliseconds in one UTC day.
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Julian day of the Unix epoch (1970-01-01T00:00Z).
const UNIX_EPOCH_JULIAN_DAY: f64 = 2_440_587.5;

/// Julian day of the J2000.0 epoch.
const J2000_JULIAN_DAY: f64 = 2_451_545.0;

/// Days in a Julian century.
const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// Errors from the solar position model.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum SolarError {
    /// The timestamp was NaN or infinite.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(f64),
}

/// The geographic point directly beneath the sun.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubSolarPoint {
    /// Longitude in degrees. Not wrapped; see [`normalized_longitude`](Self::normalized_longitude).
    pub longitude: f64,
    /// Latitude in degrees, equal to the solar declination.
    pub latitude: f64,
}

impl SubSolarPoint {
    /// Longitude wrapped into `[-180, 180)`.
    pub fn normalized_longitude(&self) -> f64 {
        (self.longitude + 180.0).rem_euclid(360.0) - 180.0
    }
}

/// Julian centuries since J2000.0 for a Unix millisecond timestamp.
pub fn julian_century(timestamp_ms: f64) -> f64 {
    (timestamp_ms / MS_PER_DAY + UNIX_EPOCH_JULIAN_DAY - J2000_JULIAN_DAY) / DAYS_PER_JULIAN_CENTURY
}

fn mean_longitude(t: f64) -> f64 {
    (280.46646 + t * (36_000.76983 + t * 0.000_303_2)).rem_euclid(360.0)
}

fn mean_anomaly(t: f64) -> f64 {
    357.529_11 + t * (35_999.050_29 - 0.000_153_7 * t)
}

fn orbit_eccentricity(t: f64) -> f64 {
    0.016_708_634 - t * (0.000_042_037 + 0.000_000_126_7 * t)
}

fn equation_of_center(t: f64) -> f64 {
    let m = mean_anomaly(t).to_radians();
    m.sin() * (1.914_602 - t * (0.004_817 + 0.000_014 * t))
        + (2.0 * m).sin() * (0.019_993 - 0.000_101 * t)
        + (3.0 * m).sin() * 0.000_289
}

/// Longitude of the ascending node of the moon's orbit, used for nutation terms.
fn omega(t: f64) -> f64 {
    (125.04 - 1934.136 * t).to_radians()
}

fn apparent_longitude(t: f64) -> f64 {
    mean_longitude(t) + equation_of_center(t) - 0.005_69 - 0.004_78 * omega(t).sin()
}

fn mean_obliquity(t: f64) -> f64 {
    let seconds = 21.448 - t * (46.815 + t * (0.000_59 - t * 0.001_813));
    23.0 + (26.0 + seconds / 60.0) / 60.0
}

fn obliquity_correction(t: f64) -> f64 {
    mean_obliquity(t) + 0.002_56 * omega(t).cos()
}

/// Solar declination in degrees for Julian century `t`.
pub fn declination(t: f64) -> f64 {
    let epsilon = obliquity_correction(t).to_radians();
    let lambda = apparent_longitude(t).to_radians();
    (epsilon.sin() * lambda.sin()).asin().to_degrees()
}

/// Equation of time in minutes for Julian century `t`.
///
/// Positive when the apparent sun is ahead of the mean sun.
pub fn equation_of_time(t: f64) -> f64 {
    let epsilon = obliquity_correction(t).to_radians();
    let l0 = mean_longitude(t).to_radians();
    let e = orbit_eccentricity(t);
    let m = mean_anomaly(t).to_radians();
    let y = (epsilon / 2.0).tan().powi(2);

    let eq = y * (2.0 * l0).sin() - 2.0 * e * m.sin() + 4.0 * e * y * m.sin() * (2.0 * l0).cos()
        - 0.5 * y * y * (4.0 * l0).sin()
        - 1.25 * e * e * (2.0 * m).sin();
    eq.to_degrees() * 4.0
}

/// Compute the sub-solar point for a Unix millisecond timestamp.
///
/// Returns [`SolarError::InvalidTimestamp`] for NaN or infinite input so
/// callers can keep their last good value instead of feeding NaN to a shader.
pub fn compute_sub_solar_point(timestamp_ms: f64) -> Result<SubSolarPoint, SolarError> {
    if !timestamp_ms.is_finite() {
        return Err(SolarError::InvalidTimestamp(timestamp_ms));
    }

    let midnight_ms = timestamp_ms - timestamp_ms.rem_euclid(MS_PER_DAY);
    let t = julian_century(timestamp_ms);

    let longitude =
        (midnight_ms - timestamp_ms) / MS_PER_DAY * 360.0 - 180.0 - equation_of_time(t) / 4.0;

    Ok(SubSolarPoint {
        longitude,
        latitude: declination(t),
    })
}
