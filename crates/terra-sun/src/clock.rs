//! Frame-driven simulated clock.
//!
//! Time advances by a fixed number of simulated milliseconds per rendered
//! frame, independent of how fast frames actually arrive.

use crate::solar::{SolarError, SubSolarPoint, compute_sub_solar_point};

/// One simulated minute per frame.
pub const DEFAULT_TIME_STEP_MS: i64 = 60_000;

/// Virtual timestamp advanced once per frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulatedClock {
    now_ms: i64,
    step_ms: i64,
    frames: u64,
}

impl SimulatedClock {
    /// Create a clock at `start_ms` advancing `step_ms` per frame.
    ///
    /// Negative steps are clamped to zero so the clock never runs backwards.
    pub fn new(start_ms: i64, step_ms: i64) -> Self {
        Self {
            now_ms: start_ms,
            step_ms: step_ms.max(0),
            frames: 0,
        }
    }

    /// Create a clock starting at the current wall-clock time.
    pub fn starting_now(step_ms: i64) -> Self {
        let now_ms = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0);
        Self::new(now_ms, step_ms)
    }

    /// Advance by one frame's step and return the new timestamp.
    pub fn advance(&mut self) -> i64 {
        self.now_ms = self.now_ms.saturating_add(self.step_ms);
        self.frames += 1;
        self.now_ms
    }

    /// Current simulated timestamp in milliseconds since the Unix epoch.
    pub fn now_ms(&self) -> i64 {
        self.now_ms
    }

    /// Simulated milliseconds added per frame.
    pub fn step_ms(&self) -> i64 {
        self.step_ms
    }

    /// Number of frames this clock has advanced.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Sub-solar point at the current simulated time.
    pub fn sub_solar_point(&self) -> Result<SubSolarPoint, SolarError> {
        compute_sub_solar_point(self.now_ms as f64)
    }
}

impl Default for SimulatedClock {
    fn default() -> Self {
        Self::starting_now(DEFAULT_TIME_STEP_MS)
    }
}
