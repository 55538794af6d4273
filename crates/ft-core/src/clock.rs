//! Simulation time model.
//!
//! # Design
//!
//! The fleet is driven by an external loop that calls `tick(elapsed)` once per
//! frame with a measured or fixed step.  `FleetClock` records how many ticks
//! have run and how many simulated seconds they covered; nothing in the core
//! reads wall-clock time.

use std::fmt;

/// Tick counter plus accumulated simulated time.
///
/// `FleetClock` is cheap to copy and holds no heap data.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FleetClock {
    /// Number of completed ticks.
    pub ticks: u64,
    /// Sum of all elapsed-time steps, in seconds.
    pub elapsed_secs: f64,
}

impl FleetClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sanitize a caller-provided step: negative, NaN, or infinite values
    /// become `0.0` so a bad frame time can never move agents backwards.
    #[inline]
    pub fn sanitize_step(dt: f64) -> f64 {
        if dt.is_finite() && dt > 0.0 { dt } else { 0.0 }
    }

    /// Record one tick of `dt` seconds.  Returns the sanitized step.
    pub fn advance(&mut self, dt: f64) -> f64 {
        let dt = Self::sanitize_step(dt);
        self.ticks += 1;
        self.elapsed_secs += dt;
        dt
    }

    /// Break elapsed time into (hours, minutes, seconds).
    pub fn elapsed_hms(&self) -> (u64, u32, u32) {
        let total = self.elapsed_secs.max(0.0) as u64;
        let hours = total / 3_600;
        let minutes = ((total % 3_600) / 60) as u32;
        let seconds = (total % 60) as u32;
        (hours, minutes, seconds)
    }
}

impl fmt::Display for FleetClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, s) = self.elapsed_hms();
        if h > 0 {
            write!(f, "T{} ({h}h {m}m {s}s)", self.ticks)
        } else if m > 0 {
            write!(f, "T{} ({m}m {s}s)", self.ticks)
        } else {
            write!(f, "T{} ({s}s)", self.ticks)
        }
    }
}
