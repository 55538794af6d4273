//! Fleet configuration.
//!
//! Typically built in code by the application (or deserialized from a JSON
//! document with the `serde` feature) and handed to `FleetBuilder`.  Every
//! field has a default matching the reference warehouse setup.

use crate::{FtError, FtResult};

// ── RobotParams ───────────────────────────────────────────────────────────────

/// Per-robot motion and battery constants.  Shared by every spawned robot.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RobotParams {
    /// Lane fraction covered per second.  1.0 = one lane per second
    /// regardless of the lane's length.
    pub move_speed: f64,

    /// Battery percentage lost per second while moving.
    pub battery_drain_rate: f64,

    /// Battery percentage gained per second while charging.
    pub charge_rate: f64,

    /// At or below this percentage the robot is sent to a charger.
    pub low_battery_threshold: f64,
}

impl Default for RobotParams {
    fn default() -> Self {
        Self {
            move_speed:            1.0,
            battery_drain_rate:    5.0,
            charge_rate:           20.0,
            low_battery_threshold: 20.0,
        }
    }
}

// ── ScoringWeights ────────────────────────────────────────────────────────────

/// Penalties used when ranking candidate routes.  Lower score wins.
///
/// The defaults keep `blocked_site_penalty > blocked_lane_penalty >
/// detour_penalty`; the exact numbers are tuning, not contract.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScoringWeights {
    /// Added per segment with a parked robot's site at either end.  A blocked
    /// site in the middle of a route is charged for both of its segments.
    pub blocked_site_penalty: u32,

    /// Added per segment using a lane another robot is traversing.
    pub blocked_lane_penalty: u32,

    /// Added per anticipated same-site, same-step meeting with a moving robot.
    pub collision_penalty: u32,

    /// Added once when a route is more than `detour_ratio` times longer
    /// (in sites) than the shortest candidate.
    pub detour_penalty: u32,

    pub detour_ratio: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            blocked_site_penalty: 100,
            blocked_lane_penalty: 50,
            collision_penalty:    75,
            detour_penalty:       40,
            detour_ratio:         1.5,
        }
    }
}

// ── FleetConfig ───────────────────────────────────────────────────────────────

/// Top-level orchestrator configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FleetConfig {
    pub robot: RobotParams,

    pub scoring: ScoringWeights,

    /// How many lane-disjoint candidate routes to consider per assignment.
    pub max_alternatives: usize,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            robot:            RobotParams::default(),
            scoring:          ScoringWeights::default(),
            max_alternatives: 3,
        }
    }
}

impl FleetConfig {
    /// Reject values that would make the simulation meaningless.
    pub fn validate(&self) -> FtResult<()> {
        let r = &self.robot;
        let positive = [
            ("move_speed", r.move_speed),
            ("battery_drain_rate", r.battery_drain_rate),
            ("charge_rate", r.charge_rate),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(FtError::Config(format!("{name} must be positive, got {value}")));
            }
        }
        if !(0.0..=100.0).contains(&r.low_battery_threshold) {
            return Err(FtError::Config(format!(
                "low_battery_threshold must be within [0, 100], got {}",
                r.low_battery_threshold
            )));
        }
        if self.max_alternatives == 0 {
            return Err(FtError::Config("max_alternatives must be at least 1".into()));
        }
        if !(self.scoring.detour_ratio >= 1.0) {
            return Err(FtError::Config(format!(
                "detour_ratio must be >= 1.0, got {}",
                self.scoring.detour_ratio
            )));
        }
        Ok(())
    }
}
