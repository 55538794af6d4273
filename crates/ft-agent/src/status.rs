//! Robot status tag.

use std::fmt;

/// What a robot is currently doing.
///
/// "Low battery" is not a status; see the advisory
/// [`Robot::needs_charging`](crate::Robot::needs_charging) predicate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AgentStatus {
    #[default]
    Idle,
    Moving,
    Waiting,
    Charging,
    TaskComplete,
    BatteryDead,
}

impl AgentStatus {
    /// `true` if a new route may be assigned in this status.
    #[inline]
    pub fn accepts_task(self) -> bool {
        matches!(self, AgentStatus::Idle | AgentStatus::TaskComplete)
    }

    /// `true` while the robot holds a route (moving or blocked on it).
    #[inline]
    pub fn is_en_route(self) -> bool {
        matches!(self, AgentStatus::Moving | AgentStatus::Waiting)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AgentStatus::Idle         => "idle",
            AgentStatus::Moving       => "moving",
            AgentStatus::Waiting      => "waiting",
            AgentStatus::Charging     => "charging",
            AgentStatus::TaskComplete => "task_complete",
            AgentStatus::BatteryDead  => "battery_dead",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
