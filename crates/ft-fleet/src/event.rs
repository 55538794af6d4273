//! Notable things that happen to the fleet.

use std::fmt;

use ft_core::{AgentId, SiteId};
use ft_graph::Route;

/// A notable fleet event, delivered to the
/// [`FleetObserver`](crate::FleetObserver) as it happens.
///
/// `Display` renders a one-line, human-readable message; what the
/// presentation layer does with it is up to the presentation layer.
#[derive(Clone, Debug, PartialEq)]
pub enum FleetEvent {
    Spawned { agent: AgentId, site: SiteId },
    SpawnRejected { site: SiteId, reason: String },

    TaskAssigned { agent: AgentId, route: Route, starts_waiting: bool },
    TaskRejected { agent: AgentId, destination: SiteId, reason: String },
    Arrived { agent: AgentId, site: SiteId },

    Waiting { agent: AgentId, site: SiteId },
    Resumed { agent: AgentId },

    BatteryDepleted { agent: AgentId, site: SiteId },
    /// A low-battery robot was sent towards `charger`.
    SeekingCharger { agent: AgentId, charger: SiteId, battery: f64 },
    ChargerUnreachable { agent: AgentId, battery: f64 },
    ChargingStarted { agent: AgentId, site: SiteId },
    ChargingComplete { agent: AgentId },
}

impl FleetEvent {
    /// The agent this event concerns, if any.
    pub fn agent(&self) -> Option<AgentId> {
        match *self {
            FleetEvent::SpawnRejected { .. } => None,
            FleetEvent::Spawned { agent, .. }
            | FleetEvent::TaskAssigned { agent, .. }
            | FleetEvent::TaskRejected { agent, .. }
            | FleetEvent::Arrived { agent, .. }
            | FleetEvent::Waiting { agent, .. }
            | FleetEvent::Resumed { agent }
            | FleetEvent::BatteryDepleted { agent, .. }
            | FleetEvent::SeekingCharger { agent, .. }
            | FleetEvent::ChargerUnreachable { agent, .. }
            | FleetEvent::ChargingStarted { agent, .. }
            | FleetEvent::ChargingComplete { agent } => Some(agent),
        }
    }

    /// `true` for refusals and failures.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            FleetEvent::SpawnRejected { .. }
                | FleetEvent::TaskRejected { .. }
                | FleetEvent::BatteryDepleted { .. }
                | FleetEvent::ChargerUnreachable { .. }
        )
    }
}

impl fmt::Display for FleetEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FleetEvent::Spawned { agent, site } => {
                write!(f, "Robot {agent} spawned at site {site}")
            }
            FleetEvent::SpawnRejected { site, reason } => {
                write!(f, "Cannot spawn at site {site}: {reason}")
            }
            FleetEvent::TaskAssigned { agent, route, starts_waiting } => {
                write!(f, "Robot {agent} assigned to site {}: {route}", route.destination())?;
                if *starts_waiting {
                    f.write_str(" (waiting for traffic)")?;
                }
                Ok(())
            }
            FleetEvent::TaskRejected { agent, destination, reason } => {
                write!(f, "Robot {agent} cannot go to site {destination}: {reason}")
            }
            FleetEvent::Arrived { agent, site } => {
                write!(f, "Robot {agent} arrived at site {site}")
            }
            FleetEvent::Waiting { agent, site } => {
                write!(f, "Robot {agent} waiting at site {site}")
            }
            FleetEvent::Resumed { agent } => write!(f, "Robot {agent} resumed"),
            FleetEvent::BatteryDepleted { agent, site } => {
                write!(f, "Robot {agent} battery depleted at site {site}; task abandoned")
            }
            FleetEvent::SeekingCharger { agent, charger, battery } => {
                write!(f, "Robot {agent} battery low ({battery:.0}%), heading to charger {charger}")
            }
            FleetEvent::ChargerUnreachable { agent, battery } => {
                write!(f, "Robot {agent} battery low ({battery:.0}%), no charger reachable")
            }
            FleetEvent::ChargingStarted { agent, site } => {
                write!(f, "Robot {agent} charging at site {site}")
            }
            FleetEvent::ChargingComplete { agent } => {
                write!(f, "Robot {agent} fully charged")
            }
        }
    }
}
