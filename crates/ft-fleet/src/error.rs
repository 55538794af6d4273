use ft_agent::{AgentError, AgentStatus};
use ft_core::{AgentId, SiteId};
use ft_graph::GraphError;
use thiserror::Error;

/// Every way an orchestrator request can be refused.  None of them leave the
/// fleet in a changed state.
#[derive(Debug, Error)]
pub enum FleetError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("site {0} not found")]
    SiteNotFound(SiteId),

    #[error("agent {agent} is busy ({status})")]
    AgentBusy { agent: AgentId, status: AgentStatus },

    #[error("agent {0} has a dead battery")]
    BatteryDead(AgentId),

    #[error("agent {agent} is already at site {site}")]
    AlreadyAtDestination { agent: AgentId, site: SiteId },

    #[error("no path from site {from} to site {to}")]
    NoPath { from: SiteId, to: SiteId },

    #[error("no reservable path for agent {agent} to site {to}")]
    NoValidPath { agent: AgentId, to: SiteId },

    #[error("site {site} is occupied by agent {holder}")]
    SpawnSiteOccupied { site: SiteId, holder: AgentId },

    #[error("agent {agent} is at site {site}, which has no charger")]
    NotAtCharger { agent: AgentId, site: SiteId },

    #[error("fleet configuration error: {0}")]
    Config(String),

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("agent error: {0}")]
    Agent(#[from] AgentError),
}

pub type FleetResult<T> = Result<T, FleetError>;
