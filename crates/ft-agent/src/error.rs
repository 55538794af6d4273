use ft_core::AgentId;
use thiserror::Error;

use crate::AgentStatus;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AgentError {
    #[error("route of {0} site(s) is too short to move along")]
    RouteTooShort(usize),

    #[error("agent {agent} is {status}")]
    NotAssignable { agent: AgentId, status: AgentStatus },

    #[error("agent {0} has no battery - needs charging")]
    BatteryDead(AgentId),

    #[error("agent {agent} cannot start charging while {status}")]
    CannotCharge { agent: AgentId, status: AgentStatus },
}

pub type AgentResult<T> = Result<T, AgentError>;
