use ft_core::{AgentId, SiteId};
use ft_graph::LaneKey;
use thiserror::Error;

/// Why [`TrafficCoordinator::reserve_route`](crate::TrafficCoordinator::reserve_route)
/// refused a route.  The coordinator is unchanged after any of these.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ReservationError {
    #[error("site {site} is occupied by agent {holder}")]
    SiteOccupied { site: SiteId, holder: AgentId },

    #[error("lane {lane} is occupied by agent {holder}")]
    LaneOccupied { lane: LaneKey, holder: AgentId },

    #[error("agent {holder} holds lane {lane} in the opposite direction")]
    HeadOn { lane: LaneKey, holder: AgentId },
}

pub type ReservationResult<T> = Result<T, ReservationError>;
