//! Graph-subsystem error type.

use thiserror::Error;

use ft_core::SiteId;

/// Errors produced by `ft-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("no route from site {from} to site {to}")]
    NoRoute { from: SiteId, to: SiteId },

    #[error("site {0} not found in graph")]
    SiteNotFound(SiteId),

    #[error("site {0} is defined more than once")]
    DuplicateSite(SiteId),

    #[error("lane #{lane} references undefined site {site}")]
    UnknownLaneEndpoint { lane: usize, site: SiteId },

    #[error("lane #{lane} connects site {site} to itself")]
    SelfLoop { lane: usize, site: SiteId },

    #[error("graph parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;
