//! Workspace base error type.
//!
//! Sub-crates define their own error enums for their own failure modes and
//! use `FtError` for the shared ones (unknown ids, configuration problems).

use thiserror::Error;

use crate::{AgentId, SiteId};

/// The top-level error type for `ft-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum FtError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("site {0} not found")]
    SiteNotFound(SiteId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `ft-core`.
pub type FtResult<T> = Result<T, FtError>;
