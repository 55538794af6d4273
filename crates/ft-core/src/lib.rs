//! `ft-core` — foundational types for the fleet-traffic workspace.
//!
//! This crate is a dependency of every other `ft-*` crate.  It has no `ft-*`
//! dependencies and minimal external ones (only `thiserror`, plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `SiteId`                                   |
//! | [`geo`]         | `Point`, Euclidean distance, interpolation            |
//! | [`clock`]       | `FleetClock` — tick counter + elapsed seconds         |
//! | [`config`]      | `FleetConfig`, `RobotParams`, `ScoringWeights`        |
//! | [`error`]       | `FtError`, `FtResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod clock;
pub mod config;
pub mod error;
pub mod geo;
pub mod ids;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use clock::FleetClock;
pub use config::{FleetConfig, RobotParams, ScoringWeights};
pub use error::{FtError, FtResult};
pub use geo::Point;
pub use ids::{AgentId, SiteId};
