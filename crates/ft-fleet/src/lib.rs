//! `ft-fleet` — the fleet orchestrator.
//!
//! # Per-tick order
//!
//! ```text
//! tick(dt):
//!   ① Advance     — Robot::update(dt) for every robot; a battery that runs
//!                   out drops the robot's reservations.
//!   ② Dock        — TaskComplete on a charger (battery < 100) → Charging.
//!   ③ Coordinate  — TrafficCoordinator::tick: rebuild occupancy, then
//!                   wait/resume against this tick's positions.
//!   ④ Chargers    — idle robots at or below the low-battery threshold
//!                   charge in place or are sent to the nearest charger.
//! ```
//!
//! # Task assignment
//!
//! ```text
//! assign_task(agent, dest):
//!   validate → observe other robots → up to N lane-disjoint candidates
//!   → rank by score → reserve best collision-free candidate
//!   → else reserve shortest and start Waiting → else NoValidPath
//! ```
//!
//! # Cargo features
//!
//! | Feature   | Effect                                                   |
//! |-----------|----------------------------------------------------------|
//! | `serde`   | Serde derives on configuration and `AgentStatus`.         |
//! | `fx-hash` | FxHash maps inside the traffic coordinator.               |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ft_core::{AgentId, SiteId};
//! use ft_fleet::{EventLog, FleetBuilder};
//! use ft_graph::{parse_graph_str, AStarRouter};
//!
//! let graph = parse_graph_str(json)?;
//! let mut fleet = FleetBuilder::new(graph, AStarRouter)
//!     .observer(EventLog::new())
//!     .spawn_at([SiteId(0)])
//!     .build()?;
//! fleet.assign_task(AgentId(0), SiteId(4))?;
//! fleet.run_ticks(50, 0.1);
//! ```

pub mod builder;
pub mod error;
pub mod event;
pub mod fleet;
pub mod observer;
pub mod scoring;


pub use builder::FleetBuilder;
pub use error::{FleetError, FleetResult};
pub use event::FleetEvent;
pub use fleet::{Assignment, Fleet};
pub use observer::{EventLog, FleetObserver, NoopObserver};
pub use scoring::{rank_routes, ScoredRoute, TrafficPicture};
