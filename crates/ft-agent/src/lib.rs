//! `ft-agent` — per-robot motion, battery, and route state.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`status`]  | `AgentStatus`, the tagged state of a robot                |
//! | [`robot`]   | `Robot` state machine, `StepOutcome`                      |
//! | [`error`]   | `AgentError`, `AgentResult<T>`                            |
//!
//! # State machine
//!
//! ```text
//!              assign_route                 progress ≥ 1 on last lane
//!   Idle ──────────────────────► Moving ───────────────────────────► TaskComplete
//!   TaskComplete ───────────────►  │ ▲                                   │
//!                               wait│ │resume                 start_charging (at charger)
//!                                  ▼ │                                   ▼
//!                                Waiting                             Charging
//!                                                                        │ battery = 100
//!   Moving ── battery = 0 ──► BatteryDead ── start_charging ──► Charging ─┘──► TaskComplete
//! ```
//!
//! A robot only ever mutates itself.  The traffic coordinator and the fleet
//! orchestrator drive it through `wait`/`resume`/`assign_route`/
//! `start_charging`; elapsed time drives it through `update`.

pub mod error;
pub mod robot;
pub mod status;

#[cfg(test)]
mod tests;

pub use error::{AgentError, AgentResult};
pub use robot::{Robot, StepOutcome};
pub use status::AgentStatus;
