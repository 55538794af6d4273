//! `ft-traffic` — keeps robots from sharing a site or a lane.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`coordinator`] | `TrafficCoordinator`, `Reservation`, `TrafficReport`    |
//! | [`error`]       | `ReservationError`, `ReservationResult<T>`              |
//!
//! # Two kinds of state
//!
//! ```text
//! occupancy     site → agent, lane → agent   rebuilt from the robots every tick
//! reservations  agent → (route, step)        persist until released or replaced
//! waiting       {agent}                      robots the coordinator put on hold
//! ```
//!
//! Occupancy is cheap to derive, so it is never updated incrementally.  A
//! reservation is released when its robot stops being `Moving`/`Waiting`
//! (arrival, battery death) or when the orchestrator clears it.
//!
//! # Cargo features
//!
//! | Feature   | Effect                                                   |
//! |-----------|----------------------------------------------------------|
//! | `fx-hash` | FxHash instead of SipHash for the internal maps.          |

pub mod coordinator;
pub mod error;


pub use coordinator::{Reservation, TrafficCoordinator, TrafficReport};
pub use error::{ReservationError, ReservationResult};
