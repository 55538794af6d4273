//! `ft-graph` — site/lane topology, spatial snapping, and routing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`graph`]   | `NavGraph` (CSR + R-tree), `NavGraphBuilder`, `Site`, `LaneKey` |
//! | [`router`]  | `Router` trait, `Route`, `AStarRouter`                      |
//! | [`loader`]  | `load_graph_json`, `load_graph_reader`, `parse_graph_str`   |
//! | [`error`]   | `GraphError`, `GraphResult<T>`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `ft-core` types.        |

pub mod error;
pub mod graph;
pub mod loader;
pub mod router;


pub use error::{GraphError, GraphResult};
pub use graph::{LaneKey, NavGraph, NavGraphBuilder, Site};
pub use loader::{load_graph_json, load_graph_reader, parse_graph_str};
pub use router::{AStarRouter, Route, Router};
