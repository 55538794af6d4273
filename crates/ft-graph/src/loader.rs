//! JSON navigation-graph loader.
//!
//! # Document format
//!
//! ```json
//! {
//!   "vertices": [
//!     { "id": 0, "coordinates": [0.0, 0.0], "name": "dock",    "is_charger": false },
//!     { "id": 1, "coordinates": [4.0, 0.0], "name": "charger", "is_charger": true }
//!   ],
//!   "lanes": [[0, 1]]
//! }
//! ```
//!
//! `is_charger` defaults to `false` when absent.  Each lane entry must start
//! with two integer site ids; trailing elements (lane attributes written by
//! some editors) are ignored.  A lane naming an undefined site fails the load
//! with [`GraphError::UnknownLaneEndpoint`].

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use ft_core::{Point, SiteId};

use crate::graph::{NavGraph, NavGraphBuilder};
use crate::GraphError;

// ── Document records ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct GraphDocument {
    vertices: Vec<VertexRecord>,
    #[serde(default)]
    lanes:    Vec<Vec<Value>>,
}

#[derive(Deserialize)]
struct VertexRecord {
    id:          u32,
    coordinates: [f64; 2],
    name:        String,
    #[serde(default)]
    is_charger:  bool,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`NavGraph`] from a JSON file.
pub fn load_graph_json(path: &Path) -> Result<NavGraph, GraphError> {
    let file = std::fs::File::open(path)?;
    load_graph_reader(std::io::BufReader::new(file))
}

/// Like [`load_graph_json`] but accepts any `Read` source.
pub fn load_graph_reader<R: Read>(reader: R) -> Result<NavGraph, GraphError> {
    let doc: GraphDocument =
        serde_json::from_reader(reader).map_err(|e| GraphError::Parse(e.to_string()))?;
    build_from_document(doc)
}

/// Parse a [`NavGraph`] from an in-memory JSON string.
pub fn parse_graph_str(json: &str) -> Result<NavGraph, GraphError> {
    let doc: GraphDocument =
        serde_json::from_str(json).map_err(|e| GraphError::Parse(e.to_string()))?;
    build_from_document(doc)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn build_from_document(doc: GraphDocument) -> Result<NavGraph, GraphError> {
    let mut b = NavGraphBuilder::with_capacity(doc.vertices.len(), doc.lanes.len());

    for v in doc.vertices {
        b.add_site(SiteId(v.id), Point::from(v.coordinates), v.name, v.is_charger)?;
    }

    for (i, lane) in doc.lanes.iter().enumerate() {
        let (a, c) = parse_lane(i, lane)?;
        b.add_lane(a, c)?;
    }

    Ok(b.build())
}

fn parse_lane(index: usize, lane: &[Value]) -> Result<(SiteId, SiteId), GraphError> {
    let endpoint = |pos: usize| -> Result<SiteId, GraphError> {
        lane.get(pos)
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .map(SiteId)
            .ok_or_else(|| {
                GraphError::Parse(format!(
                    "lane #{index}: expected two integer site ids, got {lane:?}"
                ))
            })
    };
    Ok((endpoint(0)?, endpoint(1)?))
}
