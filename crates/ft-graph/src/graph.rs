//! Navigation graph representation and builder.
//!
//! # Data layout
//!
//! Sites are stored densely in insertion order; an id → slot map translates
//! the document's (possibly sparse) `SiteId`s.  Lanes are undirected, so the
//! builder emits one adjacency entry per direction and packs them in
//! **Compressed Sparse Row (CSR)** form:
//!
//! ```text
//! adj_to[ adj_start[slot] .. adj_start[slot+1] ]
//! ```
//!
//! Neighbour iteration in the A* inner loop is therefore a contiguous scan.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps a floor-plan point to the nearest site.  The
//! presentation layer uses it to turn a click into a site id.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use ft_core::{Point, SiteId};

use crate::router::Route;
use crate::{GraphError, GraphResult};

// ── Site ──────────────────────────────────────────────────────────────────────

/// A named location robots can occupy.  Immutable after load.
#[derive(Clone, Debug, PartialEq)]
pub struct Site {
    pub id:         SiteId,
    pub pos:        Point,
    pub name:       String,
    pub is_charger: bool,
}

// ── LaneKey ───────────────────────────────────────────────────────────────────

/// Direction-independent identity of a lane: always `(min, max)`.
///
/// Occupancy and exclusion sets are keyed by `LaneKey`, so travelling `a → b`
/// and `b → a` touch the same entry.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct LaneKey {
    pub lo: SiteId,
    pub hi: SiteId,
}

impl LaneKey {
    #[inline]
    pub fn new(a: SiteId, b: SiteId) -> Self {
        if a <= b { Self { lo: a, hi: b } } else { Self { lo: b, hi: a } }
    }

    #[inline]
    pub fn touches(self, site: SiteId) -> bool {
        self.lo == site || self.hi == site
    }
}

impl fmt::Display for LaneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.lo, self.hi)
    }
}

// ── R-tree site entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct SiteEntry {
    point: [f64; 2],
    id:    SiteId,
}

impl RTreeObject for SiteEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for SiteEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── NavGraph ──────────────────────────────────────────────────────────────────

/// Undirected site/lane graph in CSR form plus a spatial index.
///
/// Build with [`NavGraphBuilder`] or load with
/// [`load_graph_json`](crate::load_graph_json).  The graph need not be
/// connected; path queries across components report
/// [`GraphError::NoRoute`].
pub struct NavGraph {
    sites: Vec<Site>,
    slot_of: HashMap<SiteId, u32>,

    // CSR adjacency over slots.  Length of `adj_start` = site_count + 1.
    adj_start:  Vec<u32>,
    adj_to:     Vec<u32>,
    adj_weight: Vec<f64>,

    /// Every lane once, sorted.
    lanes: Vec<LaneKey>,

    spatial_idx: RTree<SiteEntry>,
}

impl fmt::Debug for NavGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavGraph")
            .field("sites", &self.sites.len())
            .field("lanes", &self.lanes.len())
            .finish_non_exhaustive()
    }
}

impl NavGraph {
    /// A graph with no sites.  Every query reports `SiteNotFound`.
    pub fn empty() -> Self {
        NavGraphBuilder::new().build()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    // ── Site lookups ──────────────────────────────────────────────────────

    #[inline]
    pub fn contains(&self, id: SiteId) -> bool {
        self.slot_of.contains_key(&id)
    }

    pub fn site(&self, id: SiteId) -> Option<&Site> {
        self.slot(id).map(|s| &self.sites[s as usize])
    }

    pub fn position(&self, id: SiteId) -> Option<Point> {
        self.site(id).map(|s| s.pos)
    }

    pub fn is_charger(&self, id: SiteId) -> bool {
        self.site(id).is_some_and(|s| s.is_charger)
    }

    /// All sites in document order.
    pub fn sites(&self) -> impl Iterator<Item = &Site> + '_ {
        self.sites.iter()
    }

    /// Ids of every charger site, in document order.
    pub fn charging_sites(&self) -> Vec<SiteId> {
        self.sites
            .iter()
            .filter(|s| s.is_charger)
            .map(|s| s.id)
            .collect()
    }

    // ── Lane lookups ──────────────────────────────────────────────────────

    /// Every lane once, sorted by `(lo, hi)`.
    pub fn lanes(&self) -> &[LaneKey] {
        &self.lanes
    }

    /// Sites directly connected to `id`.
    pub fn neighbors(&self, id: SiteId) -> GraphResult<BTreeSet<SiteId>> {
        let slot = self.slot(id).ok_or(GraphError::SiteNotFound(id))?;
        Ok(self
            .out(slot)
            .map(|(to, _)| self.sites[to as usize].id)
            .collect())
    }

    /// Euclidean weight of the lane `a – b`, or `None` if there is no such lane.
    pub fn lane_weight(&self, a: SiteId, b: SiteId) -> Option<f64> {
        let from = self.slot(a)?;
        let to = self.slot(b)?;
        self.out(from).find(|&(t, _)| t == to).map(|(_, w)| w)
    }

    #[inline]
    pub fn has_lane(&self, a: SiteId, b: SiteId) -> bool {
        self.lane_weight(a, b).is_some()
    }

    /// Sum of lane weights along `route`, or `None` if two consecutive sites
    /// are not adjacent.
    pub fn route_cost(&self, route: &Route) -> Option<f64> {
        route
            .steps()
            .map(|(a, b)| self.lane_weight(a, b))
            .sum()
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The site closest to `pos`.  `None` only for an empty graph.
    pub fn nearest_site(&self, pos: Point) -> Option<SiteId> {
        self.spatial_idx
            .nearest_neighbor(&pos.to_array())
            .map(|e| e.id)
    }

    // ── Slot-level access for the router ──────────────────────────────────

    #[inline]
    pub(crate) fn slot(&self, id: SiteId) -> Option<u32> {
        self.slot_of.get(&id).copied()
    }

    #[inline]
    pub(crate) fn site_at(&self, slot: u32) -> &Site {
        &self.sites[slot as usize]
    }

    /// `(neighbour slot, lane weight)` pairs for `slot`.
    #[inline]
    pub(crate) fn out(&self, slot: u32) -> impl Iterator<Item = (u32, f64)> + '_ {
        let start = self.adj_start[slot as usize] as usize;
        let end = self.adj_start[slot as usize + 1] as usize;
        (start..end).map(move |i| (self.adj_to[i], self.adj_weight[i]))
    }
}

// ── NavGraphBuilder ───────────────────────────────────────────────────────────

/// Construct a [`NavGraph`] incrementally, then call [`build`](Self::build).
///
/// Sites must be added before the lanes that reference them.  Lane weights
/// are computed from site coordinates; duplicate lanes collapse into one.
///
/// # Example
///
/// ```
/// use ft_core::{Point, SiteId};
/// use ft_graph::NavGraphBuilder;
///
/// let mut b = NavGraphBuilder::new();
/// b.add_site(SiteId(0), Point::new(0.0, 0.0), "dock", false).unwrap();
/// b.add_site(SiteId(1), Point::new(3.0, 4.0), "charger", true).unwrap();
/// b.add_lane(SiteId(0), SiteId(1)).unwrap();
/// let graph = b.build();
/// assert_eq!(graph.lane_weight(SiteId(1), SiteId(0)), Some(5.0));
/// ```
pub struct NavGraphBuilder {
    sites:   Vec<Site>,
    slot_of: HashMap<SiteId, u32>,
    lanes:   Vec<LaneKey>,
}

impl NavGraphBuilder {
    pub fn new() -> Self {
        Self { sites: Vec::new(), slot_of: HashMap::new(), lanes: Vec::new() }
    }

    pub fn with_capacity(sites: usize, lanes: usize) -> Self {
        Self {
            sites:   Vec::with_capacity(sites),
            slot_of: HashMap::with_capacity(sites),
            lanes:   Vec::with_capacity(lanes),
        }
    }

    /// Add a site.  Fails if `id` was already added.
    pub fn add_site(
        &mut self,
        id:         SiteId,
        pos:        Point,
        name:       impl Into<String>,
        is_charger: bool,
    ) -> GraphResult<()> {
        if self.slot_of.contains_key(&id) {
            return Err(GraphError::DuplicateSite(id));
        }
        self.slot_of.insert(id, self.sites.len() as u32);
        self.sites.push(Site { id, pos, name: name.into(), is_charger });
        Ok(())
    }

    /// Add an undirected lane between two previously added sites.
    pub fn add_lane(&mut self, a: SiteId, b: SiteId) -> GraphResult<()> {
        let lane = self.lanes.len();
        for site in [a, b] {
            if !self.slot_of.contains_key(&site) {
                return Err(GraphError::UnknownLaneEndpoint { lane, site });
            }
        }
        if a == b {
            return Err(GraphError::SelfLoop { lane, site: a });
        }
        self.lanes.push(LaneKey::new(a, b));
        Ok(())
    }

    pub fn site_count(&self) -> usize { self.sites.len() }
    pub fn lane_count(&self) -> usize { self.lanes.len() }

    /// Consume the builder and produce a [`NavGraph`].
    pub fn build(self) -> NavGraph {
        let site_count = self.sites.len();

        let mut lanes = self.lanes;
        lanes.sort_unstable();
        lanes.dedup();

        // Directed half-edges (from_slot, to_slot, weight), sorted by source
        // then destination so neighbour order is deterministic.
        let mut half: Vec<(u32, u32, f64)> = Vec::with_capacity(lanes.len() * 2);
        for lane in &lanes {
            let a = self.slot_of[&lane.lo];
            let b = self.slot_of[&lane.hi];
            let w = self.sites[a as usize].pos.distance(self.sites[b as usize].pos);
            half.push((a, b, w));
            half.push((b, a, w));
        }
        half.sort_unstable_by_key(|&(from, to, _)| (from, to));

        let mut adj_start = vec![0u32; site_count + 1];
        for &(from, _, _) in &half {
            adj_start[from as usize + 1] += 1;
        }
        for i in 1..=site_count {
            adj_start[i] += adj_start[i - 1];
        }
        debug_assert_eq!(adj_start[site_count] as usize, half.len());

        let adj_to = half.iter().map(|&(_, to, _)| to).collect();
        let adj_weight = half.iter().map(|&(_, _, w)| w).collect();

        let entries: Vec<SiteEntry> = self
            .sites
            .iter()
            .map(|s| SiteEntry { point: s.pos.to_array(), id: s.id })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        NavGraph {
            sites: self.sites,
            slot_of: self.slot_of,
            adj_start,
            adj_to,
            adj_weight,
            lanes,
            spatial_idx,
        }
    }
}

impl Default for NavGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
