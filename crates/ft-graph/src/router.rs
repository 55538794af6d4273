//! Routing trait and default A* implementation.
//!
//! # Pluggability
//!
//! `ft-fleet` calls routing via the [`Router`] trait, so applications can swap
//! in a different search without touching the orchestrator.  The default
//! [`AStarRouter`] uses straight-line distance to the goal as heuristic; since
//! every lane weight *is* the straight-line distance between its ends, the
//! heuristic is consistent and the first expansion of the goal is optimal.
//!
//! # Alternatives
//!
//! [`Router::alternatives`] finds up to `max_count` lane-disjoint routes by
//! re-running the search with every lane of the routes found so far excluded.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::fmt;

use ft_core::SiteId;

use crate::graph::{LaneKey, NavGraph};
use crate::{GraphError, GraphResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// An ordered list of sites to visit, from the robot's current site to its
/// destination.
///
/// Never empty.  A single-site route means "already there".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route {
    sites: Vec<SiteId>,
}

#[allow(clippy::len_without_is_empty)]
impl Route {
    /// The "already at destination" route.
    pub fn trivial(site: SiteId) -> Self {
        Self { sites: vec![site] }
    }

    /// Wrap a site list.  Returns `None` for an empty list.
    ///
    /// Adjacency of consecutive sites is not checked here; use
    /// [`NavGraph::route_cost`] to validate against a graph.
    pub fn from_sites(sites: Vec<SiteId>) -> Option<Self> {
        if sites.is_empty() { None } else { Some(Self { sites }) }
    }

    #[inline]
    pub fn sites(&self) -> &[SiteId] {
        &self.sites
    }

    /// Number of sites, including start and destination.
    #[inline]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// `true` if start and destination are the same site.
    #[inline]
    pub fn is_trivial(&self) -> bool {
        self.sites.len() == 1
    }

    #[inline]
    pub fn start(&self) -> SiteId {
        self.sites[0]
    }

    #[inline]
    pub fn destination(&self) -> SiteId {
        self.sites[self.sites.len() - 1]
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<SiteId> {
        self.sites.get(index).copied()
    }

    /// The `(from, to)` pair leaving `sites[index]`, if any.
    pub fn step(&self, index: usize) -> Option<(SiteId, SiteId)> {
        Some((*self.sites.get(index)?, *self.sites.get(index + 1)?))
    }

    /// Consecutive `(from, to)` pairs.
    pub fn steps(&self) -> impl Iterator<Item = (SiteId, SiteId)> + '_ {
        self.sites.windows(2).map(|w| (w[0], w[1]))
    }

    /// Normalised keys of every lane the route uses.
    pub fn lanes(&self) -> impl Iterator<Item = LaneKey> + '_ {
        self.steps().map(|(a, b)| LaneKey::new(a, b))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, site) in self.sites.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{site}")?;
        }
        Ok(())
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
pub trait Router {
    /// Compute the cheapest route from `from` to `to` that avoids every lane
    /// in `excluded`.
    ///
    /// `from == to` yields the trivial route.  Unknown sites yield
    /// [`GraphError::SiteNotFound`]; disconnection yields
    /// [`GraphError::NoRoute`].
    fn route(
        &self,
        graph:    &NavGraph,
        from:     SiteId,
        to:       SiteId,
        excluded: &HashSet<LaneKey>,
    ) -> GraphResult<Route>;

    /// Up to `max_count` lane-disjoint routes, best first.
    ///
    /// Returns an empty `Vec` when no route exists at all; unknown sites are
    /// still an error.
    fn alternatives(
        &self,
        graph:     &NavGraph,
        from:      SiteId,
        to:        SiteId,
        max_count: usize,
    ) -> GraphResult<Vec<Route>> {
        let mut routes: Vec<Route> = Vec::new();
        if max_count == 0 {
            return Ok(routes);
        }
        let mut excluded = HashSet::new();

        while routes.len() < max_count {
            match self.route(graph, from, to, &excluded) {
                Ok(route) => {
                    if route.is_trivial() {
                        routes.push(route);
                        break;
                    }
                    excluded.extend(route.lanes());
                    routes.push(route);
                }
                Err(GraphError::NoRoute { .. }) => break,
                Err(e) => return Err(e),
            }
        }
        Ok(routes)
    }
}

// ── AStarRouter ───────────────────────────────────────────────────────────────

/// A* over the CSR adjacency, Euclidean heuristic, Euclidean lane cost.
///
/// Frontier ties are broken by lowest accumulated cost, then by the site's
/// document position, so results are deterministic for a fixed graph.
#[derive(Debug, Clone, Copy, Default)]
pub struct AStarRouter;

impl Router for AStarRouter {
    fn route(
        &self,
        graph:    &NavGraph,
        from:     SiteId,
        to:       SiteId,
        excluded: &HashSet<LaneKey>,
    ) -> GraphResult<Route> {
        astar(graph, from, to, excluded)
    }
}

impl NavGraph {
    /// Shortest route via [`AStarRouter`], optionally avoiding some lanes.
    pub fn shortest_path(
        &self,
        start:    SiteId,
        end:      SiteId,
        excluded: Option<&HashSet<LaneKey>>,
    ) -> GraphResult<Route> {
        match excluded {
            Some(ex) => AStarRouter.route(self, start, end, ex),
            None => AStarRouter.route(self, start, end, &HashSet::new()),
        }
    }

    /// Up to `max_count` lane-disjoint routes via [`AStarRouter`].
    pub fn alternative_routes(
        &self,
        start:     SiteId,
        end:       SiteId,
        max_count: usize,
    ) -> GraphResult<Vec<Route>> {
        AStarRouter.alternatives(self, start, end, max_count)
    }
}

// ── A* internals ──────────────────────────────────────────────────────────────

const NO_SLOT: u32 = u32::MAX;

/// Heap entry.  `Ord` is reversed so `BinaryHeap` pops the smallest `f`,
/// then the smallest `g`, then the lowest slot.
#[derive(Copy, Clone, PartialEq)]
struct Frontier {
    f:    f64,
    g:    f64,
    slot: u32,
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.g.total_cmp(&self.g))
            .then_with(|| other.slot.cmp(&self.slot))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn astar(
    graph:    &NavGraph,
    from:     SiteId,
    to:       SiteId,
    excluded: &HashSet<LaneKey>,
) -> GraphResult<Route> {
    let start = graph.slot(from).ok_or(GraphError::SiteNotFound(from))?;
    let goal = graph.slot(to).ok_or(GraphError::SiteNotFound(to))?;
    if start == goal {
        return Ok(Route::trivial(from));
    }

    let goal_pos = graph.site_at(goal).pos;
    let h = |slot: u32| graph.site_at(slot).pos.distance(goal_pos);

    let n = graph.site_count();
    let mut g_score = vec![f64::INFINITY; n];
    let mut prev = vec![NO_SLOT; n];
    let mut closed = vec![false; n];

    g_score[start as usize] = 0.0;
    let mut heap = BinaryHeap::new();
    heap.push(Frontier { f: h(start), g: 0.0, slot: start });

    while let Some(Frontier { g, slot, .. }) = heap.pop() {
        if closed[slot as usize] {
            continue;
        }
        if slot == goal {
            return Ok(reconstruct(graph, &prev, goal));
        }
        closed[slot as usize] = true;

        let here = graph.site_at(slot).id;
        for (next, weight) in graph.out(slot) {
            if closed[next as usize] {
                continue;
            }
            if !excluded.is_empty()
                && excluded.contains(&LaneKey::new(here, graph.site_at(next).id))
            {
                continue;
            }
            let tentative = g + weight;
            if tentative < g_score[next as usize] {
                g_score[next as usize] = tentative;
                prev[next as usize] = slot;
                heap.push(Frontier { f: tentative + h(next), g: tentative, slot: next });
            }
        }
    }

    Err(GraphError::NoRoute { from, to })
}

fn reconstruct(graph: &NavGraph, prev: &[u32], goal: u32) -> Route {
    let mut sites = vec![graph.site_at(goal).id];
    let mut cur = goal;
    while prev[cur as usize] != NO_SLOT {
        cur = prev[cur as usize];
        sites.push(graph.site_at(cur).id);
    }
    sites.reverse();
    Route { sites }
}
