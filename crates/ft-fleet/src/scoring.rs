//! Candidate-route scoring.
//!
//! A candidate's score starts at its length in sites and grows with every
//! conflict it is expected to run into.  Lower is better.  The penalty sizes
//! come from [`ScoringWeights`].

use std::collections::HashSet;

use ft_agent::{AgentStatus, Robot};
use ft_core::{AgentId, ScoringWeights, SiteId};
use ft_graph::{LaneKey, Route};
use ft_traffic::TrafficCoordinator;

// ── TrafficPicture ────────────────────────────────────────────────────────────

/// What the rest of the fleet is doing, as seen by the agent being routed.
#[derive(Debug, Default, Clone)]
pub struct TrafficPicture {
    /// Sites held by robots that are neither moving nor waiting.
    pub blocked_sites: HashSet<SiteId>,
    /// Lanes being traversed by moving robots.
    pub blocked_lanes: HashSet<LaneKey>,
    /// The not-yet-travelled part of every moving robot's reserved route,
    /// starting at the site it is leaving.
    pub in_flight: Vec<Vec<SiteId>>,
}

impl TrafficPicture {
    /// Snapshot every robot except `agent`.
    pub fn observe(agent: AgentId, robots: &[Robot], traffic: &TrafficCoordinator) -> Self {
        let mut picture = Self::default();
        for other in robots.iter().filter(|r| r.id() != agent) {
            match other.status() {
                AgentStatus::Moving => {
                    if let Some(next) = other.next_site() {
                        picture.blocked_lanes.insert(LaneKey::new(other.current_site(), next));
                    }
                    if let Some(res) = traffic.reservation(other.id()) {
                        picture.in_flight.push(res.remaining().to_vec());
                    }
                }
                AgentStatus::Waiting => {}
                _ => {
                    picture.blocked_sites.insert(other.current_site());
                }
            }
        }
        picture
    }

    /// Number of steps `k ≥ 1` at which `route` puts the agent on the same
    /// site as some in-flight robot at its own step `k`.
    pub fn anticipated_collisions(&self, route: &Route) -> u32 {
        let sites = route.sites();
        (1..sites.len())
            .filter(|&k| self.in_flight.iter().any(|other| other.get(k) == Some(&sites[k])))
            .count() as u32
    }
}

// ── ScoredRoute ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRoute {
    pub route: Route,
    pub score: u32,
    /// At least one anticipated same-step collision.  Such routes are never
    /// reserved directly; they only come back as the blocked fallback.
    pub collides: bool,
}

/// Score every candidate and return them best first.  Equal scores keep the
/// candidates' input (shortest-first) order.
pub fn rank_routes(
    candidates: Vec<Route>,
    picture:    &TrafficPicture,
    weights:    &ScoringWeights,
) -> Vec<ScoredRoute> {
    let shortest = candidates.iter().map(Route::len).min().unwrap_or(0);

    let mut scored: Vec<ScoredRoute> = candidates
        .into_iter()
        .map(|route| {
            let collisions = picture.anticipated_collisions(&route);
            let score = score_route(&route, shortest, collisions, picture, weights);
            ScoredRoute { route, score, collides: collisions > 0 }
        })
        .collect();
    scored.sort_by_key(|c| c.score);
    scored
}

fn score_route(
    route:      &Route,
    shortest:   usize,
    collisions: u32,
    picture:    &TrafficPicture,
    weights:    &ScoringWeights,
) -> u32 {
    let mut score = route.len() as u32;

    for (a, b) in route.steps() {
        if picture.blocked_sites.contains(&a) || picture.blocked_sites.contains(&b) {
            score += weights.blocked_site_penalty;
        }
        if picture.blocked_lanes.contains(&LaneKey::new(a, b)) {
            score += weights.blocked_lane_penalty;
        }
    }
    score += collisions * weights.collision_penalty;

    if route.len() as f64 > weights.detour_ratio * shortest as f64 {
        score += weights.detour_penalty;
    }
    score
}
