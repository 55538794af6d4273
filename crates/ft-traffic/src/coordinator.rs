//! The `TrafficCoordinator`: occupancy snapshot, reservations, right-of-way.

use std::collections::BTreeSet;

use ft_agent::{AgentStatus, Robot};
use ft_core::{AgentId, SiteId};
use ft_graph::{LaneKey, Route};
use tracing::debug;

use crate::{ReservationError, ReservationResult};

#[cfg(feature = "fx-hash")]
type Map<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
type Map<K, V> = std::collections::HashMap<K, V>;

// ── Reservation ───────────────────────────────────────────────────────────────

/// A granted route claim.
///
/// `step` is the index in `route` of the site the agent is currently leaving;
/// it follows the agent's own route index on every coordinator tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Reservation {
    pub route: Route,
    pub step:  usize,
}

impl Reservation {
    /// The `(from, to)` lane the agent is about to traverse, if any.
    #[inline]
    pub fn current_step(&self) -> Option<(SiteId, SiteId)> {
        self.route.step(self.step)
    }

    /// The part of the route not yet left behind, starting with the site the
    /// agent is currently leaving.
    pub fn remaining(&self) -> &[SiteId] {
        let sites = self.route.sites();
        &sites[self.step.min(sites.len() - 1)..]
    }
}

/// Agents whose status changed during one [`TrafficCoordinator::tick`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrafficReport {
    /// Put into `Waiting` this tick, ascending id.
    pub newly_waiting: Vec<AgentId>,
    /// Released from `Waiting` this tick, ascending id.
    pub resumed: Vec<AgentId>,
}

impl TrafficReport {
    pub fn is_empty(&self) -> bool {
        self.newly_waiting.is_empty() && self.resumed.is_empty()
    }
}

// ── TrafficCoordinator ────────────────────────────────────────────────────────

/// Owns who-holds-what: the per-tick occupancy snapshot (rebuilt from the
/// robots every tick), the route reservations (persisting until released),
/// and the set of agents it has forced to wait.
///
/// Every map holds at most one agent per key.  When two robots claim the same
/// key during a rebuild, the robot with the higher id is recorded.
#[derive(Debug, Default)]
pub struct TrafficCoordinator {
    site_occupancy: Map<SiteId, AgentId>,
    lane_occupancy: Map<LaneKey, AgentId>,
    reservations:   Map<AgentId, Reservation>,
    waiting:        BTreeSet<AgentId>,
}

impl TrafficCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    /// `true` if `site` is held by some agent other than `ignoring`.
    pub fn is_site_occupied(&self, site: SiteId, ignoring: Option<AgentId>) -> bool {
        self.site_occupant(site).is_some_and(|holder| Some(holder) != ignoring)
    }

    /// `true` if the lane between `a` and `b` (either direction) is being
    /// traversed by some agent other than `ignoring`.
    pub fn is_lane_occupied(&self, a: SiteId, b: SiteId, ignoring: Option<AgentId>) -> bool {
        self.lane_occupant(LaneKey::new(a, b))
            .is_some_and(|holder| Some(holder) != ignoring)
    }

    #[inline]
    pub fn site_occupant(&self, site: SiteId) -> Option<AgentId> {
        self.site_occupancy.get(&site).copied()
    }

    #[inline]
    pub fn lane_occupant(&self, lane: LaneKey) -> Option<AgentId> {
        self.lane_occupancy.get(&lane).copied()
    }

    /// Occupied sites and their holders, ascending by site.
    pub fn occupied_sites(&self) -> Vec<(SiteId, AgentId)> {
        let mut v: Vec<_> = self.site_occupancy.iter().map(|(&s, &a)| (s, a)).collect();
        v.sort_unstable();
        v
    }

    /// Occupied lanes and their holders, ascending by lane.
    pub fn occupied_lanes(&self) -> Vec<(LaneKey, AgentId)> {
        let mut v: Vec<_> = self.lane_occupancy.iter().map(|(&l, &a)| (l, a)).collect();
        v.sort_unstable();
        v
    }

    pub fn reservation(&self, agent: AgentId) -> Option<&Reservation> {
        self.reservations.get(&agent)
    }

    /// Number of live route reservations.
    pub fn reservation_count(&self) -> usize {
        self.reservations.len()
    }

    /// Agents currently held in `Waiting` by the coordinator, ascending id.
    pub fn waiting_agents(&self) -> Vec<AgentId> {
        self.waiting.iter().copied().collect()
    }

    #[inline]
    pub fn is_waiting(&self, agent: AgentId) -> bool {
        self.waiting.contains(&agent)
    }

    // ── Reservations ──────────────────────────────────────────────────────

    /// Claim `route` for `agent`, checking only its first step.
    ///
    /// The step is refused when its target site or lane is held by another
    /// agent, or when another agent's reservation is about to traverse the
    /// same lane the other way.  On success any previous reservation and
    /// waiting mark of `agent` are cleared.  A single-site route always
    /// succeeds.
    pub fn reserve_route(&mut self, agent: AgentId, route: Route) -> ReservationResult<()> {
        if let Some((from, to)) = route.step(0) {
            self.check_step(agent, from, to)?;
        }
        debug!(agent = %agent, route = %route, "route reserved");
        self.waiting.remove(&agent);
        self.reservations.insert(agent, Reservation { route, step: 0 });
        Ok(())
    }

    fn check_step(&self, agent: AgentId, from: SiteId, to: SiteId) -> ReservationResult<()> {
        if let Some(holder) = self.site_occupant(to).filter(|&h| h != agent) {
            return Err(ReservationError::SiteOccupied { site: to, holder });
        }
        let lane = LaneKey::new(from, to);
        if let Some(holder) = self.lane_occupant(lane).filter(|&h| h != agent) {
            return Err(ReservationError::LaneOccupied { lane, holder });
        }
        let head_on = self
            .reservations
            .iter()
            .filter(|&(&other, _)| other != agent)
            .filter(|(_, res)| res.current_step() == Some((to, from)))
            .map(|(&other, _)| other)
            .min();
        if let Some(holder) = head_on {
            return Err(ReservationError::HeadOn { lane, holder });
        }
        Ok(())
    }

    /// Drop everything associated with `agent`: its occupancy entries, its
    /// reservation, and its waiting mark.
    pub fn clear_reservations(&mut self, agent: AgentId) {
        self.site_occupancy.retain(|_, holder| *holder != agent);
        self.lane_occupancy.retain(|_, holder| *holder != agent);
        self.reservations.remove(&agent);
        self.waiting.remove(&agent);
    }

    /// Put `robot` into `Waiting` and remember that the coordinator owns the
    /// decision, so a later [`tick`](Self::tick) resumes it once unblocked.
    pub fn mark_waiting(&mut self, robot: &mut Robot) {
        robot.wait();
        if robot.status() == AgentStatus::Waiting {
            let id = robot.id();
            self.waiting.insert(id);
            self.lane_occupancy.retain(|_, holder| *holder != id);
        }
    }

    // ── Per-tick update ───────────────────────────────────────────────────

    /// Rebuild the occupancy snapshot from scratch: every robot holds its
    /// current site, and a moving robot also holds the lane it is on.
    pub fn rebuild_occupancy(&mut self, robots: &[Robot]) {
        self.site_occupancy.clear();
        self.lane_occupancy.clear();

        let mut order: Vec<&Robot> = robots.iter().collect();
        order.sort_by_key(|r| r.id());
        for robot in order {
            self.site_occupancy.insert(robot.current_site(), robot.id());
            if robot.status() != AgentStatus::Moving {
                continue;
            }
            if let Some(next) = robot.next_site() {
                self.lane_occupancy
                    .insert(LaneKey::new(robot.current_site(), next), robot.id());
            }
        }
    }

    /// One coordination pass over the already-advanced robots.
    ///
    /// 1. Rebuild occupancy.
    /// 2. Release reservations of robots that are no longer en route, and
    ///    sync the remaining reservations with each robot's route index.
    /// 3. Decide, against this snapshot, which en-route robots are blocked.
    /// 4. Apply: blocked robots wait, unblocked waiting robots resume.  A
    ///    robot put into `Waiting` gives up its lane entry in the snapshot.
    pub fn tick(&mut self, robots: &mut [Robot]) -> TrafficReport {
        self.rebuild_occupancy(robots);
        self.sync_reservations(robots);

        let decisions: Vec<(usize, bool)> = robots
            .iter()
            .enumerate()
            .filter(|(_, r)| r.status().is_en_route() && self.reservations.contains_key(&r.id()))
            .map(|(i, r)| (i, self.is_blocked(r, robots)))
            .collect();

        let mut report = TrafficReport::default();
        for (i, blocked) in decisions {
            let robot = &mut robots[i];
            let id = robot.id();
            if blocked {
                robot.wait();
                if self.waiting.insert(id) {
                    debug!(agent = %id, site = %robot.current_site(), "blocked, waiting");
                    report.newly_waiting.push(id);
                }
            } else if self.waiting.remove(&id) {
                robot.resume();
                debug!(agent = %id, "unblocked, resuming");
                report.resumed.push(id);
            }
        }
        // Only moving robots hold lanes.
        self.lane_occupancy.retain(|_, holder| !self.waiting.contains(&*holder));

        report.newly_waiting.sort_unstable();
        report.resumed.sort_unstable();
        report
    }

    fn sync_reservations(&mut self, robots: &[Robot]) {
        let live: Map<AgentId, &Robot> = robots
            .iter()
            .filter(|r| r.status().is_en_route())
            .map(|r| (r.id(), r))
            .collect();

        self.reservations.retain(|agent, _| live.contains_key(agent));
        self.waiting.retain(|agent| live.contains_key(agent));
        for (agent, res) in self.reservations.iter_mut() {
            if let Some(robot) = live.get(agent) {
                res.step = robot.route_index();
            }
        }
    }

    /// Whether `robot`'s next step is blocked in the current snapshot.
    ///
    /// Blocked when the next site or the lane to it is held by someone else,
    /// when a robot parked on the next site is not leaving it, or when the
    /// robot loses a right-of-way contest (higher id yields) against:
    /// - a robot on the next site heading straight at it, or
    /// - another en-route robot converging on the same next site.  Waiting
    ///   robots count here too, so a robot resuming this tick cannot race a
    ///   robot already heading for the same site.
    fn is_blocked(&self, robot: &Robot, robots: &[Robot]) -> bool {
        let id = robot.id();
        let current = robot.current_site();
        let Some(next) = robot.next_site() else {
            return false;
        };

        if self.is_site_occupied(next, Some(id)) || self.is_lane_occupied(current, next, Some(id)) {
            return true;
        }

        robots.iter().filter(|o| o.id() != id).any(|other| {
            let other_status = other.status();
            if other.current_site() == next {
                if !other_status.is_en_route() {
                    return true;
                }
                if other.next_site() == Some(current) && id > other.id() {
                    return true;
                }
            }
            other_status.is_en_route()
                && other.next_site() == Some(next)
                && id > other.id()
        })
    }
}
