//! The `Fleet` struct and its tick loop.

use std::collections::HashSet;

use ft_agent::{AgentStatus, Robot, StepOutcome};
use ft_core::{AgentId, FleetClock, FleetConfig, Point, SiteId};
use ft_graph::{NavGraph, Route, Router};
use ft_traffic::TrafficCoordinator;
use tracing::{debug, info, warn};

use crate::scoring::{rank_routes, TrafficPicture};
use crate::{FleetError, FleetEvent, FleetObserver, FleetResult};

// ── Assignment ────────────────────────────────────────────────────────────────

/// A successful [`Fleet::assign_task`].
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub route: Route,
    pub score: u32,
    /// The route was the blocked fallback; the robot starts in `Waiting` and
    /// the traffic coordinator releases it when the way clears.
    pub starts_waiting: bool,
}

// ── Fleet ─────────────────────────────────────────────────────────────────────

/// The fleet orchestrator.
///
/// `Fleet<R, O>` owns the topology graph, every robot, and the traffic
/// coordinator, and drives the per-tick update in a fixed order:
///
/// 1. **Advance**: every robot's state machine runs for `dt` seconds.  A robot
///    whose battery dies loses its reservations.
/// 2. **Dock**: a robot that finished its task on a charger starts charging.
/// 3. **Coordinate**: the traffic coordinator rebuilds occupancy and issues
///    wait/resume commands against the positions from step 1.
/// 4. **Seek chargers**: idle low-battery robots start charging in place or
///    are sent to the nearest reachable charger.
///
/// Robot `AgentId(n)` is always `agents()[n]`.  Create via
/// [`FleetBuilder`][crate::FleetBuilder].
pub struct Fleet<R: Router, O: FleetObserver> {
    pub(crate) graph:    NavGraph,
    pub(crate) router:   R,
    pub(crate) robots:   Vec<Robot>,
    pub(crate) traffic:  TrafficCoordinator,
    pub(crate) config:   FleetConfig,
    pub(crate) clock:    FleetClock,
    pub(crate) observer: O,
}

impl<R: Router, O: FleetObserver> Fleet<R, O> {
    // ── Read-only access ──────────────────────────────────────────────────

    #[inline] pub fn graph(&self) -> &NavGraph { &self.graph }
    #[inline] pub fn router(&self) -> &R { &self.router }
    #[inline] pub fn config(&self) -> &FleetConfig { &self.config }
    #[inline] pub fn clock(&self) -> &FleetClock { &self.clock }
    #[inline] pub fn coordinator(&self) -> &TrafficCoordinator { &self.traffic }
    #[inline] pub fn observer(&self) -> &O { &self.observer }
    #[inline] pub fn observer_mut(&mut self) -> &mut O { &mut self.observer }

    /// Every robot, indexed by id.
    #[inline]
    pub fn agents(&self) -> &[Robot] {
        &self.robots
    }

    #[inline]
    pub fn agent(&self, id: AgentId) -> Option<&Robot> {
        self.robots.get(id.index())
    }

    pub fn agent_count(&self) -> usize {
        self.robots.len()
    }

    /// Agents the coordinator is currently holding back.
    pub fn waiting_agents(&self) -> Vec<AgentId> {
        self.traffic.waiting_agents()
    }

    /// The robot parked on `site` (anything but `Moving`), if any.
    pub fn robot_at_site(&self, site: SiteId) -> Option<&Robot> {
        self.robots
            .iter()
            .find(|r| r.current_site() == site && r.status() != AgentStatus::Moving)
    }

    /// Floor-plan position of a robot, interpolated along its current lane.
    pub fn agent_world_position(&self, id: AgentId) -> Option<Point> {
        let robot = self.agent(id)?;
        let here = self.graph.position(robot.current_site())?;
        match robot.next_site().and_then(|n| self.graph.position(n)) {
            Some(there) => Some(here.lerp(there, robot.progress())),
            None => Some(here),
        }
    }

    /// The site closest to a floor-plan point.
    pub fn nearest_site(&self, pos: Point) -> Option<SiteId> {
        self.graph.nearest_site(pos)
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    // ── Intents ───────────────────────────────────────────────────────────

    /// Place a new idle robot on `site`.
    ///
    /// Refused when the site is unknown or another robot is parked there (a
    /// robot just leaving the site does not count).
    pub fn spawn_agent(&mut self, site: SiteId) -> FleetResult<AgentId> {
        match self.try_spawn(site) {
            Ok(id) => {
                self.emit(FleetEvent::Spawned { agent: id, site });
                Ok(id)
            }
            Err(e) => {
                self.emit(FleetEvent::SpawnRejected { site, reason: e.to_string() });
                Err(e)
            }
        }
    }

    fn try_spawn(&mut self, site: SiteId) -> FleetResult<AgentId> {
        if !self.graph.contains(site) {
            return Err(FleetError::SiteNotFound(site));
        }
        if let Some(holder) = self.robot_at_site(site) {
            return Err(FleetError::SpawnSiteOccupied { site, holder: holder.id() });
        }
        let id = AgentId::try_from(self.robots.len())
            .map_err(|_| FleetError::Config("agent id space exhausted".into()))?;
        self.robots.push(Robot::new(id, site, self.config.robot.clone()));
        self.traffic.rebuild_occupancy(&self.robots);
        Ok(id)
    }

    /// Send `agent` to `destination`.
    ///
    /// Candidate routes are ranked by [`rank_routes`](crate::scoring::rank_routes)
    /// and tried best first; routes with an anticipated collision are
    /// skipped.  If none can be reserved, the plain shortest route is tried
    /// once more and, if the reservation holds, the robot starts out
    /// `Waiting`.  On any error the robot and the coordinator are unchanged.
    pub fn assign_task(&mut self, agent: AgentId, destination: SiteId) -> FleetResult<Assignment> {
        match self.try_assign(agent, destination) {
            Ok(assignment) => {
                self.emit(FleetEvent::TaskAssigned {
                    agent,
                    route:          assignment.route.clone(),
                    starts_waiting: assignment.starts_waiting,
                });
                Ok(assignment)
            }
            Err(e) => {
                self.emit(FleetEvent::TaskRejected { agent, destination, reason: e.to_string() });
                Err(e)
            }
        }
    }

    fn try_assign(&mut self, agent: AgentId, destination: SiteId) -> FleetResult<Assignment> {
        // ── Validate ──────────────────────────────────────────────────────
        let robot = self.agent(agent).ok_or(FleetError::AgentNotFound(agent))?;
        if !self.graph.contains(destination) {
            return Err(FleetError::SiteNotFound(destination));
        }
        if robot.is_battery_dead() || robot.battery_level() <= 0.0 {
            return Err(FleetError::BatteryDead(agent));
        }
        if !robot.status().accepts_task() {
            return Err(FleetError::AgentBusy { agent, status: robot.status() });
        }
        let from = robot.current_site();
        if from == destination {
            return Err(FleetError::AlreadyAtDestination { agent, site: from });
        }

        // ── Candidates ────────────────────────────────────────────────────
        let picture = TrafficPicture::observe(agent, &self.robots, &self.traffic);
        let candidates = self.router.alternatives(
            &self.graph,
            from,
            destination,
            self.config.max_alternatives,
        )?;
        let Some(shortest) = candidates.first().cloned() else {
            return Err(FleetError::NoPath { from, to: destination });
        };
        let ranked = rank_routes(candidates, &picture, &self.config.scoring);

        // ── Reserve best first ────────────────────────────────────────────
        for candidate in ranked.iter().filter(|c| !c.collides) {
            match self.traffic.reserve_route(agent, candidate.route.clone()) {
                Ok(()) => {
                    self.start_route(agent, candidate.route.clone())?;
                    return Ok(Assignment {
                        route:          candidate.route.clone(),
                        score:          candidate.score,
                        starts_waiting: false,
                    });
                }
                Err(e) => debug!(agent = %agent, route = %candidate.route, "candidate refused: {e}"),
            }
        }

        // ── Fallback: shortest route, starting blocked ────────────────────
        if self.traffic.reserve_route(agent, shortest.clone()).is_err() {
            return Err(FleetError::NoValidPath { agent, to: destination });
        }
        self.start_route(agent, shortest.clone())?;
        self.traffic.mark_waiting(&mut self.robots[agent.index()]);
        let score = ranked
            .iter()
            .find(|c| c.route == shortest)
            .map_or(0, |c| c.score);
        Ok(Assignment { route: shortest, score, starts_waiting: true })
    }

    /// Hand a freshly reserved route to the robot, undoing the reservation if
    /// the robot refuses it.
    fn start_route(&mut self, agent: AgentId, route: Route) -> FleetResult<()> {
        if let Err(e) = self.robots[agent.index()].assign_route(route) {
            self.traffic.clear_reservations(agent);
            self.traffic.rebuild_occupancy(&self.robots);
            return Err(e.into());
        }
        Ok(())
    }

    /// Start charging a robot that is parked on a charger.  This is the way
    /// back for a robot whose battery died: once full it is `TaskComplete`
    /// and can take tasks again.
    pub fn recharge(&mut self, agent: AgentId) -> FleetResult<()> {
        let robot = self.robots.get_mut(agent.index()).ok_or(FleetError::AgentNotFound(agent))?;
        let site = robot.current_site();
        if !self.graph.is_charger(site) {
            return Err(FleetError::NotAtCharger { agent, site });
        }
        if robot.is_charging() {
            return Ok(());
        }
        robot.start_charging()?;
        self.emit(FleetEvent::ChargingStarted { agent, site });
        Ok(())
    }

    /// Overwrite a robot's battery level from an external reading (clamped
    /// into `[0, 100]`).  Takes effect on the next tick.
    pub fn report_battery(&mut self, agent: AgentId, level: f64) -> FleetResult<()> {
        let robot = self.robots.get_mut(agent.index()).ok_or(FleetError::AgentNotFound(agent))?;
        robot.set_battery_level(level);
        debug!(agent = %agent, level = robot.battery_level(), "battery level reported");
        Ok(())
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Run one tick covering `dt` seconds.  A negative or non-finite `dt` is
    /// treated as zero.
    pub fn tick(&mut self, dt: f64) {
        let dt = self.clock.advance(dt);
        self.observer.on_tick_start(&self.clock);

        self.advance_robots(dt);
        self.dock_at_chargers();

        let report = self.traffic.tick(&mut self.robots);
        for agent in report.newly_waiting {
            let site = self.robots[agent.index()].current_site();
            self.emit(FleetEvent::Waiting { agent, site });
        }
        for agent in report.resumed {
            self.emit(FleetEvent::Resumed { agent });
        }

        self.seek_chargers();
        self.observer.on_tick_end(&self.clock, &self.robots);
    }

    /// Run exactly `n` ticks of `dt` seconds each.
    pub fn run_ticks(&mut self, n: u64, dt: f64) {
        for _ in 0..n {
            self.tick(dt);
        }
    }

    fn advance_robots(&mut self, dt: f64) {
        let mut events = Vec::new();
        for robot in &mut self.robots {
            let before = robot.status();
            let id = robot.id();
            match robot.update(dt) {
                StepOutcome::BatteryDepleted => {
                    self.traffic.clear_reservations(id);
                    events.push(FleetEvent::BatteryDepleted { agent: id, site: robot.current_site() });
                }
                StepOutcome::Continue => match (before, robot.status()) {
                    (AgentStatus::Moving, AgentStatus::TaskComplete) => {
                        events.push(FleetEvent::Arrived { agent: id, site: robot.current_site() });
                    }
                    (AgentStatus::Charging, AgentStatus::TaskComplete) => {
                        events.push(FleetEvent::ChargingComplete { agent: id });
                    }
                    _ => {}
                },
            }
        }
        for event in events {
            self.emit(event);
        }
    }

    fn dock_at_chargers(&mut self) {
        let mut events = Vec::new();
        for robot in &mut self.robots {
            let site = robot.current_site();
            if robot.status() == AgentStatus::TaskComplete
                && robot.battery_level() < 100.0
                && self.graph.is_charger(site)
                && robot.start_charging().is_ok()
            {
                events.push(FleetEvent::ChargingStarted { agent: robot.id(), site });
            }
        }
        for event in events {
            self.emit(event);
        }
    }

    /// Idle low-battery robots charge where they stand if that is a charger,
    /// otherwise they are sent to the nearest reachable one.  Retried every
    /// tick for as long as the battery stays low.
    fn seek_chargers(&mut self) {
        let low: Vec<AgentId> = self
            .robots
            .iter()
            .filter(|r| r.status().accepts_task() && r.needs_charging() && !r.is_battery_dead())
            .map(Robot::id)
            .collect();

        for agent in low {
            let robot = &mut self.robots[agent.index()];
            let site = robot.current_site();
            let battery = robot.battery_level();

            if self.graph.is_charger(site) {
                if robot.start_charging().is_ok() {
                    self.emit(FleetEvent::ChargingStarted { agent, site });
                }
                continue;
            }

            match self.nearest_charger(site) {
                Some(charger) => {
                    if self.assign_task(agent, charger).is_ok() {
                        self.emit(FleetEvent::SeekingCharger { agent, charger, battery });
                    }
                }
                None => self.emit(FleetEvent::ChargerUnreachable { agent, battery }),
            }
        }
    }

    /// The charger with the shortest route from `from`: fewest sites, then
    /// lowest cost, then lowest id.  Unreachable chargers are skipped.
    fn nearest_charger(&self, from: SiteId) -> Option<SiteId> {
        let none = HashSet::new();
        self.graph
            .charging_sites()
            .into_iter()
            .filter_map(|charger| {
                let route = self.router.route(&self.graph, from, charger, &none).ok()?;
                let cost = self.graph.route_cost(&route).unwrap_or(f64::INFINITY);
                Some((route.len(), cost, charger))
            })
            .min_by(|a, b| {
                a.0.cmp(&b.0)
                    .then_with(|| a.1.total_cmp(&b.1))
                    .then_with(|| a.2.cmp(&b.2))
            })
            .map(|(_, _, charger)| charger)
    }

    // ── Notifications ─────────────────────────────────────────────────────

    fn emit(&mut self, event: FleetEvent) {
        let agent = event.agent().map(|a| a.to_string()).unwrap_or_default();
        if event.is_warning() {
            warn!(tick = self.clock.ticks, agent = %agent, "{event}");
        } else {
            info!(tick = self.clock.ticks, agent = %agent, "{event}");
        }
        self.observer.on_event(&event);
    }
}
