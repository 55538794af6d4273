//! Per-robot state machine.

use ft_core::{AgentId, RobotParams, SiteId};
use ft_graph::Route;

use crate::{AgentError, AgentResult, AgentStatus};

/// Result of advancing a robot by one time step.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Normal progress (including arrival and finishing a charge).
    Continue,
    /// The battery ran out mid-task; the task has been abandoned.
    BatteryDepleted,
}

/// A single robot: where it is, where it is going, and how much battery it
/// has left.
///
/// While `Moving`, the robot is between `current_site` and `next_site` at
/// fraction `progress`.  `current_site` only changes when the robot snaps to
/// the next site on arrival.
#[derive(Debug, Clone)]
pub struct Robot {
    id:           AgentId,
    current_site: SiteId,
    next_site:    Option<SiteId>,
    route:        Option<Route>,
    route_index:  usize,
    progress:     f64,
    status:       AgentStatus,
    battery:      f64,
    battery_dead: bool,
    params:       RobotParams,
}

impl Robot {
    /// A fully charged, idle robot parked at `site`.
    pub fn new(id: AgentId, site: SiteId, params: RobotParams) -> Self {
        Self {
            id,
            current_site: site,
            next_site:    None,
            route:        None,
            route_index:  0,
            progress:     0.0,
            status:       AgentStatus::Idle,
            battery:      100.0,
            battery_dead: false,
            params,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline] pub fn id(&self) -> AgentId { self.id }
    #[inline] pub fn status(&self) -> AgentStatus { self.status }
    #[inline] pub fn current_site(&self) -> SiteId { self.current_site }
    #[inline] pub fn next_site(&self) -> Option<SiteId> { self.next_site }
    #[inline] pub fn route(&self) -> Option<&Route> { self.route.as_ref() }
    #[inline] pub fn route_index(&self) -> usize { self.route_index }
    #[inline] pub fn progress(&self) -> f64 { self.progress }
    #[inline] pub fn battery_level(&self) -> f64 { self.battery }
    #[inline] pub fn is_battery_dead(&self) -> bool { self.battery_dead }
    #[inline] pub fn params(&self) -> &RobotParams { &self.params }

    /// `(current_site, next_site, progress)`.
    pub fn position(&self) -> (SiteId, Option<SiteId>, f64) {
        (self.current_site, self.next_site, self.progress)
    }

    /// `true` if the robot is parked exactly on `site` (not part-way along a
    /// lane leaving it).
    pub fn is_at_site(&self, site: SiteId) -> bool {
        self.current_site == site && self.progress == 0.0
    }

    /// Advisory: battery at or below the low-battery threshold.
    pub fn needs_charging(&self) -> bool {
        self.battery <= self.params.low_battery_threshold
    }

    #[inline]
    pub fn is_charging(&self) -> bool {
        self.status == AgentStatus::Charging
    }

    // ── Commands ──────────────────────────────────────────────────────────

    /// Start following `route` from its first site.
    ///
    /// Rejected without any change when the route has fewer than two sites,
    /// the robot is not `Idle`/`TaskComplete`, or its battery is dead or
    /// empty.
    pub fn assign_route(&mut self, route: Route) -> AgentResult<()> {
        if route.len() < 2 {
            return Err(AgentError::RouteTooShort(route.len()));
        }
        if !self.status.accepts_task() {
            return Err(AgentError::NotAssignable { agent: self.id, status: self.status });
        }
        if self.battery_dead || self.battery <= 0.0 {
            return Err(AgentError::BatteryDead(self.id));
        }

        self.next_site = route.get(1);
        self.route = Some(route);
        self.route_index = 0;
        self.progress = 0.0;
        self.status = AgentStatus::Moving;
        Ok(())
    }

    /// `Moving → Waiting`.  No-op in any other status.
    pub fn wait(&mut self) {
        if self.status == AgentStatus::Moving {
            self.status = AgentStatus::Waiting;
        }
    }

    /// `Waiting → Moving`.  No-op in any other status.
    pub fn resume(&mut self) {
        if self.status == AgentStatus::Waiting {
            self.status = AgentStatus::Moving;
        }
    }

    /// Enter `Charging`.  Allowed from `Idle`, `TaskComplete`, and
    /// `BatteryDead`; whether the robot is actually on a charger is the
    /// orchestrator's call.
    pub fn start_charging(&mut self) -> AgentResult<()> {
        match self.status {
            AgentStatus::Idle | AgentStatus::TaskComplete | AgentStatus::BatteryDead => {
                self.status = AgentStatus::Charging;
                Ok(())
            }
            AgentStatus::Charging => Ok(()),
            status => Err(AgentError::CannotCharge { agent: self.id, status }),
        }
    }

    /// `Charging → Idle`, keeping whatever charge was gained.  A robot whose
    /// battery died stays `BatteryDead` until it finishes a full charge.
    pub fn stop_charging(&mut self) {
        if self.status == AgentStatus::Charging {
            self.status = if self.battery_dead { AgentStatus::BatteryDead } else { AgentStatus::Idle };
        }
    }

    /// Overwrite the battery level (clamped into `[0, 100]`), e.g. from a
    /// hardware reading.
    pub fn set_battery_level(&mut self, level: f64) {
        self.battery = if level.is_nan() { 0.0 } else { level.clamp(0.0, 100.0) };
    }

    // ── Time step ─────────────────────────────────────────────────────────

    /// Advance by `dt` seconds.
    ///
    /// Returns [`StepOutcome::BatteryDepleted`] exactly once, on the step
    /// where a moving robot's battery reaches zero.
    pub fn update(&mut self, dt: f64) -> StepOutcome {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

        match self.status {
            AgentStatus::Moving => {
                self.advance_along_route(dt);

                self.battery = (self.battery - self.params.battery_drain_rate * dt).clamp(0.0, 100.0);
                if self.battery <= 0.0 {
                    self.battery_dead = true;
                    self.status = AgentStatus::BatteryDead;
                    self.clear_route();
                    return StepOutcome::BatteryDepleted;
                }
            }
            AgentStatus::Charging => {
                self.battery = (self.battery + self.params.charge_rate * dt).clamp(0.0, 100.0);
                if self.battery >= 100.0 {
                    self.status = AgentStatus::TaskComplete;
                    self.battery_dead = false;
                }
            }
            AgentStatus::Idle
            | AgentStatus::Waiting
            | AgentStatus::TaskComplete
            | AgentStatus::BatteryDead => {}
        }
        StepOutcome::Continue
    }

    fn advance_along_route(&mut self, dt: f64) {
        self.progress = (self.progress + self.params.move_speed * dt).max(0.0);
        if self.progress < 1.0 {
            return;
        }

        // One lane per step at most: leftover progress is discarded.
        let Some(next) = self.next_site else {
            self.progress = 0.0;
            return;
        };
        self.current_site = next;
        self.progress = 0.0;
        self.route_index += 1;

        let last = self.route.as_ref().map_or(0, |r| r.len() - 1);
        if self.route_index >= last {
            self.status = AgentStatus::TaskComplete;
            self.clear_route();
        } else {
            self.next_site = self.route.as_ref().and_then(|r| r.get(self.route_index + 1));
        }
    }

    fn clear_route(&mut self) {
        self.route = None;
        self.route_index = 0;
        self.next_site = None;
        self.progress = 0.0;
    }
}
