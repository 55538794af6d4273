//! Unit tests for ft-agent.

use ft_core::{AgentId, RobotParams, SiteId};
use ft_graph::Route;

use crate::{AgentError, AgentStatus, Robot, StepOutcome};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn route(raw: &[u32]) -> Route {
    Route::from_sites(raw.iter().map(|&n| SiteId(n)).collect()).unwrap()
}

/// Robot 0 at site 0 with default params (1 lane/s, 5 %/s drain, 20 %/s charge).
fn robot() -> Robot {
    Robot::new(AgentId(0), SiteId(0), RobotParams::default())
}

/// Step `robot` in 0.25 s increments (exact in binary floating point).
fn run(robot: &mut Robot, secs: f64) -> Vec<StepOutcome> {
    let steps = (secs / 0.25).round() as usize;
    (0..steps).map(|_| robot.update(0.25)).collect()
}

// ── Route assignment ──────────────────────────────────────────────────────────

#[cfg(test)]
mod assignment {
    use super::*;

    #[test]
    fn new_robot_is_idle_and_full() {
        let r = robot();
        assert_eq!(r.status(), AgentStatus::Idle);
        assert_eq!(r.battery_level(), 100.0);
        assert_eq!(r.position(), (SiteId(0), None, 0.0));
        assert!(r.is_at_site(SiteId(0)));
    }

    #[test]
    fn assign_starts_moving_towards_second_site() {
        let mut r = robot();
        r.assign_route(route(&[0, 1, 2])).unwrap();
        assert_eq!(r.status(), AgentStatus::Moving);
        assert_eq!(r.next_site(), Some(SiteId(1)));
        assert_eq!(r.route_index(), 0);
    }

    #[test]
    fn short_route_rejected_without_mutation() {
        let mut r = robot();
        assert_eq!(r.assign_route(route(&[0])), Err(AgentError::RouteTooShort(1)));
        assert_eq!(r.status(), AgentStatus::Idle);
        assert!(r.route().is_none());
    }

    #[test]
    fn busy_robot_rejects_new_route() {
        let mut r = robot();
        r.assign_route(route(&[0, 1])).unwrap();
        let err = r.assign_route(route(&[0, 2])).unwrap_err();
        assert!(matches!(err, AgentError::NotAssignable { status: AgentStatus::Moving, .. }));
        assert_eq!(r.route().unwrap().destination(), SiteId(1));
    }

    #[test]
    fn task_complete_accepts_new_route() {
        let mut r = robot();
        r.assign_route(route(&[0, 1])).unwrap();
        let _ = run(&mut r, 1.0);
        assert_eq!(r.status(), AgentStatus::TaskComplete);
        assert!(r.assign_route(route(&[1, 0])).is_ok());
    }

    #[test]
    fn empty_battery_never_moves() {
        let mut r = robot();
        r.set_battery_level(0.0);
        for _ in 0..3 {
            assert_eq!(r.assign_route(route(&[0, 1])), Err(AgentError::BatteryDead(AgentId(0))));
            assert_eq!(r.status(), AgentStatus::Idle);
        }
    }
}

// ── Motion ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod motion {
    use super::*;

    #[test]
    fn progress_accumulates_then_snaps() {
        let mut r = robot();
        r.assign_route(route(&[0, 1, 2])).unwrap();

        let _ = r.update(0.5);
        assert_eq!(r.progress(), 0.5);
        assert_eq!(r.current_site(), SiteId(0));

        let _ = r.update(0.5);
        assert_eq!(r.current_site(), SiteId(1));
        assert_eq!(r.progress(), 0.0);
        assert_eq!(r.route_index(), 1);
        assert_eq!(r.next_site(), Some(SiteId(2)));
        assert_eq!(r.status(), AgentStatus::Moving);
    }

    #[test]
    fn arrival_on_last_site_completes_task() {
        let mut r = robot();
        r.assign_route(route(&[0, 1, 2])).unwrap();
        let outcomes = run(&mut r, 2.0);
        assert!(outcomes.iter().all(|&o| o == StepOutcome::Continue));
        assert_eq!(r.current_site(), SiteId(2));
        assert_eq!(r.status(), AgentStatus::TaskComplete);
        assert!(r.route().is_none());
        assert_eq!(r.next_site(), None);
    }

    #[test]
    fn battery_drains_only_while_moving() {
        let mut r = robot();
        let _ = run(&mut r, 2.0);
        assert_eq!(r.battery_level(), 100.0, "idle robots do not drain");

        r.assign_route(route(&[0, 1, 2])).unwrap();
        let _ = r.update(0.5);
        assert_eq!(r.battery_level(), 97.5);

        r.wait();
        let _ = run(&mut r, 5.0);
        assert_eq!(r.battery_level(), 97.5, "waiting robots do not drain");
        assert_eq!(r.progress(), 0.5, "waiting robots do not advance");
    }

    #[test]
    fn wait_and_resume_only_from_matching_status() {
        let mut r = robot();
        r.wait();
        assert_eq!(r.status(), AgentStatus::Idle);
        r.resume();
        assert_eq!(r.status(), AgentStatus::Idle);

        r.assign_route(route(&[0, 1])).unwrap();
        r.wait();
        assert_eq!(r.status(), AgentStatus::Waiting);
        r.wait();
        assert_eq!(r.status(), AgentStatus::Waiting);
        r.resume();
        assert_eq!(r.status(), AgentStatus::Moving);
    }

    #[test]
    fn negative_or_nan_step_is_ignored() {
        let mut r = robot();
        r.assign_route(route(&[0, 1])).unwrap();
        let _ = r.update(-3.0);
        let _ = r.update(f64::NAN);
        assert_eq!(r.progress(), 0.0);
        assert_eq!(r.battery_level(), 100.0);
    }
}

// ── Battery exhaustion & charging ─────────────────────────────────────────────

#[cfg(test)]
mod battery {
    use super::*;

    #[test]
    fn depletion_mid_route_kills_task() {
        let mut r = robot();
        r.set_battery_level(2.5);
        r.assign_route(route(&[0, 1, 2, 3])).unwrap();

        assert_eq!(r.update(0.25), StepOutcome::Continue);
        assert_eq!(r.battery_level(), 1.25);
        assert_eq!(r.update(0.25), StepOutcome::BatteryDepleted);

        assert_eq!(r.battery_level(), 0.0);
        assert_eq!(r.status(), AgentStatus::BatteryDead);
        assert!(r.is_battery_dead());
        assert!(r.route().is_none());
        assert_eq!(r.next_site(), None);

        // Further updates are quiet.
        assert_eq!(r.update(0.25), StepOutcome::Continue);
        assert_eq!(
            r.assign_route(route(&[0, 1])),
            Err(AgentError::NotAssignable { agent: AgentId(0), status: AgentStatus::BatteryDead })
        );
    }

    #[test]
    fn dead_robot_recovers_after_full_charge() {
        let mut r = robot();
        r.set_battery_level(1.0);
        r.assign_route(route(&[0, 1])).unwrap();
        assert_eq!(r.update(0.25), StepOutcome::BatteryDepleted);

        r.start_charging().unwrap();
        let _ = run(&mut r, 2.5);
        assert_eq!(r.battery_level(), 50.0);
        assert!(r.is_battery_dead(), "flag clears only at 100 %");
        assert_eq!(r.status(), AgentStatus::Charging);

        let _ = run(&mut r, 2.5);
        assert_eq!(r.battery_level(), 100.0);
        assert_eq!(r.status(), AgentStatus::TaskComplete);
        assert!(!r.is_battery_dead());
        assert!(r.assign_route(route(&[0, 1])).is_ok());
    }

    #[test]
    fn stop_charging_keeps_partial_charge() {
        let mut r = robot();
        r.set_battery_level(10.0);
        r.start_charging().unwrap();
        let _ = r.update(1.0);
        r.stop_charging();
        assert_eq!(r.status(), AgentStatus::Idle);
        assert_eq!(r.battery_level(), 30.0);
    }

    #[test]
    fn cannot_charge_while_en_route() {
        let mut r = robot();
        r.assign_route(route(&[0, 1])).unwrap();
        assert!(matches!(
            r.start_charging(),
            Err(AgentError::CannotCharge { status: AgentStatus::Moving, .. })
        ));
    }

    #[test]
    fn needs_charging_threshold_is_inclusive() {
        let mut r = robot();
        r.set_battery_level(20.0);
        assert!(r.needs_charging());
        r.set_battery_level(20.5);
        assert!(!r.needs_charging());
    }

    #[test]
    fn battery_level_is_clamped() {
        let mut r = robot();
        r.set_battery_level(250.0);
        assert_eq!(r.battery_level(), 100.0);
        r.set_battery_level(-4.0);
        assert_eq!(r.battery_level(), 0.0);
    }
}

#[cfg(test)]
mod status {
    use crate::AgentStatus;

    #[test]
    fn labels() {
        assert_eq!(AgentStatus::TaskComplete.to_string(), "task_complete");
        assert_eq!(AgentStatus::BatteryDead.to_string(), "battery_dead");
        assert!(AgentStatus::Idle.accepts_task());
        assert!(!AgentStatus::Charging.accepts_task());
        assert!(AgentStatus::Waiting.is_en_route());
    }
}
