//! Unit tests for ft-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, SiteId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(AgentId(0) < AgentId(1));
        assert!(SiteId(100) > SiteId(99));
    }

    #[test]
    fn display_is_bare_number() {
        assert_eq!(AgentId(7).to_string(), "7");
        assert_eq!(SiteId::from(3).to_string(), "3");
    }
}

#[cfg(test)]
mod geo {
    use crate::Point;

    #[test]
    fn zero_distance() {
        let p = Point::new(3.5, -1.0);
        assert_eq!(p.distance(p), 0.0);
    }

    #[test]
    fn pythagorean_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.distance(a), 5.0);
    }

    #[test]
    fn lerp_clamps() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 20.0);
        assert_eq!(a.lerp(b, 0.5), Point::new(5.0, 10.0));
        assert_eq!(a.lerp(b, -1.0), a);
        assert_eq!(a.lerp(b, 3.0), b);
    }
}

#[cfg(test)]
mod clock {
    use crate::FleetClock;

    #[test]
    fn advance_accumulates() {
        let mut clock = FleetClock::new();
        clock.advance(0.5);
        clock.advance(0.25);
        assert_eq!(clock.ticks, 2);
        assert_eq!(clock.elapsed_secs, 0.75);
    }

    #[test]
    fn bad_steps_count_as_zero() {
        let mut clock = FleetClock::new();
        assert_eq!(clock.advance(-1.0), 0.0);
        assert_eq!(clock.advance(f64::NAN), 0.0);
        assert_eq!(clock.advance(f64::INFINITY), 0.0);
        assert_eq!(clock.ticks, 3);
        assert_eq!(clock.elapsed_secs, 0.0);
    }

    #[test]
    fn display_formats_elapsed() {
        let clock = FleetClock { ticks: 10, elapsed_secs: 3_725.0 };
        assert_eq!(clock.to_string(), "T10 (1h 2m 5s)");
        let clock = FleetClock { ticks: 2, elapsed_secs: 42.0 };
        assert_eq!(clock.to_string(), "T2 (42s)");
    }
}

#[cfg(test)]
mod config {
    use crate::{FleetConfig, FtError};

    #[test]
    fn default_is_valid() {
        assert!(FleetConfig::default().validate().is_ok());
    }

    #[test]
    fn default_penalties_keep_ordering() {
        let s = FleetConfig::default().scoring;
        assert!(s.blocked_site_penalty > s.blocked_lane_penalty);
        assert!(s.blocked_lane_penalty > s.detour_penalty);
    }

    #[test]
    fn rejects_non_positive_rates() {
        let mut cfg = FleetConfig::default();
        cfg.robot.charge_rate = 0.0;
        assert!(matches!(cfg.validate(), Err(FtError::Config(_))));

        let mut cfg = FleetConfig::default();
        cfg.robot.move_speed = f64::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_threshold_out_of_range() {
        let mut cfg = FleetConfig::default();
        cfg.robot.low_battery_threshold = 120.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_zero_alternatives_and_short_detour_ratio() {
        let mut cfg = FleetConfig::default();
        cfg.max_alternatives = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = FleetConfig::default();
        cfg.scoring.detour_ratio = 0.5;
        assert!(cfg.validate().is_err());
    }
}
