//! Fleet observer trait for notifications and state read-back.

use ft_agent::Robot;
use ft_core::FleetClock;

use crate::FleetEvent;

/// Callbacks invoked by [`Fleet`][crate::Fleet] at tick boundaries and
/// whenever a [`FleetEvent`] occurs.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.  Any `FnMut(&FleetEvent)` closure is an
/// observer that only listens to events.
///
/// # Example: status printer
///
/// ```rust,ignore
/// struct StatusPrinter;
///
/// impl FleetObserver for StatusPrinter {
///     fn on_event(&mut self, event: &FleetEvent) {
///         println!("{event}");
///     }
///     fn on_tick_end(&mut self, clock: &FleetClock, robots: &[Robot]) {
///         let moving = robots.iter().filter(|r| r.status().is_en_route()).count();
///         println!("{clock}: {moving} robots en route");
///     }
/// }
/// ```
pub trait FleetObserver {
    /// Called at the start of each tick, after the clock has advanced.
    fn on_tick_start(&mut self, _clock: &FleetClock) {}

    /// Called for every notable event, in the order the events occur.
    fn on_event(&mut self, _event: &FleetEvent) {}

    /// Called at the end of each tick with the final robot states, which is
    /// where a renderer reads back positions.
    fn on_tick_end(&mut self, _clock: &FleetClock, _robots: &[Robot]) {}
}

/// A [`FleetObserver`] that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl FleetObserver for NoopObserver {}

/// Records every event, for tests and headless runs.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    pub events: Vec<FleetEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Human-readable form of every recorded event.
    pub fn messages(&self) -> Vec<String> {
        self.events.iter().map(ToString::to_string).collect()
    }

    /// Take the recorded events, leaving the log empty.
    pub fn drain(&mut self) -> Vec<FleetEvent> {
        std::mem::take(&mut self.events)
    }
}

impl FleetObserver for EventLog {
    fn on_event(&mut self, event: &FleetEvent) {
        self.events.push(event.clone());
    }
}

impl<F: FnMut(&FleetEvent)> FleetObserver for F {
    fn on_event(&mut self, event: &FleetEvent) {
        self(event)
    }
}
