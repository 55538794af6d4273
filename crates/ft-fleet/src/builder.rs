//! Fluent builder for constructing a [`Fleet`].

use ft_core::{FleetClock, FleetConfig, SiteId};
use ft_graph::{NavGraph, Router};
use ft_traffic::TrafficCoordinator;

use crate::{Fleet, FleetError, FleetObserver, FleetResult, NoopObserver};

/// Fluent builder for [`Fleet<R, O>`].
///
/// # Required inputs
///
/// - [`NavGraph`]: the site/lane topology, e.g. from
///   [`ft_graph::load_graph_json`]
/// - `R: Router`: the routing algorithm (e.g. [`ft_graph::AStarRouter`])
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                  |
/// |-------------------|--------------------------|
/// | `.config(c)`      | `FleetConfig::default()` |
/// | `.observer(o)`    | `NoopObserver`           |
/// | `.spawn_at(v)`    | no robots                |
///
/// # Example
///
/// ```rust,ignore
/// let graph = load_graph_json(Path::new("warehouse.json"))?;
/// let mut fleet = FleetBuilder::new(graph, AStarRouter)
///     .observer(EventLog::new())
///     .spawn_at([SiteId(0), SiteId(3)])
///     .build()?;
/// fleet.assign_task(AgentId(0), SiteId(4))?;
/// fleet.run_ticks(100, 0.1);
/// ```
pub struct FleetBuilder<R: Router, O: FleetObserver> {
    graph:    NavGraph,
    router:   R,
    config:   Option<FleetConfig>,
    observer: O,
    spawns:   Vec<SiteId>,
}

impl<R: Router> FleetBuilder<R, NoopObserver> {
    /// Create a builder with all required inputs.
    pub fn new(graph: NavGraph, router: R) -> Self {
        Self {
            graph,
            router,
            config:   None,
            observer: NoopObserver,
            spawns:   Vec::new(),
        }
    }
}

impl<R: Router, O: FleetObserver> FleetBuilder<R, O> {
    pub fn config(mut self, config: FleetConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the observer.  It receives the `Spawned` events of
    /// [`spawn_at`](Self::spawn_at) robots during `build`.
    pub fn observer<O2: FleetObserver>(self, observer: O2) -> FleetBuilder<R, O2> {
        FleetBuilder {
            graph:  self.graph,
            router: self.router,
            config: self.config,
            observer,
            spawns: self.spawns,
        }
    }

    /// Spawn one robot per site, in order, when the fleet is built.  Robot
    /// `n` is placed on the `n`-th site.
    pub fn spawn_at(mut self, sites: impl IntoIterator<Item = SiteId>) -> Self {
        self.spawns.extend(sites);
        self
    }

    /// Validate the configuration, spawn the initial robots, and return a
    /// ready-to-run [`Fleet`].
    pub fn build(self) -> FleetResult<Fleet<R, O>> {
        let config = self.config.unwrap_or_default();
        config.validate().map_err(|e| FleetError::Config(e.to_string()))?;

        let mut fleet = Fleet {
            graph:    self.graph,
            router:   self.router,
            robots:   Vec::with_capacity(self.spawns.len()),
            traffic:  TrafficCoordinator::new(),
            config,
            clock:    FleetClock::new(),
            observer: self.observer,
        };
        for site in self.spawns {
            fleet.spawn_agent(site)?;
        }
        Ok(fleet)
    }
}
