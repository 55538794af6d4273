//! warehouse — a small fleet-traffic walkthrough.
//!
//! Three robots share a ten-site warehouse floor: two aisles joined by cross
//! lanes, with chargers at the far corners.  The demo assigns crossing tasks
//! so the coordinator has to hold robots back, then drains one battery to
//! show charger seeking.
//!
//! Run with `RUST_LOG=debug` for the per-tick coordinator trace.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ft_core::{AgentId, FleetConfig, SiteId};
use ft_fleet::{EventLog, Fleet, FleetBuilder};
use ft_graph::{AStarRouter, parse_graph_str};

// ── Constants ─────────────────────────────────────────────────────────────────

const TICK_SECS: f64 = 0.1;
const PHASE_TICKS: u64 = 150;

/// Floor plan.  Sites 0–3 form the south aisle, 4–7 the north aisle; the
/// chargers hang off the west and east ends.
const WAREHOUSE_JSON: &str = r#"{
  "vertices": [
    { "id": 0, "coordinates": [0.0, 0.0], "name": "dock" },
    { "id": 1, "coordinates": [2.0, 0.0], "name": "s-aisle-1" },
    { "id": 2, "coordinates": [4.0, 0.0], "name": "s-aisle-2" },
    { "id": 3, "coordinates": [6.0, 0.0], "name": "pick-south" },
    { "id": 4, "coordinates": [6.0, 2.0], "name": "pick-north" },
    { "id": 5, "coordinates": [4.0, 2.0], "name": "n-aisle-2" },
    { "id": 6, "coordinates": [2.0, 2.0], "name": "n-aisle-1" },
    { "id": 7, "coordinates": [0.0, 2.0], "name": "staging" },
    { "id": 8, "coordinates": [0.0, 4.0], "name": "charger-west", "is_charger": true },
    { "id": 9, "coordinates": [6.0, 4.0], "name": "charger-east", "is_charger": true }
  ],
  "lanes": [
    [0, 1], [1, 2], [2, 3], [3, 4], [4, 5], [5, 6], [6, 7], [7, 0],
    [1, 6], [2, 5], [7, 8], [4, 9]
  ]
}"#;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn print_events(fleet: &mut Fleet<AStarRouter, EventLog>) {
    let tick = fleet.clock().ticks;
    for event in fleet.observer_mut().drain() {
        println!("  [tick {tick:>4}] {event}");
    }
}

fn print_agents(fleet: &Fleet<AStarRouter, EventLog>) {
    println!("{:<7} {:<14} {:<14} {:>8}", "Robot", "Status", "Site", "Battery");
    println!("{}", "-".repeat(46));
    for robot in fleet.agents() {
        let site = fleet
            .graph()
            .site(robot.current_site())
            .map(|s| s.name.as_str())
            .unwrap_or("?");
        println!(
            "{:<7} {:<14} {:<14} {:>7.1}%",
            robot.id().0,
            robot.status(),
            site,
            robot.battery_level(),
        );
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_logging();

    println!("=== warehouse — fleet traffic demo ===");

    // 1. Floor plan.
    let graph = parse_graph_str(WAREHOUSE_JSON)?;
    println!("Floor plan: {} sites, {} lanes", graph.site_count(), graph.lane_count());

    // 2. Fleet with three robots: dock, south pick face, west charger.
    let mut fleet = FleetBuilder::new(graph, AStarRouter)
        .config(FleetConfig::default())
        .observer(EventLog::new())
        .spawn_at([SiteId(0), SiteId(3), SiteId(8)])
        .build()?;
    print_events(&mut fleet);

    // 3. Crossing tasks.  Rejections are reported as events, not fatal.
    println!();
    println!("Assigning tasks");
    for (agent, dest) in [(0, 4), (1, 7), (2, 3)] {
        if let Ok(a) = fleet.assign_task(AgentId(agent), SiteId(dest)) {
            info!(agent, score = a.score, waiting = a.starts_waiting, "task accepted");
        }
    }
    print_events(&mut fleet);

    // 4. Drive until everyone has arrived.
    println!();
    println!("Running {PHASE_TICKS} ticks of {TICK_SECS} s");
    for _ in 0..PHASE_TICKS {
        fleet.tick(TICK_SECS);
        print_events(&mut fleet);
    }

    // 5. A robot reports a nearly flat battery and heads for a charger.
    println!();
    println!("Robot 0 reports 10% battery");
    fleet.report_battery(AgentId(0), 10.0)?;
    for _ in 0..PHASE_TICKS {
        fleet.tick(TICK_SECS);
        print_events(&mut fleet);
    }

    // 6. Summary.
    let (h, m, s) = fleet.clock().elapsed_hms();
    println!();
    println!("Finished after {} ticks ({h:02}:{m:02}:{s:02} simulated)", fleet.clock().ticks);
    println!();
    print_agents(&fleet);

    Ok(())
}
