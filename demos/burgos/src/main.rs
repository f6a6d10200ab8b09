//! burgos — plan a circular dog walk on a synthetic Burgos street grid.
//!
//! Usage: `burgos [REQUEST_JSON]`
//!
//! The request may use English or Spanish field names, e.g.
//! `{"latitud": 42.3439, "longitud": -3.6969, "tamaño": "mediano",
//! "edad": 5, "raza": "Labrador", "duracion": 30}`.

mod network;

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};

use walk_planner::{PlannerConfig, WalkPlanner, WalkRequest};

use network::{build_network, green_zones};

// ── Constants ─────────────────────────────────────────────────────────────────

const DEFAULT_REQUEST: &str = r#"{"latitud": 42.3439, "longitud": -3.6969, "tamaño": "mediano", "edad": 5, "raza": "Labrador", "duracion": 30}"#;

/// Metres per budget unit (minutes × speed class).
const BUDGET_SCALE:   f64 = 12.0;
const MAX_EXPANSIONS: u64 = 500_000;
const TIME_LIMIT_MS:  u64 = 2_000;

fn main() -> Result<()> {
    println!("=== burgos — circular dog-walk planner ===");

    let raw = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_REQUEST.to_owned());
    let request: WalkRequest = serde_json::from_str(&raw).context("parsing walk request")?;

    let net = build_network()?;
    let zones = green_zones()?;
    println!(
        "Network: {} nodes, {} edges  |  Green zones: {}",
        net.node_count(),
        net.edge_count(),
        zones.len()
    );

    let config = PlannerConfig {
        max_expansions: Some(MAX_EXPANSIONS),
        time_limit_ms:  Some(TIME_LIMIT_MS),
        budget_scale:   BUDGET_SCALE,
        ..Default::default()
    };
    let planner = WalkPlanner::new(Arc::new(net), zones, config)?;

    let profile = request.profile();
    println!(
        "Dog: size={}  breed={}  age={}  |  Duration: {} min",
        profile.effective_size().map_or("unknown", |s| s.as_str()),
        profile.breed.as_deref().unwrap_or("-"),
        profile.age(),
        request.duration_minutes
    );
    println!();

    let t0 = Instant::now();
    let response = planner.plan(&request)?;
    let elapsed = t0.elapsed();

    println!("Planned in {:.3} s", elapsed.as_secs_f64());
    println!(
        "Budget: {:.0} m  |  Candidates: {}  |  Complete search: {}",
        response.distance_budget_meters, response.candidates_considered, response.search_complete
    );
    match &response.route {
        Some(walk) => println!(
            "Best walk: {} points, {:.0} m, score {:.1}",
            walk.route.len(),
            walk.total_length_meters,
            walk.score
        ),
        None => println!("No closed walk fits the budget."),
    }
    println!();
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
