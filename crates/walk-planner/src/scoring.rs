//! Route scoring and best-route selection.
//!
//! ```text
//! cost = (length_m * size_factor + mean_green_distance_m) * age_factor
//! ```
//!
//! Lower is better.  `mean_green_distance_m` is the mean, over every node id
//! in the route (the repeated start included), of the distance from that
//! node to its nearest green zone; it is zero when there are no zones.

use tracing::debug;

use walk_spatial::{GeoDistance, GreenZone, WeightedGraph};

use crate::profile::{DogProfile, SizeClass};
use crate::search::RouteCandidate;

/// Age (years) from which the senior multiplier applies.
pub const SENIOR_AGE_YEARS: f64 = 8.0;

/// Length multiplier by body size; unknown sizes count as medium.
pub fn size_factor(size: Option<SizeClass>) -> f64 {
    match size {
        Some(SizeClass::Small)         => 1.0,
        Some(SizeClass::Medium) | None => 2.0,
        Some(SizeClass::Large)         => 3.0,
    }
}

/// Whole-cost multiplier by age.
pub fn age_factor(age_years: f64) -> f64 {
    if age_years < SENIOR_AGE_YEARS { 1.0 } else { 1.5 }
}

/// Mean distance from each route node to its nearest green zone.
pub fn mean_green_distance<D: GeoDistance + ?Sized>(
    route: &RouteCandidate,
    graph: &WeightedGraph,
    zones: &[GreenZone],
    geo:   &D,
) -> f64 {
    let nodes = route.nodes();
    if zones.is_empty() || nodes.is_empty() {
        return 0.0;
    }
    let net = graph.network();
    let total: f64 = nodes
        .iter()
        .filter_map(|&n| geo.nearest(net.node_pos[n.index()], zones))
        .map(|nearest| nearest.distance_m)
        .sum();
    total / nodes.len() as f64
}

/// Cost of `route` for `profile`.  Lower is better.
pub fn score<D: GeoDistance + ?Sized>(
    route:   &RouteCandidate,
    graph:   &WeightedGraph,
    zones:   &[GreenZone],
    profile: &DogProfile,
    geo:     &D,
) -> f64 {
    let proximity = mean_green_distance(route, graph, zones, geo);
    (route.length_m() * size_factor(profile.effective_size()) + proximity) * age_factor(profile.age())
}

/// A candidate together with its cost.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScoredRoute {
    pub route: RouteCandidate,
    pub score: f64,
}

/// Score every candidate and return the cheapest.
///
/// Ties keep the candidate that came first in `candidates`.  Returns `None`
/// for an empty input.  With the `parallel` feature scores are computed on
/// the rayon pool; the result is identical either way.
pub fn select<D: GeoDistance + ?Sized>(
    candidates: Vec<RouteCandidate>,
    graph:      &WeightedGraph,
    zones:      &[GreenZone],
    profile:    &DogProfile,
    geo:        &D,
) -> Option<ScoredRoute> {
    let mut scored = score_all(candidates, graph, zones, profile, geo);
    scored.sort_by(|a, b| a.score.total_cmp(&b.score));
    debug!(
        candidates = scored.len(),
        best = scored.first().map(|s| s.score),
        "candidates scored"
    );
    scored.into_iter().next()
}

fn score_all<D: GeoDistance + ?Sized>(
    candidates: Vec<RouteCandidate>,
    graph:      &WeightedGraph,
    zones:      &[GreenZone],
    profile:    &DogProfile,
    geo:        &D,
) -> Vec<ScoredRoute> {
    #[cfg(not(feature = "parallel"))]
    {
        candidates
            .into_iter()
            .map(|route| {
                let score = score(&route, graph, zones, profile, geo);
                ScoredRoute { route, score }
            })
            .collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        candidates
            .into_par_iter()
            .map(|route| {
                let score = score(&route, graph, zones, profile, geo);
                ScoredRoute { route, score }
            })
            .collect()
    }
}
