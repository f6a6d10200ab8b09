//! Pluggable candidate generation.
//!
//! The planner asks a [`CandidateGenerator`] for closed walks and scores
//! whatever comes back.  [`CycleEnumerator`] is the bounded backtracking
//! search from [`crate::search`]; a cheaper heuristic generator can be
//! swapped in without touching scoring or selection.

use std::time::Duration;

use walk_core::NodeId;
use walk_spatial::WeightedGraph;

use crate::search::{enumerate_cycles, CycleSearch, SearchLimits};
use crate::PlanResult;

/// Produces closed-walk candidates from `start` within a distance budget.
///
/// Implementations must be `Send + Sync` so one planner can serve requests
/// from many threads.
pub trait CandidateGenerator: Send + Sync {
    fn generate(&self, graph: &WeightedGraph, start: NodeId, budget_m: f64) -> PlanResult<CycleSearch>;
}

/// Exhaustive-with-pruning enumeration, capped per call.
#[derive(Copy, Clone, Debug, Default)]
pub struct CycleEnumerator {
    pub max_expansions: Option<u64>,
    /// Wall-clock cap, measured from the start of each `generate` call.
    pub time_limit:     Option<Duration>,
}

impl CycleEnumerator {
    pub fn new(max_expansions: Option<u64>, time_limit: Option<Duration>) -> Self {
        Self { max_expansions, time_limit }
    }

    fn limits(&self) -> SearchLimits {
        let mut limits = SearchLimits { max_expansions: self.max_expansions, deadline: None };
        if let Some(t) = self.time_limit {
            limits = limits.with_time_limit(t);
        }
        limits
    }
}

impl CandidateGenerator for CycleEnumerator {
    fn generate(&self, graph: &WeightedGraph, start: NodeId, budget_m: f64) -> PlanResult<CycleSearch> {
        enumerate_cycles(graph, start, budget_m, &self.limits())
    }
}
