//! Bounded backtracking enumeration of closed walks.
//!
//! # Algorithm
//!
//! Depth-first search from `start` over effective weights, driven by an
//! explicit frame stack (one frame per node on the current path) so deep
//! searches cannot overflow the call stack.  For each half-edge `u → v` with
//! cumulative length `d'`:
//!
//! 1. `d' > budget`                       → skip;
//! 2. `v == start` and the path holds at
//!    least three nodes                   → record `path + [start]`;
//!    `v == start` never extends the path;
//! 3. `v` already on the path             → skip;
//! 4. `best[v] <= d'`                     → skip (dominated);
//! 5. otherwise `best[v] = d'` and descend.
//!
//! `best` holds the shortest distance at which each node has been entered
//! during the whole search and is never rolled back on backtrack.  The
//! pruning is therefore heuristic: some simple cycles within budget are not
//! enumerated, but every recorded candidate is a valid simple cycle no
//! longer than the budget.  Closing requires three path nodes, so a walk to
//! a neighbour and straight back (`A → B → A`) is never produced.
//!
//! Candidates are recorded in discovery order; neighbour order is the
//! network's adjacency order, which makes the output deterministic.

use std::time::{Duration, Instant};

use tracing::debug;

use walk_core::NodeId;
use walk_spatial::WeightedGraph;

use crate::{PlanError, PlanResult};

/// Minimum number of path nodes (start included) before a closing edge back
/// to the start is accepted.
const MIN_CLOSING_PATH: usize = 3;

/// The deadline is polled once per this many expansions.
const DEADLINE_CHECK_INTERVAL: u64 = 256;

// ── RouteCandidate ────────────────────────────────────────────────────────────

/// A closed walk: first node equals last node, no interior node repeated.
///
/// Only built by the search or by [`RouteCandidate::from_nodes`]; it is
/// serialized for output but never decoded.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RouteCandidate {
    nodes:    Vec<NodeId>,
    length_m: f64,
}

impl RouteCandidate {
    /// Validate `nodes` against `graph` and compute the effective length.
    ///
    /// # Errors
    ///
    /// [`PlanError::InvalidRoute`] if the walk has fewer than three ids, is
    /// not closed, repeats an interior node, or uses a non-existent edge.
    pub fn from_nodes(graph: &WeightedGraph, nodes: Vec<NodeId>) -> PlanResult<Self> {
        if nodes.len() < 3 {
            return Err(PlanError::InvalidRoute(format!("{} nodes, need at least 3", nodes.len())));
        }
        let (first, last) = (nodes[0], nodes[nodes.len() - 1]);
        if first != last {
            return Err(PlanError::InvalidRoute(format!("starts at {first} but ends at {last}")));
        }
        let open = &nodes[..nodes.len() - 1];
        for (i, n) in open.iter().enumerate() {
            if open[i + 1..].contains(n) {
                return Err(PlanError::InvalidRoute(format!("node {n} visited twice")));
            }
        }
        let length_m = graph
            .path_length(&nodes)
            .ok_or_else(|| PlanError::InvalidRoute("consecutive nodes not joined by an edge".into()))?;
        Ok(Self { nodes, length_m })
    }

    /// Node sequence, start repeated at the end.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Sum of effective weights along the walk, in metres.
    pub fn length_m(&self) -> f64 {
        self.length_m
    }

    /// First node of the walk.
    pub fn start(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn into_nodes(self) -> Vec<NodeId> {
        self.nodes
    }
}

// ── SearchLimits ──────────────────────────────────────────────────────────────

/// Caps on the amount of work one enumeration may do.
///
/// When a limit is hit the search stops and reports the candidates found so
/// far with [`CycleSearch::truncated`] set.
#[derive(Copy, Clone, Debug, Default)]
pub struct SearchLimits {
    /// Maximum number of node expansions (`None` = unbounded).
    pub max_expansions: Option<u64>,
    /// Wall-clock instant after which the search stops.
    pub deadline:       Option<Instant>,
}

impl SearchLimits {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_expansions(mut self, n: u64) -> Self {
        self.max_expansions = Some(n);
        self
    }

    /// Stop `limit` from now.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.deadline = Some(Instant::now() + limit);
        self
    }
}

// ── CycleSearch ───────────────────────────────────────────────────────────────

/// Output of one enumeration.
#[derive(Clone, Debug, Default)]
pub struct CycleSearch {
    /// Candidates in discovery order.
    pub candidates: Vec<RouteCandidate>,
    /// Nodes pushed onto the search path (the start excluded).
    pub expansions: u64,
    /// `true` if a limit stopped the search before it was exhausted.
    pub truncated:  bool,
}

/// Enumerate closed walks from `start` whose effective length is at most
/// `budget_m`.
///
/// A budget of zero (or any negative budget) yields no candidates; that is a
/// normal result, not an error.
///
/// # Errors
///
/// - [`PlanError::StartNotInGraph`] if `start` is not a network node.
/// - [`PlanError::InvalidBudget`] if `budget_m` is NaN.
/// - [`PlanError::Spatial`] if any effective weight is not positive.
pub fn enumerate_cycles(
    graph:    &WeightedGraph,
    start:    NodeId,
    budget_m: f64,
    limits:   &SearchLimits,
) -> PlanResult<CycleSearch> {
    if !graph.network().contains(start) {
        return Err(PlanError::StartNotInGraph(start));
    }
    if budget_m.is_nan() {
        return Err(PlanError::InvalidBudget(budget_m));
    }
    graph.check_positive()?;

    let mut search = Backtracker::new(graph, start, budget_m, limits);
    search.run();
    debug!(
        start = %start,
        budget_m,
        candidates = search.found.len(),
        expansions = search.expansions,
        truncated = search.truncated,
        "cycle enumeration finished"
    );
    Ok(CycleSearch {
        candidates: search.found,
        expansions: search.expansions,
        truncated:  search.truncated,
    })
}

// ── Backtracker ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone)]
struct Frame {
    node:   NodeId,
    dist:   f64,
    /// Next half-edge index to try.
    cursor: usize,
    end:    usize,
}

struct Backtracker<'g> {
    graph:      &'g WeightedGraph,
    limits:     &'g SearchLimits,
    start:      NodeId,
    budget:     f64,
    best:       Vec<f64>,
    on_path:    Vec<bool>,
    path:       Vec<NodeId>,
    stack:      Vec<Frame>,
    found:      Vec<RouteCandidate>,
    expansions: u64,
    truncated:  bool,
}

impl<'g> Backtracker<'g> {
    fn new(graph: &'g WeightedGraph, start: NodeId, budget: f64, limits: &'g SearchLimits) -> Self {
        let n = graph.network().node_count();
        Self {
            graph,
            limits,
            start,
            budget,
            best:       vec![f64::INFINITY; n],
            on_path:    vec![false; n],
            path:       Vec::new(),
            stack:      Vec::new(),
            found:      Vec::new(),
            expansions: 0,
            truncated:  false,
        }
    }

    fn run(&mut self) {
        let graph = self.graph;
        let net = graph.network();

        self.best[self.start.index()] = 0.0;
        self.push(self.start, 0.0);

        while let Some(top) = self.stack.last_mut() {
            if top.cursor == top.end {
                self.pop();
                continue;
            }
            let i = top.cursor;
            top.cursor += 1;
            let from_dist = top.dist;

            let next = net.adj_node[i];
            let dist = from_dist + graph.effective_weight(net.adj_edge[i]);
            if dist > self.budget {
                continue;
            }
            if next == self.start {
                if self.path.len() >= MIN_CLOSING_PATH {
                    self.record(dist);
                }
                continue;
            }
            if self.on_path[next.index()] || self.best[next.index()] <= dist {
                continue;
            }
            if self.limit_reached() {
                self.truncated = true;
                return;
            }
            self.best[next.index()] = dist;
            self.expansions += 1;
            self.push(next, dist);
        }
    }

    fn push(&mut self, node: NodeId, dist: f64) {
        let range = self.graph.network().adjacency(node);
        self.stack.push(Frame { node, dist, cursor: range.start, end: range.end });
        self.path.push(node);
        self.on_path[node.index()] = true;
    }

    fn pop(&mut self) {
        if let Some(frame) = self.stack.pop() {
            self.path.pop();
            self.on_path[frame.node.index()] = false;
        }
    }

    fn record(&mut self, length_m: f64) {
        let mut nodes = Vec::with_capacity(self.path.len() + 1);
        nodes.extend_from_slice(&self.path);
        nodes.push(self.start);
        self.found.push(RouteCandidate { nodes, length_m });
    }

    fn limit_reached(&self) -> bool {
        if self.limits.max_expansions.is_some_and(|max| self.expansions >= max) {
            return true;
        }
        match self.limits.deadline {
            Some(deadline) if self.expansions % DEADLINE_CHECK_INTERVAL == 0 => {
                Instant::now() >= deadline
            }
            _ => false,
        }
    }
}
