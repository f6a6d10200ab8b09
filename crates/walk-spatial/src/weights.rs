//! Per-session edge weights and the green-proximity weight adjuster.
//!
//! # Ownership
//!
//! The street topology ([`WalkNetwork`]) is shared and immutable.  The
//! *effective* weight of every edge lives in a [`WeightedGraph`], which each
//! planning session owns exclusively.  Adjusting weights for one request can
//! therefore never leak into a concurrent request using different discount
//! factors.
//!
//! # Invariant
//!
//! `effective_weight(e) == base_weight(e) * f` with `f ∈ (0, 1]`, so an
//! effective weight is always positive and never exceeds its base weight.

use std::sync::Arc;

use tracing::debug;

use walk_core::{EdgeId, NodeId};

use crate::{GeoDistance, GreenZone, SpatialError, SpatialResult, WalkNetwork};

// ── GreenDiscount ─────────────────────────────────────────────────────────────

/// Parameters of the green-proximity discount.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GreenDiscount {
    /// Edges whose midpoint lies strictly closer than this to a green zone
    /// are discounted.  Metres.  Default: 10.
    pub distance_threshold_m: f64,

    /// Multiplier applied near an ordinary green zone.  Default: 0.5.
    pub discount_factor: f64,

    /// Multiplier applied when the nearest zone is a dog park.  Default: 0.7.
    pub dog_park_discount_factor: f64,
}

impl Default for GreenDiscount {
    fn default() -> Self {
        Self {
            distance_threshold_m:     10.0,
            discount_factor:          0.5,
            dog_park_discount_factor: 0.7,
        }
    }
}

impl GreenDiscount {
    /// Both factors must lie in `(0, 1]`; the threshold must be finite and
    /// non-negative.
    pub fn validate(&self) -> SpatialResult<()> {
        if !self.distance_threshold_m.is_finite() || self.distance_threshold_m < 0.0 {
            return Err(SpatialError::InvalidDiscount(format!(
                "distance threshold {} must be finite and non-negative",
                self.distance_threshold_m
            )));
        }
        for (what, f) in [
            ("discount factor", self.discount_factor),
            ("dog-park discount factor", self.dog_park_discount_factor),
        ] {
            if !(f > 0.0 && f <= 1.0) {
                return Err(SpatialError::InvalidDiscount(format!("{what} {f} outside (0, 1]")));
            }
        }
        Ok(())
    }
}

// ── WeightedGraph ─────────────────────────────────────────────────────────────

/// A walking network plus one owned vector of effective edge weights.
///
/// Cloning is cheap for the topology (an `Arc` bump) and copies only the
/// weight vector, which makes it a per-request snapshot.
#[derive(Clone)]
pub struct WeightedGraph {
    network:   Arc<WalkNetwork>,
    effective: Vec<f64>,
}

impl WeightedGraph {
    /// Open a weighted view over `network` with every effective weight equal
    /// to its base weight.
    ///
    /// # Errors
    ///
    /// [`SpatialError::EmptyNetwork`] if the network has no nodes,
    /// [`SpatialError::NonPositiveWeight`] if any base weight is zero,
    /// negative, or not finite.
    pub fn new(network: Arc<WalkNetwork>) -> SpatialResult<Self> {
        if network.is_empty() {
            return Err(SpatialError::EmptyNetwork);
        }
        for (edge, _, _, weight) in network.edges() {
            if !(weight.is_finite() && weight > 0.0) {
                return Err(SpatialError::NonPositiveWeight { edge, weight });
            }
        }
        let effective = network.edge_length_m.clone();
        Ok(Self { network, effective })
    }

    #[inline]
    pub fn network(&self) -> &WalkNetwork {
        &self.network
    }

    #[inline]
    pub fn shared_network(&self) -> &Arc<WalkNetwork> {
        &self.network
    }

    #[inline]
    pub fn base_weight(&self, edge: EdgeId) -> f64 {
        self.network.base_weight(edge)
    }

    #[inline]
    pub fn effective_weight(&self, edge: EdgeId) -> f64 {
        self.effective[edge.index()]
    }

    /// All effective weights, indexed by `EdgeId`.
    pub fn effective_weights(&self) -> &[f64] {
        &self.effective
    }

    /// Restore every effective weight to its base weight.
    pub fn reset(&mut self) {
        self.effective.copy_from_slice(&self.network.edge_length_m);
    }

    /// Re-check the positive-weight invariant on the effective weights.
    pub fn check_positive(&self) -> SpatialResult<()> {
        match self.effective.iter().position(|w| !(w.is_finite() && *w > 0.0)) {
            Some(i) => Err(SpatialError::NonPositiveWeight {
                edge:   EdgeId::from_index(i),
                weight: self.effective[i],
            }),
            None => Ok(()),
        }
    }

    /// Cheapest edge joining `a` and `b` under the effective weights.
    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        if !self.network.contains(a) {
            return None;
        }
        self.network
            .neighbors(a)
            .filter(|&(n, _)| n == b)
            .map(|(_, e)| e)
            .min_by(|&x, &y| self.effective_weight(x).total_cmp(&self.effective_weight(y)))
    }

    /// Sum of effective weights along consecutive node pairs, or `None` if
    /// some pair is not joined by an edge.
    pub fn path_length(&self, nodes: &[NodeId]) -> Option<f64> {
        nodes
            .windows(2)
            .map(|w| self.edge_between(w[0], w[1]).map(|e| self.effective_weight(e)))
            .sum()
    }
}

// ── Adjuster ──────────────────────────────────────────────────────────────────

/// Counts reported by [`adjust`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdjustSummary {
    /// Edges examined.
    pub edges: usize,
    /// Edges discounted because an ordinary green zone was nearest.
    pub park_discounted: usize,
    /// Edges discounted because a dog park was nearest.
    pub dog_park_discounted: usize,
}

/// Rewrite every effective weight from its base weight according to green
/// proximity.
///
/// For each edge, the nearest zone to the edge midpoint is found through
/// `geo`.  If it lies strictly closer than `distance_threshold_m`, the base
/// weight is multiplied by `dog_park_discount_factor` (dog park) or
/// `discount_factor` (any other zone).  All other edges keep their base
/// weight.
///
/// Weights are reset before recomputation, so calling `adjust` repeatedly is
/// idempotent for the same inputs and safe with different parameters.
pub fn adjust<D: GeoDistance + ?Sized>(
    graph:    &mut WeightedGraph,
    zones:    &[GreenZone],
    discount: &GreenDiscount,
    geo:      &D,
) -> SpatialResult<AdjustSummary> {
    discount.validate()?;
    graph.reset();

    let mut summary = AdjustSummary { edges: graph.network.edge_count(), ..Default::default() };
    if zones.is_empty() {
        debug!(edges = summary.edges, "no green zones; weights left at base length");
        return Ok(summary);
    }

    for i in 0..summary.edges {
        let edge = EdgeId::from_index(i);
        let midpoint = graph.network.edge_midpoint(edge);
        let Some(nearest) = geo.nearest(midpoint, zones) else {
            continue;
        };
        if nearest.distance_m >= discount.distance_threshold_m {
            continue;
        }
        let factor = if nearest.is_dog_park() {
            summary.dog_park_discounted += 1;
            discount.dog_park_discount_factor
        } else {
            summary.park_discounted += 1;
            discount.discount_factor
        };
        graph.effective[i] = graph.network.edge_length_m[i] * factor;
    }

    debug!(
        edges = summary.edges,
        park = summary.park_discounted,
        dog_park = summary.dog_park_discounted,
        "applied green-proximity discounts"
    );
    Ok(summary)
}
