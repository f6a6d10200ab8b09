//! Request handling: per-request sessions and the shared planner.
//!
//! The network and green zones are loaded once and shared read-only
//! (`Arc`).  Each request opens a [`PlanningSession`] that owns its own
//! [`WeightedGraph`], so concurrent requests never observe each other's
//! discounted weights.

use std::sync::Arc;

use tracing::{debug, info};

use walk_core::{GeoPoint, NodeId};
use walk_spatial::{
    adjust, AdjustSummary, GeoDistance, GreenZone, Haversine, SpatialError, WalkNetwork,
    WeightedGraph,
};

use crate::config::PlannerConfig;
use crate::estimator::estimate_budget;
use crate::generator::{CandidateGenerator, CycleEnumerator};
use crate::profile::DogProfile;
use crate::scoring::{select, ScoredRoute};
use crate::search::RouteCandidate;
use crate::{PlanError, PlanResult};

// ── Request / response ────────────────────────────────────────────────────────

/// A walk request as received at the service boundary.
///
/// Dog fields are free text or optional numbers; they are parsed into a
/// [`DogProfile`] by [`WalkRequest::profile`].  With the `serde` feature the
/// Spanish field names (`latitud`, `tamaño`, …) are accepted as aliases.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WalkRequest {
    #[cfg_attr(feature = "serde", serde(alias = "latitud"))]
    pub latitude: Option<f64>,
    #[cfg_attr(feature = "serde", serde(alias = "longitud"))]
    pub longitude: Option<f64>,
    #[cfg_attr(feature = "serde", serde(alias = "tamaño", alias = "tamano"))]
    pub dog_size: Option<String>,
    #[cfg_attr(feature = "serde", serde(alias = "edad"))]
    pub dog_age: Option<f64>,
    #[cfg_attr(feature = "serde", serde(alias = "raza", alias = "comportamiento"))]
    pub dog_breed_or_behavior: Option<String>,
    #[cfg_attr(feature = "serde", serde(alias = "peso"))]
    pub dog_weight_kg: Option<f64>,
    #[cfg_attr(feature = "serde", serde(alias = "duracion", alias = "duración"))]
    pub duration_minutes: f64,
}

impl WalkRequest {
    pub fn profile(&self) -> DogProfile {
        DogProfile::from_fields(
            self.dog_size.as_deref(),
            self.dog_age,
            self.dog_breed_or_behavior.as_deref(),
            self.dog_weight_kg,
        )
    }
}

/// One vertex of a planned walk.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WalkPoint {
    pub latitude:  f64,
    pub longitude: f64,
}

impl From<GeoPoint> for WalkPoint {
    fn from(p: GeoPoint) -> Self {
        Self { latitude: p.lat, longitude: p.lon }
    }
}

/// The selected walk.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannedWalk {
    /// Coordinates in walking order; first and last coincide.
    pub route:               Vec<WalkPoint>,
    pub nodes:               Vec<NodeId>,
    /// Effective (discounted) length, in metres.
    pub total_length_meters: f64,
    pub score:               f64,
}

/// Reply to a [`WalkRequest`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WalkResponse {
    /// `None` when no closed walk fits the budget.
    pub route:                  Option<PlannedWalk>,
    /// `false` if a search limit cut the enumeration short.
    pub search_complete:        bool,
    pub candidates_considered:  usize,
    pub distance_budget_meters: f64,
}

impl WalkResponse {
    pub fn is_found(&self) -> bool {
        self.route.is_some()
    }
}

// ── PlanningSession ───────────────────────────────────────────────────────────

/// Outcome of [`PlanningSession::run`].
#[derive(Clone, Debug)]
pub struct SessionOutcome {
    pub best:       Option<ScoredRoute>,
    pub candidates: usize,
    pub expansions: u64,
    pub truncated:  bool,
}

/// Per-request state: a private weighted copy of the network, the dog
/// profile, the start node, and the distance budget.
pub struct PlanningSession<'z> {
    graph:   WeightedGraph,
    zones:   &'z [GreenZone],
    profile: DogProfile,
    start:   NodeId,
    budget:  f64,
    summary: AdjustSummary,
}

impl<'z> PlanningSession<'z> {
    /// Build the session's weighted graph, apply the green discount, and
    /// estimate the distance budget.
    pub fn open<D: GeoDistance + ?Sized>(
        network:          Arc<WalkNetwork>,
        zones:            &'z [GreenZone],
        profile:          DogProfile,
        start:            NodeId,
        duration_minutes: f64,
        config:           &PlannerConfig,
        geo:              &D,
    ) -> PlanResult<Self> {
        if !network.contains(start) {
            return Err(PlanError::StartNotInGraph(start));
        }
        let mut graph = WeightedGraph::new(network)?;
        let summary = adjust(&mut graph, zones, &config.discount, geo)?;
        let budget = estimate_budget(duration_minutes, &profile) * config.budget_scale;
        Ok(Self { graph, zones, profile, start, budget, summary })
    }

    pub fn graph(&self) -> &WeightedGraph {
        &self.graph
    }

    pub fn profile(&self) -> &DogProfile {
        &self.profile
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    /// Distance budget in the same units as the edge weights.
    pub fn budget_m(&self) -> f64 {
        self.budget
    }

    pub fn adjust_summary(&self) -> AdjustSummary {
        self.summary
    }

    /// Generate candidates and select the cheapest.
    pub fn run<G, D>(&self, generator: &G, geo: &D) -> PlanResult<SessionOutcome>
    where
        G: CandidateGenerator + ?Sized,
        D: GeoDistance + ?Sized,
    {
        let search = generator.generate(&self.graph, self.start, self.budget)?;
        let candidates = search.candidates.len();
        let best = select(search.candidates, &self.graph, self.zones, &self.profile, geo);
        Ok(SessionOutcome {
            best,
            candidates,
            expansions: search.expansions,
            truncated: search.truncated,
        })
    }

    /// Coordinates of a candidate's nodes.
    pub fn coordinates(&self, route: &RouteCandidate) -> Vec<WalkPoint> {
        let net = self.graph.network();
        route.nodes().iter().map(|n| WalkPoint::from(net.node_pos[n.index()])).collect()
    }
}

// ── WalkPlanner ───────────────────────────────────────────────────────────────

/// Shared, thread-safe entry point: one instance serves every request.
///
/// # Example
///
/// ```rust,ignore
/// let planner = WalkPlanner::new(Arc::new(network), zones, PlannerConfig::default())?;
/// let response = planner.plan(&WalkRequest {
///     latitude: Some(42.3439),
///     longitude: Some(-3.6969),
///     duration_minutes: 30.0,
///     ..Default::default()
/// })?;
/// ```
pub struct WalkPlanner<D: GeoDistance = Haversine, G: CandidateGenerator = CycleEnumerator> {
    network:   Arc<WalkNetwork>,
    zones:     Arc<[GreenZone]>,
    config:    PlannerConfig,
    geo:       D,
    generator: G,
}

impl WalkPlanner {
    /// Planner with haversine distances and the configured cycle enumerator.
    pub fn new(
        network: Arc<WalkNetwork>,
        zones:   Vec<GreenZone>,
        config:  PlannerConfig,
    ) -> PlanResult<Self> {
        let generator = config.enumerator();
        Self::with_parts(network, zones, config, Haversine, generator)
    }
}

impl<D: GeoDistance, G: CandidateGenerator> WalkPlanner<D, G> {
    /// Planner with a custom distance provider and candidate generator.
    ///
    /// # Errors
    ///
    /// Invalid configuration, an empty network, or a non-positive edge
    /// length.
    pub fn with_parts(
        network:   Arc<WalkNetwork>,
        zones:     Vec<GreenZone>,
        config:    PlannerConfig,
        geo:       D,
        generator: G,
    ) -> PlanResult<Self> {
        config.validate()?;
        // Validates non-emptiness and base weights once, up front.
        WeightedGraph::new(Arc::clone(&network))?;
        info!(
            nodes = network.node_count(),
            edges = network.edge_count(),
            zones = zones.len(),
            "walk planner ready"
        );
        Ok(Self { network, zones: zones.into(), config, geo, generator })
    }

    pub fn network(&self) -> &WalkNetwork {
        &self.network
    }

    pub fn zones(&self) -> &[GreenZone] {
        &self.zones
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan a walk for `request`.
    ///
    /// The start is the network node nearest the requested coordinates.
    ///
    /// # Errors
    ///
    /// - [`PlanError::MissingStart`] if either coordinate is absent.
    /// - [`PlanError::Core`] if the coordinates are out of range.
    ///
    /// Finding no walk within budget is `Ok` with `route: None`.
    pub fn plan(&self, request: &WalkRequest) -> PlanResult<WalkResponse> {
        let (Some(lat), Some(lon)) = (request.latitude, request.longitude) else {
            return Err(PlanError::MissingStart);
        };
        let origin = GeoPoint::checked(lat, lon)?;
        let start = self.network.snap_to_node(origin).ok_or(SpatialError::EmptyNetwork)?;

        let session = PlanningSession::open(
            Arc::clone(&self.network),
            &self.zones,
            request.profile(),
            start,
            request.duration_minutes,
            &self.config,
            &self.geo,
        )?;
        debug!(
            origin = %origin,
            start = %start,
            budget = session.budget_m(),
            discounted = session.adjust_summary().park_discounted
                + session.adjust_summary().dog_park_discounted,
            "planning session opened"
        );

        let outcome = session.run(&self.generator, &self.geo)?;
        let route = outcome.best.map(|best| PlannedWalk {
            route:               session.coordinates(&best.route),
            total_length_meters: best.route.length_m(),
            score:               best.score,
            nodes:               best.route.into_nodes(),
        });

        info!(
            start = %start,
            candidates = outcome.candidates,
            truncated = outcome.truncated,
            found = route.is_some(),
            "walk planned"
        );
        Ok(WalkResponse {
            route,
            search_complete:        !outcome.truncated,
            candidates_considered:  outcome.candidates,
            distance_budget_meters: session.budget_m(),
        })
    }
}
