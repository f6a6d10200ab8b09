//! Walking network representation and builder.
//!
//! # Data layout
//!
//! Edges are **undirected**: each street segment gets one `EdgeId` and one
//! base length.  Adjacency is stored in **Compressed Sparse Row (CSR)**
//! format over half-edges.  Given a `NodeId n`, its incident half-edges
//! occupy the slice:
//!
//! ```text
//! adj_node[ adj_start[n] .. adj_start[n+1] ]   // neighbour at the far end
//! adj_edge[ adj_start[n] .. adj_start[n+1] ]   // EdgeId of the segment
//! ```
//!
//! Within a node's slice, half-edges keep the order in which their edges were
//! added to the builder.  The cycle search walks neighbours in this order, so
//! results are deterministic for a fixed build sequence.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over node positions projected to local metres
//! (east, north) around the centroid of the network.  Raw lat/lon would
//! overweight north-south offsets by `1 / cos(lat)`, which at Spanish
//! latitudes picks the wrong node for starts between two blocks.

use std::ops::Range;

use rstar::primitives::GeomWithData;
use rstar::RTree;

use walk_core::{EdgeId, GeoPoint, NodeId};

use crate::{SpatialError, SpatialResult};

/// Projected `[east, north]` point carrying its node id.
type NodeEntry = GeomWithData<[f64; 2], NodeId>;

// ── WalkNetwork ───────────────────────────────────────────────────────────────

/// Undirected street-and-path graph in CSR format plus a spatial index for
/// start-point snapping.
///
/// A `WalkNetwork` is immutable once built.  Per-request edge weights live in
/// [`WeightedGraph`](crate::WeightedGraph), so one network can be shared (via
/// `Arc`) between any number of concurrent planning sessions.
///
/// Do not construct directly; use [`WalkNetworkBuilder`].
pub struct WalkNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    // ── CSR half-edge adjacency ───────────────────────────────────────────
    /// CSR row pointer.  Length = `node_count + 1`.
    pub adj_start: Vec<u32>,

    /// Far endpoint of each half-edge.
    pub adj_node: Vec<NodeId>,

    /// Undirected edge behind each half-edge.
    pub adj_edge: Vec<EdgeId>,

    // ── Edge data (indexed by EdgeId) ─────────────────────────────────────
    /// First endpoint as passed to [`WalkNetworkBuilder::add_edge`].
    pub edge_a: Vec<NodeId>,

    /// Second endpoint.
    pub edge_b: Vec<NodeId>,

    /// Base length of each edge in metres.
    pub edge_length_m: Vec<f64>,

    // ── Spatial index ─────────────────────────────────────────────────────
    /// Projection origin of the index.
    origin:      GeoPoint,
    spatial_idx: RTree<NodeEntry>,
}

impl WalkNetwork {
    /// Construct an empty network with no nodes or edges.
    ///
    /// Planning against an empty network fails with
    /// [`SpatialError::EmptyNetwork`].
    pub fn empty() -> Self {
        WalkNetworkBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_pos.len()
    }

    /// Position of `node`, or [`SpatialError::NodeNotFound`].
    pub fn position(&self, node: NodeId) -> SpatialResult<GeoPoint> {
        self.node_pos
            .get(node.index())
            .copied()
            .ok_or(SpatialError::NodeNotFound(node))
    }

    // ── Iteration ─────────────────────────────────────────────────────────

    /// All nodes with their coordinates, in `NodeId` order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, GeoPoint)> + '_ {
        self.node_pos
            .iter()
            .enumerate()
            .map(|(i, &pos)| (NodeId::from_index(i), pos))
    }

    /// All edges as `(id, a, b, base_length_m)`, in `EdgeId` order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, NodeId, NodeId, f64)> + '_ {
        (0..self.edge_count()).map(|i| {
            (EdgeId::from_index(i), self.edge_a[i], self.edge_b[i], self.edge_length_m[i])
        })
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Half-edge index range of `node` into `adj_node` / `adj_edge`.
    #[inline]
    pub fn adjacency(&self, node: NodeId) -> Range<usize> {
        let start = self.adj_start[node.index()] as usize;
        let end   = self.adj_start[node.index() + 1] as usize;
        start..end
    }

    /// Iterator over `(neighbour, edge)` pairs incident to `node`.
    ///
    /// Contiguous slice of the CSR arrays; nothing is allocated.
    #[inline]
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, EdgeId)> + '_ {
        self.adjacency(node).map(|i| (self.adj_node[i], self.adj_edge[i]))
    }

    /// Number of half-edges incident to `node`.
    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        self.adjacency(node).len()
    }

    #[inline]
    pub fn endpoints(&self, edge: EdgeId) -> (NodeId, NodeId) {
        (self.edge_a[edge.index()], self.edge_b[edge.index()])
    }

    #[inline]
    pub fn base_weight(&self, edge: EdgeId) -> f64 {
        self.edge_length_m[edge.index()]
    }

    /// Representative point of an edge: midpoint of its straight segment.
    pub fn edge_midpoint(&self, edge: EdgeId) -> GeoPoint {
        let (a, b) = self.endpoints(edge);
        self.node_pos[a.index()].midpoint(self.node_pos[b.index()])
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the `NodeId` of the nearest network node to `pos`.
    ///
    /// Returns `None` only if the network has no nodes.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&self.index_point(pos))
            .map(|e| e.data)
    }

    /// Return up to `k` nearest nodes to `pos`, sorted by ascending distance.
    pub fn k_nearest_nodes(&self, pos: GeoPoint, k: usize) -> Vec<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&self.index_point(pos))
            .take(k)
            .map(|e| e.data)
            .collect()
    }

    fn index_point(&self, pos: GeoPoint) -> [f64; 2] {
        let (east, north) = pos.project_m(self.origin);
        [east, north]
    }
}

// ── WalkNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`WalkNetwork`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use walk_core::GeoPoint;
/// use walk_spatial::WalkNetworkBuilder;
///
/// let mut b = WalkNetworkBuilder::new();
/// let a = b.add_node(GeoPoint::new(42.3439, -3.6969));
/// let c = b.add_node(GeoPoint::new(42.3448, -3.6969));
/// b.add_edge(a, c, 100.0).unwrap();
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 1); // undirected
/// assert_eq!(net.degree(a), 1);
/// ```
pub struct WalkNetworkBuilder {
    nodes: Vec<GeoPoint>,
    edges: Vec<RawEdge>,
}

struct RawEdge {
    a:        NodeId,
    b:        NodeId,
    length_m: f64,
}

impl WalkNetworkBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), edges: Vec::new() }
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            edges: Vec::with_capacity(edges),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(pos);
        id
    }

    /// Add an undirected street segment of `length_m` metres between `a` and
    /// `b`.
    ///
    /// Lengths are not validated here; non-positive weights are rejected when
    /// a [`WeightedGraph`](crate::WeightedGraph) is opened over the network.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, length_m: f64) -> SpatialResult<EdgeId> {
        for n in [a, b] {
            if n.index() >= self.nodes.len() {
                return Err(SpatialError::NodeNotFound(n));
            }
        }
        let id = EdgeId::from_index(self.edges.len());
        self.edges.push(RawEdge { a, b, length_m });
        Ok(id)
    }

    /// Look up the position of a node added earlier (used by the CSV loader
    /// to derive missing edge lengths).
    pub fn node_pos(&self, id: NodeId) -> GeoPoint {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.edges.len() }

    /// Consume the builder and produce a [`WalkNetwork`].
    ///
    /// Time complexity: O(E log E) for the half-edge sort + O(N log N) for the
    /// R-tree bulk load.
    pub fn build(self) -> WalkNetwork {
        let node_count = self.nodes.len();

        // Two half-edges per segment, stably sorted by source so each node's
        // neighbours keep edge insertion order.
        let mut half: Vec<(NodeId, NodeId, EdgeId)> = Vec::with_capacity(self.edges.len() * 2);
        for (i, e) in self.edges.iter().enumerate() {
            let id = EdgeId::from_index(i);
            half.push((e.a, e.b, id));
            half.push((e.b, e.a, id));
        }
        half.sort_by_key(|&(from, _, edge)| (from.0, edge.0));

        let adj_node: Vec<NodeId> = half.iter().map(|h| h.1).collect();
        let adj_edge: Vec<EdgeId> = half.iter().map(|h| h.2).collect();

        // Build CSR row pointer.
        let mut adj_start = vec![0u32; node_count + 1];
        for h in &half {
            adj_start[h.0.index() + 1] += 1;
        }
        for i in 1..=node_count {
            adj_start[i] += adj_start[i - 1];
        }
        debug_assert_eq!(adj_start[node_count] as usize, half.len());

        let origin = centroid(&self.nodes);
        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| {
                let (east, north) = pos.project_m(origin);
                GeomWithData::new([east, north], NodeId::from_index(i))
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        WalkNetwork {
            node_pos: self.nodes,
            adj_start,
            adj_node,
            adj_edge,
            edge_a:        self.edges.iter().map(|e| e.a).collect(),
            edge_b:        self.edges.iter().map(|e| e.b).collect(),
            edge_length_m: self.edges.iter().map(|e| e.length_m).collect(),
            origin,
            spatial_idx,
        }
    }
}

/// Mean position; `(0, 0)` for no points.
fn centroid(points: &[GeoPoint]) -> GeoPoint {
    if points.is_empty() {
        return GeoPoint::new(0.0, 0.0);
    }
    let n = points.len() as f64;
    let (lat, lon) = points.iter().fold((0.0, 0.0), |(la, lo), p| (la + p.lat, lo + p.lon));
    GeoPoint::new(lat / n, lon / n)
}

impl Default for WalkNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
