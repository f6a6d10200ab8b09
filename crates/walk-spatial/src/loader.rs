//! CSV readers for walking networks and green zones.
//!
//! # Network CSV format
//!
//! Two files.  Nodes carry an external integer id (e.g. an OSM node id):
//!
//! ```csv
//! id,lat,lon
//! 101,42.3439,-3.6969
//! 102,42.3448,-3.6969
//! ```
//!
//! Edges reference external ids.  `length_m` may be left empty, in which
//! case the haversine distance between the endpoints is used:
//!
//! ```csv
//! u,v,length_m
//! 101,102,100.0
//! 102,103,
//! ```
//!
//! # Green-zone CSV format
//!
//! ```csv
//! name,leisure,landuse,natural,ring
//! Parque de la Isla,park,,,42.340 -3.710;42.341 -3.710;42.341 -3.708
//! ```
//!
//! `ring` is a `;`-separated list of `lat lon` vertices.  Rows whose tags do
//! not classify as a green area (see [`GreenZoneKind::from_osm_tags`]) are
//! skipped.

use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;
use tracing::{debug, warn};

use walk_core::{GeoPoint, NodeId};

use crate::network::{WalkNetwork, WalkNetworkBuilder};
use crate::zones::{GreenZone, GreenZoneKind, Polygon};
use crate::{SpatialError, SpatialResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    id:  u64,
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct EdgeRecord {
    u:        u64,
    v:        u64,
    length_m: Option<f64>,
}

#[derive(Deserialize)]
struct ZoneRecord {
    name:    Option<String>,
    leisure: Option<String>,
    landuse: Option<String>,
    natural: Option<String>,
    ring:    String,
}

// ── LoadedNetwork ─────────────────────────────────────────────────────────────

/// A network read from CSV together with the external node ids it was keyed
/// by.
pub struct LoadedNetwork {
    pub network: WalkNetwork,
    /// External id of each node, indexed by `NodeId`.
    pub external_ids: Vec<u64>,
    by_external: FxHashMap<u64, NodeId>,
}

impl LoadedNetwork {
    /// `NodeId` assigned to an external id.
    pub fn node_for(&self, external: u64) -> Option<NodeId> {
        self.by_external.get(&external).copied()
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a network from a node CSV file and an edge CSV file.
pub fn load_network_csv(nodes: &Path, edges: &Path) -> SpatialResult<LoadedNetwork> {
    let nodes = std::fs::File::open(nodes)?;
    let edges = std::fs::File::open(edges)?;
    load_network_reader(nodes, edges)
}

/// Like [`load_network_csv`] but accepts any `Read` sources.
///
/// Useful for testing (pass a `std::io::Cursor`) or embedded data.
pub fn load_network_reader<N: Read, E: Read>(nodes: N, edges: E) -> SpatialResult<LoadedNetwork> {
    // ── Nodes ─────────────────────────────────────────────────────────────
    let mut builder = WalkNetworkBuilder::new();
    let mut external_ids = Vec::new();
    let mut by_external: FxHashMap<u64, NodeId> = FxHashMap::default();

    for result in csv::Reader::from_reader(nodes).deserialize::<NodeRecord>() {
        let row = result.map_err(|e| SpatialError::Parse(e.to_string()))?;
        let pos = GeoPoint::checked(row.lat, row.lon)?;
        if by_external.contains_key(&row.id) {
            return Err(SpatialError::Parse(format!("duplicate node id {}", row.id)));
        }
        let id = builder.add_node(pos);
        by_external.insert(row.id, id);
        external_ids.push(row.id);
    }

    // ── Edges ─────────────────────────────────────────────────────────────
    for result in csv::Reader::from_reader(edges).deserialize::<EdgeRecord>() {
        let row = result.map_err(|e| SpatialError::Parse(e.to_string()))?;
        let lookup = |ext: u64| {
            by_external
                .get(&ext)
                .copied()
                .ok_or_else(|| SpatialError::Parse(format!("edge references unknown node {ext}")))
        };
        let (a, b) = (lookup(row.u)?, lookup(row.v)?);
        let length_m = row
            .length_m
            .unwrap_or_else(|| builder.node_pos(a).distance_m(builder.node_pos(b)));
        builder.add_edge(a, b, length_m)?;
    }

    debug!(nodes = builder.node_count(), edges = builder.edge_count(), "loaded network CSV");

    Ok(LoadedNetwork {
        network: builder.build(),
        external_ids,
        by_external,
    })
}

/// Load green zones from a CSV file.
pub fn load_zones_csv(path: &Path) -> SpatialResult<Vec<GreenZone>> {
    let file = std::fs::File::open(path)?;
    load_zones_reader(file)
}

/// Like [`load_zones_csv`] but accepts any `Read` source.
pub fn load_zones_reader<R: Read>(reader: R) -> SpatialResult<Vec<GreenZone>> {
    let mut zones = Vec::new();
    let mut skipped = 0usize;

    for result in csv::Reader::from_reader(reader).deserialize::<ZoneRecord>() {
        let row = result.map_err(|e| SpatialError::Parse(e.to_string()))?;
        let Some(kind) = GreenZoneKind::from_osm_tags(
            row.leisure.as_deref(),
            row.landuse.as_deref(),
            row.natural.as_deref(),
        ) else {
            skipped += 1;
            continue;
        };
        let polygon = Polygon::new(parse_ring(&row.ring)?)?;
        zones.push(GreenZone {
            polygon,
            kind,
            name: row.name.filter(|n| !n.trim().is_empty()),
        });
    }

    if skipped > 0 {
        warn!(skipped, "zone rows without a green classification were ignored");
    }
    Ok(zones)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_ring(s: &str) -> SpatialResult<Vec<GeoPoint>> {
    s.split(';')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|vertex| {
            let mut parts = vertex.split_whitespace().map(str::parse::<f64>);
            match (parts.next(), parts.next(), parts.next()) {
                (Some(Ok(lat)), Some(Ok(lon)), None) => Ok(GeoPoint::checked(lat, lon)?),
                _ => Err(SpatialError::Parse(format!(
                    "invalid ring vertex {vertex:?}: expected \"lat lon\""
                ))),
            }
        })
        .collect()
}
