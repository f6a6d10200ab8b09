//! Unit tests for walk-spatial.
//!
//! All tests use hand-crafted networks and zones so they run without any
//! external data.

#[cfg(test)]
mod helpers {
    use std::sync::Arc;

    use walk_core::{GeoPoint, NodeId};

    use crate::{GreenZone, GreenZoneKind, Polygon, WalkNetwork, WalkNetworkBuilder, WeightedGraph};

    /// Metres per degree of latitude on the haversine sphere.
    pub const M_PER_DEG: f64 = 111_194.93;

    /// Small grid network for testing.
    ///
    /// Nodes (lat, lon):
    ///   0:(42.000,-3.700)  1:(42.000,-3.699)  2:(42.000,-3.698)
    ///   3:(42.001,-3.700)                     4:(42.001,-3.698)
    ///
    /// Undirected edges, in insertion order: 0-1, 1-2, 0-3, 2-4, 3-4
    pub fn grid_network() -> (WalkNetwork, [NodeId; 5]) {
        let mut b = WalkNetworkBuilder::new();

        let n0 = b.add_node(GeoPoint::new(42.000, -3.700));
        let n1 = b.add_node(GeoPoint::new(42.000, -3.699));
        let n2 = b.add_node(GeoPoint::new(42.000, -3.698));
        let n3 = b.add_node(GeoPoint::new(42.001, -3.700));
        let n4 = b.add_node(GeoPoint::new(42.001, -3.698));

        b.add_edge(n0, n1, 83.0).unwrap();
        b.add_edge(n1, n2, 83.0).unwrap();
        b.add_edge(n0, n3, 111.0).unwrap();
        b.add_edge(n2, n4, 111.0).unwrap();
        b.add_edge(n3, n4, 166.0).unwrap();

        (b.build(), [n0, n1, n2, n3, n4])
    }

    pub fn weighted(net: WalkNetwork) -> WeightedGraph {
        WeightedGraph::new(Arc::new(net)).unwrap()
    }

    /// Axis-aligned zone given by its south-west and north-east corners.
    pub fn rect(sw: (f64, f64), ne: (f64, f64), kind: GreenZoneKind) -> GreenZone {
        let polygon = Polygon::rectangle(GeoPoint::new(sw.0, sw.1), GeoPoint::new(ne.0, ne.1)).unwrap();
        GreenZone::new(polygon, kind)
    }

    /// One ~99 m edge along lat 42.0 with midpoint at (42.0, -3.6994).
    pub fn single_edge() -> WalkNetwork {
        let mut b = WalkNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(42.0, -3.7000));
        let c = b.add_node(GeoPoint::new(42.0, -3.6988));
        b.add_edge(a, c, 99.0).unwrap();
        b.build()
    }
}

// ── Builder & network structure ───────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use walk_core::{EdgeId, GeoPoint, NodeId};

    use crate::{SpatialError, WalkNetworkBuilder};

    #[test]
    fn empty_build() {
        let net = WalkNetworkBuilder::new().build();
        assert_eq!(net.node_count(), 0);
        assert_eq!(net.edge_count(), 0);
        assert!(net.is_empty());
    }

    #[test]
    fn undirected_edge_visible_from_both_ends() {
        let mut b = WalkNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(42.0, -3.7));
        let c = b.add_node(GeoPoint::new(42.001, -3.7));
        let e = b.add_edge(a, c, 111.0).unwrap();
        let net = b.build();
        assert_eq!(net.edge_count(), 1);
        assert_eq!(net.neighbors(a).collect::<Vec<_>>(), vec![(c, e)]);
        assert_eq!(net.neighbors(c).collect::<Vec<_>>(), vec![(a, e)]);
    }

    #[test]
    fn csr_degrees() {
        let (net, [n0, n1, n2, n3, n4]) = super::helpers::grid_network();
        assert_eq!(net.degree(n0), 2); // n1, n3
        assert_eq!(net.degree(n1), 2); // n0, n2
        assert_eq!(net.degree(n2), 2); // n1, n4
        assert_eq!(net.degree(n3), 2); // n0, n4
        assert_eq!(net.degree(n4), 2); // n2, n3
    }

    #[test]
    fn neighbours_keep_insertion_order() {
        let (net, [n0, n1, _, n3, _]) = super::helpers::grid_network();
        let order: Vec<NodeId> = net.neighbors(n0).map(|(n, _)| n).collect();
        assert_eq!(order, vec![n1, n3]);
    }

    #[test]
    fn edges_iterator_and_endpoints() {
        let (net, [n0, n1, ..]) = super::helpers::grid_network();
        let first = net.edges().next().unwrap();
        assert_eq!(first, (EdgeId(0), n0, n1, 83.0));
        assert_eq!(net.endpoints(EdgeId(0)), (n0, n1));
        assert_eq!(net.base_weight(EdgeId(4)), 166.0);
    }

    #[test]
    fn edge_to_unknown_node_is_rejected() {
        let mut b = WalkNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let err = b.add_edge(a, NodeId(9), 10.0).unwrap_err();
        assert!(matches!(err, SpatialError::NodeNotFound(NodeId(9))));
    }

    #[test]
    fn position_lookup() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        assert_eq!(net.position(n0).unwrap(), GeoPoint::new(42.0, -3.7));
        assert!(net.position(NodeId(99)).is_err());
    }
}

// ── Spatial snap ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod snap {
    use walk_core::GeoPoint;

    use crate::WalkNetworkBuilder;

    #[test]
    fn snap_exact_position() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        assert_eq!(net.snap_to_node(GeoPoint::new(42.0, -3.7)), Some(n0));
    }

    #[test]
    fn snap_nearest() {
        let (net, [n0, n1, ..]) = super::helpers::grid_network();
        assert_eq!(net.snap_to_node(GeoPoint::new(42.0, -3.6996)), Some(n0));
        assert_eq!(net.snap_to_node(GeoPoint::new(42.0, -3.6994)), Some(n1));
    }

    #[test]
    fn snap_measures_in_metres() {
        // 0.0007° north of n0 is ~78 m; 0.0009° east is ~74 m.
        let mut b = WalkNetworkBuilder::new();
        let north = b.add_node(GeoPoint::new(42.0007, -3.7000));
        let east = b.add_node(GeoPoint::new(42.0000, -3.6991));
        let net = b.build();
        let p = GeoPoint::new(42.0, -3.7);
        assert!(p.distance_m(GeoPoint::new(42.0000, -3.6991)) < p.distance_m(GeoPoint::new(42.0007, -3.7000)));
        assert_eq!(net.snap_to_node(p), Some(east));
        assert_ne!(net.snap_to_node(p), Some(north));
    }

    #[test]
    fn empty_network_returns_none() {
        let net = WalkNetworkBuilder::new().build();
        assert!(net.snap_to_node(GeoPoint::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn k_nearest_order() {
        let (net, nodes) = super::helpers::grid_network();
        let nearest = net.k_nearest_nodes(GeoPoint::new(42.0, -3.7), 2);
        assert_eq!(nearest[0], nodes[0]); // exact
        // 0.001° of longitude (~83 m) is shorter than 0.001° of latitude (~111 m).
        assert_eq!(nearest[1], nodes[1]);
    }
}

// ── Zones & polygons ──────────────────────────────────────────────────────────

#[cfg(test)]
mod zones {
    use walk_core::GeoPoint;

    use super::helpers::{rect, M_PER_DEG};
    use crate::{GreenZoneKind, Polygon, SpatialError};

    #[test]
    fn osm_classification() {
        use GreenZoneKind::*;
        assert_eq!(GreenZoneKind::from_osm_tags(Some("park"), None, None), Some(Park));
        assert_eq!(GreenZoneKind::from_osm_tags(Some("garden"), None, None), Some(Garden));
        assert_eq!(GreenZoneKind::from_osm_tags(None, Some("grass"), None), Some(Grass));
        assert_eq!(GreenZoneKind::from_osm_tags(None, None, Some("heath")), Some(Heath));
        assert_eq!(GreenZoneKind::from_osm_tags(Some("pitch"), Some("retail"), None), None);
        // dog_park under any key wins.
        assert_eq!(GreenZoneKind::from_osm_tags(Some("park"), Some("dog_park"), None), Some(DogPark));
        // leisure beats landuse.
        assert_eq!(GreenZoneKind::from_osm_tags(Some("nature_reserve"), Some("forest"), None), Some(NatureReserve));
    }

    #[test]
    fn closing_vertex_is_dropped() {
        let a = GeoPoint::new(0.0, 0.0);
        let p = Polygon::new(vec![a, GeoPoint::new(0.0, 1.0), GeoPoint::new(1.0, 1.0), a]).unwrap();
        assert_eq!(p.vertices().len(), 3);
    }

    #[test]
    fn degenerate_polygon_rejected() {
        let err = Polygon::new(vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0)]).unwrap_err();
        assert!(matches!(err, SpatialError::InvalidPolygon(_)));
    }

    #[test]
    fn vertex_list_conversion_validates() {
        let err = Polygon::try_from(Vec::new()).unwrap_err();
        assert!(matches!(err, SpatialError::InvalidPolygon(_)));

        let ring = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0), GeoPoint::new(1.0, 1.0)];
        let p = Polygon::try_from(ring.clone()).unwrap();
        assert_eq!(Vec::<GeoPoint>::from(p), ring);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn decoding_rejects_empty_ring() {
        use crate::GreenZone;

        let bad = r#"{"polygon":[],"kind":"Park","name":null}"#;
        assert!(serde_json::from_str::<GreenZone>(bad).is_err());

        let z = rect((42.0, -3.70), (42.01, -3.69), GreenZoneKind::DogPark);
        let json = serde_json::to_string(&z).unwrap();
        let back: GreenZone = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind, GreenZoneKind::DogPark);
        assert_eq!(back.polygon.vertices().len(), 4);
        assert_eq!(back.polygon.distance_m(GeoPoint::new(42.005, -3.695)), 0.0);
    }

    #[test]
    fn inside_is_zero_distance() {
        let z = rect((42.0, -3.70), (42.01, -3.69), GreenZoneKind::Park);
        assert!(z.polygon.contains(GeoPoint::new(42.005, -3.695)));
        assert_eq!(z.polygon.distance_m(GeoPoint::new(42.005, -3.695)), 0.0);
    }

    #[test]
    fn outside_distance_to_nearest_side() {
        let z = rect((42.0, -3.70), (42.01, -3.69), GreenZoneKind::Park);
        // 0.001° south of the southern side, within its longitude span.
        let p = GeoPoint::new(41.999, -3.695);
        assert!(!z.polygon.contains(p));
        let d = z.polygon.distance_m(p);
        assert!((d - 0.001 * M_PER_DEG).abs() < 0.5, "got {d}");
    }

    #[test]
    fn outside_distance_to_corner() {
        let z = rect((42.0, -3.70), (42.01, -3.69), GreenZoneKind::Park);
        let corner = GeoPoint::new(42.0, -3.70);
        let p = GeoPoint::new(41.999, -3.701);
        let d = z.polygon.distance_m(p);
        assert!((d - p.distance_m(corner)).abs() < 0.5, "got {d}");
    }
}

// ── Geo-distance provider ─────────────────────────────────────────────────────

#[cfg(test)]
mod distance {
    use walk_core::{GeoPoint, ZoneId};

    use super::helpers::rect;
    use crate::{GeoDistance, GreenZoneKind, Haversine};

    #[test]
    fn nearest_picks_closest() {
        let zones = vec![
            rect((42.01, -3.70), (42.02, -3.69), GreenZoneKind::Park),
            rect((42.001, -3.70), (42.002, -3.69), GreenZoneKind::DogPark),
        ];
        let n = Haversine.nearest(GeoPoint::new(42.0, -3.695), &zones).unwrap();
        assert_eq!(n.id, ZoneId(1));
        assert!(n.is_dog_park());
    }

    #[test]
    fn ties_resolve_to_first_zone() {
        let a = rect((42.001, -3.70), (42.002, -3.69), GreenZoneKind::Park);
        let b = rect((42.001, -3.70), (42.002, -3.69), GreenZoneKind::DogPark);
        let zones = [a, b];
        let n = Haversine.nearest(GeoPoint::new(42.0, -3.695), &zones).unwrap();
        assert_eq!(n.id, ZoneId(0));
        assert!(!n.is_dog_park());
    }

    #[test]
    fn no_zones_no_nearest() {
        assert!(Haversine.nearest(GeoPoint::new(0.0, 0.0), &[]).is_none());
    }
}

// ── Weighted graph & adjuster ─────────────────────────────────────────────────

#[cfg(test)]
mod weights {
    use std::sync::Arc;

    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use walk_core::{EdgeId, GeoPoint, NodeId};

    use super::helpers::{grid_network, rect, single_edge, weighted, M_PER_DEG};
    use crate::{
        adjust, GreenDiscount, GreenZoneKind, Haversine, SpatialError, WalkNetworkBuilder,
        WeightedGraph,
    };

    fn discount() -> GreenDiscount {
        GreenDiscount {
            distance_threshold_m:     10.0,
            discount_factor:          0.5,
            dog_park_discount_factor: 0.8,
        }
    }

    #[test]
    fn starts_at_base_weight() {
        let g = weighted(grid_network().0);
        for (e, _, _, base) in g.network().edges() {
            assert_eq!(g.effective_weight(e), base);
        }
    }

    #[test]
    fn empty_network_rejected() {
        let err = WeightedGraph::new(Arc::new(WalkNetworkBuilder::new().build())).err().unwrap();
        assert!(matches!(err, SpatialError::EmptyNetwork));
    }

    #[test]
    fn zero_weight_rejected() {
        let mut b = WalkNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.001));
        b.add_edge(a, c, 100.0).unwrap();
        b.add_edge(c, a, 0.0).unwrap();
        let err = WeightedGraph::new(Arc::new(b.build())).err().unwrap();
        assert!(matches!(err, SpatialError::NonPositiveWeight { edge: EdgeId(1), .. }));
    }

    #[test]
    fn dog_park_factor_when_dog_park_is_nearest() {
        // Dog park 5 m north of the midpoint, ordinary park 50 m south.
        let dog_park_south_edge = 42.0 + 5.0 / M_PER_DEG;
        let park_north_edge = 42.0 - 50.0 / M_PER_DEG;
        let zones = vec![
            rect((42.0 - 0.001, -3.6996), (park_north_edge, -3.6992), GreenZoneKind::Park),
            rect((dog_park_south_edge, -3.6996), (42.0 + 0.001, -3.6992), GreenZoneKind::DogPark),
        ];
        let mut g = weighted(single_edge());
        let summary = adjust(&mut g, &zones, &discount(), &Haversine).unwrap();
        assert_eq!(summary.dog_park_discounted, 1);
        assert_eq!(summary.park_discounted, 0);
        assert!((g.effective_weight(EdgeId(0)) - 99.0 * 0.8).abs() < 1e-9);
    }

    #[test]
    fn park_factor_when_ordinary_park_is_nearest() {
        let zones = vec![rect((42.0 + 3.0 / M_PER_DEG, -3.6996), (42.001, -3.6992), GreenZoneKind::Garden)];
        let mut g = weighted(single_edge());
        adjust(&mut g, &zones, &discount(), &Haversine).unwrap();
        assert!((g.effective_weight(EdgeId(0)) - 99.0 * 0.5).abs() < 1e-9);
    }

    #[test]
    fn distant_zone_leaves_base_weight() {
        let zones = vec![rect((42.0 + 20.0 / M_PER_DEG, -3.6996), (42.001, -3.6992), GreenZoneKind::DogPark)];
        let mut g = weighted(single_edge());
        let summary = adjust(&mut g, &zones, &discount(), &Haversine).unwrap();
        assert_eq!(summary.dog_park_discounted + summary.park_discounted, 0);
        assert_eq!(g.effective_weight(EdgeId(0)), 99.0);
    }

    #[test]
    fn adjust_twice_equals_once() {
        let zones = vec![rect((41.9995, -3.7005), (42.0005, -3.6985), GreenZoneKind::Park)];
        let mut g = weighted(grid_network().0);
        adjust(&mut g, &zones, &discount(), &Haversine).unwrap();
        let once = g.effective_weights().to_vec();
        adjust(&mut g, &zones, &discount(), &Haversine).unwrap();
        assert_eq!(g.effective_weights(), once.as_slice());
    }

    #[test]
    fn readjust_with_other_parameters_starts_from_base() {
        let zones = vec![rect((41.9995, -3.7005), (42.0005, -3.6985), GreenZoneKind::Park)];
        let mut g = weighted(grid_network().0);
        adjust(&mut g, &zones, &discount(), &Haversine).unwrap();
        let gentle = GreenDiscount { discount_factor: 0.9, ..discount() };
        adjust(&mut g, &zones, &gentle, &Haversine).unwrap();
        // Edge 0-1 lies inside the park.
        assert!((g.effective_weight(EdgeId(0)) - 83.0 * 0.9).abs() < 1e-9);
    }

    #[test]
    fn invalid_discount_rejected() {
        let mut g = weighted(single_edge());
        for bad in [
            GreenDiscount { discount_factor: 0.0, ..discount() },
            GreenDiscount { dog_park_discount_factor: 1.5, ..discount() },
            GreenDiscount { distance_threshold_m: -1.0, ..discount() },
            GreenDiscount { distance_threshold_m: f64::NAN, ..discount() },
        ] {
            let err = adjust(&mut g, &[], &bad, &Haversine).unwrap_err();
            assert!(matches!(err, SpatialError::InvalidDiscount(_)));
        }
    }

    #[test]
    fn sessions_do_not_share_weights() {
        let zones = vec![rect((41.9995, -3.7005), (42.0005, -3.6985), GreenZoneKind::Park)];
        let base = weighted(grid_network().0);
        let mut a = base.clone();
        adjust(&mut a, &zones, &discount(), &Haversine).unwrap();
        assert!(a.effective_weight(EdgeId(0)) < base.effective_weight(EdgeId(0)));
        assert!(Arc::ptr_eq(a.shared_network(), base.shared_network()));
    }

    #[test]
    fn path_length_sums_effective_weights() {
        let (net, [n0, n1, n2, n3, n4]) = grid_network();
        let g = weighted(net);
        assert_eq!(g.path_length(&[n0, n1, n2, n4, n3, n0]), Some(83.0 + 83.0 + 111.0 + 166.0 + 111.0));
        assert_eq!(g.path_length(&[n0, n2]), None);
        assert_eq!(g.edge_between(n1, NodeId(77)), None);
    }

    #[test]
    fn effective_never_exceeds_base_on_random_graphs() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..20 {
            let mut b = WalkNetworkBuilder::new();
            let nodes: Vec<NodeId> = (0..12)
                .map(|_| b.add_node(GeoPoint::new(42.0 + rng.gen_range(0.0..0.002), -3.7 + rng.gen_range(0.0..0.002))))
                .collect();
            for _ in 0..25 {
                let (x, y) = (rng.gen_range(0..nodes.len()), rng.gen_range(0..nodes.len()));
                b.add_edge(nodes[x], nodes[y], rng.gen_range(1.0..300.0)).unwrap();
            }
            let zones: Vec<_> = (0..3)
                .map(|i| {
                    let lat = 42.0 + rng.gen_range(0.0..0.002);
                    let lon = -3.7 + rng.gen_range(0.0..0.002);
                    let kind = if i == 0 { GreenZoneKind::DogPark } else { GreenZoneKind::Park };
                    rect((lat, lon), (lat + 0.0003, lon + 0.0003), kind)
                })
                .collect();
            let mut g = weighted(b.build());
            let d = GreenDiscount {
                distance_threshold_m:     rng.gen_range(0.0..80.0),
                discount_factor:          rng.gen_range(0.05..=1.0),
                dog_park_discount_factor: rng.gen_range(0.05..=1.0),
            };
            adjust(&mut g, &zones, &d, &Haversine).unwrap();
            for (e, _, _, base) in g.network().edges() {
                let w = g.effective_weight(e);
                assert!(w > 0.0 && w <= base, "edge {e}: {w} vs base {base}");
            }
            g.check_positive().unwrap();
        }
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use walk_core::EdgeId;

    use crate::{load_network_reader, load_zones_reader, GreenZoneKind, SpatialError};

    const NODES: &str = "id,lat,lon\n101,42.0,-3.7\n102,42.001,-3.7\n103,42.001,-3.699\n";

    #[test]
    fn network_with_missing_length() {
        let edges = "u,v,length_m\n101,102,120.5\n102,103,\n";
        let loaded = load_network_reader(Cursor::new(NODES), Cursor::new(edges)).unwrap();
        assert_eq!(loaded.network.node_count(), 3);
        assert_eq!(loaded.network.edge_count(), 2);
        assert_eq!(loaded.network.base_weight(EdgeId(0)), 120.5);
        // Derived from haversine: ~0.001° of longitude at 42° N ≈ 82.6 m.
        let derived = loaded.network.base_weight(EdgeId(1));
        assert!((derived - 82.6).abs() < 1.0, "got {derived}");
        let n = loaded.node_for(103).unwrap();
        assert_eq!(loaded.external_ids[n.index()], 103);
    }

    #[test]
    fn edge_to_unknown_node() {
        let edges = "u,v,length_m\n101,999,10\n";
        let err = load_network_reader(Cursor::new(NODES), Cursor::new(edges)).err().unwrap();
        assert!(matches!(err, SpatialError::Parse(_)));
    }

    #[test]
    fn zones_are_classified_and_unknown_rows_skipped() {
        let csv = "name,leisure,landuse,natural,ring\n\
                   Parque,park,,,42.0 -3.7;42.001 -3.7;42.001 -3.699\n\
                   Pipican,dog_park,,,42.0 -3.7;42.0005 -3.7;42.0005 -3.6995\n\
                   Mall,,retail,,42.0 -3.7;42.001 -3.7;42.001 -3.699\n";
        let zones = load_zones_reader(Cursor::new(csv)).unwrap();
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].kind, GreenZoneKind::Park);
        assert_eq!(zones[0].name.as_deref(), Some("Parque"));
        assert!(zones[1].is_dog_park());
    }

    #[test]
    fn malformed_ring() {
        let csv = "name,leisure,landuse,natural,ring\nX,park,,,42.0;42.001 -3.7;1 2\n";
        assert!(matches!(load_zones_reader(Cursor::new(csv)), Err(SpatialError::Parse(_))));
    }
}
