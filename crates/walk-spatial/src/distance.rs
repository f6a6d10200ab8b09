//! Geo-distance provider trait and the default haversine implementation.
//!
//! # Pluggability
//!
//! The weight adjuster and the route scorer measure every distance through
//! [`GeoDistance`], so applications can swap in a projected-CRS or geodesic
//! implementation without touching the planner.

use walk_core::{GeoPoint, ZoneId};

use crate::GreenZone;

/// The zone closest to a query point.
#[derive(Debug, Clone, Copy)]
pub struct NearestZone<'z> {
    pub id:         ZoneId,
    pub zone:       &'z GreenZone,
    pub distance_m: f64,
}

impl NearestZone<'_> {
    #[inline]
    pub fn is_dog_park(&self) -> bool {
        self.zone.is_dog_park()
    }
}

/// Distance measurements on geographic coordinates.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so route scoring can share one
/// provider across Rayon worker threads.
pub trait GeoDistance: Send + Sync {
    /// Distance in metres between two points.
    fn distance(&self, a: GeoPoint, b: GeoPoint) -> f64;

    /// Distance in metres from `p` to `zone` (0 inside the zone).
    fn distance_to_zone(&self, p: GeoPoint, zone: &GreenZone) -> f64;

    /// Nearest zone to `p`, or `None` when `zones` is empty.
    ///
    /// Ties resolve to the first minimum in slice order, so the result is
    /// deterministic for a fixed zone ordering.
    fn nearest<'z>(&self, p: GeoPoint, zones: &'z [GreenZone]) -> Option<NearestZone<'z>> {
        let mut best: Option<NearestZone<'z>> = None;
        for (i, zone) in zones.iter().enumerate() {
            let d = self.distance_to_zone(p, zone);
            if best.is_none_or(|b| d < b.distance_m) {
                best = Some(NearestZone { id: ZoneId::from_index(i), zone, distance_m: d });
            }
        }
        best
    }
}

/// Great-circle point distances and local-plane point-to-polygon distances.
#[derive(Debug, Clone, Copy, Default)]
pub struct Haversine;

impl GeoDistance for Haversine {
    #[inline]
    fn distance(&self, a: GeoPoint, b: GeoPoint) -> f64 {
        a.distance_m(b)
    }

    #[inline]
    fn distance_to_zone(&self, p: GeoPoint, zone: &GreenZone) -> f64 {
        zone.polygon.distance_m(p)
    }
}
