//! Geographic coordinate type and spatial utilities.
//!
//! `GeoPoint` uses `f64` latitude/longitude.  Green-zone thresholds are a few
//! metres wide, so single precision (≈ 1 m at the equator) is not enough.

use crate::{WalkError, WalkResult};

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Like [`new`](Self::new) but rejects non-finite or out-of-range values.
    pub fn checked(lat: f64, lon: f64) -> WalkResult<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(WalkError::InvalidCoordinate { lat, lon });
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(WalkError::InvalidCoordinate { lat, lon });
        }
        Ok(Self { lat, lon })
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Midpoint of the straight lat/lon segment between `self` and `other`.
    ///
    /// Street edges are tens of metres long, so the planar midpoint and the
    /// great-circle midpoint are indistinguishable at that scale.
    #[inline]
    pub fn midpoint(self, other: GeoPoint) -> GeoPoint {
        GeoPoint::new((self.lat + other.lat) * 0.5, (self.lon + other.lon) * 0.5)
    }

    /// Project onto a local equirectangular plane centred at `origin`.
    ///
    /// Returns `(east_m, north_m)`.  Error stays below 0.1 % within a few
    /// kilometres of the origin, which covers any walk.
    #[inline]
    pub fn project_m(self, origin: GeoPoint) -> (f64, f64) {
        let k = EARTH_RADIUS_M.to_radians();
        let east = (self.lon - origin.lon) * k * origin.lat.to_radians().cos();
        let north = (self.lat - origin.lat) * k;
        (east, north)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}
