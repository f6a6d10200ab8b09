//! Green zones: parks, gardens, nature reserves, and dog parks.
//!
//! A zone is a simple polygon (exterior ring only) with a classification.
//! Zones are loaded once and never mutated; the planner only reads them.

use walk_core::GeoPoint;

use crate::{SpatialError, SpatialResult};

// ── GreenZoneKind ─────────────────────────────────────────────────────────────

/// Classification of a green area, following the OpenStreetMap tags that
/// identify it.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GreenZoneKind {
    /// `leisure=park`
    Park,
    /// `leisure=garden`
    Garden,
    /// `leisure=nature_reserve`
    NatureReserve,
    /// `leisure=dog_park`
    DogPark,
    /// `landuse=forest`
    Forest,
    /// `landuse=village_green`
    VillageGreen,
    /// `landuse=grass`
    Grass,
    /// `natural=scrub`
    Scrub,
    /// `natural=heath`
    Heath,
}

impl GreenZoneKind {
    /// Classify a feature from its OSM `leisure`, `landuse` and `natural`
    /// tags.  Returns `None` for features that are not green areas.
    ///
    /// A `dog_park` value under any of the three keys wins; otherwise
    /// `leisure` takes precedence over `landuse`, which takes precedence over
    /// `natural`.
    pub fn from_osm_tags(
        leisure: Option<&str>,
        landuse: Option<&str>,
        natural: Option<&str>,
    ) -> Option<Self> {
        let tags = [leisure, landuse, natural];
        if tags.iter().flatten().any(|v| v.trim() == "dog_park") {
            return Some(GreenZoneKind::DogPark);
        }

        let from_leisure = leisure.and_then(|v| match v.trim() {
            "park"           => Some(GreenZoneKind::Park),
            "garden"         => Some(GreenZoneKind::Garden),
            "nature_reserve" => Some(GreenZoneKind::NatureReserve),
            _                => None,
        });
        let from_landuse = || landuse.and_then(|v| match v.trim() {
            "forest"        => Some(GreenZoneKind::Forest),
            "village_green" => Some(GreenZoneKind::VillageGreen),
            "grass"         => Some(GreenZoneKind::Grass),
            _               => None,
        });
        let from_natural = || natural.and_then(|v| match v.trim() {
            "scrub" => Some(GreenZoneKind::Scrub),
            "heath" => Some(GreenZoneKind::Heath),
            _       => None,
        });

        from_leisure.or_else(from_landuse).or_else(from_natural)
    }

    #[inline]
    pub fn is_dog_park(self) -> bool {
        matches!(self, GreenZoneKind::DogPark)
    }

    /// OSM tag value, useful for logging and output columns.
    pub fn as_str(self) -> &'static str {
        match self {
            GreenZoneKind::Park          => "park",
            GreenZoneKind::Garden        => "garden",
            GreenZoneKind::NatureReserve => "nature_reserve",
            GreenZoneKind::DogPark       => "dog_park",
            GreenZoneKind::Forest        => "forest",
            GreenZoneKind::VillageGreen  => "village_green",
            GreenZoneKind::Grass         => "grass",
            GreenZoneKind::Scrub         => "scrub",
            GreenZoneKind::Heath         => "heath",
        }
    }
}

impl std::fmt::Display for GreenZoneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Polygon ───────────────────────────────────────────────────────────────────

/// A simple polygon given by its exterior ring.
///
/// The ring is stored open: a closing vertex equal to the first one is
/// dropped on construction.  Deserialization goes through [`Polygon::new`],
/// so a decoded polygon satisfies the same checks; it is written as a bare
/// vertex list.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<GeoPoint>", into = "Vec<GeoPoint>"))]
pub struct Polygon {
    ring: Vec<GeoPoint>,
}

impl Polygon {
    /// Build a polygon from at least three distinct, finite vertices.
    pub fn new(mut ring: Vec<GeoPoint>) -> SpatialResult<Self> {
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        if ring.len() < 3 {
            return Err(SpatialError::InvalidPolygon(format!(
                "ring needs at least 3 vertices, got {}",
                ring.len()
            )));
        }
        if let Some(p) = ring.iter().find(|p| !p.lat.is_finite() || !p.lon.is_finite()) {
            return Err(SpatialError::InvalidPolygon(format!("non-finite vertex {p}")));
        }
        Ok(Self { ring })
    }

    /// Axis-aligned rectangle spanning two opposite corners.
    pub fn rectangle(south_west: GeoPoint, north_east: GeoPoint) -> SpatialResult<Self> {
        Self::new(vec![
            south_west,
            GeoPoint::new(south_west.lat, north_east.lon),
            north_east,
            GeoPoint::new(north_east.lat, south_west.lon),
        ])
    }

    pub fn vertices(&self) -> &[GeoPoint] {
        &self.ring
    }

    /// Even-odd ray casting in lat/lon space.  Points exactly on the boundary
    /// may land on either side; `distance_m` returns ~0 for them anyway.
    pub fn contains(&self, p: GeoPoint) -> bool {
        let mut inside = false;
        let n = self.ring.len();
        if n < 3 {
            return false;
        }
        let mut j = n - 1;
        for i in 0..n {
            let (a, b) = (self.ring[i], self.ring[j]);
            if (a.lat > p.lat) != (b.lat > p.lat) {
                let lon_at = a.lon + (p.lat - a.lat) * (b.lon - a.lon) / (b.lat - a.lat);
                if p.lon < lon_at {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Distance in metres from `p` to the polygon: 0 inside, otherwise the
    /// distance to the closest boundary segment.
    ///
    /// Segments are measured on a local plane centred at `p`.
    pub fn distance_m(&self, p: GeoPoint) -> f64 {
        if self.contains(p) {
            return 0.0;
        }
        let n = self.ring.len();
        if n == 0 {
            return f64::INFINITY;
        }
        (0..n)
            .map(|i| {
                let a = self.ring[i].project_m(p);
                let b = self.ring[(i + 1) % n].project_m(p);
                origin_to_segment(a, b)
            })
            .fold(f64::INFINITY, f64::min)
    }
}

impl TryFrom<Vec<GeoPoint>> for Polygon {
    type Error = SpatialError;

    fn try_from(ring: Vec<GeoPoint>) -> SpatialResult<Self> {
        Self::new(ring)
    }
}

impl From<Polygon> for Vec<GeoPoint> {
    fn from(p: Polygon) -> Self {
        p.ring
    }
}

/// Distance from the plane origin to segment `a`–`b`.
fn origin_to_segment(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len2 = dx * dx + dy * dy;
    let t = if len2 == 0.0 {
        0.0
    } else {
        (-(a.0 * dx + a.1 * dy) / len2).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
    (cx * cx + cy * cy).sqrt()
}

// ── GreenZone ─────────────────────────────────────────────────────────────────

/// A classified green area.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GreenZone {
    pub polygon: Polygon,
    pub kind:    GreenZoneKind,
    pub name:    Option<String>,
}

impl GreenZone {
    pub fn new(polygon: Polygon, kind: GreenZoneKind) -> Self {
        Self { polygon, kind, name: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[inline]
    pub fn is_dog_park(&self) -> bool {
        self.kind.is_dog_park()
    }
}
