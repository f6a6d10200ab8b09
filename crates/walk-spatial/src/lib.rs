//! `walk-spatial` — walking network, green zones, and proximity weighting.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`network`]  | `WalkNetwork` (CSR + R-tree), `WalkNetworkBuilder`         |
//! | [`zones`]    | `GreenZone`, `GreenZoneKind`, `Polygon`                    |
//! | [`distance`] | `GeoDistance` trait, `Haversine`, `NearestZone`            |
//! | [`weights`]  | `WeightedGraph`, `GreenDiscount`, `adjust`                 |
//! | [`loader`]   | CSV readers for networks and green zones                   |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod distance;
pub mod error;
pub mod loader;
pub mod network;
pub mod weights;
pub mod zones;

#[cfg(test)]
mod tests;

pub use distance::{GeoDistance, Haversine, NearestZone};
pub use error::{SpatialError, SpatialResult};
pub use loader::{load_network_csv, load_network_reader, load_zones_csv, load_zones_reader, LoadedNetwork};
pub use network::{WalkNetwork, WalkNetworkBuilder};
pub use weights::{adjust, AdjustSummary, GreenDiscount, WeightedGraph};
pub use zones::{GreenZone, GreenZoneKind, Polygon};
