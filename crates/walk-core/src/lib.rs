//! `walk-core` — foundational types for the dog-walk route planner.
//!
//! This crate is a dependency of every other `walk-*` crate.  It has no
//! `walk-*` dependencies and only `thiserror` (plus optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                                  |
//! |-----------|-----------------------------------------------------------|
//! | [`ids`]   | `NodeId`, `EdgeId`, `ZoneId`                              |
//! | [`geo`]   | `GeoPoint`, haversine distance, local planar projection   |
//! | [`error`] | `WalkError`, `WalkResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{WalkError, WalkResult};
pub use geo::GeoPoint;
pub use ids::{EdgeId, NodeId, ZoneId};
