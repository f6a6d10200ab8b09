//! Shared error type.
//!
//! Sub-crates define their own error enums and wrap `WalkError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// Errors produced by `walk-core` and reused by the other `walk-*` crates.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("invalid coordinate (lat {lat}, lon {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },
}

/// Shorthand result type for `walk-core`.
pub type WalkResult<T> = Result<T, WalkError>;
