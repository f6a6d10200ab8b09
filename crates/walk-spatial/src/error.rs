//! Spatial-subsystem error type.

use thiserror::Error;

use walk_core::{EdgeId, NodeId, WalkError};

/// Errors produced by `walk-spatial`.
///
/// Every variant is a configuration error: the network, zone set, or
/// discount parameters are unusable and planning must not proceed.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("network has no nodes")]
    EmptyNetwork,

    #[error("edge {edge} has non-positive weight {weight}")]
    NonPositiveWeight { edge: EdgeId, weight: f64 },

    #[error("invalid green-zone polygon: {0}")]
    InvalidPolygon(String),

    #[error("invalid green discount: {0}")]
    InvalidDiscount(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Core(#[from] WalkError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
