use thiserror::Error;

use walk_core::{NodeId, WalkError};
use walk_spatial::SpatialError;

/// Errors that abort a planning request.
///
/// "No route within budget" is not an error: it is reported as an `Ok`
/// response without a walk.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("request has no start coordinates")]
    MissingStart,

    #[error("start node {0} is not in the network")]
    StartNotInGraph(NodeId),

    #[error("distance budget {0} is not a number")]
    InvalidBudget(f64),

    #[error("invalid route: {0}")]
    InvalidRoute(String),

    #[error("planner configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Core(#[from] WalkError),
}

pub type PlanResult<T> = Result<T, PlanError>;
