//! `streetcore-graph` error type.

use thiserror::Error;

use streetcore_core::IntersectionId;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("no route from {from} to {to}")]
    NoRoute {
        from: IntersectionId,
        to: IntersectionId,
    },

    #[error("intersection {0} not found")]
    IntersectionNotFound(IntersectionId),

    #[error("empty map: no intersections to index")]
    EmptyMap,
}

pub type GraphResult<T> = Result<T, GraphError>;
