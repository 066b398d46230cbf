//! `streetcore-db` error type.

use thiserror::Error;

use streetcore_core::{IntersectionId, PoiId, SegmentId, StreetId};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("intersection {0} not found")]
    IntersectionNotFound(IntersectionId),

    #[error("street segment {0} not found")]
    SegmentNotFound(SegmentId),

    #[error("street {0} not found")]
    StreetNotFound(StreetId),

    #[error("point of interest {0} not found")]
    PoiNotFound(PoiId),

    #[error("malformed record: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "osm")]
    #[error("OSM parse error: {0}")]
    Osm(String),
}

pub type DbResult<T> = Result<T, DbError>;
