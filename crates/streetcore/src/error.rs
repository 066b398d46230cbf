use thiserror::Error;

/// Aggregates the sub-crates' error types, matching how `dt-core::DtError`
/// is positioned as a common base other `dt-*` crates wrap.
///
/// Most of the public surface never returns this directly — query
/// misuse is undefined behavior in the source spec, implemented here as a
/// validated, loud [`GraphError`] rather than UB, and "no route" / "no
/// feasible courier route" are signaled by an empty result, never an error.
#[derive(Debug, Error)]
pub enum StreetCoreError {
    #[error(transparent)]
    Db(#[from] streetcore_db::DbError),

    #[error(transparent)]
    Graph(#[from] streetcore_graph::GraphError),
}

pub type StreetCoreResult<T> = Result<T, StreetCoreError>;
