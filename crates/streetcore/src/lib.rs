//! `streetcore` — the public facade: a single [`StreetMap`] handle over
//! map loading, graph queries, turn-penalized search, and the capacitated
//! traveling-courier planner.
//!
//! | Module       | Contents                                                 |
//! |--------------|-----------------------------------------------------------|
//! | [`lifecycle`]| `StreetMap` — `new`/`load`/`close`/`is_loaded`              |
//! | [`query`]    | The public query surface, as `StreetMap` methods            |
//! | [`error`]    | `StreetCoreError`, `StreetCoreResult`                      |
//!
//! ## Features
//! - `serde`: derive `Serialize`/`Deserialize` on the sub-crates' value types.
//! - `parallel`: run the courier planner's restart workers across a rayon
//!   thread pool instead of sequentially.
//! - `osm`: load a `StreetMap` from OSM PBF extracts instead of CSV.

pub mod error;
pub mod lifecycle;
pub mod query;

pub use error::{StreetCoreError, StreetCoreResult};
pub use lifecycle::StreetMap;
pub use streetcore_courier::{CourierConfig, Delivery, Depot, RouteElement};
pub use streetcore_graph::SearchConfig;
