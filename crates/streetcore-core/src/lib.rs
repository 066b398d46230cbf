//! `streetcore-core` — foundational types for the `streetcore` routing workspace.
//!
//! This crate is a dependency of every other `streetcore-*` crate. It
//! intentionally has no `streetcore-*` dependencies and minimal external ones
//! (only `rand` and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                  |
//! |--------------|-------------------------------------------------------------|
//! | [`ids`]      | `IntersectionId`, `SegmentId`, `StreetId`, `PoiId`           |
//! | [`geo`]      | `GeoPoint`, `Projector`, turn-direction classification       |
//! | [`deadline`] | `Deadline`, a wall-clock budget for the courier planner      |
//! | [`rng`]      | `PlannerRng` (global), `WorkerRng` (per restart worker)      |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                               |
//! |---------|-------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.   |

pub mod deadline;
pub mod geo;
pub mod ids;
pub mod rng;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use deadline::Deadline;
pub use geo::{classify_turn_vectors, pairwise_distance_m, GeoPoint, Projector, TurnDirection};
pub use ids::{IntersectionId, PoiId, SegmentId, StreetId};
pub use rng::{PlannerRng, WorkerRng};
