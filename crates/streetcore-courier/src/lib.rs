//! `streetcore-courier` — the capacitated pickup-and-delivery planner (the
//! "traveling courier") built on top of `streetcore-graph`'s many-to-many
//! search.
//!
//! | Module            | Contents                                                |
//! |--------------------|---------------------------------------------------------|
//! | [`types`]          | `Delivery`, `Depot`, `RouteElement`, `CourierConfig`     |
//! | [`distance_table`] | Stage A — the all-pairs-of-interest distance table       |
//! | [`seed`]           | Stage B — greedy nearest-feasible seed construction       |
//! | [`local_search`]   | Stage C — block reinsertion, pair swap, simulated annealing|
//! | [`depot`]          | Stage D — depot attachment                                |
//! | [`planner`]        | Stage E and the public `traveling_courier` entry point    |
//! | [`route`]          | Converting a finished tour into `RouteElement`s            |
//! | [`stop`]           | The shared stop-list representation and feasibility checks |
//! | [`error`]          | `CourierError`, `CourierResult`                            |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                       |
//! |------------|----------------------------------------------------------------|
//! | `serde`    | Adds `Serialize`/`Deserialize` to the public types.            |
//! | `parallel` | Runs stage E's restart workers on Rayon's thread pool.         |

pub mod depot;
pub mod distance_table;
pub mod error;
pub mod local_search;
pub mod planner;
pub mod route;
pub mod seed;
pub mod stop;
pub mod types;

pub use error::{CourierError, CourierResult};
pub use planner::traveling_courier;
pub use types::{CourierConfig, Delivery, Depot, RouteElement};
