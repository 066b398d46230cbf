//! `streetcore-graph` — the map index, turn-penalty A* search, and
//! many-to-many search built from a [`streetcore_db::StreetDatabase`].
//!
//! | Module          | Contents                                               |
//! |-----------------|------------------------------------------------------------|
//! | [`index`]       | `MapIndex` — CSR adjacency, street aggregates, spatial index|
//! | [`trie`]        | `NameTrie` — case-insensitive street-name prefix search     |
//! | [`turn`]        | `find_turn_type`, the turn-classification geometry           |
//! | [`search`]      | `find_path_between_intersections`, `compute_path_travel_time`|
//! | [`multi_source`]| `many_to_many` — the distance-table search                  |
//! | [`error`]       | `GraphError`, `GraphResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                               |
//! |---------|-------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.   |

pub mod error;
pub mod index;
pub mod multi_source;
pub mod search;
pub mod trie;
pub mod turn;

pub use error::{GraphError, GraphResult};
pub use index::{distance_m, MapIndex, SegmentGeom};
pub use multi_source::many_to_many;
pub use search::{compute_path_travel_time, find_path_between_intersections, PathResult, SearchConfig};
pub use turn::find_turn_type;
