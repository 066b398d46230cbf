//! `streetcore-db` — the `StreetDatabase` query interface and its loaders.
//!
//! `streetcore-graph` never reads a file directly; it only ever talks to a
//! `&dyn StreetDatabase`. This crate owns every concrete way of producing
//! one.
//!
//! | Module      | Contents                                                |
//! |-------------|------------------------------------------------------------|
//! | [`traits`]  | `StreetDatabase`, `OsmTagDatabase`                          |
//! | [`records`] | `StreetSegmentInfo`                                         |
//! | [`csv_db`]  | `CsvStreetDatabase` — the reference in-memory implementation|
//! | [`tag_db`]  | `CsvTagDatabase` — the companion `OsmTagDatabase` for `load`  |
//! | [`osm_db`]  | (feature `osm`) OSM-PBF-backed implementation                |
//! | [`error`]   | `DbError`, `DbResult`                                        |

pub mod csv_db;
pub mod error;
pub mod records;
pub mod tag_db;
pub mod traits;

#[cfg(feature = "osm")]
pub mod osm_db;

pub use csv_db::CsvStreetDatabase;
pub use error::{DbError, DbResult};
pub use records::StreetSegmentInfo;
pub use tag_db::CsvTagDatabase;
pub use traits::{OsmTagDatabase, StreetDatabase};

#[cfg(feature = "osm")]
pub use osm_db::OsmStreetDatabase;
