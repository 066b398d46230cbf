//! The narrow, read-only query surface that `streetcore-graph` builds its
//! map index from.
//!
//! `StreetDatabase` is deliberately small: it exposes exactly the per-record
//! fields a map index needs to run its two load passes (see
//! `streetcore-graph::index`), and nothing about how those records got
//! there. Swapping the CSV loader for the OSM-PBF loader, or for an
//! in-memory fixture built by hand in a test, requires no change anywhere
//! else in the workspace.

use streetcore_core::{GeoPoint, IntersectionId, PoiId, SegmentId, StreetId};

use crate::records::StreetSegmentInfo;

/// Read-only access to a loaded street map's raw records.
///
/// All index arguments are assumed to be in `0..num_*()` — implementations
/// may panic (array-index style) rather than return a `Result` for
/// out-of-range input, since every caller in this workspace only ever
/// iterates indices it just asked `num_*()` for.
pub trait StreetDatabase {
    fn num_intersections(&self) -> usize;
    fn num_street_segments(&self) -> usize;
    fn num_streets(&self) -> usize;
    fn num_points_of_interest(&self) -> usize;

    /// Count of database-native features carried over from the source
    /// format (e.g. OSM ways tagged as parks, rivers, buildings). Not used
    /// for routing; exposed for completeness with the original interface.
    /// Implementations with no such concept (e.g. the CSV loader) return 0.
    fn num_features(&self) -> usize {
        0
    }

    fn intersection_position(&self, id: IntersectionId) -> GeoPoint;
    fn intersection_name(&self, id: IntersectionId) -> &str;
    fn intersection_street_segment_count(&self, id: IntersectionId) -> usize;
    fn intersection_street_segment(&self, id: IntersectionId, index: usize) -> SegmentId;

    fn info_street_segment(&self, id: SegmentId) -> StreetSegmentInfo;
    fn street_segment_curve_point(&self, id: SegmentId, index: usize) -> GeoPoint;
    fn street_name(&self, id: StreetId) -> &str;

    fn point_of_interest_position(&self, id: PoiId) -> GeoPoint;
    fn point_of_interest_name(&self, id: PoiId) -> &str;
    fn point_of_interest_type(&self, id: PoiId) -> &str;
}

/// A companion database of free-form `key=value` tags attached to street
/// segments, intersections, and points of interest (OSM calls these "tags";
/// e.g. `highway=residential`, `amenity=cafe`).
///
/// Loading a map couples a [`StreetDatabase`] with an `OsmTagDatabase`
/// sourced from the same file: if either half fails to parse, the whole
/// load is rolled back (see `streetcore::lifecycle`). Most callers never
/// touch this trait directly — it exists for tools that need the original
/// source tags rather than the normalized fields `StreetDatabase` exposes.
pub trait OsmTagDatabase {
    /// Number of tags attached to the given OSM entity id.
    fn tag_count(&self, entity_id: u64) -> usize;
    /// The `index`-th `(key, value)` tag pair for the given entity.
    fn tag(&self, entity_id: u64, index: usize) -> (&str, &str);
}
