//! The map index: everything derived from a [`StreetDatabase`] once, at load
//! time, so that routing and lookup queries never touch the database again.
//!
//! # Data layout
//!
//! Outgoing travel from an intersection is stored in **Compressed Sparse
//! Row** form, same as a conventional CSR graph: given `IntersectionId n`,
//! its outgoing directed edges occupy
//!
//! ```text
//! out_segment[ out_start[n] .. out_start[n+1] ]
//! ```
//!
//! and the parallel arrays `out_forward`, `out_to`, `out_travel_time_s` give
//! the rest of each edge's data at the same index. A directed edge always
//! corresponds to one [`SegmentId`]; `out_forward[e]` says whether it is
//! travelled from the segment's `from` end to its `to` end, or the reverse
//! (only possible when the segment is not one-way).
//!
//! Pass 2 (which segment is outgoing from which intersection) is delegated
//! entirely to `streetcore-db`'s [`StreetDatabase::intersection_street_segment`]
//! — the database already resolved the one-way adjacency rule while
//! loading. This module's own job is Pass 1 (derive segment length and
//! travel time from geometry) plus the aggregates and spatial indexes that
//! make querying cheap afterwards.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use streetcore_core::{pairwise_distance_m, GeoPoint, IntersectionId, PoiId, Projector, SegmentId, StreetId};
use streetcore_db::{StreetDatabase, StreetSegmentInfo};

use crate::error::{GraphError, GraphResult};
use crate::trie::NameTrie;

/// Sentinel for "no directed edge" in scratch arrays — mirrors the
/// `INVALID`-sentinel convention the typed ids use, kept as a bare `usize`
/// here since directed-edge indices never leave this crate.
pub(crate) const NO_EDGE: usize = usize::MAX;

/// Static geometry and attributes of one street segment, derived once at
/// load time from its [`StreetSegmentInfo`] and curve points.
#[derive(Clone, Debug)]
pub struct SegmentGeom {
    pub from: IntersectionId,
    pub to: IntersectionId,
    pub one_way: bool,
    pub speed_limit_kmh: f64,
    pub street_id: StreetId,
    pub curve_points: Vec<GeoPoint>,
    pub length_m: f64,
    pub travel_time_s: f64,
}

impl SegmentGeom {
    /// The full ordered polyline from `from` to `to`, endpoints included.
    pub fn polyline(&self, from_pos: GeoPoint, to_pos: GeoPoint) -> Vec<GeoPoint> {
        let mut pts = Vec::with_capacity(self.curve_points.len() + 2);
        pts.push(from_pos);
        pts.extend_from_slice(&self.curve_points);
        pts.push(to_pos);
        pts
    }
}

// ── R-tree entries ──────────────────────────────────────────────────────────

struct IntersectionEntry {
    point: [f64; 2],
    id: IntersectionId,
}

impl RTreeObject for IntersectionEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for IntersectionEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

struct PoiEntry {
    point: [f64; 2],
    id: PoiId,
}

impl RTreeObject for PoiEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for PoiEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── MapIndex ──────────────────────────────────────────────────────────────────

/// Everything derived from a loaded street map. Immutable once built, so a
/// single `MapIndex` can be shared (e.g. behind an `Arc`) across as many
/// concurrent readers as the caller likes — see the crate's concurrency
/// notes in the `streetcore` facade.
pub struct MapIndex {
    // ── Intersections ─────────────────────────────────────────────────────
    pub(crate) intersection_pos: Vec<GeoPoint>,
    intersection_names: Vec<String>,

    // ── CSR outgoing-travel adjacency ─────────────────────────────────────
    pub(crate) out_start: Vec<u32>,
    pub(crate) out_segment: Vec<SegmentId>,
    pub(crate) out_forward: Vec<bool>,
    pub(crate) out_to: Vec<IntersectionId>,
    pub(crate) out_travel_time_s: Vec<f64>,

    // ── Segments ───────────────────────────────────────────────────────────
    pub(crate) segments: Vec<SegmentGeom>,

    // ── Streets ────────────────────────────────────────────────────────────
    street_names: Vec<String>,
    street_segments: Vec<Vec<SegmentId>>,
    street_length_m: Vec<f64>,

    // ── Points of interest ─────────────────────────────────────────────────
    poi_pos: Vec<GeoPoint>,
    poi_name: Vec<String>,
    poi_type: Vec<String>,

    // ── Derived indexes ────────────────────────────────────────────────────
    trie: NameTrie,
    pub(crate) projector: Projector,
    intersection_rtree: RTree<IntersectionEntry>,
    poi_rtree: RTree<PoiEntry>,

    /// Fastest posted speed limit anywhere on the map, used to keep the A*
    /// heuristic admissible (see `search::heuristic_time_s`).
    pub(crate) max_speed_kmh: f64,
}

impl MapIndex {
    /// Build a `MapIndex` from a loaded [`StreetDatabase`].
    ///
    /// Time complexity: O(S log S) to sort streets' segment lists for
    /// display stability, plus O(N log N) for the two R-tree bulk loads,
    /// where S = segment count, N = intersection/POI count.
    pub fn build(db: &dyn StreetDatabase) -> GraphResult<Self> {
        let n = db.num_intersections();
        if n == 0 {
            return Err(GraphError::EmptyMap);
        }

        // ── Intersections ──────────────────────────────────────────────
        let mut intersection_pos = Vec::with_capacity(n);
        let mut intersection_names = Vec::with_capacity(n);
        for i in 0..n {
            let id = IntersectionId(i as u32);
            intersection_pos.push(db.intersection_position(id));
            intersection_names.push(db.intersection_name(id).to_string());
        }

        // Index-building reference latitude: mean of the whole map's
        // latitude bounds, fixed once so every length computed against this
        // MapIndex stays mutually consistent.
        let (min_lat, max_lat) = intersection_pos.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), p| (lo.min(p.lat), hi.max(p.lat)),
        );
        let projector = Projector::from_bounds(min_lat, max_lat);

        // ── Pass 1: segment geometry, length, travel time ────────────────
        let num_segments = db.num_street_segments();
        let mut segments = Vec::with_capacity(num_segments);
        for i in 0..num_segments {
            let seg_id = SegmentId(i as u32);
            let info: StreetSegmentInfo = db.info_street_segment(seg_id);
            let curve_points: Vec<GeoPoint> = (0..info.num_curve_points)
                .map(|j| db.street_segment_curve_point(seg_id, j))
                .collect();

            let from_pos = intersection_pos[info.from.index()];
            let to_pos = intersection_pos[info.to.index()];
            let mut length_m = 0.0;
            let mut prev = from_pos;
            for &p in &curve_points {
                length_m += projector.distance_m(prev, p);
                prev = p;
            }
            length_m += projector.distance_m(prev, to_pos);

            let speed_mps = info.speed_limit_kmh * 1000.0 / 3600.0;
            let travel_time_s = if speed_mps > 0.0 { length_m / speed_mps } else { 0.0 };

            segments.push(SegmentGeom {
                from: info.from,
                to: info.to,
                one_way: info.one_way,
                speed_limit_kmh: info.speed_limit_kmh,
                street_id: info.street_id,
                curve_points,
                length_m,
                travel_time_s,
            });
        }

        // ── Street aggregates ─────────────────────────────────────────────
        let num_streets = db.num_streets();
        let mut street_names = Vec::with_capacity(num_streets);
        for i in 0..num_streets {
            street_names.push(db.street_name(StreetId(i as u32)).to_string());
        }
        let mut street_segments: Vec<Vec<SegmentId>> = vec![Vec::new(); num_streets];
        let mut street_length_m = vec![0.0; num_streets];
        for (i, seg) in segments.iter().enumerate() {
            let s = seg.street_id.index();
            street_segments[s].push(SegmentId(i as u32));
            street_length_m[s] += seg.length_m;
        }

        let trie = NameTrie::build(&street_names);

        // ── Pass 2: CSR adjacency, reusing the database's own one-way-aware
        //    membership (`intersection_street_segment`) rather than
        //    re-deriving it ───────────────────────────────────────────────
        let mut out_start = vec![0u32; n + 1];
        let mut out_segment = Vec::new();
        let mut out_forward = Vec::new();
        let mut out_to = Vec::new();
        let mut out_travel_time_s = Vec::new();

        for i in 0..n {
            let id = IntersectionId(i as u32);
            let count = db.intersection_street_segment_count(id);
            for j in 0..count {
                let seg_id = db.intersection_street_segment(id, j);
                let seg = &segments[seg_id.index()];
                let forward = seg.from == id;
                let to = if forward { seg.to } else { seg.from };
                out_segment.push(seg_id);
                out_forward.push(forward);
                out_to.push(to);
                out_travel_time_s.push(seg.travel_time_s);
            }
            out_start[i + 1] = out_segment.len() as u32;
        }

        // ── Points of interest ────────────────────────────────────────────
        let num_pois = db.num_points_of_interest();
        let mut poi_pos = Vec::with_capacity(num_pois);
        let mut poi_name = Vec::with_capacity(num_pois);
        let mut poi_type = Vec::with_capacity(num_pois);
        for i in 0..num_pois {
            let id = PoiId(i as u32);
            poi_pos.push(db.point_of_interest_position(id));
            poi_name.push(db.point_of_interest_name(id).to_string());
            poi_type.push(db.point_of_interest_type(id).to_string());
        }

        // ── Spatial indexes ───────────────────────────────────────────────
        let intersection_entries: Vec<IntersectionEntry> = intersection_pos
            .iter()
            .enumerate()
            .map(|(i, &pos)| IntersectionEntry {
                point: [pos.lat, pos.lon],
                id: IntersectionId(i as u32),
            })
            .collect();
        let intersection_rtree = RTree::bulk_load(intersection_entries);

        let poi_entries: Vec<PoiEntry> = poi_pos
            .iter()
            .enumerate()
            .map(|(i, &pos)| PoiEntry {
                point: [pos.lat, pos.lon],
                id: PoiId(i as u32),
            })
            .collect();
        let poi_rtree = RTree::bulk_load(poi_entries);

        let max_speed_kmh = segments
            .iter()
            .map(|s| s.speed_limit_kmh)
            .fold(0.0_f64, f64::max)
            .max(1.0); // guard against a degenerate all-zero-speed map

        Ok(Self {
            intersection_pos,
            intersection_names,
            out_start,
            out_segment,
            out_forward,
            out_to,
            out_travel_time_s,
            segments,
            street_names,
            street_segments,
            street_length_m,
            poi_pos,
            poi_name,
            poi_type,
            trie,
            projector,
            intersection_rtree,
            poi_rtree,
            max_speed_kmh,
        })
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn num_intersections(&self) -> usize {
        self.intersection_pos.len()
    }

    pub fn num_street_segments(&self) -> usize {
        self.segments.len()
    }

    pub fn num_streets(&self) -> usize {
        self.street_names.len()
    }

    pub fn num_points_of_interest(&self) -> usize {
        self.poi_pos.len()
    }

    // ── Intersections ─────────────────────────────────────────────────────

    pub fn intersection_position(&self, id: IntersectionId) -> GeoPoint {
        self.intersection_pos[id.index()]
    }

    pub fn intersection_name(&self, id: IntersectionId) -> &str {
        &self.intersection_names[id.index()]
    }

    /// Directed edges leaving `id`, as `(segment, forward, to)` triples.
    pub(crate) fn out_edges(&self, id: IntersectionId) -> impl Iterator<Item = usize> + '_ {
        let start = self.out_start[id.index()] as usize;
        let end = self.out_start[id.index() + 1] as usize;
        start..end
    }

    pub fn adjacent_intersections(&self, id: IntersectionId) -> Vec<IntersectionId> {
        let mut out: Vec<IntersectionId> = self.out_edges(id).map(|e| self.out_to[e]).collect();
        out.sort();
        out.dedup();
        out
    }

    pub fn are_directly_connected(&self, a: IntersectionId, b: IntersectionId) -> bool {
        a == b || self.out_edges(a).any(|e| self.out_to[e] == b)
    }

    pub fn intersection_street_segment_count(&self, id: IntersectionId) -> usize {
        self.out_edges(id).count()
    }

    pub fn intersection_street_segments(&self, id: IntersectionId) -> Vec<SegmentId> {
        self.out_edges(id).map(|e| self.out_segment[e]).collect()
    }

    /// The distinct street names touching `id`.
    pub fn intersection_street_names(&self, id: IntersectionId) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .out_edges(id)
            .map(|e| self.street_name(self.segments[self.out_segment[e].index()].street_id))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    pub fn closest_intersection(&self, pos: GeoPoint) -> Option<IntersectionId> {
        self.intersection_rtree
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|e| e.id)
    }

    // ── Segments ───────────────────────────────────────────────────────────

    pub fn segment(&self, id: SegmentId) -> &SegmentGeom {
        &self.segments[id.index()]
    }

    pub fn segment_length_m(&self, id: SegmentId) -> f64 {
        self.segments[id.index()].length_m
    }

    pub fn segment_curve_point(&self, id: SegmentId, index: usize) -> GeoPoint {
        self.segments[id.index()].curve_points[index]
    }

    /// Segments whose `from`/`to` endpoint is `id`, regardless of travel
    /// direction (unlike [`Self::intersection_street_segments`], which only
    /// returns segments actually drivable away from `id`).
    pub fn street_segments_of_street(&self, street: StreetId) -> &[SegmentId] {
        &self.street_segments[street.index()]
    }

    // ── Streets ────────────────────────────────────────────────────────────

    pub fn street_name(&self, id: StreetId) -> &str {
        &self.street_names[id.index()]
    }

    pub fn street_length_m(&self, id: StreetId) -> f64 {
        self.street_length_m[id.index()]
    }

    /// Every intersection that touches any segment of `street`.
    pub fn street_intersections(&self, street: StreetId) -> Vec<IntersectionId> {
        let mut out = Vec::new();
        for &seg_id in &self.street_segments[street.index()] {
            let seg = &self.segments[seg_id.index()];
            out.push(seg.from);
            out.push(seg.to);
        }
        out.sort();
        out.dedup();
        out
    }

    pub fn find_streets_by_prefix(&self, prefix: &str) -> Vec<StreetId> {
        self.trie.find_by_prefix(prefix)
    }

    // ── Points of interest ─────────────────────────────────────────────────

    pub fn poi_position(&self, id: PoiId) -> GeoPoint {
        self.poi_pos[id.index()]
    }

    pub fn poi_name(&self, id: PoiId) -> &str {
        &self.poi_name[id.index()]
    }

    pub fn poi_type(&self, id: PoiId) -> &str {
        &self.poi_type[id.index()]
    }

    pub fn closest_poi(&self, pos: GeoPoint) -> Option<PoiId> {
        self.poi_rtree.nearest_neighbor(&[pos.lat, pos.lon]).map(|e| e.id)
    }

    /// The closest point of interest whose type matches `poi_type` exactly.
    /// Falls back to a linear scan filtered by type — POI-type filtering is
    /// rare enough in practice that a dedicated per-type R-tree isn't worth
    /// the extra bookkeeping.
    pub fn closest_poi_of_type(&self, pos: GeoPoint, poi_type: &str) -> Option<PoiId> {
        self.poi_rtree
            .nearest_neighbor_iter(&[pos.lat, pos.lon])
            .find(|e| self.poi_type[e.id.index()] == poi_type)
            .map(|e| e.id)
    }

    /// Straight-line distance between two points, under this map's fixed
    /// index-building reference latitude.
    pub fn distance_m(&self, a: GeoPoint, b: GeoPoint) -> f64 {
        self.projector.distance_m(a, b)
    }
}

/// One-off equirectangular distance that doesn't need a loaded map, e.g.
/// `find_distance_between_two_points` before any map is loaded.
pub fn distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    pairwise_distance_m(a, b)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use streetcore_db::CsvStreetDatabase;
    use std::io::Cursor;

    /// A small three-intersection, two-segment grid with one POI, used by
    /// this module's and the sibling `search`/`multi_source` modules' tests.
    pub(crate) fn grid_map() -> MapIndex {
        let intersections = "id,lat,lon,name\n\
             0,43.6600,-79.4000,A\n\
             1,43.6610,-79.4000,B\n\
             2,43.6610,-79.3990,C\n";
        let streets = "id,name\n0,Main St\n1,Cross St\n";
        let segments = "id,from,to,one_way,speed_limit_kmh,street_id,curve_points\n\
             0,0,1,false,50.0,0,\n\
             1,1,2,false,40.0,1,\n";
        let pois = "id,lat,lon,name,poi_type\n0,43.6605,-79.4000,Cafe,cafe\n";

        let db = CsvStreetDatabase::load_from_readers(
            Cursor::new(intersections),
            Cursor::new(streets),
            Cursor::new(segments),
            Cursor::new(pois),
        )
        .unwrap();
        MapIndex::build(&db).unwrap()
    }

    #[test]
    fn dimensions_match_fixture() {
        let idx = grid_map();
        assert_eq!(idx.num_intersections(), 3);
        assert_eq!(idx.num_street_segments(), 2);
        assert_eq!(idx.num_streets(), 2);
        assert_eq!(idx.num_points_of_interest(), 1);
    }

    #[test]
    fn adjacency_is_bidirectional_for_two_way_segments() {
        let idx = grid_map();
        assert!(idx.are_directly_connected(IntersectionId(0), IntersectionId(1)));
        assert!(idx.are_directly_connected(IntersectionId(1), IntersectionId(0)));
        assert!(!idx.are_directly_connected(IntersectionId(0), IntersectionId(2)));
    }

    #[test]
    fn street_aggregates_sum_segment_lengths() {
        let idx = grid_map();
        let seg_len = idx.segment_length_m(SegmentId(0));
        assert!((idx.street_length_m(StreetId(0)) - seg_len).abs() < 1e-6);
    }

    #[test]
    fn closest_intersection_finds_nearest() {
        let idx = grid_map();
        let near_b = GeoPoint::new(43.6609, -79.4001);
        assert_eq!(idx.closest_intersection(near_b), Some(IntersectionId(1)));
    }

    #[test]
    fn closest_poi_finds_the_only_poi() {
        let idx = grid_map();
        let pos = GeoPoint::new(43.6604, -79.3999);
        assert_eq!(idx.closest_poi(pos), Some(PoiId(0)));
    }

    #[test]
    fn prefix_search_finds_named_street() {
        let idx = grid_map();
        assert_eq!(idx.find_streets_by_prefix("main"), vec![StreetId(0)]);
    }
}
