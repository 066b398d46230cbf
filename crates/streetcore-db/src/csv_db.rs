//! CSV-backed [`StreetDatabase`] implementation.
//!
//! # CSV format
//!
//! Four files, one row per record:
//!
//! ```csv
//! # intersections.csv
//! id,lat,lon,name
//! 0,43.6629,-79.3957,King St & Bay St
//! ```
//! ```csv
//! # streets.csv
//! id,name
//! 0,King St
//! ```
//! ```csv
//! # street_segments.csv
//! id,from,to,one_way,speed_limit_kmh,street_id,curve_points
//! 0,0,1,false,50.0,0,43.6630:-79.3950;43.6631:-79.3940
//! ```
//! `curve_points` is a `;`-separated list of `lat:lon` pairs running from
//! `from` to `to`, excluding both endpoints. An empty field means the
//! segment is a straight line between its two intersections.
//!
//! ```csv
//! # points_of_interest.csv
//! id,lat,lon,name,poi_type
//! 0,43.6629,-79.3957,Tim Hortons,cafe
//! ```
//!
//! # Adjacency
//!
//! The file format has no explicit per-intersection segment list — it's
//! derived while loading, the same way the original loader does it: a
//! segment is always registered as outgoing at its `from` end, and also at
//! its `to` end whenever it is not one-way (since such a segment can be
//! driven in either direction).

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use streetcore_core::{GeoPoint, IntersectionId, PoiId, SegmentId, StreetId};

use crate::error::{DbError, DbResult};
use crate::records::StreetSegmentInfo;
use crate::traits::StreetDatabase;

#[derive(Deserialize)]
struct IntersectionRow {
    id: u32,
    lat: f64,
    lon: f64,
    name: String,
}

#[derive(Deserialize)]
struct StreetRow {
    id: u32,
    name: String,
}

#[derive(Deserialize)]
struct SegmentRow {
    id: u32,
    from: u32,
    to: u32,
    one_way: bool,
    speed_limit_kmh: f64,
    street_id: u32,
    curve_points: String,
}

#[derive(Deserialize)]
struct PoiRow {
    id: u32,
    lat: f64,
    lon: f64,
    name: String,
    poi_type: String,
}

struct IntersectionRecord {
    pos: GeoPoint,
    name: String,
}

struct SegmentRecord {
    info: StreetSegmentInfo,
    curve_points: Vec<GeoPoint>,
}

struct PoiRecord {
    pos: GeoPoint,
    name: String,
    poi_type: String,
}

/// An in-memory [`StreetDatabase`] populated by parsing the four CSV files.
pub struct CsvStreetDatabase {
    intersections: Vec<IntersectionRecord>,
    segments: Vec<SegmentRecord>,
    streets: Vec<String>,
    pois: Vec<PoiRecord>,
    /// `adjacency[i]` lists the segments that can be driven away from
    /// intersection `i`, in the order encountered while loading.
    adjacency: Vec<Vec<SegmentId>>,
}

impl CsvStreetDatabase {
    /// Load from four file paths.
    pub fn load_from_paths(
        intersections_path: &Path,
        streets_path: &Path,
        segments_path: &Path,
        pois_path: &Path,
    ) -> DbResult<Self> {
        let intersections = std::fs::File::open(intersections_path)?;
        let streets = std::fs::File::open(streets_path)?;
        let segments = std::fs::File::open(segments_path)?;
        let pois = std::fs::File::open(pois_path)?;
        Self::load_from_readers(intersections, streets, segments, pois)
    }

    /// Like [`Self::load_from_paths`] but accepts any `Read` sources —
    /// useful for tests (pass `std::io::Cursor`s over string literals).
    pub fn load_from_readers<R1, R2, R3, R4>(
        intersections_r: R1,
        streets_r: R2,
        segments_r: R3,
        pois_r: R4,
    ) -> DbResult<Self>
    where
        R1: Read,
        R2: Read,
        R3: Read,
        R4: Read,
    {
        // ── Intersections ──────────────────────────────────────────────
        let mut rows: Vec<IntersectionRow> = csv::Reader::from_reader(intersections_r)
            .deserialize()
            .collect::<Result<_, _>>()
            .map_err(|e| DbError::Parse(format!("intersections.csv: {e}")))?;
        rows.sort_by_key(|r| r.id);
        let mut intersections = Vec::with_capacity(rows.len());
        for (expected, row) in rows.into_iter().enumerate() {
            if row.id as usize != expected {
                return Err(DbError::Parse(format!(
                    "intersections.csv: expected contiguous ids starting at 0, found gap at {expected}"
                )));
            }
            intersections.push(IntersectionRecord {
                pos: GeoPoint::new(row.lat, row.lon),
                name: row.name,
            });
        }

        // ── Streets ────────────────────────────────────────────────────
        let mut rows: Vec<StreetRow> = csv::Reader::from_reader(streets_r)
            .deserialize()
            .collect::<Result<_, _>>()
            .map_err(|e| DbError::Parse(format!("streets.csv: {e}")))?;
        rows.sort_by_key(|r| r.id);
        let mut streets = Vec::with_capacity(rows.len());
        for (expected, row) in rows.into_iter().enumerate() {
            if row.id as usize != expected {
                return Err(DbError::Parse(format!(
                    "streets.csv: expected contiguous ids starting at 0, found gap at {expected}"
                )));
            }
            streets.push(row.name);
        }

        // ── Street segments ────────────────────────────────────────────
        let mut rows: Vec<SegmentRow> = csv::Reader::from_reader(segments_r)
            .deserialize()
            .collect::<Result<_, _>>()
            .map_err(|e| DbError::Parse(format!("street_segments.csv: {e}")))?;
        rows.sort_by_key(|r| r.id);

        let mut segments = Vec::with_capacity(rows.len());
        let mut adjacency: Vec<Vec<SegmentId>> = vec![Vec::new(); intersections.len()];

        for (expected, row) in rows.into_iter().enumerate() {
            if row.id as usize != expected {
                return Err(DbError::Parse(format!(
                    "street_segments.csv: expected contiguous ids starting at 0, found gap at {expected}"
                )));
            }
            let curve_points = parse_curve_points(&row.curve_points)?;
            let seg_id = SegmentId(row.id);
            let from = IntersectionId(row.from);
            let to = IntersectionId(row.to);

            adjacency
                .get_mut(from.index())
                .ok_or_else(|| DbError::Parse(format!("segment {} has out-of-range from={}", row.id, row.from)))?
                .push(seg_id);
            if !row.one_way {
                adjacency
                    .get_mut(to.index())
                    .ok_or_else(|| DbError::Parse(format!("segment {} has out-of-range to={}", row.id, row.to)))?
                    .push(seg_id);
            }

            segments.push(SegmentRecord {
                info: StreetSegmentInfo {
                    from,
                    to,
                    one_way: row.one_way,
                    speed_limit_kmh: row.speed_limit_kmh,
                    street_id: StreetId(row.street_id),
                    num_curve_points: curve_points.len(),
                },
                curve_points,
            });
        }

        // ── Points of interest ─────────────────────────────────────────
        let mut rows: Vec<PoiRow> = csv::Reader::from_reader(pois_r)
            .deserialize()
            .collect::<Result<_, _>>()
            .map_err(|e| DbError::Parse(format!("points_of_interest.csv: {e}")))?;
        rows.sort_by_key(|r| r.id);
        let mut pois = Vec::with_capacity(rows.len());
        for (expected, row) in rows.into_iter().enumerate() {
            if row.id as usize != expected {
                return Err(DbError::Parse(format!(
                    "points_of_interest.csv: expected contiguous ids starting at 0, found gap at {expected}"
                )));
            }
            pois.push(PoiRecord {
                pos: GeoPoint::new(row.lat, row.lon),
                name: row.name,
                poi_type: row.poi_type,
            });
        }

        Ok(Self {
            intersections,
            segments,
            streets,
            pois,
            adjacency,
        })
    }
}

fn parse_curve_points(field: &str) -> DbResult<Vec<GeoPoint>> {
    let field = field.trim();
    if field.is_empty() {
        return Ok(Vec::new());
    }
    field
        .split(';')
        .map(|pair| {
            let (lat, lon) = pair
                .split_once(':')
                .ok_or_else(|| DbError::Parse(format!("malformed curve point {pair:?}")))?;
            let lat: f64 = lat
                .parse()
                .map_err(|_| DbError::Parse(format!("malformed curve point latitude {lat:?}")))?;
            let lon: f64 = lon
                .parse()
                .map_err(|_| DbError::Parse(format!("malformed curve point longitude {lon:?}")))?;
            Ok(GeoPoint::new(lat, lon))
        })
        .collect()
}

impl StreetDatabase for CsvStreetDatabase {
    fn num_intersections(&self) -> usize {
        self.intersections.len()
    }

    fn num_street_segments(&self) -> usize {
        self.segments.len()
    }

    fn num_streets(&self) -> usize {
        self.streets.len()
    }

    fn num_points_of_interest(&self) -> usize {
        self.pois.len()
    }

    fn intersection_position(&self, id: IntersectionId) -> GeoPoint {
        self.intersections[id.index()].pos
    }

    fn intersection_name(&self, id: IntersectionId) -> &str {
        &self.intersections[id.index()].name
    }

    fn intersection_street_segment_count(&self, id: IntersectionId) -> usize {
        self.adjacency[id.index()].len()
    }

    fn intersection_street_segment(&self, id: IntersectionId, index: usize) -> SegmentId {
        self.adjacency[id.index()][index]
    }

    fn info_street_segment(&self, id: SegmentId) -> StreetSegmentInfo {
        self.segments[id.index()].info
    }

    fn street_segment_curve_point(&self, id: SegmentId, index: usize) -> GeoPoint {
        self.segments[id.index()].curve_points[index]
    }

    fn street_name(&self, id: StreetId) -> &str {
        &self.streets[id.index()]
    }

    fn point_of_interest_position(&self, id: PoiId) -> GeoPoint {
        self.pois[id.index()].pos
    }

    fn point_of_interest_name(&self, id: PoiId) -> &str {
        &self.pois[id.index()].name
    }

    fn point_of_interest_type(&self, id: PoiId) -> &str {
        &self.pois[id.index()].poi_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn fixture() -> CsvStreetDatabase {
        let intersections = "id,lat,lon,name\n\
             0,43.6629,-79.3957,A\n\
             1,43.6640,-79.3950,B\n\
             2,43.6650,-79.3940,C\n";
        let streets = "id,name\n0,Main St\n";
        let segments = "id,from,to,one_way,speed_limit_kmh,street_id,curve_points\n\
             0,0,1,false,50.0,0,\n\
             1,1,2,true,50.0,0,\n";
        let pois = "id,lat,lon,name,poi_type\n0,43.6635,-79.3953,Cafe,cafe\n";

        CsvStreetDatabase::load_from_readers(
            Cursor::new(intersections),
            Cursor::new(streets),
            Cursor::new(segments),
            Cursor::new(pois),
        )
        .unwrap()
    }

    #[test]
    fn counts_match_rows() {
        let db = fixture();
        assert_eq!(db.num_intersections(), 3);
        assert_eq!(db.num_street_segments(), 2);
        assert_eq!(db.num_streets(), 1);
        assert_eq!(db.num_points_of_interest(), 1);
    }

    #[test]
    fn two_way_segment_registers_at_both_endpoints() {
        let db = fixture();
        assert_eq!(db.intersection_street_segment_count(IntersectionId(0)), 1);
        assert_eq!(db.intersection_street_segment_count(IntersectionId(1)), 2);
        assert_eq!(db.intersection_street_segment(IntersectionId(1), 0), SegmentId(0));
        assert_eq!(db.intersection_street_segment(IntersectionId(1), 1), SegmentId(1));
    }

    #[test]
    fn one_way_segment_registers_only_at_from() {
        let db = fixture();
        // segment 1 is one-way 1 -> 2; intersection 2 gets nothing from it.
        assert_eq!(db.intersection_street_segment_count(IntersectionId(2)), 0);
    }

    #[test]
    fn info_round_trips_fields() {
        let db = fixture();
        let info = db.info_street_segment(SegmentId(0));
        assert_eq!(info.from, IntersectionId(0));
        assert_eq!(info.to, IntersectionId(1));
        assert!(!info.one_way);
        assert_eq!(info.street_id, StreetId(0));
    }
}
