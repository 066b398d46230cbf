//! Stage A: the all-pairs-of-interest distance table.
//!
//! `I` is the set of distinct pickup/dropoff intersections across every
//! delivery. `T[a][b]` holds the travel time and path for every `a ∈ I` to
//! every `b ∈ I ∪ P` (the depots). A second table `T_depot[p][pickup]` covers
//! the opening leg from each depot to each distinct pickup intersection.
//!
//! Both tables are built with one call each to
//! [`streetcore_graph::many_to_many`] — one Dijkstra run per source, turn
//! penalties included, no heuristic (there's no single target to bound
//! against with a whole destination set in play). Once built, neither table
//! is ever mutated again; every later stage only reads it.

use std::collections::HashMap;

use streetcore_core::IntersectionId;
use streetcore_graph::{many_to_many, MapIndex, PathResult, SearchConfig};

use crate::types::{Delivery, Depot};

/// A square(ish) travel-time/path table over the distinct pickup and dropoff
/// intersections of a delivery set, plus depots as destinations, plus a
/// depot-to-pickup opening-leg table.
pub struct DistanceTable {
    points: Vec<IntersectionId>,
    point_index: HashMap<IntersectionId, usize>,
    /// `rows[a][b]` = path from `points[a]` to `points[b]`, `None` if
    /// unreachable. `b` ranges over `points` (`I ∪ P`).
    rows: Vec<Vec<Option<PathResult>>>,

    depots: Vec<IntersectionId>,
    depot_index: HashMap<IntersectionId, usize>,
    pickups: Vec<IntersectionId>,
    pickup_index: HashMap<IntersectionId, usize>,
    /// `depot_rows[p][pickup]` = path from `depots[p]` to `pickups[pickup]`.
    depot_rows: Vec<Vec<Option<PathResult>>>,
}

impl DistanceTable {
    /// Build the table from a delivery set and depot set against `idx`.
    pub fn build(idx: &MapIndex, deliveries: &[Delivery], depots: &[Depot], cfg: &SearchConfig) -> Self {
        fn push_point(p: IntersectionId, points: &mut Vec<IntersectionId>, index: &mut HashMap<IntersectionId, usize>) {
            index.entry(p).or_insert_with(|| {
                points.push(p);
                points.len() - 1
            });
        }

        let mut points = Vec::new();
        let mut point_index = HashMap::new();
        for d in deliveries {
            push_point(d.pickup, &mut points, &mut point_index);
            push_point(d.dropoff, &mut points, &mut point_index);
        }

        let depot_points: Vec<IntersectionId> = depots.iter().map(|p| p.intersection).collect();
        let mut destinations = points.clone();
        for &p in &depot_points {
            push_point(p, &mut destinations, &mut point_index);
        }
        // `point_index` now indexes into `destinations`, which is a superset
        // of `points` (I) that also contains any depot not already in I.

        let rows = many_to_many(idx, &points, &destinations, cfg);

        let mut pickups = Vec::new();
        let mut pickup_index = HashMap::new();
        for d in deliveries {
            pickup_index.entry(d.pickup).or_insert_with(|| {
                pickups.push(d.pickup);
                pickups.len() - 1
            });
        }

        let mut depot_index = HashMap::new();
        for (i, &p) in depot_points.iter().enumerate() {
            depot_index.entry(p).or_insert(i);
        }

        let depot_rows = many_to_many(idx, &depot_points, &pickups, cfg);

        Self {
            points: destinations,
            point_index,
            rows,
            depots: depot_points,
            depot_index,
            pickups,
            pickup_index,
            depot_rows,
        }
    }

    /// Travel time from `a` to `b`, both drawn from the delivery/depot set
    /// this table was built from. `f64::INFINITY` if unreachable or if
    /// either point wasn't part of the original set.
    pub fn time(&self, a: IntersectionId, b: IntersectionId) -> f64 {
        if a == b {
            return 0.0;
        }
        self.path(a, b).map(|p| p.travel_time_s).unwrap_or(f64::INFINITY)
    }

    pub fn path(&self, a: IntersectionId, b: IntersectionId) -> Option<&PathResult> {
        let &ai = self.point_index.get(&a)?;
        let &bi = self.point_index.get(&b)?;
        if ai >= self.rows.len() {
            return None; // `a` was only ever a destination (e.g. a depot), never a search source
        }
        self.rows[ai][bi].as_ref()
    }

    /// Travel time for the opening leg from `depot` to `pickup`.
    pub fn depot_time(&self, depot: IntersectionId, pickup: IntersectionId) -> f64 {
        self.depot_path(depot, pickup).map(|p| p.travel_time_s).unwrap_or(f64::INFINITY)
    }

    pub fn depot_path(&self, depot: IntersectionId, pickup: IntersectionId) -> Option<&PathResult> {
        let &di = self.depot_index.get(&depot)?;
        let &pi = self.pickup_index.get(&pickup)?;
        self.depot_rows[di][pi].as_ref()
    }

    pub fn depots(&self) -> &[IntersectionId] {
        &self.depots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use streetcore_graph::MapIndex;
    use streetcore_db::CsvStreetDatabase;
    use std::io::Cursor;

    fn line_map() -> MapIndex {
        let intersections = "id,lat,lon,name\n\
             0,43.6600,-79.4000,A\n\
             1,43.6610,-79.4000,B\n\
             2,43.6620,-79.4000,C\n\
             3,43.6630,-79.4000,D\n";
        let streets = "id,name\n0,Main St\n";
        let segments = "id,from,to,one_way,speed_limit_kmh,street_id,curve_points\n\
             0,0,1,false,50.0,0,\n\
             1,1,2,false,50.0,0,\n\
             2,2,3,false,50.0,0,\n";
        let pois = "id,lat,lon,name,poi_type\n";
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
    fn table_covers_pickups_dropoffs_and_depots() {
        let idx = line_map();
        let deliveries = vec![Delivery {
            pickup: IntersectionId(0),
            dropoff: IntersectionId(2),
            weight: 1.0,
        }];
        let depots = vec![Depot {
            intersection: IntersectionId(3),
        }];
        let table = DistanceTable::build(&idx, &deliveries, &depots, &SearchConfig::default());

        assert!(table.time(IntersectionId(0), IntersectionId(2)) > 0.0);
        assert!(table.time(IntersectionId(2), IntersectionId(3)) > 0.0);
        assert!(table.depot_time(IntersectionId(3), IntersectionId(0)) > 0.0);
    }
}
