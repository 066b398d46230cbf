//! The public query surface, implemented as methods on [`StreetMap`].
//!
//! Every method here panics if called before a successful [`StreetMap::load`]
//! (see `lifecycle::StreetMap::index`) — query misuse is allowed to be
//! undefined behavior, implemented here as a loud failure instead.
//! "No route" and "no feasible courier route" are never this kind of
//! misuse; they are ordinary outcomes signaled by an empty `Vec`.

use streetcore_core::{GeoPoint, IntersectionId, PoiId, SegmentId, StreetId, TurnDirection};
use streetcore_courier::{CourierConfig, Delivery, Depot, RouteElement};
use streetcore_graph::{compute_path_travel_time as graph_compute_path_travel_time, find_path_between_intersections, find_turn_type as graph_find_turn_type, SearchConfig};

use crate::lifecycle::StreetMap;

impl StreetMap {
    pub fn find_intersection_street_segments(&self, id: IntersectionId) -> Vec<SegmentId> {
        self.index().intersection_street_segments(id)
    }

    pub fn find_intersection_street_names(&self, id: IntersectionId) -> Vec<String> {
        self.index().intersection_street_names(id).into_iter().map(str::to_owned).collect()
    }

    pub fn find_adjacent_intersections(&self, id: IntersectionId) -> Vec<IntersectionId> {
        self.index().adjacent_intersections(id)
    }

    pub fn are_directly_connected(&self, a: IntersectionId, b: IntersectionId) -> bool {
        self.index().are_directly_connected(a, b)
    }

    pub fn find_street_street_segments(&self, street: StreetId) -> Vec<SegmentId> {
        self.index().street_segments_of_street(street).to_vec()
    }

    pub fn find_all_street_intersections(&self, street: StreetId) -> Vec<IntersectionId> {
        self.index().street_intersections(street)
    }

    /// The intersections common to both streets, as a set (order is sorted
    /// and deduplicated, so callers comparing the two argument orders get
    /// identical `Vec`s).
    pub fn find_intersection_ids_from_street_ids(&self, a: StreetId, b: StreetId) -> Vec<IntersectionId> {
        let ia = self.index().street_intersections(a);
        let ib: std::collections::HashSet<_> = self.index().street_intersections(b).into_iter().collect();
        let mut out: Vec<IntersectionId> = ia.into_iter().filter(|i| ib.contains(i)).collect();
        out.sort();
        out.dedup();
        out
    }

    /// Straight-line distance between two points. Does not require a loaded
    /// map — an equirectangular one-off projection local to the two points
    /// (see `streetcore_graph::distance_m`).
    pub fn find_distance_between_two_points(&self, p: GeoPoint, q: GeoPoint) -> f64 {
        streetcore_graph::distance_m(p, q)
    }

    pub fn find_street_segment_length(&self, id: SegmentId) -> f64 {
        self.index().segment_length_m(id)
    }

    pub fn find_street_length(&self, street: StreetId) -> f64 {
        self.index().street_length_m(street)
    }

    pub fn find_street_segment_travel_time(&self, id: SegmentId) -> f64 {
        self.index().segment(id).travel_time_s
    }

    pub fn find_closest_intersection(&self, p: GeoPoint) -> Option<IntersectionId> {
        self.index().closest_intersection(p)
    }

    pub fn find_closest_point_of_interest(&self, p: GeoPoint) -> Option<PoiId> {
        self.index().closest_poi(p)
    }

    /// Case-insensitive prefix match over street names.
    pub fn find_street_ids_from_partial_street_name(&self, prefix: &str) -> Vec<StreetId> {
        self.index().find_streets_by_prefix(prefix)
    }

    pub fn find_turn_type(&self, a: SegmentId, b: SegmentId) -> TurnDirection {
        graph_find_turn_type(self.index(), a, b)
    }

    pub fn compute_path_travel_time(&self, path: &[SegmentId], right_penalty_s: f64, left_penalty_s: f64) -> f64 {
        let cfg = SearchConfig {
            right_turn_penalty_s: right_penalty_s,
            left_turn_penalty_s: left_penalty_s,
        };
        graph_compute_path_travel_time(self.index(), path, &cfg)
    }

    /// The fastest turn-penalized path from `start` to `end`. Empty if no
    /// route exists — "no route" is signaled this way, never as an error.
    pub fn find_path_between_intersections(
        &self,
        start: IntersectionId,
        end: IntersectionId,
        right_penalty_s: f64,
        left_penalty_s: f64,
    ) -> Vec<SegmentId> {
        let cfg = SearchConfig {
            right_turn_penalty_s: right_penalty_s,
            left_turn_penalty_s: left_penalty_s,
        };
        find_path_between_intersections(self.index(), start, end, &cfg)
            .map(|p| p.segments)
            .unwrap_or_default()
    }

    /// Plan a capacitated pickup-and-delivery route. Empty if no
    /// feasible route exists under `capacity`.
    pub fn traveling_courier(
        &self,
        deliveries: &[Delivery],
        depots: &[Depot],
        right_penalty_s: f64,
        left_penalty_s: f64,
        capacity: f64,
    ) -> Vec<RouteElement> {
        let search_cfg = SearchConfig {
            right_turn_penalty_s: right_penalty_s,
            left_turn_penalty_s: left_penalty_s,
        };
        streetcore_courier::traveling_courier(self.index(), deliveries, depots, capacity, &search_cfg, &CourierConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// A one-way triangle A -> B -> C -> A, so turn penalties and
    /// directionality both matter for the path queries below.
    fn write_triangle(dir: &std::path::Path) {
        let mut f = |name: &str, contents: &str| {
            std::fs::File::create(dir.join(name)).unwrap().write_all(contents.as_bytes()).unwrap();
        };
        f(
            "triangle.csv",
            "id,lat,lon,name\n0,43.6600,-79.4000,A\n1,43.6610,-79.4000,B\n2,43.6610,-79.3990,C\n",
        );
        f("triangle.streets.csv", "id,name\n0,AB\n1,BC\n2,CA\n");
        f(
            "triangle.segments.csv",
            "id,from,to,one_way,speed_limit_kmh,street_id,curve_points\n\
             0,0,1,true,50.0,0,\n\
             1,1,2,true,50.0,1,\n\
             2,2,0,true,50.0,2,\n",
        );
        f("triangle.pois.csv", "id,lat,lon,name,poi_type\n");
        f("triangle.osm.bin", "entity_id,key,value\n0,highway,residential\n");
    }

    fn loaded_triangle() -> StreetMap {
        let dir = std::env::temp_dir().join("streetcore_query_test_triangle");
        std::fs::create_dir_all(&dir).unwrap();
        write_triangle(&dir);
        let mut map = StreetMap::new();
        assert!(map.load(&dir.join("triangle.csv")));
        map
    }

    #[test]
    fn are_directly_connected_is_true_only_along_the_one_way_direction() {
        let map = loaded_triangle();
        let a = IntersectionId(0);
        let b = IntersectionId(1);
        assert!(map.are_directly_connected(a, b));
        assert!(!map.are_directly_connected(b, a));
    }

    #[test]
    fn find_path_between_intersections_follows_the_one_way_loop() {
        let map = loaded_triangle();
        let a = IntersectionId(0);
        let c = IntersectionId(2);
        // A -> C directly would go against the one-way segment C -> A, so
        // the fastest path must go the long way around: A -> B -> C.
        let path = map.find_path_between_intersections(a, c, 15.0, 25.0);
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn find_path_between_intersections_is_empty_for_a_same_node_query() {
        let map = loaded_triangle();
        let a = IntersectionId(0);
        let c = IntersectionId(2);
        assert_eq!(map.find_path_between_intersections(a, a, 15.0, 25.0), Vec::new());
        assert_eq!(map.find_path_between_intersections(c, c, 15.0, 25.0), Vec::new());
    }

    #[test]
    fn traveling_courier_smoke_test_returns_a_route_touching_the_depot() {
        let map = loaded_triangle();
        let deliveries = vec![Delivery {
            pickup: IntersectionId(1),
            dropoff: IntersectionId(2),
            weight: 1.0,
        }];
        let depots = vec![Depot {
            intersection: IntersectionId(0),
        }];
        let route = map.traveling_courier(&deliveries, &depots, 15.0, 25.0, 5.0);
        assert_eq!(route.len(), 3);
        assert_eq!(route[0].start_intersection, IntersectionId(0));
        assert_eq!(route.last().unwrap().end_intersection, IntersectionId(0));
    }
}
