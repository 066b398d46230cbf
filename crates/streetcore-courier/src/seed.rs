//! Stage B: greedy nearest-feasible seed tour construction.

use crate::distance_table::DistanceTable;
use crate::stop::{tour_intersection, Stop, StopKind};
use crate::types::Delivery;

/// Greedily build a seed tour starting at the pickup of `first`.
///
/// At every step, compares the nearest-in-time not-yet-picked pickup
/// (capacity permitting) against the nearest-in-time currently-carried
/// dropoff, and takes whichever is closer — a dropoff wins ties. Returns
/// `None` if at some step neither candidate exists (no feasible seed from
/// this starting delivery).
pub fn build_seed(first: usize, deliveries: &[Delivery], table: &DistanceTable, capacity: f64) -> Option<Vec<Stop>> {
    let n = deliveries.len();
    let mut tour = vec![Stop {
        kind: StopKind::Pickup,
        delivery: first,
    }];

    let mut not_yet_picked: Vec<usize> = (0..n).filter(|&d| d != first).collect();
    let mut carried: Vec<usize> = vec![first];
    let mut load = deliveries[first].weight;
    let mut cur = deliveries[first].pickup;

    while tour.len() < 2 * n {
        let pickup_candidate = not_yet_picked
            .iter()
            .copied()
            .filter(|&d| load + deliveries[d].weight <= capacity + f64::EPSILON)
            .map(|d| (table.time(cur, deliveries[d].pickup), d))
            .filter(|(t, _)| t.is_finite())
            .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

        let dropoff_candidate = carried
            .iter()
            .copied()
            .map(|d| (table.time(cur, deliveries[d].dropoff), d))
            .filter(|(t, _)| t.is_finite())
            .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

        let take_dropoff = match (pickup_candidate, dropoff_candidate) {
            (None, None) => return None,
            (None, Some(_)) => true,
            (Some(_), None) => false,
            (Some(p), Some(d)) => d.0 <= p.0, // tie favors the dropoff
        };

        if take_dropoff {
            let (_, d) = dropoff_candidate.unwrap();
            tour.push(Stop {
                kind: StopKind::Dropoff,
                delivery: d,
            });
            carried.retain(|&c| c != d);
            load -= deliveries[d].weight;
            cur = deliveries[d].dropoff;
        } else {
            let (_, d) = pickup_candidate.unwrap();
            tour.push(Stop {
                kind: StopKind::Pickup,
                delivery: d,
            });
            not_yet_picked.retain(|&c| c != d);
            carried.push(d);
            load += deliveries[d].weight;
            cur = deliveries[d].pickup;
        }
    }

    debug_assert_eq!(tour_intersection(tour.last().unwrap(), deliveries), cur);
    Some(tour)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance_table::DistanceTable;
    use crate::types::Depot;
    use std::io::Cursor;
    use streetcore_core::IntersectionId;
    use streetcore_db::CsvStreetDatabase;
    use streetcore_graph::{MapIndex, SearchConfig};

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
    fn single_delivery_seed_is_pickup_then_dropoff() {
        let idx = line_map();
        let deliveries = vec![Delivery {
            pickup: IntersectionId(0),
            dropoff: IntersectionId(2),
            weight: 1.0,
        }];
        let table = DistanceTable::build(
            &idx,
            &deliveries,
            &[Depot {
                intersection: IntersectionId(3),
            }],
            &SearchConfig::default(),
        );
        let seed = build_seed(0, &deliveries, &table, 5.0).unwrap();
        assert_eq!(seed.len(), 2);
        assert_eq!(seed[0].kind, StopKind::Pickup);
        assert_eq!(seed[1].kind, StopKind::Dropoff);
    }

    #[test]
    fn over_capacity_delivery_never_appears_as_a_pickup_candidate() {
        let idx = line_map();
        let deliveries = vec![
            Delivery {
                pickup: IntersectionId(0),
                dropoff: IntersectionId(1),
                weight: 1.0,
            },
            Delivery {
                pickup: IntersectionId(1),
                dropoff: IntersectionId(2),
                weight: 10.0,
            },
        ];
        let table = DistanceTable::build(
            &idx,
            &deliveries,
            &[Depot {
                intersection: IntersectionId(3),
            }],
            &SearchConfig::default(),
        );
        // Capacity only fits the first delivery at a time.
        let seed = build_seed(0, &deliveries, &table, 1.0);
        assert!(seed.is_none(), "second pickup would exceed capacity, and its dropoff can't be reached before it is picked up");
    }
}
