//! `traveling_courier`: the top-level entry point tying together stages
//! A through E.

use streetcore_core::{Deadline, WorkerRng};
use streetcore_graph::{MapIndex, SearchConfig};

use crate::depot::attach_depots;
use crate::distance_table::DistanceTable;
use crate::local_search::local_search;
use crate::route::build_route_elements;
use crate::seed::build_seed;
use crate::stop::{tour_intersection, Stop};
use crate::types::{CourierConfig, Delivery, Depot, RouteElement};

/// Plan a capacitated pickup-and-delivery route.
///
/// Returns an empty route if `deliveries` or `depots` is empty, if any
/// delivery's weight exceeds `capacity`, or if no feasible tour could be
/// constructed from any starting delivery before the deadline. Never
/// panics, never throws — infeasibility is always signaled by an empty
/// `Vec`.
pub fn traveling_courier(
    idx: &MapIndex,
    deliveries: &[Delivery],
    depots: &[Depot],
    capacity: f64,
    search_cfg: &SearchConfig,
    courier_cfg: &CourierConfig,
) -> Vec<RouteElement> {
    if deliveries.is_empty() || depots.is_empty() {
        return Vec::new();
    }
    if deliveries.iter().any(|d| d.weight > capacity) {
        return Vec::new();
    }

    let deadline = Deadline::starting_now(courier_cfg.deadline);
    log::info!(
        "traveling_courier: {} deliveries, {} depots, capacity {capacity}, deadline {:?}",
        deliveries.len(),
        depots.len(),
        courier_cfg.deadline,
    );

    let table = DistanceTable::build(idx, deliveries, depots, search_cfg);

    let restarts = run_restarts(deliveries, &table, capacity, courier_cfg, &deadline);
    let best = restarts
        .into_iter()
        .flatten()
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap());

    let Some((best_tour, best_cost)) = best else {
        log::warn!("traveling_courier: no feasible seed tour found for any starting delivery");
        return Vec::new();
    };
    log::info!("traveling_courier: best tour cost {best_cost:.1}s over {} stops", best_tour.len());

    let first_pickup = tour_intersection(&best_tour[0], deliveries);
    let last_stop = tour_intersection(best_tour.last().expect("non-empty tour"), deliveries);

    let Some(attachment) = attach_depots(first_pickup, last_stop, depots, &table) else {
        log::warn!("traveling_courier: no depot reaches both ends of the best tour");
        return Vec::new();
    };

    build_route_elements(&best_tour, deliveries, &attachment, &table)
}

/// Stage E: restart workers, run concurrently under the `parallel` feature
/// (a Rayon data-parallel map) or sequentially otherwise. Each worker
/// observes `deadline` independently and surrenders whatever it has when it
/// expires.
///
/// Every starting delivery gets at least one worker (stage B is exhaustive
/// over `d0 ∈ D`). If `cfg.restart_workers` exceeds the delivery count, the
/// extra workers revisit starting deliveries round-robin with a fresh RNG
/// seed each, giving the simulated-annealing pass additional independent
/// trajectories to explore within the same deadline.
fn run_restarts(
    deliveries: &[Delivery],
    table: &DistanceTable,
    capacity: f64,
    cfg: &CourierConfig,
    deadline: &Deadline,
) -> Vec<Option<(Vec<Stop>, f64)>> {
    let n = deliveries.len();
    let worker_count = n.max(cfg.restart_workers);

    let run_one = |worker: usize| -> Option<(Vec<Stop>, f64)> {
        if deadline.expired() {
            log::warn!("traveling_courier: restart worker {worker} cancelled by deadline before starting");
            return None;
        }
        let d0 = worker % n;
        let seed = build_seed(d0, deliveries, table, capacity)?;
        let mut rng = WorkerRng::new(cfg.rng_seed, worker as u32);
        Some(local_search(seed, deliveries, table, capacity, cfg, &mut rng, deadline))
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        (0..worker_count).into_par_iter().map(run_one).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..worker_count).map(run_one).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use streetcore_core::IntersectionId;
    use streetcore_db::CsvStreetDatabase;

    /// A loop of four intersections so a depot, a pickup, and a dropoff are
    /// all mutually reachable.
    fn loop_map() -> MapIndex {
        let intersections = "id,lat,lon,name\n\
             0,43.6600,-79.4000,Depot\n\
             1,43.6610,-79.4000,Pickup\n\
             2,43.6610,-79.3990,Dropoff\n\
             3,43.6600,-79.3990,Corner\n";
        let streets = "id,name\n0,Main St\n1,Side St\n2,Back St\n3,Front St\n";
        let segments = "id,from,to,one_way,speed_limit_kmh,street_id,curve_points\n\
             0,0,1,false,50.0,0,\n\
             1,1,2,false,50.0,1,\n\
             2,2,3,false,50.0,2,\n\
             3,3,0,false,50.0,3,\n";
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
    fn single_delivery_produces_three_elements() {
        let idx = loop_map();
        let deliveries = vec![Delivery {
            pickup: IntersectionId(1),
            dropoff: IntersectionId(2),
            weight: 5.0,
        }];
        let depots = vec![Depot {
            intersection: IntersectionId(0),
        }];
        let route = traveling_courier(
            &idx,
            &deliveries,
            &depots,
            10.0,
            &SearchConfig::default(),
            &CourierConfig {
                deadline: std::time::Duration::from_secs(2),
                restart_workers: 1,
                ..Default::default()
            },
        );

        assert_eq!(route.len(), 3);
        assert_eq!(route[0].start_intersection, IntersectionId(0));
        assert_eq!(route[1].pickup_indices, vec![0]);
        assert_eq!(route.last().unwrap().end_intersection, IntersectionId(0));
    }

    #[test]
    fn empty_deliveries_yields_empty_route() {
        let idx = loop_map();
        let depots = vec![Depot {
            intersection: IntersectionId(0),
        }];
        let route = traveling_courier(&idx, &[], &depots, 10.0, &SearchConfig::default(), &CourierConfig::default());
        assert!(route.is_empty());
    }

    #[test]
    fn overweight_delivery_yields_empty_route() {
        let idx = loop_map();
        let deliveries = vec![Delivery {
            pickup: IntersectionId(1),
            dropoff: IntersectionId(2),
            weight: 20.0,
        }];
        let depots = vec![Depot {
            intersection: IntersectionId(0),
        }];
        let route = traveling_courier(&idx, &deliveries, &depots, 10.0, &SearchConfig::default(), &CourierConfig::default());
        assert!(route.is_empty());
    }
}
