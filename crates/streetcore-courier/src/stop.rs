//! The stop-list representation shared by stages B, C, and D: an ordered
//! sequence of pickup/dropoff visits over a fixed delivery set, plus the
//! feasibility and cost checks every neighborhood move runs against.

use crate::distance_table::DistanceTable;
use crate::types::Delivery;
use streetcore_core::IntersectionId;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StopKind {
    Pickup,
    Dropoff,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Stop {
    pub kind: StopKind,
    pub delivery: usize,
}

pub fn tour_intersection(stop: &Stop, deliveries: &[Delivery]) -> IntersectionId {
    match stop.kind {
        StopKind::Pickup => deliveries[stop.delivery].pickup,
        StopKind::Dropoff => deliveries[stop.delivery].dropoff,
    }
}

/// Precedence (pickup before its dropoff) and running-capacity feasibility
/// of a stop sequence, evaluated independent of depots.
pub fn is_feasible(tour: &[Stop], deliveries: &[Delivery], capacity: f64) -> bool {
    let mut carried: Vec<usize> = Vec::new();
    let mut load = 0.0;
    for stop in tour {
        match stop.kind {
            StopKind::Pickup => {
                load += deliveries[stop.delivery].weight;
                if load > capacity + f64::EPSILON {
                    return false;
                }
                carried.push(stop.delivery);
            }
            StopKind::Dropoff => {
                if !carried.contains(&stop.delivery) {
                    return false; // dropoff before its own pickup
                }
                carried.retain(|&d| d != stop.delivery);
                load -= deliveries[stop.delivery].weight;
            }
        }
    }
    true
}

/// Sum of `T[a][b]` over consecutive stops. `f64::INFINITY` if any leg is
/// unreachable.
pub fn tour_cost(tour: &[Stop], deliveries: &[Delivery], table: &DistanceTable) -> f64 {
    tour.windows(2)
        .map(|w| {
            let a = tour_intersection(&w[0], deliveries);
            let b = tour_intersection(&w[1], deliveries);
            table.time(a, b)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deliveries() -> Vec<Delivery> {
        vec![Delivery {
            pickup: IntersectionId(0),
            dropoff: IntersectionId(1),
            weight: 2.0,
        }]
    }

    #[test]
    fn dropoff_before_pickup_is_infeasible() {
        let d = deliveries();
        let tour = vec![
            Stop {
                kind: StopKind::Dropoff,
                delivery: 0,
            },
            Stop {
                kind: StopKind::Pickup,
                delivery: 0,
            },
        ];
        assert!(!is_feasible(&tour, &d, 5.0));
    }

    #[test]
    fn capacity_overflow_is_infeasible() {
        let d = vec![
            Delivery {
                pickup: IntersectionId(0),
                dropoff: IntersectionId(1),
                weight: 3.0,
            },
            Delivery {
                pickup: IntersectionId(1),
                dropoff: IntersectionId(2),
                weight: 3.0,
            },
        ];
        let tour = vec![
            Stop {
                kind: StopKind::Pickup,
                delivery: 0,
            },
            Stop {
                kind: StopKind::Pickup,
                delivery: 1,
            },
            Stop {
                kind: StopKind::Dropoff,
                delivery: 0,
            },
            Stop {
                kind: StopKind::Dropoff,
                delivery: 1,
            },
        ];
        assert!(!is_feasible(&tour, &d, 5.0));
    }
}
