use streetcore_core::IntersectionId;

/// A pickup/dropoff pair with a weight, identified by its position in the
/// `deliveries` slice passed to [`crate::traveling_courier`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Delivery {
    pub pickup: IntersectionId,
    pub dropoff: IntersectionId,
    pub weight: f64,
}

/// An intersection legal to start or finish a courier route at.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Depot {
    pub intersection: IntersectionId,
}

/// One leg of a courier route: a walk from `start_intersection` to
/// `end_intersection`, plus the deliveries picked up at the start.
///
/// The concatenation of every element's `segments` in order is a legal walk
/// from the first element's start to the last element's end.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteElement {
    pub start_intersection: IntersectionId,
    pub end_intersection: IntersectionId,
    pub segments: Vec<streetcore_core::SegmentId>,
    /// Indices into the `deliveries` slice picked up at `start_intersection`.
    pub pickup_indices: Vec<usize>,
}

/// Tunables for the planner's local-search and parallel-restart stages.
///
/// Plain data with a sensible `Default`, no builder macro.
#[derive(Copy, Clone, Debug)]
pub struct CourierConfig {
    /// Wall-clock budget for the whole call, starting at first entry.
    pub deadline: std::time::Duration,
    /// Number of independent restart workers (stage E). Each worker starts
    /// from a different seed delivery and/or RNG perturbation.
    pub restart_workers: usize,
    /// Global seed for per-worker RNGs (see `streetcore_core::rng`).
    pub rng_seed: u64,
    /// Minimum stop-list length before simulated annealing is layered onto
    /// the local search; shorter sequences just run hill-climbing.
    pub sa_min_stops: usize,
    /// Simulated-annealing starting temperature (seconds of travel time).
    pub sa_initial_temp: f64,
    /// Geometric cooling rate applied after every accepted or rejected move.
    pub sa_cooling_rate: f64,
}

impl Default for CourierConfig {
    fn default() -> Self {
        Self {
            deadline: std::time::Duration::from_secs(45),
            restart_workers: 4,
            rng_seed: 0,
            sa_min_stops: 8,
            sa_initial_temp: 120.0,
            sa_cooling_rate: 0.995,
        }
    }
}
