//! Stage C: local-search improvement over a feasible seed tour.
//!
//! Two neighborhoods, both first-improvement (the first feasible, cheaper
//! candidate found is accepted and the search restarts from the top):
//!
//! - **Block reinsertion.** Three cut points `i < j < k` split the stop list
//!   into four blocks; the first is held fixed and the remaining three are
//!   tried in every reordering off [`BLOCK_ORDERINGS`].
//! - **Pair swap.** Any two stops are swapped; the shared feasibility check
//!   (precedence + capacity) rejects anything that breaks pickup-before-
//!   dropoff ordering or overflows capacity, so no separate rule is needed
//!   for "a pickup can't swap past its own dropoff."
//!
//! When the stop list is long enough (`CourierConfig::sa_min_stops`), a
//! simulated-annealing pass layers on top once both neighborhoods are
//! exhausted: a random swap is accepted unconditionally if it improves, and
//! otherwise with probability `exp(-delta/temperature)`, with the
//! temperature cooling geometrically every iteration.

use streetcore_core::{Deadline, WorkerRng};

use crate::distance_table::DistanceTable;
use crate::stop::{is_feasible, tour_cost, Stop};
use crate::types::{CourierConfig, Delivery};

/// The 23 reorderings of three inner blocks (B1, B2, B3) used by block
/// reinsertion: every permutation of the three blocks (6), each optionally
/// with one of the three blocks internally reversed (4 reversal patterns:
/// none, reverse B1, reverse B2, reverse B3), minus the one combination that
/// reproduces the original order (identity permutation, no reversal) —
/// `6 * 4 - 1 = 23`.
const PERMS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];
const REVERSALS: [Option<usize>; 4] = [None, Some(0), Some(1), Some(2)];

fn block_orderings() -> Vec<([usize; 3], Option<usize>)> {
    let mut out = Vec::with_capacity(23);
    for perm in PERMS {
        for rev in REVERSALS {
            if perm == [0, 1, 2] && rev.is_none() {
                continue;
            }
            out.push((perm, rev));
        }
    }
    out
}

fn apply_ordering(blocks: &[Vec<Stop>; 3], perm: [usize; 3], rev: Option<usize>) -> Vec<Stop> {
    let mut out = Vec::with_capacity(blocks.iter().map(Vec::len).sum());
    for &bi in &perm {
        let mut block = blocks[bi].clone();
        if rev == Some(bi) {
            block.reverse();
        }
        out.extend(block);
    }
    out
}

fn try_block_reinsertion(
    tour: &[Stop],
    deliveries: &[Delivery],
    table: &DistanceTable,
    capacity: f64,
    current_cost: f64,
    deadline: &Deadline,
) -> Option<(Vec<Stop>, f64)> {
    let l = tour.len();
    if l < 4 {
        return None;
    }
    let orderings = block_orderings();

    for i in 1..l - 2 {
        for j in (i + 1)..l - 1 {
            for k in (j + 1)..l {
                if deadline.expired() {
                    return None;
                }
                let blocks = [tour[i..j].to_vec(), tour[j..k].to_vec(), tour[k..l].to_vec()];
                for &(perm, rev) in &orderings {
                    let mut candidate = tour[0..i].to_vec();
                    candidate.extend(apply_ordering(&blocks, perm, rev));
                    if !is_feasible(&candidate, deliveries, capacity) {
                        continue;
                    }
                    let cost = tour_cost(&candidate, deliveries, table);
                    if cost.is_finite() && cost < current_cost - 1e-9 {
                        return Some((candidate, cost));
                    }
                }
            }
        }
    }
    None
}

fn try_pair_swap(
    tour: &[Stop],
    deliveries: &[Delivery],
    table: &DistanceTable,
    capacity: f64,
    current_cost: f64,
    deadline: &Deadline,
) -> Option<(Vec<Stop>, f64)> {
    let l = tour.len();
    for p in 0..l {
        for q in (p + 1)..l {
            if deadline.expired() {
                return None;
            }
            let mut candidate = tour.to_vec();
            candidate.swap(p, q);
            if !is_feasible(&candidate, deliveries, capacity) {
                continue;
            }
            let cost = tour_cost(&candidate, deliveries, table);
            if cost.is_finite() && cost < current_cost - 1e-9 {
                return Some((candidate, cost));
            }
        }
    }
    None
}

fn random_neighbor(
    tour: &[Stop],
    deliveries: &[Delivery],
    table: &DistanceTable,
    capacity: f64,
    rng: &mut WorkerRng,
) -> Option<(Vec<Stop>, f64)> {
    let l = tour.len();
    if l < 2 {
        return None;
    }
    for _ in 0..8 {
        let p = rng.gen_range(0..l);
        let q = rng.gen_range(0..l);
        if p == q {
            continue;
        }
        let mut candidate = tour.to_vec();
        candidate.swap(p, q);
        if is_feasible(&candidate, deliveries, capacity) {
            let cost = tour_cost(&candidate, deliveries, table);
            if cost.is_finite() {
                return Some((candidate, cost));
            }
        }
    }
    None
}

/// Improve `seed` via block reinsertion and pair swap until neither
/// neighborhood finds anything better, optionally layering simulated
/// annealing on top when the stop list is long enough. Returns the best
/// tour found and its cost.
pub fn local_search(
    seed: Vec<Stop>,
    deliveries: &[Delivery],
    table: &DistanceTable,
    capacity: f64,
    cfg: &CourierConfig,
    rng: &mut WorkerRng,
    deadline: &Deadline,
) -> (Vec<Stop>, f64) {
    let mut tour = seed;
    let mut cost = tour_cost(&tour, deliveries, table);
    let use_sa = tour.len() >= cfg.sa_min_stops;
    let mut temp = cfg.sa_initial_temp;

    loop {
        if deadline.expired() {
            break;
        }

        if let Some((t, c)) = try_block_reinsertion(&tour, deliveries, table, capacity, cost, deadline) {
            tour = t;
            cost = c;
            continue;
        }
        if let Some((t, c)) = try_pair_swap(&tour, deliveries, table, capacity, cost, deadline) {
            tour = t;
            cost = c;
            continue;
        }

        if !use_sa || temp < 1e-3 {
            break;
        }

        if let Some((cand, cand_cost)) = random_neighbor(&tour, deliveries, table, capacity, rng) {
            let delta = cand_cost - cost;
            if delta <= 0.0 || rng.gen_bool((-delta / temp).exp()) {
                tour = cand;
                cost = cand_cost;
            }
        }
        temp *= cfg.sa_cooling_rate;
    }

    (tour, cost)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_orderings_has_twenty_three_entries_and_no_duplicates() {
        let orderings = block_orderings();
        assert_eq!(orderings.len(), 23);
        let mut seen = std::collections::HashSet::new();
        for o in &orderings {
            assert!(seen.insert(*o), "duplicate ordering {o:?}");
        }
    }

    #[test]
    fn apply_ordering_identity_with_no_reversal_is_unchanged() {
        let blocks = [
            vec![Stop {
                kind: crate::stop::StopKind::Pickup,
                delivery: 0,
            }],
            vec![Stop {
                kind: crate::stop::StopKind::Pickup,
                delivery: 1,
            }],
            vec![Stop {
                kind: crate::stop::StopKind::Dropoff,
                delivery: 0,
            }],
        ];
        let out = apply_ordering(&blocks, [0, 1, 2], None);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].delivery, 0);
        assert_eq!(out[1].delivery, 1);
        assert_eq!(out[2].delivery, 0);
    }
}
