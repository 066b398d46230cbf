//! Many-to-many search: a full `sources × destinations` travel-time table
//! in fewer searches than the naive `sources.len() * destinations.len()`
//! single-pair calls.
//!
//! Each row of the table is one Dijkstra run seeded at a single source,
//! with turn penalties applied exactly as in [`crate::search`], but with no
//! A* heuristic — there is no single target to aim a lower bound at when
//! the run is chasing an entire destination set at once. The saving instead
//! comes from early termination: the run stops as soon as every requested
//! destination has been popped off the heap (settled), rather than
//! exploring the whole map. This is the shape the courier planner's
//! distance-table stage needs: it always wants every pickup/dropoff/depot
//! pair at once, never a single pair in isolation.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use streetcore_core::IntersectionId;

use crate::index::{MapIndex, NO_EDGE};
use crate::search::{PathResult, SearchConfig};
use crate::turn::turn_between_directed;

#[derive(Copy, Clone, Debug)]
struct WaveElem {
    g: f64,
    node: IntersectionId,
}

impl PartialEq for WaveElem {
    fn eq(&self, other: &Self) -> bool {
        self.g == other.g
    }
}
impl Eq for WaveElem {}

impl PartialOrd for WaveElem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WaveElem {
    fn cmp(&self, other: &Self) -> Ordering {
        other.g.partial_cmp(&self.g).unwrap_or(Ordering::Equal)
    }
}

/// Build the full travel-time table from every source to every destination.
///
/// `table[i][j]` is `Some(path)` from `sources[i]` to `destinations[j]`, or
/// `None` if `destinations[j]` is unreachable from `sources[i]`.
pub fn many_to_many(
    idx: &MapIndex,
    sources: &[IntersectionId],
    destinations: &[IntersectionId],
    cfg: &SearchConfig,
) -> Vec<Vec<Option<PathResult>>> {
    sources
        .iter()
        .map(|&source| one_to_many(idx, source, destinations, cfg))
        .collect()
}

fn one_to_many(
    idx: &MapIndex,
    source: IntersectionId,
    destinations: &[IntersectionId],
    cfg: &SearchConfig,
) -> Vec<Option<PathResult>> {
    let n = idx.num_intersections();
    let mut best_time = vec![f64::INFINITY; n];
    let mut reaching_edge = vec![NO_EDGE; n];
    best_time[source.index()] = 0.0;

    let mut remaining: HashSet<IntersectionId> = destinations.iter().copied().collect();

    let mut heap = BinaryHeap::new();
    heap.push(WaveElem { g: 0.0, node: source });

    while !remaining.is_empty() {
        let Some(wave) = heap.pop() else { break };
        if wave.g > best_time[wave.node.index()] {
            continue;
        }
        remaining.remove(&wave.node);

        let reaching = reaching_edge[wave.node.index()];

        for e in idx.out_edges(wave.node) {
            let out_seg = idx.out_segment[e];
            let out_forward = idx.out_forward[e];
            let neighbor = idx.out_to[e];

            let mut turn_cost = 0.0;
            if reaching != NO_EDGE {
                let in_seg = idx.out_segment[reaching];
                let in_forward = idx.out_forward[reaching];
                if in_seg == out_seg && in_forward != out_forward {
                    continue;
                }
                let turn = turn_between_directed(idx, in_seg, in_forward, out_seg, out_forward, wave.node);
                turn_cost = cfg_penalty(cfg, turn);
            }

            let new_g = wave.g + idx.out_travel_time_s[e] + turn_cost;
            if new_g < best_time[neighbor.index()] {
                best_time[neighbor.index()] = new_g;
                reaching_edge[neighbor.index()] = e;
                heap.push(WaveElem { g: new_g, node: neighbor });
            }
        }
    }

    destinations
        .iter()
        .map(|&dest| {
            if best_time[dest.index()].is_finite() {
                Some(reconstruct(idx, &reaching_edge, dest, best_time[dest.index()]))
            } else {
                None
            }
        })
        .collect()
}

fn cfg_penalty(cfg: &SearchConfig, turn: streetcore_core::TurnDirection) -> f64 {
    use streetcore_core::TurnDirection::*;
    match turn {
        Straight | None => 0.0,
        Right => cfg.right_turn_penalty_s,
        Left => cfg.left_turn_penalty_s,
    }
}

fn reconstruct(idx: &MapIndex, reaching_edge: &[usize], to: IntersectionId, total_time_s: f64) -> PathResult {
    let mut segments = Vec::new();
    let mut cur = to;
    loop {
        let e = reaching_edge[cur.index()];
        if e == NO_EDGE {
            break;
        }
        let seg = idx.out_segment[e];
        segments.push(seg);
        let seg_geom = idx.segment(seg);
        cur = if idx.out_forward[e] { seg_geom.from } else { seg_geom.to };
    }
    segments.reverse();
    PathResult {
        segments,
        travel_time_s: total_time_s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::tests::grid_map;
    use crate::search::find_path_between_intersections;

    #[test]
    fn table_matches_pairwise_search() {
        let idx = grid_map();
        let cfg = SearchConfig::default();
        let sources = vec![IntersectionId(0), IntersectionId(1)];
        let destinations = vec![IntersectionId(1), IntersectionId(2)];

        let table = many_to_many(&idx, &sources, &destinations, &cfg);

        for (i, &src) in sources.iter().enumerate() {
            for (j, &dst) in destinations.iter().enumerate() {
                let direct = find_path_between_intersections(&idx, src, dst, &cfg).ok();
                match (&table[i][j], &direct) {
                    (Some(a), Some(b)) => assert!((a.travel_time_s - b.travel_time_s).abs() < 1e-9),
                    (None, None) => {}
                    _ => panic!("reachability mismatch at ({i}, {j})"),
                }
            }
        }
    }

    #[test]
    fn self_to_self_entry_is_trivial() {
        let idx = grid_map();
        let cfg = SearchConfig::default();
        let table = many_to_many(&idx, &[IntersectionId(0)], &[IntersectionId(0)], &cfg);
        let entry = table[0][0].as_ref().unwrap();
        assert!(entry.segments.is_empty());
        assert_eq!(entry.travel_time_s, 0.0);
    }
}
