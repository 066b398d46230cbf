//! Stage D: depot attachment.
//!
//! Prepends the depot that minimizes the opening leg to the first pickup,
//! and appends the depot that minimizes the closing leg from the last stop.
//! Fails (returns `None`) if no depot has a path from the last stop — the
//! opening leg always succeeds as long as at least one depot reaches the
//! first pickup, which Stage B's distance table already guarantees was
//! checked implicitly by the caller.

use streetcore_core::IntersectionId;

use crate::distance_table::DistanceTable;
use crate::types::Depot;

/// The chosen opening and closing depot, plus the two attachment legs' travel
/// times, for a tour whose first stop is `first_pickup` and whose last stop
/// is at `last_stop`.
pub struct DepotAttachment {
    pub opening_depot: IntersectionId,
    pub opening_time_s: f64,
    pub closing_depot: IntersectionId,
    pub closing_time_s: f64,
}

pub fn attach_depots(first_pickup: IntersectionId, last_stop: IntersectionId, depots: &[Depot], table: &DistanceTable) -> Option<DepotAttachment> {
    let opening = depots
        .iter()
        .map(|d| (d.intersection, table.depot_time(d.intersection, first_pickup)))
        .filter(|(_, t)| t.is_finite())
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap())?;

    let closing = depots
        .iter()
        .map(|d| (d.intersection, table.time(last_stop, d.intersection)))
        .filter(|(_, t)| t.is_finite())
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap())?;

    Some(DepotAttachment {
        opening_depot: opening.0,
        opening_time_s: opening.1,
        closing_depot: closing.0,
        closing_time_s: closing.1,
    })
}
