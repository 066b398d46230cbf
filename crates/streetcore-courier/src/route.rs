//! Turning a finished stop list plus its depot attachment into the public
//! `RouteElement` list.
//!
//! Element `0` is the depot-to-first-pickup leg (no deliveries picked up at
//! a depot). Element `i` for `1 <= i <= tour.len()` starts at `tour[i-1]`'s
//! intersection; its `pickup_indices` lists that stop's delivery if it is a
//! pickup. The final element closes from the last stop to the chosen
//! closing depot.

use crate::depot::DepotAttachment;
use crate::stop::{tour_intersection, Stop, StopKind};
use crate::types::{Delivery, RouteElement};
use crate::distance_table::DistanceTable;

pub fn build_route_elements(
    tour: &[Stop],
    deliveries: &[Delivery],
    attachment: &DepotAttachment,
    table: &DistanceTable,
) -> Vec<RouteElement> {
    let mut positions = Vec::with_capacity(tour.len() + 2);
    positions.push(attachment.opening_depot);
    for s in tour {
        positions.push(tour_intersection(s, deliveries));
    }
    positions.push(attachment.closing_depot);

    let mut elements = Vec::with_capacity(positions.len() - 1);
    for i in 0..positions.len() - 1 {
        let start = positions[i];
        let end = positions[i + 1];

        let segments = if i == 0 {
            table.depot_path(start, end).map(|p| p.segments.clone()).unwrap_or_default()
        } else {
            table.path(start, end).map(|p| p.segments.clone()).unwrap_or_default()
        };

        let pickup_indices = if i >= 1 && i <= tour.len() && tour[i - 1].kind == StopKind::Pickup {
            vec![tour[i - 1].delivery]
        } else {
            Vec::new()
        };

        elements.push(RouteElement {
            start_intersection: start,
            end_intersection: end,
            segments,
            pickup_indices,
        });
    }
    elements
}
