//! Plain data records returned by [`crate::StreetDatabase`].

use streetcore_core::{IntersectionId, StreetId};

/// The static attributes of one directed street segment, as stored by the
/// underlying database. Geometry (endpoints, curve points) is queried
/// separately so that callers who only need, say, the speed limit don't pay
/// for point lookups they don't need.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreetSegmentInfo {
    pub from: IntersectionId,
    pub to: IntersectionId,
    pub one_way: bool,
    /// Posted speed limit in km/h.
    pub speed_limit_kmh: f64,
    pub street_id: StreetId,
    /// Number of interior curve points between `from` and `to` (not
    /// counting the endpoints themselves).
    pub num_curve_points: usize,
}
