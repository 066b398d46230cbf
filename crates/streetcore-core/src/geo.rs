//! Geographic coordinate type and the projection used for both distance and
//! turn-direction calculations.
//!
//! `GeoPoint` uses `f64` latitude/longitude degrees.  Routing correctness
//! depends on sub-metre consistency between the distance used to *build* the
//! map index and the distance used to *search* it, so unlike a statistical
//! simulation this module does not trade precision for memory.
//!
//! # Equirectangular projection
//!
//! Great-circle (haversine) distance is accurate but expensive, and more
//! precision than a road network needs — streets don't span enough of the
//! globe for the sphere's curvature to matter once a reference latitude is
//! fixed. Instead every distance in this crate goes through a flat
//! equirectangular projection:
//!
//! ```text
//! x = lon * (pi/180) * cos(ref_lat * pi/180)
//! y = lat * (pi/180)
//! d = EARTH_RADIUS_M * sqrt(dx^2 + dy^2)
//! ```
//!
//! `ref_lat` is the one free parameter, and the codebase picks it two
//! different ways depending on what it's projecting:
//!
//! - [`Projector`] fixes `ref_lat` once, from the whole map's latitude bounds,
//!   at load time. All segment-length and point-to-point distance queries
//!   share this single projector so that summed segment lengths stay
//!   consistent with ad-hoc distance queries over the same map.
//! - Turn classification ([`classify_turn`]) only cares about the *sign* of a
//!   cross product, not a metric distance, so it reprojects locally using the
//!   mean latitude of just the two points in play. This keeps the turn
//!   computation self-contained and independent of which map it runs against.

/// Mean Earth radius in metres, used by the equirectangular projection.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Fixed-reference-latitude equirectangular projector.
///
/// Build one from a map's latitude bounds at load time and reuse it for
/// every distance computation over that map.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Projector {
    ref_lat_rad: f64,
}

impl Projector {
    /// A projector whose reference latitude is the mean of `min_lat` and
    /// `max_lat` (degrees) — the convention used when building a map index.
    pub fn from_bounds(min_lat: f64, max_lat: f64) -> Self {
        Self {
            ref_lat_rad: ((min_lat + max_lat) * 0.5).to_radians(),
        }
    }

    /// A projector centred on a single point, e.g. for ad-hoc one-off use.
    pub fn from_ref_lat_deg(ref_lat_deg: f64) -> Self {
        Self {
            ref_lat_rad: ref_lat_deg.to_radians(),
        }
    }

    /// Project a point to flat (x, y) metres around the reference latitude.
    #[inline]
    pub fn project(&self, p: GeoPoint) -> (f64, f64) {
        let x = p.lon.to_radians() * self.ref_lat_rad.cos();
        let y = p.lat.to_radians();
        (x * EARTH_RADIUS_M, y * EARTH_RADIUS_M)
    }

    /// Straight-line distance in metres between two points, under this
    /// projector's fixed reference latitude.
    pub fn distance_m(&self, a: GeoPoint, b: GeoPoint) -> f64 {
        let (ax, ay) = self.project(a);
        let (bx, by) = self.project(b);
        ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
    }
}

/// One-off equirectangular distance using the mean latitude of `a` and `b`
/// as the reference. Used where no map-wide [`Projector`] is available yet,
/// e.g. while the map index is still being built.
pub fn pairwise_distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    Projector::from_ref_lat_deg((a.lat + b.lat) * 0.5).distance_m(a, b)
}

/// The classification of a turn from an inbound direction to an outbound
/// direction at a shared intersection.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TurnDirection {
    /// Continuing on the same named street.
    Straight,
    Right,
    Left,
    /// The two segments do not meet at a shared endpoint — no turn exists.
    None,
}

/// Classify the turn from direction vector `inbound` to direction vector
/// `outbound`, both given as flat (dx, dy) vectors under a shared local
/// projection.
///
/// Uses the sign of the 2D cross product `inbound x outbound`:
///
/// - `cross > 0`  -> left turn
/// - `cross <= 0` -> right turn (the `== 0` tie, a dead-ahead or U-turn
///   vector pair, is deliberately folded into "right" rather than given its
///   own case)
///
/// Same-street continuations are detected by the caller before reaching this
/// function (see `streetcore-graph`'s turn classification), since this
/// function only has the two vectors to work with.
pub fn classify_turn_vectors(inbound: (f64, f64), outbound: (f64, f64)) -> TurnDirection {
    let cross = inbound.0 * outbound.1 - inbound.1 * outbound.0;
    if cross > 0.0 {
        TurnDirection::Left
    } else {
        TurnDirection::Right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projector_distance_matches_known_scale() {
        // One degree of latitude is ~111.2 km.
        let proj = Projector::from_bounds(0.0, 1.0);
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);
        let d = proj.distance_m(a, b);
        assert!((d - 111_195.0).abs() < 500.0, "d = {d}");
    }

    #[test]
    fn distance_is_zero_for_identical_points() {
        let p = GeoPoint::new(43.6629, -79.3957);
        assert_eq!(pairwise_distance_m(p, p), 0.0);
    }

    #[test]
    fn straight_ahead_vectors_classify_as_right() {
        // collinear, same direction -> cross == 0 -> Right by the tie-break.
        let dir = classify_turn_vectors((1.0, 0.0), (1.0, 0.0));
        assert_eq!(dir, TurnDirection::Right);
    }

    #[test]
    fn ninety_degree_left_and_right_turns() {
        assert_eq!(
            classify_turn_vectors((1.0, 0.0), (0.0, 1.0)),
            TurnDirection::Left
        );
        assert_eq!(
            classify_turn_vectors((1.0, 0.0), (0.0, -1.0)),
            TurnDirection::Right
        );
    }
}
