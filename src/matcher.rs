//! # Coordinate matcher
//!
//! Joins acquisition planes to named multipoints by stage position. A pair
//! matches when both axis differences are within the tolerance (inclusive).
//!
//! The join is an unindexed nested loop, O(planes x points). Plates carry tens
//! to low thousands of positions, so this is fast enough; a grid bucketed by
//! `tolerance` would be the way to scale it.
//!
//! No disambiguation is performed: a plane may match several points and a point
//! several planes. One-to-one results require positions spaced farther apart
//! than twice the tolerance.

use crate::records::{MatchRecord, PlaneRecord, PointRecord};

/// Default absolute tolerance, in stage coordinate units
pub const DEFAULT_TOLERANCE: f64 = 1e-3;

/// Check whether two positions agree within `tolerance` on both axes
#[inline]
pub fn within_tolerance(ax: f64, ay: f64, bx: f64, by: f64, tolerance: f64) -> bool {
    (ax - bx).abs() <= tolerance && (ay - by).abs() <= tolerance
}

/// Emit one [`MatchRecord`] for every (plane, point) pair within `tolerance`.
///
/// Output order is plane-major, then point order, mirroring the input order.
pub fn match_positions(
    planes: &[PlaneRecord],
    points: &[PointRecord],
    tolerance: f64,
) -> Vec<MatchRecord> {
    let mut matches = Vec::new();
    for plane in planes {
        for point in points {
            if within_tolerance(plane.x, plane.y, point.x, point.y, tolerance) {
                matches.push(MatchRecord::from_pair(plane, point));
            }
        }
    }
    matches
}
