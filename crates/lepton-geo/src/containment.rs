//! Point-in-polygon tests with closed-boundary semantics.
//!
//! A point lying exactly on an edge or vertex of a polygon counts as
//! inside. Holes are open: a point on a hole's ring is on the polygon's
//! boundary and therefore inside, a point strictly within a hole is
//! outside.

use geo::{Coord, LineString, Polygon};
use lepton_types::Coordinate;

use crate::to_coord;

/// Tolerance for the on-segment test, in degrees.
const EDGE_EPSILON: f64 = 1e-12;

/// Where a point lies relative to a ring or polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointPosition {
    /// Strictly inside.
    Inside,
    /// On an edge or vertex.
    OnBoundary,
    /// Strictly outside.
    Outside,
}

/// Whether `point` lies inside `polygon` or on its boundary.
pub fn point_in_polygon(point: Coordinate, polygon: &Polygon<f64>) -> bool {
    polygon_position(to_coord(point), polygon) != PointPosition::Outside
}

/// Classify `point` against a polygon with holes.
pub fn polygon_position(point: Coord<f64>, polygon: &Polygon<f64>) -> PointPosition {
    match ring_position(point, polygon.exterior()) {
        PointPosition::Inside => {}
        other => return other,
    }

    for hole in polygon.interiors() {
        match ring_position(point, hole) {
            PointPosition::Inside => return PointPosition::Outside,
            PointPosition::OnBoundary => return PointPosition::OnBoundary,
            PointPosition::Outside => {}
        }
    }

    PointPosition::Inside
}

/// Classify `point` against a single closed ring using even-odd ray casting.
///
/// The ray runs from the point towards `+x`. Each edge is half-open in `y`
/// so a ray through a vertex is counted once.
pub fn ring_position(point: Coord<f64>, ring: &LineString<f64>) -> PointPosition {
    let mut inside = false;

    for edge in ring.lines() {
        let (a, b) = (edge.start, edge.end);

        if on_segment(point, a, b) {
            return PointPosition::OnBoundary;
        }

        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = (point.y - a.y).mul_add((b.x - a.x) / (b.y - a.y), a.x);
            if point.x < x_cross {
                inside = !inside;
            }
        }
    }

    if inside {
        PointPosition::Inside
    } else {
        PointPosition::Outside
    }
}

fn on_segment(p: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> bool {
    let cross = (b.x - a.x).mul_add(p.y - a.y, -((b.y - a.y) * (p.x - a.x)));
    if cross.abs() > EDGE_EPSILON {
        return false;
    }

    p.x >= a.x.min(b.x) - EDGE_EPSILON
        && p.x <= a.x.max(b.x) + EDGE_EPSILON
        && p.y >= a.y.min(b.y) - EDGE_EPSILON
        && p.y <= a.y.max(b.y) + EDGE_EPSILON
}
