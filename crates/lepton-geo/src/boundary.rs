//! Spatial filters for place queries.
//!
//! A [`Boundary`] is a union of polygons: a place qualifies when its point
//! lies in *any* member polygon (closed-boundary semantics). Region
//! resolution and catchment building both produce one.

use geo::{BoundingRect, Coord, MultiPolygon, Polygon, Rect};
use lepton_types::Coordinate;

use crate::containment::{PointPosition, polygon_position};
use crate::to_coord;

/// A union of polygons used as a spatial filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Boundary {
    members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq)]
struct Member {
    polygon: Polygon<f64>,
    envelope: Rect<f64>,
}

impl Boundary {
    /// A boundary that contains nothing.
    pub const fn empty() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    /// A boundary consisting of a single polygon.
    pub fn from_polygon(polygon: Polygon<f64>) -> Self {
        let mut boundary = Self::empty();
        boundary.push(polygon);
        boundary
    }

    /// Add one polygon to the union. Empty polygons are ignored.
    pub fn push(&mut self, polygon: Polygon<f64>) {
        if let Some(envelope) = polygon.bounding_rect() {
            self.members.push(Member { polygon, envelope });
        }
    }

    /// Add every polygon of a multi-polygon to the union.
    pub fn extend_multi(&mut self, multi: &MultiPolygon<f64>) {
        for polygon in multi {
            self.push(polygon.clone());
        }
    }

    /// Merge another boundary into this one.
    pub fn union_with(&mut self, other: Self) {
        self.members.extend(other.members);
    }

    /// Whether the boundary contains no polygon at all.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of member polygons.
    pub fn polygon_count(&self) -> usize {
        self.members.len()
    }

    /// Whether `point` lies inside or on any member polygon.
    ///
    /// Polygons whose longitudes run past `±180` (antimeridian-crossing
    /// catchments) are also tested against the point shifted by `∓360`.
    pub fn contains(&self, point: Coordinate) -> bool {
        let coord = to_coord(point);
        self.members
            .iter()
            .any(|member| shifted(coord, &member.envelope).any(|c| member.contains(c)))
    }

    /// Longitude/latitude windows covering the boundary inside the
    /// `[-180, 180]` range, one or more per member polygon.
    ///
    /// A spatial index can use these to pre-select candidate points before
    /// the exact [`contains`](Self::contains) test.
    pub fn search_windows(&self) -> Vec<Rect<f64>> {
        let mut windows = Vec::with_capacity(self.members.len());
        for member in &self.members {
            let env = member.envelope;
            windows.push(env);
            if env.min().x < -180.0 {
                windows.push(shift_rect(env, 360.0));
            }
            if env.max().x > 180.0 {
                windows.push(shift_rect(env, -360.0));
            }
        }
        windows
    }
}

impl Member {
    fn contains(&self, coord: Coord<f64>) -> bool {
        coord.x >= self.envelope.min().x
            && coord.x <= self.envelope.max().x
            && coord.y >= self.envelope.min().y
            && coord.y <= self.envelope.max().y
            && polygon_position(coord, &self.polygon) != PointPosition::Outside
    }
}

impl From<Polygon<f64>> for Boundary {
    fn from(polygon: Polygon<f64>) -> Self {
        Self::from_polygon(polygon)
    }
}

impl From<&MultiPolygon<f64>> for Boundary {
    fn from(multi: &MultiPolygon<f64>) -> Self {
        let mut boundary = Self::empty();
        boundary.extend_multi(multi);
        boundary
    }
}

/// The point itself plus its `±360` images when the envelope extends past
/// the antimeridian.
fn shifted(coord: Coord<f64>, envelope: &Rect<f64>) -> impl Iterator<Item = Coord<f64>> {
    let west = (envelope.min().x < -180.0).then_some(Coord {
        x: coord.x - 360.0,
        y: coord.y,
    });
    let east = (envelope.max().x > 180.0).then_some(Coord {
        x: coord.x + 360.0,
        y: coord.y,
    });
    core::iter::once(coord).chain(west).chain(east)
}

fn shift_rect(rect: Rect<f64>, dx: f64) -> Rect<f64> {
    Rect::new(
        Coord {
            x: rect.min().x + dx,
            y: rect.min().y,
        },
        Coord {
            x: rect.max().x + dx,
            y: rect.max().y,
        },
    )
}

#[cfg(test)]
mod tests {
    use geo::polygon;

    use super::*;
    use crate::geodesic::buffer_point;

    fn square(x0: f64, y0: f64, size: f64) -> Polygon<f64> {
        polygon![
            (x: x0, y: y0),
            (x: x0 + size, y: y0),
            (x: x0 + size, y: y0 + size),
            (x: x0, y: y0 + size),
        ]
    }

    #[test]
    fn empty_boundary_contains_nothing() {
        let boundary = Boundary::empty();
        assert!(boundary.is_empty());
        assert!(!boundary.contains(Coordinate::new(0.0, 0.0)));
        assert!(boundary.search_windows().is_empty());
    }

    #[test]
    fn union_matches_any_member() {
        let mut boundary = Boundary::from_polygon(square(0.0, 0.0, 1.0));
        boundary.union_with(Boundary::from_polygon(square(5.0, 5.0, 1.0)));
        assert_eq!(boundary.polygon_count(), 2);
        assert!(boundary.contains(Coordinate::new(0.5, 0.5)));
        assert!(boundary.contains(Coordinate::new(5.5, 5.5)));
        assert!(!boundary.contains(Coordinate::new(3.0, 3.0)));
    }

    #[test]
    fn multipolygon_members_are_flattened() {
        let multi = MultiPolygon::new(vec![square(0.0, 0.0, 1.0), square(2.0, 0.0, 1.0)]);
        let boundary = Boundary::from(&multi);
        assert_eq!(boundary.polygon_count(), 2);
        assert!(boundary.contains(Coordinate::new(2.5, 0.5)));
    }

    #[test]
    fn closed_boundary_semantics_hold_for_the_union() {
        let boundary = Boundary::from_polygon(square(0.0, 0.0, 1.0));
        assert!(boundary.contains(Coordinate::new(1.0, 0.5)));
        assert!(boundary.contains(Coordinate::new(1.0, 1.0)));
    }

    #[test]
    fn antimeridian_catchment_matches_wrapped_points() {
        let boundary = Boundary::from_polygon(buffer_point(Coordinate::new(179.999, 0.0), 1_000.0, 64));
        assert!(boundary.contains(Coordinate::new(-179.998, 0.0)));
        assert!(boundary.contains(Coordinate::new(179.995, 0.0)));
        assert!(!boundary.contains(Coordinate::new(-179.98, 0.0)));

        let windows = boundary.search_windows();
        assert_eq!(windows.len(), 2);
        assert!(windows.iter().any(|w| w.min().x < -179.99 && w.max().x > -180.0));
    }
}
