//! Geometry kernel for the Lepton query service.
//!
//! Pure, side-effect-free primitives over WGS 84 longitude/latitude
//! coordinates:
//!
//! - [`containment`] -- closed-boundary point-in-polygon tests
//! - [`geodesic`] -- haversine distance, destination points, and
//!   geodesic point buffers
//! - [`boundary`] -- [`Boundary`], a union of polygons used as the spatial
//!   filter for place queries
//!
//! Nothing in this crate fails at runtime. Malformed numeric input (NaN,
//! out-of-range coordinates) is rejected by callers before it gets here.

pub mod boundary;
pub mod containment;
pub mod geodesic;

pub use boundary::Boundary;
pub use containment::{PointPosition, point_in_polygon, polygon_position};
pub use geodesic::{EARTH_RADIUS_M, MIN_SEGMENTS, buffer_point, destination, distance};

use geo::Coord;
use lepton_types::Coordinate;

/// Convert a [`Coordinate`] into a planar `x = lon, y = lat` [`Coord`].
pub const fn to_coord(point: Coordinate) -> Coord<f64> {
    Coord {
        x: point.longitude,
        y: point.latitude,
    }
}
