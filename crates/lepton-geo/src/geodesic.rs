//! Spherical-earth distances, destination points, and point buffers.
//!
//! All formulas use a sphere of radius [`EARTH_RADIUS_M`] (the IUGG mean
//! radius). Over catchment-sized distances the error against the WGS 84
//! ellipsoid stays well under half a percent.

use core::f64::consts::PI;

use geo::{Coord, LineString, Polygon};
use lepton_types::Coordinate;

/// Mean earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Minimum number of ring vertices for a buffered point.
pub const MIN_SEGMENTS: usize = 32;

/// Below this angular distance (radians) from a pole the centre is treated
/// as sitting exactly on it.
const POLE_EPSILON: f64 = 1e-9;

/// Great-circle distance in metres between two coordinates (haversine).
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = phi2 - phi1;
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let sin_phi = (d_phi / 2.0).sin();
    let sin_lambda = (d_lambda / 2.0).sin();
    let h = (phi1.cos() * phi2.cos())
        .mul_add(sin_lambda * sin_lambda, sin_phi * sin_phi)
        .clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// The point reached by travelling `distance_m` metres from `origin` along
/// the initial bearing `bearing_deg` (clockwise from north).
///
/// The returned longitude is *not* wrapped: it is `origin.longitude` plus
/// a delta in `(-180, 180]`, so consecutive destinations around one centre
/// form a continuous ring even across the antimeridian.
pub fn destination(origin: Coordinate, bearing_deg: f64, distance_m: f64) -> Coordinate {
    let delta = distance_m / EARTH_RADIUS_M;
    let theta = bearing_deg.to_radians();
    let phi1 = origin.latitude.to_radians();

    let sin_phi2 = phi1
        .sin()
        .mul_add(delta.cos(), phi1.cos() * delta.sin() * theta.cos())
        .clamp(-1.0, 1.0);
    let phi2 = sin_phi2.asin();
    let d_lambda = (theta.sin() * delta.sin() * phi1.cos())
        .atan2(phi1.sin().mul_add(-sin_phi2, delta.cos()));

    Coordinate::new(origin.longitude + d_lambda.to_degrees(), phi2.to_degrees())
}

/// Approximate a geodesic circle of `radius_m` metres around `center` as a
/// polygon with at least [`MIN_SEGMENTS`] vertices.
///
/// Vertices are true spherical destination points, so the ring widens in
/// longitude with latitude instead of being a planar circle in degrees.
///
/// - A circle crossing the antimeridian keeps continuous longitudes that
///   may exceed `±180`; [`Boundary`](crate::Boundary) accounts for the
///   shift when testing containment.
/// - A circle enclosing a pole becomes a polar cap: the ring is unrolled
///   from `-180` to `180` and closed along the pole's latitude.
/// - A circle reaching the antipode covers the whole globe.
pub fn buffer_point(center: Coordinate, radius_m: f64, segments: usize) -> Polygon<f64> {
    let segments = segments.max(MIN_SEGMENTS);
    let angular = radius_m / EARTH_RADIUS_M;

    if angular >= PI {
        return whole_globe();
    }

    let phi = center.latitude.to_radians();
    let to_north = PI / 2.0 - phi;
    let to_south = PI / 2.0 + phi;

    if to_north <= angular && to_south <= angular {
        return whole_globe();
    }
    if to_north <= angular {
        return polar_cap(center, radius_m, segments, 90.0);
    }
    if to_south <= angular {
        return polar_cap(center, radius_m, segments, -90.0);
    }

    let ring: Vec<Coord<f64>> = (0..segments)
        .map(|k| {
            let bearing = 360.0 * k as f64 / segments as f64;
            let p = destination(center, bearing, radius_m);
            Coord {
                x: p.longitude,
                y: p.latitude,
            }
        })
        .collect();

    Polygon::new(LineString::from(ring), vec![])
}

fn polar_cap(center: Coordinate, radius_m: f64, segments: usize, pole_lat: f64) -> Polygon<f64> {
    let angular_to_pole = (pole_lat - center.latitude).abs().to_radians();

    let mut ring: Vec<Coord<f64>> = if angular_to_pole < POLE_EPSILON {
        // Centred on the pole: the circle is a parallel.
        let lat = pole_lat - pole_lat.signum() * (radius_m / EARTH_RADIUS_M).to_degrees();
        (0..segments)
            .map(|k| Coord {
                x: (360.0 * k as f64 / segments as f64) - 180.0,
                y: lat,
            })
            .collect()
    } else {
        let mut points: Vec<Coord<f64>> = (0..segments)
            .map(|k| {
                let bearing = 360.0 * k as f64 / segments as f64;
                let p = destination(center, bearing, radius_m);
                Coord {
                    x: normalize_longitude(p.longitude),
                    y: p.latitude,
                }
            })
            .collect();
        points.sort_by(|a, b| a.x.total_cmp(&b.x));
        points
    };

    let seam = seam_latitude(&ring);
    ring.insert(0, Coord { x: -180.0, y: seam });
    ring.push(Coord { x: 180.0, y: seam });
    ring.push(Coord {
        x: 180.0,
        y: pole_lat,
    });
    ring.push(Coord {
        x: -180.0,
        y: pole_lat,
    });

    Polygon::new(LineString::from(ring), vec![])
}

/// Latitude where a longitude-sorted ring crosses the `±180` meridian,
/// interpolated between its last and first vertex.
fn seam_latitude(sorted: &[Coord<f64>]) -> f64 {
    match (sorted.first(), sorted.last()) {
        (Some(first), Some(last)) => {
            let span = (first.x + 360.0) - last.x;
            if span <= 0.0 {
                return last.y;
            }
            let t = (180.0 - last.x) / span;
            t.mul_add(first.y - last.y, last.y)
        }
        _ => 0.0,
    }
}

fn whole_globe() -> Polygon<f64> {
    Polygon::new(
        LineString::from(vec![
            (-180.0, -90.0),
            (180.0, -90.0),
            (180.0, 90.0),
            (-180.0, 90.0),
        ]),
        vec![],
    )
}

/// Wrap a longitude into `[-180, 180)`.
pub fn normalize_longitude(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}
