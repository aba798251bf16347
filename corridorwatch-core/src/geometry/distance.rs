//! Distance helpers on (lon, lat) coordinates

use geo::{Coord, LineString};

/// Metres per degree of latitude in the local planar approximation
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Distance in metres from `point` to the segment `a`-`b`.
///
/// Both ends are projected onto a plane centred on `point` where a degree of
/// longitude shrinks with `cos(lat)`. Good enough for buffers of a few
/// hundred metres.
pub fn point_to_segment_meters(point: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> f64 {
    let m_lat = METERS_PER_DEGREE;
    let m_lon = METERS_PER_DEGREE * point.y.to_radians().cos();

    // point sits at the origin
    let ax = (a.x - point.x) * m_lon;
    let ay = (a.y - point.y) * m_lat;
    let bx = (b.x - point.x) * m_lon;
    let by = (b.y - point.y) * m_lat;

    let vx = bx - ax;
    let vy = by - ay;
    let len2 = vx * vx + vy * vy;
    if len2 == 0.0 {
        return ax.hypot(ay);
    }

    let t = (-(ax * vx + ay * vy) / len2).clamp(0.0, 1.0);
    (ax + t * vx).hypot(ay + t * vy)
}

/// Minimum distance in metres from `point` to any segment of `polyline`.
/// Infinite when the polyline has no segments.
pub fn distance_to_polyline_meters(point: Coord<f64>, polyline: &LineString<f64>) -> f64 {
    polyline
        .lines()
        .map(|segment| point_to_segment_meters(point, segment.start, segment.end))
        .fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::coord;

    #[test]
    fn test_point_to_segment_projects_inside() {
        // segment along the equator, point 0.001 deg north of its middle
        let a = coord! { x: 0.0, y: 0.0 };
        let b = coord! { x: 0.01, y: 0.0 };
        let p = coord! { x: 0.005, y: 0.001 };
        assert_relative_eq!(point_to_segment_meters(p, a, b), 111.32, epsilon = 1e-6);
    }

    #[test]
    fn test_point_to_segment_clamps_to_endpoint() {
        let a = coord! { x: 0.0, y: 0.0 };
        let b = coord! { x: 0.01, y: 0.0 };
        let p = coord! { x: 0.02, y: 0.0 };
        assert_relative_eq!(point_to_segment_meters(p, a, b), 1113.2, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_length_segment() {
        let a = coord! { x: 0.0, y: 0.0 };
        let p = coord! { x: 0.0, y: 0.001 };
        let d = point_to_segment_meters(p, a, a);
        assert!(d.is_finite());
        assert_relative_eq!(d, 111.32, epsilon = 1e-6);
    }

    #[test]
    fn test_polyline_distance_takes_minimum() {
        let line = LineString::from(vec![(0.0, 0.0), (0.01, 0.0), (0.01, 0.01)]);
        let p = coord! { x: 0.011, y: 0.005 };
        let d = distance_to_polyline_meters(p, &line);
        let expected = 0.001 * METERS_PER_DEGREE * 0.005_f64.to_radians().cos();
        assert_relative_eq!(d, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_polyline_without_segments() {
        let p = coord! { x: 0.0, y: 0.0 };
        assert!(distance_to_polyline_meters(p, &LineString::new(vec![])).is_infinite());
        assert!(distance_to_polyline_meters(p, &LineString::from(vec![(0.0, 0.0)])).is_infinite());
    }
}
