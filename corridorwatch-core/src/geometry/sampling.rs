//! Choosing sample points along a corridor

use geo::{Coord, Distance, Haversine, LineString, Point};

use crate::model::BoundingBox;

/// Place `count` points evenly by distance along the polyline, strictly
/// between its endpoints.
///
/// Targets sit at `i * total / (count + 1)` for `i = 1..=count`, with the
/// length measured as great-circle metres along each segment. Returns
/// nothing for polylines with fewer than two vertices or zero length.
pub fn sample_along_polyline(polyline: &LineString<f64>, count: usize) -> Vec<Point<f64>> {
    let vertices = &polyline.0;
    if vertices.len() < 2 || count == 0 {
        return Vec::new();
    }

    let mut cumulative = Vec::with_capacity(vertices.len());
    cumulative.push(0.0);
    for pair in vertices.windows(2) {
        let last = cumulative[cumulative.len() - 1];
        cumulative.push(last + Haversine.distance(Point::from(pair[0]), Point::from(pair[1])));
    }

    let total = cumulative[cumulative.len() - 1];
    if total <= 0.0 {
        return Vec::new();
    }

    let step = total / (count + 1) as f64;
    let last_segment = vertices.len() - 2;

    let mut segment = 0;
    (1..=count)
        .map(|i| {
            let target = i as f64 * step;
            // targets increase, so the bracketing segment only moves forward
            while segment < last_segment && cumulative[segment + 1] < target {
                segment += 1;
            }

            let length = cumulative[segment + 1] - cumulative[segment];
            let t = if length == 0.0 {
                0.0
            } else {
                (target - cumulative[segment]) / length
            };
            interpolate(vertices[segment], vertices[segment + 1], t)
        })
        .collect()
}

/// Place `count` points on the straight NW to SE diagonal of the box,
/// corners included. A single point lands on the midpoint.
pub fn sample_bbox_diagonal(bbox: &BoundingBox, count: usize) -> Vec<Point<f64>> {
    let start = bbox.north_west().0;
    let end = bbox.south_east().0;

    (0..count)
        .map(|i| {
            let t = if count == 1 {
                0.5
            } else {
                i as f64 / (count - 1) as f64
            };
            interpolate(start, end, t)
        })
        .collect()
}

/// Polyline samples, or the bbox diagonal when the polyline yields none
pub fn sample_points(polyline: &LineString<f64>, bbox: &BoundingBox, count: usize) -> Vec<Point<f64>> {
    let samples = sample_along_polyline(polyline, count);
    if samples.is_empty() {
        sample_bbox_diagonal(bbox, count)
    } else {
        samples
    }
}

fn interpolate(a: Coord<f64>, b: Coord<f64>, t: f64) -> Point<f64> {
    Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bbox() -> BoundingBox {
        BoundingBox::parse("39.8,-105.2,39.6,-104.9").unwrap()
    }

    #[test]
    fn test_diagonal_single_point_is_midpoint() {
        let points = sample_bbox_diagonal(&bbox(), 1);
        assert_eq!(points.len(), 1);
        assert_relative_eq!(points[0].y(), 39.7, epsilon = 1e-12);
        assert_relative_eq!(points[0].x(), -105.05, epsilon = 1e-12);
    }

    #[test]
    fn test_diagonal_is_monotonic() {
        let points = sample_bbox_diagonal(&bbox(), 5);
        assert_eq!(points.len(), 5);
        assert_eq!(points[0], bbox().north_west());
        assert_relative_eq!(points[4].x(), bbox().south_east().x(), epsilon = 1e-12);
        assert_relative_eq!(points[4].y(), bbox().south_east().y(), epsilon = 1e-12);

        for pair in points.windows(2) {
            assert!(pair[1].y() < pair[0].y());
            assert!(pair[1].x() > pair[0].x());
        }
    }

    #[test]
    fn test_diagonal_zero_count() {
        assert!(sample_bbox_diagonal(&bbox(), 0).is_empty());
    }

    #[test]
    fn test_polyline_samples_are_interior() {
        let polyline = LineString::from(vec![(-105.0, 39.0), (-105.0, 39.5), (-104.5, 39.5)]);
        let points = sample_along_polyline(&polyline, 7);
        assert_eq!(points.len(), 7);

        let first = Point::from(polyline.0[0]);
        let last = Point::from(polyline.0[2]);
        for point in &points {
            assert_ne!(*point, first);
            assert_ne!(*point, last);
        }
    }

    #[test]
    fn test_polyline_samples_evenly_spaced() {
        // straight north-south line, 1 degree long: 3 samples at quarters
        let polyline = LineString::from(vec![(-105.0, 39.0), (-105.0, 40.0)]);
        let points = sample_along_polyline(&polyline, 3);
        assert_eq!(points.len(), 3);
        assert_relative_eq!(points[0].y(), 39.25, epsilon = 1e-9);
        assert_relative_eq!(points[1].y(), 39.5, epsilon = 1e-9);
        assert_relative_eq!(points[2].y(), 39.75, epsilon = 1e-9);
    }

    #[test]
    fn test_spacing_follows_great_circle_length() {
        // a degree of longitude at 60N is half as long as a degree of
        // latitude, so the midpoint lands about 28 km along the east leg
        let polyline = LineString::from(vec![(10.0, 59.0), (10.0, 60.0), (13.0, 60.0)]);
        let points = sample_along_polyline(&polyline, 1);

        let first_leg = Haversine.distance(Point::new(10.0, 59.0), Point::new(10.0, 60.0));
        let second_leg = Haversine.distance(Point::new(10.0, 60.0), Point::new(13.0, 60.0));
        let overshoot = (first_leg + second_leg) / 2.0 - first_leg;

        assert_relative_eq!(points[0].y(), 60.0, epsilon = 1e-12);
        let walked = Haversine.distance(Point::new(10.0, 60.0), points[0]);
        assert_relative_eq!(walked, overshoot, max_relative = 1e-3);
    }

    #[test]
    fn test_polyline_with_duplicate_vertices() {
        let polyline = LineString::from(vec![
            (-105.0, 39.0),
            (-105.0, 39.0),
            (-105.0, 40.0),
            (-105.0, 40.0),
        ]);
        let points = sample_along_polyline(&polyline, 1);
        assert_eq!(points.len(), 1);
        assert_relative_eq!(points[0].y(), 39.5, epsilon = 1e-9);
        assert!(points[0].y().is_finite());
    }

    #[test]
    fn test_degenerate_polylines_yield_nothing() {
        assert!(sample_along_polyline(&LineString::new(vec![]), 5).is_empty());
        assert!(sample_along_polyline(&LineString::from(vec![(1.0, 1.0)]), 5).is_empty());
        let collapsed = LineString::from(vec![(1.0, 1.0), (1.0, 1.0), (1.0, 1.0)]);
        assert!(sample_along_polyline(&collapsed, 5).is_empty());
        let line = LineString::from(vec![(1.0, 1.0), (1.0, 2.0)]);
        assert!(sample_along_polyline(&line, 0).is_empty());
    }

    #[test]
    fn test_sample_points_falls_back_to_diagonal() {
        let points = sample_points(&LineString::new(vec![]), &bbox(), 5);
        assert_eq!(points, sample_bbox_diagonal(&bbox(), 5));

        let polyline = LineString::from(vec![(-105.0, 39.0), (-105.0, 40.0)]);
        let points = sample_points(&polyline, &bbox(), 3);
        assert_relative_eq!(points[1].y(), 39.5, epsilon = 1e-9);
    }
}
