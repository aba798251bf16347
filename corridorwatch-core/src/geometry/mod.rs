//! Corridor geometry: route polylines, sample points and distances

pub mod distance;
pub mod sampling;

pub use distance::{distance_to_polyline_meters, point_to_segment_meters};
pub use sampling::{sample_along_polyline, sample_bbox_diagonal, sample_points};

use geo::{LineString, Point};

/// Route polyline of a corridor together with the points sampled along it
#[derive(Debug, Clone, PartialEq)]
pub struct RouteGeometry {
    /// Routed path, (lon, lat). Empty when no route was available.
    pub polyline: LineString<f64>,
    pub samples: Vec<Point<f64>>,
}

impl RouteGeometry {
    pub fn new(polyline: LineString<f64>, samples: Vec<Point<f64>>) -> Self {
        Self { polyline, samples }
    }

    pub fn has_route(&self) -> bool {
        !self.polyline.0.is_empty()
    }
}
