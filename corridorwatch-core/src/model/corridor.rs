//! Corridor definitions and their bounding boxes

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Spans narrower than this (in degrees) are widened by the same amount on
/// both sides so sampling never works on a zero-area box.
pub const DEGENERATE_SPAN_EPSILON: f64 = 1e-6;

/// A named road corridor, as configured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corridor {
    /// Corridor name, also used as the road number to match incidents against
    pub name: String,
    /// `"lat1,lon1,lat2,lon2"`, corners in any order
    pub bbox: String,
    /// Lowest functional road class (0 = motorway) kept during aggregation.
    /// Falls back to the global default when unset.
    #[serde(default)]
    pub max_road_class: Option<u8>,
}

impl Corridor {
    pub fn new(name: impl Into<String>, bbox: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bbox: bbox.into(),
            max_road_class: None,
        }
    }

    #[must_use]
    pub fn with_max_road_class(mut self, max_road_class: u8) -> Self {
        self.max_road_class = Some(max_road_class);
        self
    }

    /// Parses and normalizes the configured bounding box
    ///
    /// # Errors
    ///
    /// Returns an error if the box does not hold exactly four finite numbers
    pub fn bounding_box(&self) -> Result<BoundingBox, Error> {
        BoundingBox::parse(&self.bbox)
    }
}

/// Axis-sorted bounding box in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Parse `"lat1,lon1,lat2,lon2"` into a normalized box.
    ///
    /// Each pair is expected as latitude then longitude, but a pair whose
    /// first value cannot be a latitude (|v| > 90) while the second can is
    /// read as longitude, latitude instead.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBoundingBox`] on wrong arity or non-finite values
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let invalid = |reason: &str| Error::InvalidBoundingBox(raw.to_string(), reason.to_string());

        let values = raw
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| invalid(&e.to_string()))?;

        let [a, b, c, d] = values[..] else {
            return Err(invalid("expected 'lat1,lon1,lat2,lon2'"));
        };
        if values.iter().any(|v| !v.is_finite()) {
            return Err(invalid("coordinates must be finite"));
        }

        Ok(Self::from_corners(lat_lon_pair(a, b), lat_lon_pair(c, d)))
    }

    /// Build a box from two (lat, lon) corners in any order
    pub fn from_corners(first: (f64, f64), second: (f64, f64)) -> Self {
        let (mut min_lat, mut max_lat) = min_max(first.0, second.0);
        let (mut min_lon, mut max_lon) = min_max(first.1, second.1);

        if max_lat - min_lat < DEGENERATE_SPAN_EPSILON {
            min_lat -= DEGENERATE_SPAN_EPSILON;
            max_lat += DEGENERATE_SPAN_EPSILON;
        }
        if max_lon - min_lon < DEGENERATE_SPAN_EPSILON {
            min_lon -= DEGENERATE_SPAN_EPSILON;
            max_lon += DEGENERATE_SPAN_EPSILON;
        }

        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// Route start and diagonal origin, as a (lon, lat) point
    pub fn north_west(&self) -> Point<f64> {
        Point::new(self.min_lon, self.max_lat)
    }

    /// Route end and diagonal terminus, as a (lon, lat) point
    pub fn south_east(&self) -> Point<f64> {
        Point::new(self.max_lon, self.min_lat)
    }

    /// Render in the `minLon,minLat,maxLon,maxLat` order the incidents
    /// endpoint expects
    pub fn to_incidents_bbox(&self) -> String {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
            .map(decimal)
            .join(",")
    }
}

/// Plain decimal notation with at least one fractional digit, never an
/// exponent: `40.0`, `-0.000001`
fn decimal(value: f64) -> String {
    let mut text = value.to_string();
    if !text.contains('.') {
        text.push_str(".0");
    }
    text
}

fn lat_lon_pair(first: f64, second: f64) -> (f64, f64) {
    if first.abs() > 90.0 && second.abs() <= 90.0 {
        (second, first)
    } else {
        (first, second)
    }
}

fn min_max(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}
