use geo::{Coord, LineString, MultiLineString, Point};
use serde_json::Value as JsonValue;

/// Incident geometry in (lon, lat) order
#[derive(Debug, Clone, PartialEq)]
pub enum IncidentGeometry {
    Point(Point<f64>),
    LineString(LineString<f64>),
    MultiLineString(MultiLineString<f64>),
    /// Any other geometry type, or one whose coordinates could not be read
    Unsupported(String),
}

impl IncidentGeometry {
    /// All vertices of the geometry. Empty for unsupported geometries.
    pub fn vertices(&self) -> Vec<Coord<f64>> {
        match self {
            IncidentGeometry::Point(point) => vec![point.0],
            IncidentGeometry::LineString(line) => line.0.clone(),
            IncidentGeometry::MultiLineString(lines) => {
                lines.iter().flat_map(|line| line.0.iter().copied()).collect()
            }
            IncidentGeometry::Unsupported(_) => Vec::new(),
        }
    }
}

/// A provider-reported traffic incident
#[derive(Debug, Clone, PartialEq)]
pub struct Incident {
    pub road_numbers: Vec<String>,
    pub geometry: IncidentGeometry,
    /// The incident object exactly as the provider returned it
    pub raw: JsonValue,
}
