//! Geofencing incidents to a corridor
//!
//! An incident belongs to a corridor when one of its road numbers names the
//! corridor and it lies within a buffer of the corridor's route polyline.

use geo::LineString;

use crate::geometry::distance_to_polyline_meters;
use crate::model::{Incident, IncidentGeometry};

pub const DEFAULT_BUFFER_METERS: f64 = 300.0;

/// Strip everything but ASCII letters and digits and upper-case the rest,
/// so `"I-25"`, `"I 25"` and `"i25"` all become `"I25"`.
pub fn normalize_road(road: &str) -> String {
    road.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Incident filter for one corridor
#[derive(Debug, Clone)]
pub struct IncidentFilter<'a> {
    road: String,
    polyline: &'a LineString<f64>,
    buffer_meters: f64,
}

impl<'a> IncidentFilter<'a> {
    pub fn new(corridor_name: &str, polyline: &'a LineString<f64>, buffer_meters: f64) -> Self {
        Self {
            road: normalize_road(corridor_name),
            polyline,
            buffer_meters,
        }
    }

    pub fn matches(&self, incident: &Incident) -> bool {
        self.matches_road(incident) && self.within_buffer(&incident.geometry)
    }

    /// Any reported road number equal to the corridor's, after normalization
    pub fn matches_road(&self, incident: &Incident) -> bool {
        incident
            .road_numbers
            .iter()
            .any(|road| normalize_road(road) == self.road)
    }

    /// Some vertex of the incident within the buffer of the polyline.
    /// Always true when there is no polyline to measure against.
    pub fn within_buffer(&self, geometry: &IncidentGeometry) -> bool {
        if self.polyline.0.is_empty() {
            return true;
        }

        geometry
            .vertices()
            .into_iter()
            .any(|vertex| distance_to_polyline_meters(vertex, self.polyline) <= self.buffer_meters)
    }

    /// Incidents passing both predicates, in their original order
    pub fn apply(&self, incidents: Vec<Incident>) -> Vec<Incident> {
        incidents
            .into_iter()
            .filter(|incident| self.matches(incident))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use geo::{LineString, MultiLineString, Point};
    use serde_json::json;

    use super::*;
    use crate::geometry::distance::METERS_PER_DEGREE;

    fn incident(roads: &[&str], geometry: IncidentGeometry) -> Incident {
        Incident {
            road_numbers: roads.iter().map(|r| r.to_string()).collect(),
            geometry,
            raw: json!({}),
        }
    }

    /// Polyline along the equator with a point `meters` north of its middle
    fn equator_case(meters: f64) -> (LineString<f64>, IncidentGeometry) {
        let polyline = LineString::from(vec![(0.0, 0.0), (0.01, 0.0)]);
        let point = Point::new(0.005, meters / METERS_PER_DEGREE);
        (polyline, IncidentGeometry::Point(point))
    }

    #[test]
    fn test_normalize_road() {
        assert_eq!(normalize_road("I-25"), "I25");
        assert_eq!(normalize_road("I 25"), "I25");
        assert_eq!(normalize_road("i25"), "I25");
        assert_eq!(normalize_road(" US-36 (Boulder) "), "US36BOULDER");
        assert_eq!(normalize_road("--"), "");
    }

    #[test]
    fn test_road_match_variants() {
        let polyline = LineString::new(vec![]);
        let filter = IncidentFilter::new("I-25", &polyline, DEFAULT_BUFFER_METERS);
        let point = IncidentGeometry::Point(Point::new(0.0, 0.0));

        for road in ["I-25", "I 25", "i25"] {
            assert!(filter.matches_road(&incident(&[road], point.clone())), "{road}");
        }
        assert!(filter.matches_road(&incident(&["US-36", "I 25"], point.clone())));
        assert!(!filter.matches_road(&incident(&["I-225"], point.clone())));
        assert!(!filter.matches_road(&incident(&[], point)));
    }

    #[test]
    fn test_buffer_boundary_is_inclusive() {
        let (polyline, at_300) = equator_case(300.0);
        let filter = IncidentFilter::new("I-25", &polyline, DEFAULT_BUFFER_METERS);
        assert!(filter.within_buffer(&at_300));

        let (_, at_301) = equator_case(301.0);
        assert!(!filter.within_buffer(&at_301));
    }

    #[test]
    fn test_empty_polyline_skips_proximity() {
        let polyline = LineString::new(vec![]);
        let filter = IncidentFilter::new("I-25", &polyline, DEFAULT_BUFFER_METERS);
        let far_away = IncidentGeometry::Point(Point::new(120.0, -45.0));
        assert!(filter.within_buffer(&far_away));
        assert!(filter.within_buffer(&IncidentGeometry::Unsupported("Polygon".into())));
    }

    #[test]
    fn test_line_geometries_match_on_any_vertex() {
        let polyline = LineString::from(vec![(0.0, 0.0), (0.01, 0.0)]);
        let filter = IncidentFilter::new("I-25", &polyline, DEFAULT_BUFFER_METERS);

        let near = 100.0 / METERS_PER_DEGREE;
        let far = 0.1;
        let line = LineString::from(vec![(0.005, far), (0.005, near)]);
        assert!(filter.within_buffer(&IncidentGeometry::LineString(line.clone())));

        let multi = MultiLineString::new(vec![LineString::from(vec![(0.005, far)]), line]);
        assert!(filter.within_buffer(&IncidentGeometry::MultiLineString(multi)));

        let distant = LineString::from(vec![(0.005, far), (0.006, far)]);
        assert!(!filter.within_buffer(&IncidentGeometry::LineString(distant)));
    }

    #[test]
    fn test_unsupported_geometry_fails_proximity() {
        let polyline = LineString::from(vec![(0.0, 0.0), (0.01, 0.0)]);
        let filter = IncidentFilter::new("I-25", &polyline, DEFAULT_BUFFER_METERS);
        assert!(!filter.within_buffer(&IncidentGeometry::Unsupported("Polygon".into())));
    }

    #[test]
    fn test_duplicate_point_segments() {
        let polyline = LineString::from(vec![(0.0, 0.0), (0.0, 0.0), (0.01, 0.0)]);
        let filter = IncidentFilter::new("I-25", &polyline, DEFAULT_BUFFER_METERS);
        let (_, near) = equator_case(50.0);
        assert!(filter.within_buffer(&near));
    }

    #[test]
    fn test_apply_requires_both_predicates() {
        let polyline = LineString::from(vec![(0.0, 0.0), (0.01, 0.0)]);
        let filter = IncidentFilter::new("I-25", &polyline, DEFAULT_BUFFER_METERS);
        let (_, near) = equator_case(10.0);
        let (_, far) = equator_case(5_000.0);

        let kept = filter.apply(vec![
            incident(&["I25"], near.clone()),
            incident(&["I25"], far),
            incident(&["I70"], near),
        ]);
        assert_eq!(kept.len(), 1);
    }
}
