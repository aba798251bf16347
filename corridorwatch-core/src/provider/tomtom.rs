//! Request builders and response decoding for the TomTom routing, flow and
//! incident endpoints.
//!
//! Decoding is lenient: missing or mistyped fields become `None`, and only a
//! response without the expected top-level structure is reported as
//! [`ProviderError::Malformed`].

use geo::{Coord, LineString, MultiLineString, Point};
use serde_json::Value as JsonValue;

use super::ProviderRequest;
use crate::ProviderError;
use crate::model::{BoundingBox, FlowReading, Incident, IncidentGeometry};

pub const DEFAULT_BASE_URL: &str = "https://api.tomtom.com";

/// Field selection for the incidents endpoint: road numbers, icon, delay
/// and geometry are all the geofilter and the stored record need.
pub const INCIDENT_FIELDS: &str =
    "{incidents{properties{roadNumbers,iconCategory,delay},geometry{type,coordinates}}}";

/// Traffic-aware route between two (lon, lat) points avoiding unpaved roads
pub fn route_request(start: Point<f64>, end: Point<f64>, api_key: &str) -> ProviderRequest {
    let path = format!(
        "/routing/1/calculateRoute/{:.6},{:.6}:{:.6},{:.6}/json",
        start.y(),
        start.x(),
        end.y(),
        end.x()
    );

    ProviderRequest::new(path)
        .param("traffic", "true")
        .param("avoid", "unpavedRoads")
        .param("key", api_key)
}

/// Flow segment data for the road closest to a (lon, lat) point
pub fn flow_request(point: Point<f64>, api_key: &str) -> ProviderRequest {
    ProviderRequest::new("/traffic/services/4/flowSegmentData/absolute/10/json")
        .param("point", format!("{},{}", point.y(), point.x()))
        .param("unit", "mph")
        .param("key", api_key)
}

/// Incidents currently valid inside the box
pub fn incidents_request(bbox: &BoundingBox, api_key: &str) -> ProviderRequest {
    ProviderRequest::new("/traffic/services/5/incidentDetails")
        .param("bbox", bbox.to_incidents_bbox())
        .param("timeValidityFilter", "present")
        .param("fields", INCIDENT_FIELDS)
        .param("key", api_key)
}

/// Route polyline from `routes[0].legs[0].points`, as (lon, lat).
/// Vertices missing a coordinate are skipped.
pub fn parse_route(body: &JsonValue) -> Result<LineString<f64>, ProviderError> {
    let points = body
        .pointer("/routes/0/legs/0/points")
        .and_then(JsonValue::as_array)
        .ok_or_else(|| ProviderError::Malformed("route response has no leg points".into()))?;

    let coords = points
        .iter()
        .filter_map(|point| {
            let lat = point.get("latitude")?.as_f64()?;
            let lon = point.get("longitude")?.as_f64()?;
            Some(Coord { x: lon, y: lat })
        })
        .collect::<Vec<_>>();

    Ok(LineString::new(coords))
}

/// A single flow reading from `flowSegmentData`
pub fn parse_flow(body: &JsonValue) -> Result<FlowReading, ProviderError> {
    let flow = body
        .get("flowSegmentData")
        .filter(|flow| flow.is_object())
        .ok_or_else(|| ProviderError::Malformed("flow response has no flowSegmentData".into()))?;

    Ok(FlowReading {
        current_speed: flow.get("currentSpeed").and_then(JsonValue::as_f64),
        free_flow_speed: flow.get("freeFlowSpeed").and_then(JsonValue::as_f64),
        confidence: flow.get("confidence").and_then(JsonValue::as_f64),
        road_class: flow
            .get("frc")
            .and_then(JsonValue::as_str)
            .and_then(|frc| frc.parse().ok()),
    })
}

/// All incidents of an incident details response
pub fn parse_incidents(body: &JsonValue) -> Result<Vec<Incident>, ProviderError> {
    let incidents = body
        .get("incidents")
        .and_then(JsonValue::as_array)
        .ok_or_else(|| ProviderError::Malformed("incident response has no incidents".into()))?;

    Ok(incidents.iter().map(parse_incident).collect())
}

fn parse_incident(raw: &JsonValue) -> Incident {
    let road_numbers = raw
        .pointer("/properties/roadNumbers")
        .and_then(JsonValue::as_array)
        .map(|numbers| {
            numbers
                .iter()
                .filter_map(|number| match number {
                    JsonValue::String(s) => Some(s.clone()),
                    JsonValue::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    let geometry = raw
        .get("geometry")
        .map_or_else(|| IncidentGeometry::Unsupported(String::new()), parse_geometry);

    Incident {
        road_numbers,
        geometry,
        raw: raw.clone(),
    }
}

fn parse_geometry(geometry: &JsonValue) -> IncidentGeometry {
    let kind = geometry
        .get("type")
        .and_then(JsonValue::as_str)
        .unwrap_or_default();
    let coordinates = geometry.get("coordinates");

    let parsed = match kind {
        "Point" => coordinates
            .and_then(parse_position)
            .map(|coord| IncidentGeometry::Point(coord.into())),
        "LineString" => coordinates
            .and_then(parse_line)
            .map(IncidentGeometry::LineString),
        "MultiLineString" => coordinates
            .and_then(JsonValue::as_array)
            .map(|lines| {
                lines
                    .iter()
                    .filter_map(parse_line)
                    .collect::<Vec<_>>()
            })
            .map(|lines| IncidentGeometry::MultiLineString(MultiLineString::new(lines))),
        _ => None,
    };

    parsed.unwrap_or_else(|| IncidentGeometry::Unsupported(kind.to_string()))
}

/// `[lon, lat, ...]`
fn parse_position(position: &JsonValue) -> Option<Coord<f64>> {
    let values = position.as_array()?;
    let lon = values.first()?.as_f64()?;
    let lat = values.get(1)?.as_f64()?;
    Some(Coord { x: lon, y: lat })
}

fn parse_line(line: &JsonValue) -> Option<LineString<f64>> {
    let positions = line.as_array()?;
    Some(LineString::new(
        positions.iter().filter_map(parse_position).collect(),
    ))
}
