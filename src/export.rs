//! GeoJSON rendering of cached corridor geometry

use anyhow::Result;
use corridorwatch_core::prelude::*;
use geo::MultiPoint;
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

/// The route polyline (when one was routed) and the flow sample points
pub fn geometry_to_geojson(corridor: &str, geometry: &RouteGeometry) -> Result<FeatureCollection> {
    let mut features = Vec::with_capacity(2);

    if geometry.has_route() {
        features.push(feature(
            Geometry::new(GeoJsonValue::from(&geometry.polyline)),
            json!({
                "corridor": corridor,
                "kind": "route",
                "vertices": geometry.polyline.0.len(),
            }),
        )?);
    }

    let samples = MultiPoint::new(geometry.samples.clone());
    features.push(feature(
        Geometry::new(GeoJsonValue::from(&samples)),
        json!({
            "corridor": corridor,
            "kind": "samples",
            "count": geometry.samples.len(),
        }),
    )?);

    Ok(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    })
}

fn feature(geometry: Geometry, properties: serde_json::Value) -> Result<Feature> {
    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": properties,
    });
    Ok(serde_json::from_value::<Feature>(value)?)
}
