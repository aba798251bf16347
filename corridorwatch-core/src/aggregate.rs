//! Reducing flow readings and incidents into a [`TrafficSample`]

use chrono::Utc;
use serde_json::{Value as JsonValue, json};

use crate::Error;
use crate::model::{FlowReading, Incident, RoadClass, TrafficSample};

/// Keep FRC0 and FRC1 unless configured otherwise
pub const DEFAULT_MAX_ROAD_CLASS: RoadClass = RoadClass::MAJOR_ROAD;

/// Arithmetic mean, `None` for no values
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Smallest value, `None` for no values
pub fn minimum(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

/// Corridor-quality filter on functional road class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoadClassFilter {
    /// Lowest grade still kept
    pub max_class: RoadClass,
}

impl Default for RoadClassFilter {
    fn default() -> Self {
        Self {
            max_class: DEFAULT_MAX_ROAD_CLASS,
        }
    }
}

impl RoadClassFilter {
    pub fn new(max_class: RoadClass) -> Self {
        Self { max_class }
    }

    /// Readings without a road class are never kept
    pub fn keeps(&self, reading: &FlowReading) -> bool {
        reading
            .road_class
            .is_some_and(|class| class <= self.max_class)
    }
}

/// Statistics of one corridor's readings, before they become a sample
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowSummary {
    pub avg_current_speed: Option<f64>,
    pub avg_freeflow_speed: Option<f64>,
    pub min_current_speed: Option<f64>,
    pub avg_confidence: Option<f64>,
}

impl FlowSummary {
    /// Each statistic is computed over the readings that carry that field,
    /// independently of the others.
    pub fn from_readings<'a>(readings: impl IntoIterator<Item = &'a FlowReading>) -> Self {
        let mut current = Vec::new();
        let mut free_flow = Vec::new();
        let mut confidence = Vec::new();

        for reading in readings {
            push_finite(&mut current, reading.current_speed);
            push_finite(&mut free_flow, reading.free_flow_speed);
            push_finite(&mut confidence, reading.confidence);
        }

        Self {
            avg_current_speed: mean(&current),
            avg_freeflow_speed: mean(&free_flow),
            min_current_speed: minimum(&current),
            avg_confidence: mean(&confidence),
        }
    }
}

fn push_finite(values: &mut Vec<f64>, value: Option<f64>) {
    if let Some(v) = value.filter(|v| v.is_finite()) {
        values.push(v);
    }
}

/// Builds the persisted record for a corridor
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    road_classes: RoadClassFilter,
}

impl Aggregator {
    pub fn new(road_classes: RoadClassFilter) -> Self {
        Self { road_classes }
    }

    /// # Errors
    ///
    /// Returns an error if the incident collection cannot be serialized
    pub fn aggregate(
        &self,
        corridor: &str,
        readings: &[FlowReading],
        incidents: &[Incident],
    ) -> Result<TrafficSample, Error> {
        let summary = FlowSummary::from_readings(
            readings
                .iter()
                .filter(|reading| self.road_classes.keeps(reading)),
        );

        Ok(TrafficSample {
            corridor: corridor.to_string(),
            avg_current_speed: summary.avg_current_speed,
            avg_freeflow_speed: summary.avg_freeflow_speed,
            min_current_speed: summary.min_current_speed,
            confidence: summary.avg_confidence,
            incidents_json: incidents_json(incidents)?,
            points_sampled: readings.len(),
            polled_at: Utc::now(),
        })
    }
}

/// `{"incidents":[...]}` with each incident as the provider sent it
pub fn incidents_json(incidents: &[Incident]) -> Result<String, Error> {
    let raw: Vec<&JsonValue> = incidents.iter().map(|incident| &incident.raw).collect();
    Ok(serde_json::to_string(&json!({ "incidents": raw }))?)
}
