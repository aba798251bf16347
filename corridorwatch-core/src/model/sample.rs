use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Corridor-level result of one poll, as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficSample {
    pub corridor: String,
    pub avg_current_speed: Option<f64>,
    pub avg_freeflow_speed: Option<f64>,
    pub min_current_speed: Option<f64>,
    /// Average confidence across the sampled points
    pub confidence: Option<f64>,
    /// `{"incidents":[...]}` holding the incidents that passed the geofilter
    pub incidents_json: String,
    /// Flow readings received for this poll, before road class filtering
    pub points_sampled: usize,
    pub polled_at: DateTime<Utc>,
}

impl TrafficSample {
    /// Number of incidents in the serialized collection
    pub fn incident_count(&self) -> usize {
        serde_json::from_str::<serde_json::Value>(&self.incidents_json)
            .ok()
            .and_then(|value| value.get("incidents")?.as_array().map(Vec::len))
            .unwrap_or(0)
    }
}
