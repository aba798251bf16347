//! Test doubles shared by the unit tests of this crate

use std::sync::Mutex;

use serde_json::{Value as JsonValue, json};

use crate::ProviderError;
use crate::provider::{ProviderRequest, Transport};

type Handler = Box<dyn Fn(&ProviderRequest) -> Result<JsonValue, ProviderError> + Send + Sync>;

/// Transport answering every request through a closure and recording what
/// was asked
pub(crate) struct ScriptedTransport {
    handler: Handler,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new(
        handler: impl Fn(&ProviderRequest) -> Result<JsonValue, ProviderError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, path_prefix: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|request| request.path.starts_with(path_prefix))
            .count()
    }
}

impl Transport for ScriptedTransport {
    async fn get_json(&self, request: &ProviderRequest) -> Result<JsonValue, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());
        (self.handler)(request)
    }
}

pub(crate) const ROUTE_PREFIX: &str = "/routing/";
pub(crate) const FLOW_PREFIX: &str = "/traffic/services/4/";
pub(crate) const INCIDENTS_PREFIX: &str = "/traffic/services/5/";

pub(crate) fn flow_body(frc: &str, current: f64, free_flow: f64) -> JsonValue {
    json!({
        "flowSegmentData": {
            "frc": frc,
            "currentSpeed": current,
            "freeFlowSpeed": free_flow
        }
    })
}

pub(crate) fn route_body(points: &[(f64, f64)]) -> JsonValue {
    let points: Vec<_> = points
        .iter()
        .map(|(lat, lon)| json!({"latitude": lat, "longitude": lon}))
        .collect();
    json!({"routes": [{"legs": [{"points": points}]}]})
}
