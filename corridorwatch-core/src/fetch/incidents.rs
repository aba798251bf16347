use log::warn;

use crate::model::{BoundingBox, Incident};
use crate::provider::{Fetched, RetryPolicy, Transport, tomtom};

/// Fetches the incidents inside a corridor's bounding box
#[derive(Debug, Clone)]
pub struct IncidentFetcher {
    policy: RetryPolicy,
}

impl Default for IncidentFetcher {
    fn default() -> Self {
        Self::new(RetryPolicy::INCIDENTS)
    }
}

impl IncidentFetcher {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Incidents valid at present. Exhausted retries yield
    /// [`Fetched::Unavailable`], which aggregates as no incidents.
    pub async fn fetch<T: Transport>(
        &self,
        transport: &T,
        bbox: &BoundingBox,
        api_key: &str,
    ) -> Fetched<Vec<Incident>> {
        let request = tomtom::incidents_request(bbox, api_key);

        let result = self
            .policy
            .run(|| async {
                let body = transport.get_json(&request).await?;
                tomtom::parse_incidents(&body)
            })
            .await;

        if let Err(e) = &result {
            warn!("Incident call failed for {request}: {e}");
        }

        result.into()
    }
}
