use geo::Point;
use log::warn;

use crate::ProviderError;
use crate::model::FlowReading;
use crate::provider::{RetryPolicy, Transport, tomtom};

/// Fetches flow readings one sample point at a time
#[derive(Debug, Clone)]
pub struct FlowFetcher {
    policy: RetryPolicy,
}

impl Default for FlowFetcher {
    fn default() -> Self {
        Self::new(RetryPolicy::FLOW)
    }
}

impl FlowFetcher {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Flow reading at a single (lon, lat) point, with timeout and retry
    ///
    /// # Errors
    ///
    /// Returns the last provider error once retries are exhausted
    pub async fn fetch<T: Transport>(
        &self,
        transport: &T,
        point: Point<f64>,
        api_key: &str,
    ) -> Result<FlowReading, ProviderError> {
        let request = tomtom::flow_request(point, api_key);

        self.policy
            .run(|| async {
                let body = transport.get_json(&request).await?;
                tomtom::parse_flow(&body)
            })
            .await
    }

    /// Readings for all points, requested sequentially in order.
    ///
    /// Points whose request fails are skipped, so the result may be shorter
    /// than `points`.
    pub async fn fetch_all<T: Transport>(
        &self,
        transport: &T,
        points: &[Point<f64>],
        api_key: &str,
    ) -> Vec<FlowReading> {
        let mut readings = Vec::with_capacity(points.len());

        for &point in points {
            match self.fetch(transport, point, api_key).await {
                Ok(reading) => readings.push(reading),
                Err(e) => warn!("Flow call failed for {},{}: {e}", point.y(), point.x()),
            }
        }

        readings
    }
}
