use geo::LineString;
use log::{debug, warn};

use crate::model::BoundingBox;
use crate::provider::{Fetched, RetryPolicy, Transport, tomtom};

/// Fetches the routed polyline across a corridor's bounding box
#[derive(Debug, Clone)]
pub struct RouteResolver {
    policy: RetryPolicy,
}

impl Default for RouteResolver {
    fn default() -> Self {
        Self::new(RetryPolicy::ROUTING)
    }
}

impl RouteResolver {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Route from the NW to the SE corner of `bbox`.
    ///
    /// Never fails: an exhausted or rejected request comes back as
    /// [`Fetched::Unavailable`] and the caller samples the diagonal instead.
    pub async fn resolve<T: Transport>(
        &self,
        transport: &T,
        bbox: &BoundingBox,
        api_key: &str,
    ) -> Fetched<LineString<f64>> {
        let request = tomtom::route_request(bbox.north_west(), bbox.south_east(), api_key);

        let result = self
            .policy
            .run(|| async {
                let body = transport.get_json(&request).await?;
                tomtom::parse_route(&body)
            })
            .await;

        match &result {
            Ok(polyline) => debug!("Route {request} has {} vertices", polyline.0.len()),
            Err(e) => warn!("Routing polyline failed for {request}: {e}, falling back to bbox diagonal"),
        }

        result.into()
    }
}
