//! HTTP transport for the traffic provider

use std::time::Duration;

use corridorwatch_core::prelude::*;
use reqwest::Client;
use serde_json::Value as JsonValue;
use tracing::trace;

/// Upper bound for a single request. The poller's retry policies apply
/// tighter limits on top of this.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> reqwest::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("corridorwatch/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, request: &ProviderRequest) -> String {
        format!("{}{}", self.base_url, request.path)
    }
}

impl Transport for HttpTransport {
    async fn get_json(&self, request: &ProviderRequest) -> Result<JsonValue, ProviderError> {
        trace!("GET {request}");

        let response = self
            .client
            .get(self.url(request))
            .query(&request.query)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        response.json::<JsonValue>().await.map_err(classify)
    }
}

fn classify(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout
    } else if error.is_decode() {
        ProviderError::Malformed(error.to_string())
    } else if error.is_builder() {
        ProviderError::InvalidRequest(error.to_string())
    } else if let Some(status) = error.status() {
        ProviderError::Status(status.as_u16())
    } else {
        ProviderError::Io(error.to_string())
    }
}
