//! Traffic provider access
//!
//! The core never talks HTTP itself. Requests are described as
//! [`ProviderRequest`]s and handed to a [`Transport`], which returns the
//! decoded JSON body or a classified [`ProviderError`].

pub mod retry;
pub mod tomtom;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde_json::Value as JsonValue;

pub use retry::{RetryPolicy, TimeoutScope};

use crate::ProviderError;

/// A GET request against the provider's base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    /// Path below the base URL, starting with `/`
    pub path: String,
    /// Query parameters, unencoded
    pub query: Vec<(&'static str, String)>,
}

impl ProviderRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    #[must_use]
    pub fn param(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.query.push((name, value.into()));
        self
    }

    #[cfg(test)]
    pub(crate) fn get_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

// Never prints the API key
impl fmt::Display for ProviderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        let mut separator = '?';
        for (name, value) in self.query.iter().filter(|(name, _)| *name != "key") {
            write!(f, "{separator}{name}={value}")?;
            separator = '&';
        }
        Ok(())
    }
}

/// Request/response client for the traffic provider
pub trait Transport: Send + Sync {
    /// Perform the request and decode the body as JSON.
    ///
    /// Non-2xx responses must be reported as [`ProviderError::Status`].
    fn get_json(
        &self,
        request: &ProviderRequest,
    ) -> impl Future<Output = Result<JsonValue, ProviderError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn get_json(
        &self,
        request: &ProviderRequest,
    ) -> impl Future<Output = Result<JsonValue, ProviderError>> + Send {
        self.as_ref().get_json(request)
    }
}

/// Outcome of a best-effort fetch. `Unavailable` is a normal result that
/// callers treat like an empty one.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Available(T),
    Unavailable(ProviderError),
}

impl<T> Fetched<T> {
    #[cfg(test)]
    pub(crate) fn is_available(&self) -> bool {
        matches!(self, Fetched::Available(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Fetched::Available(value) => Some(value),
            Fetched::Unavailable(_) => None,
        }
    }
}

impl<T: Default> Fetched<T> {
    pub fn unwrap_or_empty(self) -> T {
        self.ok().unwrap_or_default()
    }
}

impl<T> From<Result<T, ProviderError>> for Fetched<T> {
    fn from(result: Result<T, ProviderError>) -> Self {
        match result {
            Ok(value) => Fetched::Available(value),
            Err(e) => Fetched::Unavailable(e),
        }
    }
}
