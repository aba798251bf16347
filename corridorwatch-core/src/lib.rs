//! Corridor traffic polling
//!
//! Resolves a route for each configured corridor once, then on every poll
//! samples flow along it, geofences incidents to it and reduces the result
//! into a [`TrafficSample`] handed to a [`SampleStore`].

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod geometry;
pub mod model;
pub mod poll;
pub mod prelude;
pub mod provider;

#[cfg(test)]
mod testing;

pub use error::{Error, ProviderError};
pub use model::{BoundingBox, Corridor, TrafficSample};
pub use poll::{Poller, SampleStore};
