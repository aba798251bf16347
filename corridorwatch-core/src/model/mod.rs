//! Data model for corridor polling
//!
//! Corridors come from configuration; readings and incidents are ephemeral
//! provider data; a [`TrafficSample`] is what gets persisted.

pub mod corridor;
pub mod flow;
pub mod incident;
pub mod sample;

pub use corridor::{BoundingBox, Corridor, DEGENERATE_SPAN_EPSILON};
pub use flow::{FlowReading, RoadClass};
pub use incident::{Incident, IncidentGeometry};
pub use sample::TrafficSample;
