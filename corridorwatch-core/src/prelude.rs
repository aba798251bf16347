pub use crate::{Error, ProviderError};

// Configuration and the poll loop
pub use crate::config::TrafficConfig;
pub use crate::poll::{CorridorOutcome, CorridorReport, CycleReport, PollState, Poller, SampleStore};

// Provider seam
pub use crate::provider::{ProviderRequest, Transport};

// Geometry shared with readers
pub use crate::cache::GeometryCache;
pub use crate::geometry::RouteGeometry;
pub use crate::model::{BoundingBox, Corridor, TrafficSample};
