//! Provider calls made during a poll: route, flow and incidents.
//!
//! Each fetcher owns its [`RetryPolicy`](crate::provider::RetryPolicy) and
//! degrades to an empty result instead of failing.

mod flow;
mod incidents;
mod route;

pub use flow::FlowFetcher;
pub use incidents::IncidentFetcher;
pub use route::RouteResolver;
