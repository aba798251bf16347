//! One poll cycle across all configured corridors
//!
//! Corridors run one after another. Inside a corridor the flow requests and
//! the incident request run concurrently and are joined before aggregation.
//! A corridor that fails is reported and logged; the cycle moves on.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use log::{debug, error, info};

use crate::Error;
use crate::aggregate::{Aggregator, RoadClassFilter};
use crate::cache::GeometryCache;
use crate::config::TrafficConfig;
use crate::fetch::{FlowFetcher, IncidentFetcher, RouteResolver};
use crate::filter::IncidentFilter;
use crate::model::{Corridor, TrafficSample};
use crate::provider::Transport;

/// Sink for computed samples
pub trait SampleStore: Send + Sync {
    fn save(&self, sample: TrafficSample) -> impl Future<Output = Result<(), Error>> + Send;
}

impl<S: SampleStore> SampleStore for Arc<S> {
    fn save(&self, sample: TrafficSample) -> impl Future<Output = Result<(), Error>> + Send {
        self.as_ref().save(sample)
    }
}

/// Where a corridor's poll is, or where it stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    GeometryResolving,
    FetchingFlowsAndIncidents,
    Aggregating,
    Persisted,
    Failed,
}

impl fmt::Display for PollState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PollState::Idle => "idle",
            PollState::GeometryResolving => "resolving geometry",
            PollState::FetchingFlowsAndIncidents => "fetching flows and incidents",
            PollState::Aggregating => "aggregating",
            PollState::Persisted => "persisted",
            PollState::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub enum CorridorOutcome {
    Persisted(TrafficSample),
    /// `state` is the step that failed
    Failed { state: PollState, error: Error },
}

#[derive(Debug)]
pub struct CorridorReport {
    pub corridor: String,
    pub outcome: CorridorOutcome,
}

impl CorridorReport {
    pub fn state(&self) -> PollState {
        match self.outcome {
            CorridorOutcome::Persisted(_) => PollState::Persisted,
            CorridorOutcome::Failed { .. } => PollState::Failed,
        }
    }

    pub fn sample(&self) -> Option<&TrafficSample> {
        match &self.outcome {
            CorridorOutcome::Persisted(sample) => Some(sample),
            CorridorOutcome::Failed { .. } => None,
        }
    }
}

/// Per-corridor outcomes of one cycle, in configuration order
#[derive(Debug, Default)]
pub struct CycleReport {
    pub corridors: Vec<CorridorReport>,
}

impl CycleReport {
    pub fn persisted(&self) -> usize {
        self.corridors
            .iter()
            .filter(|report| report.state() == PollState::Persisted)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.corridors.len() - self.persisted()
    }

    pub fn get(&self, corridor: &str) -> Option<&CorridorReport> {
        self.corridors
            .iter()
            .find(|report| report.corridor == corridor)
    }
}

/// Drives poll cycles against a transport and a store
#[derive(Debug)]
pub struct Poller<T, S> {
    transport: T,
    store: S,
    config: TrafficConfig,
    cache: Arc<GeometryCache>,
    flows: FlowFetcher,
    incidents: IncidentFetcher,
}

impl<T: Transport, S: SampleStore> Poller<T, S> {
    pub fn new(transport: T, store: S, config: TrafficConfig) -> Self {
        let cache = GeometryCache::new(RouteResolver::default(), config.sample_points);
        Self {
            transport,
            store,
            config,
            cache: Arc::new(cache),
            flows: FlowFetcher::default(),
            incidents: IncidentFetcher::default(),
        }
    }

    pub fn config(&self) -> &TrafficConfig {
        &self.config
    }

    /// Shared with readers such as the geometry endpoint
    pub fn geometry_cache(&self) -> &Arc<GeometryCache> {
        &self.cache
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Poll every configured corridor once
    pub async fn poll_cycle(&self) -> CycleReport {
        let mut report = CycleReport::default();

        for corridor in &self.config.corridors {
            report.corridors.push(self.poll_corridor(corridor).await);
        }

        info!(
            "Poll cycle finished: {} persisted, {} failed",
            report.persisted(),
            report.failed()
        );
        report
    }

    /// Poll one corridor, capturing any failure in the report
    pub async fn poll_corridor(&self, corridor: &Corridor) -> CorridorReport {
        let mut state = PollState::Idle;

        let outcome = match self.run_corridor(corridor, &mut state).await {
            Ok(sample) => CorridorOutcome::Persisted(sample),
            Err(error) => {
                error!("Poll failed for {} while {state}: {error}", corridor.name);
                CorridorOutcome::Failed { state, error }
            }
        };

        CorridorReport {
            corridor: corridor.name.clone(),
            outcome,
        }
    }

    async fn run_corridor(
        &self,
        corridor: &Corridor,
        state: &mut PollState,
    ) -> Result<TrafficSample, Error> {
        let api_key = self.config.api_key.as_str();

        advance(state, PollState::GeometryResolving, corridor);
        let bbox = corridor.bounding_box()?;
        let geometry = self
            .cache
            .resolve(&self.transport, &corridor.name, &bbox, api_key)
            .await;

        advance(state, PollState::FetchingFlowsAndIncidents, corridor);
        let (readings, incidents) = tokio::join!(
            self.flows.fetch_all(&self.transport, &geometry.samples, api_key),
            self.incidents.fetch(&self.transport, &bbox, api_key),
        );

        advance(state, PollState::Aggregating, corridor);
        let filter = IncidentFilter::new(&corridor.name, &geometry.polyline, self.config.buffer_meters);
        let incidents = filter.apply(incidents.unwrap_or_empty());

        let road_classes = RoadClassFilter::new(self.config.max_road_class(corridor));
        let sample = Aggregator::new(road_classes).aggregate(&corridor.name, &readings, &incidents)?;

        self.store.save(sample.clone()).await?;
        advance(state, PollState::Persisted, corridor);

        info!(
            "Polled {} -> points={}, avgSpeed={:?}, minSpeed={:?}, incidents={}",
            corridor.name,
            readings.len(),
            sample.avg_current_speed,
            sample.min_current_speed,
            sample.incident_count()
        );

        Ok(sample)
    }
}

fn advance(state: &mut PollState, next: PollState, corridor: &Corridor) {
    debug!("{}: {} -> {}", corridor.name, state, next);
    *state = next;
}
