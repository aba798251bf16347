//! Per-corridor route geometry, computed once and kept for the life of the
//! process.
//!
//! Routes are not invalidated: a corridor whose road layout changes keeps its
//! first successfully routed polyline until restart. Two polls racing on the
//! same uncached corridor may both compute it; the last write is kept.

use std::sync::{Arc, PoisonError, RwLock};

use geo::LineString;
use hashbrown::HashMap;
use log::{debug, info};

use crate::fetch::RouteResolver;
use crate::geometry::{RouteGeometry, sample_bbox_diagonal, sample_points};
use crate::model::BoundingBox;
use crate::provider::{Fetched, Transport};

pub const DEFAULT_SAMPLE_POINTS: usize = 50;

#[derive(Debug)]
pub struct GeometryCache {
    entries: RwLock<HashMap<String, Arc<RouteGeometry>>>,
    resolver: RouteResolver,
    sample_count: usize,
}

impl Default for GeometryCache {
    fn default() -> Self {
        Self::new(RouteResolver::default(), DEFAULT_SAMPLE_POINTS)
    }
}

impl GeometryCache {
    pub fn new(resolver: RouteResolver, sample_count: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            resolver,
            sample_count,
        }
    }

    /// Cached geometry for `corridor`, computing it on a miss.
    ///
    /// A routed polyline is stored even if it is too short to sample, in
    /// which case the stored samples come from the bbox diagonal. When
    /// routing fails the diagonal geometry is returned but not stored, so
    /// the next poll tries routing again.
    pub async fn resolve<T: Transport>(
        &self,
        transport: &T,
        corridor: &str,
        bbox: &BoundingBox,
        api_key: &str,
    ) -> Arc<RouteGeometry> {
        if let Some(cached) = self.get(corridor) {
            return cached;
        }

        match self.resolver.resolve(transport, bbox, api_key).await {
            Fetched::Available(polyline) => {
                let samples = sample_points(&polyline, bbox, self.sample_count);
                let geometry = Arc::new(RouteGeometry::new(polyline, samples));
                info!(
                    "Cached route for {corridor}: {} vertices, {} sample points",
                    geometry.polyline.0.len(),
                    geometry.samples.len()
                );
                self.insert(corridor, Arc::clone(&geometry));
                geometry
            }
            Fetched::Unavailable(_) => {
                debug!("Using bbox diagonal for {corridor}");
                Arc::new(RouteGeometry::new(
                    LineString::new(Vec::new()),
                    sample_bbox_diagonal(bbox, self.sample_count),
                ))
            }
        }
    }

    pub fn get(&self, corridor: &str) -> Option<Arc<RouteGeometry>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(corridor)
            .cloned()
    }

    pub fn insert(&self, corridor: &str, geometry: Arc<RouteGeometry>) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(corridor.to_string(), geometry);
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
