use hashbrown::HashSet;
use serde::Deserialize;

use crate::Error;
use crate::aggregate::DEFAULT_MAX_ROAD_CLASS;
use crate::cache::DEFAULT_SAMPLE_POINTS;
use crate::filter::DEFAULT_BUFFER_METERS;
use crate::model::{Corridor, RoadClass};
use crate::provider::tomtom::DEFAULT_BASE_URL;

/// Configuration of the poller
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrafficConfig {
    /// Provider API key
    #[serde(default)]
    pub api_key: String,
    /// Delay between the end of one poll cycle and the start of the next
    #[serde(default = "default_poll_seconds")]
    pub poll_seconds: u64,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Flow sample points per corridor
    #[serde(default = "default_sample_points")]
    pub sample_points: usize,
    /// Maximum distance between an incident and the route, in metres
    #[serde(default = "default_buffer_meters")]
    pub buffer_meters: f64,
    /// Lowest functional road class kept when a corridor sets none
    #[serde(default = "default_max_road_class")]
    pub default_max_road_class: u8,
    #[serde(default)]
    pub corridors: Vec<Corridor>,
}

fn default_poll_seconds() -> u64 {
    120
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_sample_points() -> usize {
    DEFAULT_SAMPLE_POINTS
}

fn default_buffer_meters() -> f64 {
    DEFAULT_BUFFER_METERS
}

fn default_max_road_class() -> u8 {
    DEFAULT_MAX_ROAD_CLASS.rank()
}

impl TrafficConfig {
    pub fn new(api_key: impl Into<String>, corridors: Vec<Corridor>) -> Self {
        Self {
            api_key: api_key.into(),
            poll_seconds: default_poll_seconds(),
            base_url: default_base_url(),
            sample_points: default_sample_points(),
            buffer_meters: default_buffer_meters(),
            default_max_road_class: default_max_road_class(),
            corridors,
        }
    }

    /// Road class threshold for a corridor, falling back to the default
    pub fn max_road_class(&self, corridor: &Corridor) -> RoadClass {
        RoadClass(
            corridor
                .max_road_class
                .unwrap_or(self.default_max_road_class),
        )
    }

    /// Checks settings that would make every poll pointless.
    ///
    /// Bounding boxes are not checked here: a corridor with a broken box
    /// fails on its own at poll time without affecting the others. Use
    /// [`TrafficConfig::invalid_corridors`] to report them up front.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] describing the first problem found
    pub fn validate(&self) -> Result<(), Error> {
        if self.api_key.trim().is_empty() {
            return Err(Error::InvalidConfig("api_key is empty".to_string()));
        }
        if self.poll_seconds == 0 {
            return Err(Error::InvalidConfig("poll_seconds must be positive".to_string()));
        }
        if self.sample_points == 0 {
            return Err(Error::InvalidConfig("sample_points must be positive".to_string()));
        }
        if !self.buffer_meters.is_finite() || self.buffer_meters < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "buffer_meters must be a non-negative number, got {}",
                self.buffer_meters
            )));
        }
        if self.corridors.is_empty() {
            return Err(Error::InvalidConfig("no corridors configured".to_string()));
        }

        let mut names = HashSet::new();
        for corridor in &self.corridors {
            if corridor.name.trim().is_empty() {
                return Err(Error::InvalidConfig("corridor with empty name".to_string()));
            }
            if !names.insert(corridor.name.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate corridor name '{}'",
                    corridor.name
                )));
            }
        }

        Ok(())
    }

    /// Corridors whose bounding box does not parse, with the reason
    pub fn invalid_corridors(&self) -> Vec<(&Corridor, Error)> {
        self.corridors
            .iter()
            .filter_map(|corridor| corridor.bounding_box().err().map(|e| (corridor, e)))
            .collect()
    }
}
