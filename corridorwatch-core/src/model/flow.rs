use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Functional road class as reported by the flow provider.
/// `FRC0` is a motorway, higher numbers are progressively lower grade roads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoadClass(pub u8);

impl RoadClass {
    pub const MOTORWAY: RoadClass = RoadClass(0);
    pub const MAJOR_ROAD: RoadClass = RoadClass(1);

    pub fn rank(self) -> u8 {
        self.0
    }
}

impl FromStr for RoadClass {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("FRC")
            .and_then(|rank| rank.parse::<u8>().ok())
            .map(RoadClass)
            .ok_or(())
    }
}

impl fmt::Display for RoadClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FRC{}", self.0)
    }
}

/// One point-in-time flow measurement at a sample point
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowReading {
    pub current_speed: Option<f64>,
    pub free_flow_speed: Option<f64>,
    pub confidence: Option<f64>,
    pub road_class: Option<RoadClass>,
}
