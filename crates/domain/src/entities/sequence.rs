//! Optimized visiting sequences

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stop after the optimizer has placed it in the visiting order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedWaypoint {
    /// Label the stop was submitted under
    pub key: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Zero-based position in the optimized order
    pub sequence: u32,
    /// When the vehicle is expected to leave the stop
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_departure: Option<DateTime<Utc>>,
}

/// A route whose intermediate stops were reordered by the optimizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedRoute {
    /// Total time in seconds
    pub time: u64,
    /// Total distance in meters
    pub distance: u64,
    /// Departure the sequence was calculated for (unix seconds on the wire)
    #[serde(with = "chrono::serde::ts_seconds")]
    pub start_time: DateTime<Utc>,
    /// Stops sorted by `sequence`
    pub waypoints: Vec<OptimizedWaypoint>,
}

impl OptimizedRoute {
    /// Labels in visiting order
    #[must_use]
    pub fn visiting_order(&self) -> Vec<&str> {
        self.waypoints.iter().map(|w| w.key.as_str()).collect()
    }
}
