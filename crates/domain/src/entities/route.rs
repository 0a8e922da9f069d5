//! Route results
//!
//! Normalized shape of a calculated route: overall summary plus one [`Leg`] per
//! pair of consecutive stops.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A point on a route together with the label it was requested under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledPoint {
    /// Caller label, or the positional index when none was supplied
    pub key: String,
    /// Latitude of the position the service matched the stop to
    pub latitude: f64,
    /// Longitude of the position the service matched the stop to
    pub longitude: f64,
}

/// The sub-route between two consecutive stops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    /// Where the leg starts
    pub start: LabeledPoint,
    /// Where the leg ends
    pub end: LabeledPoint,
    /// Travel time in seconds
    pub travel_time: u64,
    /// Distance in meters
    pub distance: u64,
}

/// A calculated route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    /// Total travel time in seconds
    pub travel_time: u64,
    /// Total distance in meters
    pub distance: u64,
    /// Departure the route was calculated for (unix seconds on the wire)
    #[serde(with = "chrono::serde::ts_seconds")]
    pub start_time: DateTime<Utc>,
    /// One leg per pair of consecutive stops
    pub legs: Vec<Leg>,
}

impl RouteResult {
    /// Estimated arrival at the final stop
    #[must_use]
    pub fn arrival_time(&self) -> DateTime<Utc> {
        let secs = i64::try_from(self.travel_time).unwrap_or(i64::MAX);
        self.start_time + chrono::Duration::seconds(secs)
    }
}

impl fmt::Display for RouteResult {
    #[allow(clippy::cast_precision_loss)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} legs, {:.1} km, {} min, departing {}",
            self.legs.len(),
            self.distance as f64 / 1000.0,
            self.travel_time / 60,
            self.start_time.format("%Y-%m-%d %H:%M UTC")
        )
    }
}
