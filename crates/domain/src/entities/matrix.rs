//! Travel-time matrix entries

use serde::{Deserialize, Serialize};

/// Travel time and distance for one origin/destination pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixEntry {
    /// Label of the origin
    pub start: String,
    /// Label of the destination
    pub end: String,
    /// Travel time in seconds; `None` if the service could not route this pair
    pub travel_time: Option<u64>,
    /// Distance in meters; `None` if the service could not route this pair
    pub distance: Option<u64>,
}

impl MatrixEntry {
    /// Whether the service produced a route for this pair
    #[must_use]
    pub const fn is_routed(&self) -> bool {
        self.travel_time.is_some()
    }
}
