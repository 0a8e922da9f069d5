//! Waypoint value object
//!
//! A caller-supplied stop on a route. Coordinates are optional at the type level
//! because waypoints are frequently deserialized from loosely shaped input; a
//! waypoint missing either axis is rejected when it is resolved to a location.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::GeoLocation;

/// A labeled stop participating in a route
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    /// Latitude in degrees
    #[serde(default, alias = "latitude")]
    pub lat: Option<f64>,
    /// Longitude in degrees
    #[serde(default, alias = "longitude")]
    pub lng: Option<f64>,
    /// Caller-assigned label, echoed back in results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Time spent at the stop, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_over_duration: Option<u32>,
}

impl Waypoint {
    /// Create an unlabeled waypoint
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat: Some(lat),
            lng: Some(lng),
            key: None,
            stop_over_duration: None,
        }
    }

    /// Attach a caller label
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Attach a stop-over duration in seconds
    #[must_use]
    pub const fn with_stop_over(mut self, seconds: u32) -> Self {
        self.stop_over_duration = Some(seconds);
        self
    }

    /// Resolve to a validated location
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinate` if either axis is absent or invalid.
    pub fn location(&self) -> Result<GeoLocation, DomainError> {
        let lat = self
            .lat
            .ok_or_else(|| DomainError::invalid_coordinate("waypoint is missing lat"))?;
        let lng = self
            .lng
            .ok_or_else(|| DomainError::invalid_coordinate("waypoint is missing lng"))?;
        GeoLocation::new(lat, lng)
    }

    /// The caller label, if one was supplied and is not blank
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref().filter(|k| !k.trim().is_empty())
    }

    /// The caller label, or `fallback` when none exists
    #[must_use]
    pub fn label_or(&self, fallback: impl Into<String>) -> String {
        self.key().map_or_else(|| fallback.into(), str::to_string)
    }

    /// The caller label, or the positional index as a string
    #[must_use]
    pub fn label(&self, index: usize) -> String {
        self.label_or(index.to_string())
    }
}

impl From<GeoLocation> for Waypoint {
    fn from(location: GeoLocation) -> Self {
        Self::new(location.latitude(), location.longitude())
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => write!(f, "{lat},{lng}")?,
            _ => write!(f, "?,?")?,
        }
        if let Some(key) = self.key() {
            write!(f, ",{key}")?;
        }
        Ok(())
    }
}

/// Parses `lat,lng` or `lat,lng,key`; the key may itself contain commas.
impl FromStr for Waypoint {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ',');
        let lat = parse_axis(parts.next(), "lat", s)?;
        let lng = parse_axis(parts.next(), "lng", s)?;
        let waypoint = Self::new(lat, lng);
        waypoint.location()?;

        Ok(match parts.next().map(str::trim) {
            Some(key) if !key.is_empty() => waypoint.with_key(key),
            _ => waypoint,
        })
    }
}

fn parse_axis(part: Option<&str>, axis: &str, input: &str) -> Result<f64, DomainError> {
    part.map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| DomainError::invalid_coordinate(format!("'{input}' is missing {axis}")))?
        .parse()
        .map_err(|_| DomainError::invalid_coordinate(format!("'{input}' has a non-numeric {axis}")))
}
