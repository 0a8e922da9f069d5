//! Operation requests
//!
//! Each request type validates itself and encodes into an [`EncodedRequest`]
//! plus whatever the normalizer needs to map the response back onto the
//! caller's labels. Fields that the caller must supply are `Option`s so that a
//! request deserialized from loose input reports exactly which one is missing.

use std::iter;

use chrono::{DateTime, Utc};
use domain::{Address, RoutingMode, TrafficMode, Waypoint};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::encoding::{
    InlineQuery, MapQuery, coordinates, geo_position, iso_timestamp, iso_timestamp_seconds,
};
use crate::endpoint::{EncodedRequest, Endpoint};
use crate::error::HereError;
use crate::validation::{require, require_label, require_non_empty, require_text};

/// Label given to the start of an optimized sequence without a key
pub const DEFAULT_START_LABEL: &str = "start";
/// Label given to the end of an optimized sequence without a key
pub const DEFAULT_END_LABEL: &str = "end";

/// Route from an origin to a destination, optionally via waypoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    /// Where the route starts
    #[serde(default)]
    pub origin: Option<Waypoint>,
    /// Where the route ends
    #[serde(default)]
    pub destination: Option<Waypoint>,
    /// How to route
    #[serde(default)]
    pub mode: Option<RoutingMode>,
    /// Departure; the current time when omitted
    #[serde(default)]
    pub departure: Option<DateTime<Utc>>,
    /// Intermediate stops, visited in order
    #[serde(default)]
    pub waypoints: Vec<Waypoint>,
}

impl RouteRequest {
    /// Create a request with its mandatory parts
    #[must_use]
    pub const fn new(origin: Waypoint, destination: Waypoint, mode: RoutingMode) -> Self {
        Self {
            origin: Some(origin),
            destination: Some(destination),
            mode: Some(mode),
            departure: None,
            waypoints: Vec::new(),
        }
    }

    /// Set the departure time
    #[must_use]
    pub const fn with_departure(mut self, departure: DateTime<Utc>) -> Self {
        self.departure = Some(departure);
        self
    }

    /// Add an intermediate stop
    #[must_use]
    pub fn via(mut self, waypoint: Waypoint) -> Self {
        self.waypoints.push(waypoint);
        self
    }

    pub(crate) fn plan(&self, clock: &dyn Clock) -> Result<RoutePlan, HereError> {
        let origin = require(self.origin.as_ref(), "origin")?;
        let destination = require(self.destination.as_ref(), "destination")?;
        let mode = require(self.mode.as_ref(), "mode")?;
        let departure = self.departure.unwrap_or_else(|| clock.now());

        let mut query = MapQuery::new()
            .param("mode", mode.to_string())
            .param("departure", iso_timestamp(&departure));

        let stops = iter::once(origin)
            .chain(&self.waypoints)
            .chain(iter::once(destination));
        let mut labels = Vec::with_capacity(self.waypoints.len() + 2);
        for (index, stop) in stops.enumerate() {
            let position = if stop.stop_over_duration.is_some() {
                geo_position(stop)?
            } else {
                coordinates(stop)?
            };
            query = query.param(format!("waypoint{index}"), position);
            labels.push(stop.label(index));
        }

        Ok(RoutePlan {
            request: EncodedRequest::new(Endpoint::CALCULATE_ROUTE, query.build()),
            labels,
            departure,
        })
    }
}

/// Travel times along an ordered list of stops
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelTimesRequest {
    /// Stops in visiting order; at least two
    #[serde(default)]
    pub stops: Vec<Waypoint>,
    /// Departure; the current time when omitted
    #[serde(default)]
    pub departure: Option<DateTime<Utc>>,
    /// Ignore traffic information
    #[serde(default)]
    pub disable_traffic: bool,
}

impl TravelTimesRequest {
    /// Create a request for the given stops
    #[must_use]
    pub const fn new(stops: Vec<Waypoint>) -> Self {
        Self {
            stops,
            departure: None,
            disable_traffic: false,
        }
    }

    /// Set the departure time
    #[must_use]
    pub const fn with_departure(mut self, departure: DateTime<Utc>) -> Self {
        self.departure = Some(departure);
        self
    }

    /// Ignore traffic information
    #[must_use]
    pub const fn without_traffic(mut self) -> Self {
        self.disable_traffic = true;
        self
    }

    pub(crate) fn plan(&self, clock: &dyn Clock) -> Result<RoutePlan, HereError> {
        let stops = require_non_empty(&self.stops, "route_stops", 2)?;
        let departure = self.departure.unwrap_or_else(|| clock.now());
        let mode = RoutingMode::fastest_car()
            .with_traffic(TrafficMode::from_disabled(self.disable_traffic));

        let mut query = InlineQuery::new();
        let mut labels = Vec::with_capacity(stops.len());
        for (index, stop) in stops.iter().enumerate() {
            let label = stop.label(index);
            query = query.waypoint(index, stop, &label)?;
            labels.push(label);
        }
        let query = query
            .mode(&mode)
            .segment("departure", &iso_timestamp(&departure))
            .build();

        Ok(RoutePlan {
            request: EncodedRequest::new(Endpoint::CALCULATE_ROUTE, query),
            labels,
            departure,
        })
    }
}

/// All-pairs travel times between origins and destinations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixRequest {
    /// Origins; at least one
    #[serde(default)]
    pub origins: Vec<Waypoint>,
    /// Destinations; at least one
    #[serde(default)]
    pub destinations: Vec<Waypoint>,
    /// How to route; fastest car without traffic when omitted
    #[serde(default)]
    pub mode: Option<RoutingMode>,
}

impl MatrixRequest {
    /// Create a request for the given origins and destinations
    #[must_use]
    pub const fn new(origins: Vec<Waypoint>, destinations: Vec<Waypoint>) -> Self {
        Self {
            origins,
            destinations,
            mode: None,
        }
    }

    /// Override the routing mode
    #[must_use]
    pub const fn with_mode(mut self, mode: RoutingMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub(crate) fn plan(&self) -> Result<MatrixPlan, HereError> {
        let origins = require_non_empty(&self.origins, "origins", 1)?;
        let destinations = require_non_empty(&self.destinations, "destinations", 1)?;
        let mode = self
            .mode
            .unwrap_or_else(|| RoutingMode::fastest_car().with_traffic(TrafficMode::Disabled));

        let mut query = MapQuery::new();
        let mut origin_labels = Vec::with_capacity(origins.len());
        for (index, origin) in origins.iter().enumerate() {
            query = query.param(format!("start{index}"), geo_position(origin)?);
            origin_labels.push(origin.label(index));
        }
        let mut destination_labels = Vec::with_capacity(destinations.len());
        for (index, destination) in destinations.iter().enumerate() {
            query = query.param(format!("destination{index}"), geo_position(destination)?);
            destination_labels.push(destination.label(index));
        }
        let query = query
            .param("mode", mode.to_string())
            .param("summaryAttributes", "traveltime,distance")
            .build();

        Ok(MatrixPlan {
            request: EncodedRequest::new(Endpoint::CALCULATE_MATRIX, query),
            origins: origin_labels,
            destinations: destination_labels,
        })
    }
}

/// Visiting order optimization between a fixed start and end
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    /// Where the sequence starts
    #[serde(default)]
    pub start: Option<Waypoint>,
    /// Where the sequence ends
    #[serde(default)]
    pub end: Option<Waypoint>,
    /// Stops to reorder; at least one
    #[serde(default)]
    pub waypoints: Vec<Waypoint>,
    /// Departure; the current time when omitted
    #[serde(default)]
    pub departure: Option<DateTime<Utc>>,
    /// Ignore traffic information
    #[serde(default)]
    pub disable_traffic: bool,
}

impl OptimizeRequest {
    /// Create a request with its mandatory parts
    #[must_use]
    pub const fn new(start: Waypoint, end: Waypoint, waypoints: Vec<Waypoint>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            waypoints,
            departure: None,
            disable_traffic: false,
        }
    }

    /// Set the departure time
    #[must_use]
    pub const fn with_departure(mut self, departure: DateTime<Utc>) -> Self {
        self.departure = Some(departure);
        self
    }

    /// Ignore traffic information
    #[must_use]
    pub const fn without_traffic(mut self) -> Self {
        self.disable_traffic = true;
        self
    }

    pub(crate) fn plan(&self, clock: &dyn Clock) -> Result<SequencePlan, HereError> {
        let start = require(self.start.as_ref(), "start")?;
        let end = require(self.end.as_ref(), "end")?;
        let waypoints = require_non_empty(&self.waypoints, "waypoints", 1)?;
        let departure = self.departure.unwrap_or_else(|| clock.now());
        let mode = RoutingMode::fastest_car()
            .with_traffic(TrafficMode::from_disabled(self.disable_traffic));

        let mut query = MapQuery::new().param(
            "start",
            sequence_stop(start, &start.label_or(DEFAULT_START_LABEL))?,
        );
        for (index, waypoint) in waypoints.iter().enumerate() {
            let number = index + 1;
            query = query.param(
                format!("destination{number}"),
                sequence_stop(waypoint, &waypoint.label(number))?,
            );
        }
        let query = query
            .param("end", sequence_stop(end, &end.label_or(DEFAULT_END_LABEL))?)
            .param("mode", mode.to_string())
            .param("departure", iso_timestamp_seconds(&departure))
            .build();

        Ok(SequencePlan {
            request: EncodedRequest::new(Endpoint::FIND_SEQUENCE, query),
            departure,
        })
    }
}

/// `label;lat,lng`, plus `;st:{secs}` when the stop has a service time
fn sequence_stop(point: &Waypoint, label: &str) -> Result<String, HereError> {
    let label = require_label(label)?;
    let coords = coordinates(point)?;
    Ok(match point.stop_over_duration {
        Some(secs) => format!("{label};{coords};st:{secs}"),
        None => format!("{label};{coords}"),
    })
}

/// Encode a geocoding request
///
/// `street` and `zip` are mandatory; `city` too when `require_city` is set.
/// A unit is searched as part of the street text.
pub(crate) fn geocode_request(address: &Address, require_city: bool) -> Result<EncodedRequest, HereError> {
    let street = require_text(address.street.as_deref(), "street")?;
    let street = match address.unit.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        Some(unit) => format!("{street} {unit}"),
        None => street.to_string(),
    };
    let zip = require_text(address.zip.as_deref(), "zip")?;
    if require_city {
        require_text(address.city.as_deref(), "city")?;
    }

    let query = MapQuery::new()
        .param("street", street)
        .optional("city", address.city.as_deref())
        .optional("state", address.state.as_deref())
        .param("postalcode", zip)
        .optional("country", address.country.as_deref())
        .build();

    Ok(EncodedRequest::new(Endpoint::GEOCODE, query))
}

/// An encoded route request and the labels of its stops
#[derive(Debug)]
pub(crate) struct RoutePlan {
    pub request: EncodedRequest,
    pub labels: Vec<String>,
    pub departure: DateTime<Utc>,
}

/// An encoded matrix request and the positional label maps
#[derive(Debug)]
pub(crate) struct MatrixPlan {
    pub request: EncodedRequest,
    pub origins: Vec<String>,
    pub destinations: Vec<String>,
}

/// An encoded sequence request
#[derive(Debug)]
pub(crate) struct SequencePlan {
    pub request: EncodedRequest,
    pub departure: DateTime<Utc>,
}
