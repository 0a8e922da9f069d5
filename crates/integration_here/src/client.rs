//! HERE client
//!
//! [`HereClient`] owns configuration, credentials, the transport and the
//! clock. Operations are grouped by service through borrowed namespace handles:
//!
//! ```no_run
//! # async fn run() -> Result<(), integration_here::HereError> {
//! use domain::Waypoint;
//! use integration_here::{HereClient, HereConfig, TravelTimesRequest};
//!
//! let client = HereClient::new(HereConfig::new("app-id", "app-code"))?;
//! let route = client
//!     .route()
//!     .calculate_travel_times(&TravelTimesRequest::new(vec![
//!         Waypoint::new(41.28, -96.0042).with_key("business"),
//!         Waypoint::new(41.2939, -96.0206).with_key("my home"),
//!     ]))
//!     .await?;
//! println!("{route}");
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use domain::{Address, GeocodeResult, MatrixEntry, OptimizedRoute, RouteResult};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::clock::{Clock, SystemClock};
use crate::config::HereConfig;
use crate::endpoint::{Credentials, EncodedRequest};
use crate::error::HereError;
use crate::normalize;
use crate::requests::{
    MatrixRequest, OptimizeRequest, RouteRequest, TravelTimesRequest, geocode_request,
};
use crate::transport::{Envelope, HttpTransport, Transport};

/// Client for the HERE routing, matrix, sequence and geocoding services
#[derive(Clone)]
pub struct HereClient {
    config: HereConfig,
    credentials: Credentials,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for HereClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HereClient")
            .field("app_id", &self.credentials.app_id())
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl HereClient {
    /// Create a client talking HTTP to the configured hosts
    ///
    /// # Errors
    ///
    /// Returns `HereError::MissingArgument` if `app_id` or `app_code` is absent,
    /// or `HereError::Configuration` if the configuration is otherwise unusable.
    pub fn new(config: HereConfig) -> Result<Self, HereError> {
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client on top of a custom transport
    ///
    /// # Errors
    ///
    /// Same as [`HereClient::new`].
    pub fn with_transport(
        config: HereConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, HereError> {
        let credentials = Credentials::from_config(&config)?;
        config.validate().map_err(HereError::Configuration)?;

        Ok(Self {
            config,
            credentials,
            transport,
            clock: Arc::new(SystemClock),
        })
    }

    /// Create a client behind an `Arc` for sharing across tasks
    ///
    /// # Errors
    ///
    /// Same as [`HereClient::new`].
    pub fn new_shared(config: HereConfig) -> Result<Arc<Self>, HereError> {
        Self::new(config).map(Arc::new)
    }

    /// Replace the clock used for default departures
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &HereConfig {
        &self.config
    }

    /// Point-to-point routing
    #[must_use]
    pub const fn route(&self) -> RouteApi<'_> {
        RouteApi { client: self }
    }

    /// Travel-time matrix
    #[must_use]
    pub const fn distance(&self) -> DistanceApi<'_> {
        DistanceApi { client: self }
    }

    /// Waypoint sequence optimization
    #[must_use]
    pub const fn sequence(&self) -> SequenceApi<'_> {
        SequenceApi { client: self }
    }

    /// Address geocoding
    #[must_use]
    pub const fn address(&self) -> AddressApi<'_> {
        AddressApi { client: self }
    }

    /// Send one encoded request and unwrap its envelope
    #[instrument(
        skip(self, request),
        fields(capability = %request.endpoint.capability, path = %request.endpoint.path())
    )]
    async fn execute(&self, request: &EncodedRequest) -> Result<Value, HereError> {
        let url = request.url(&self.config, &self.credentials)?;
        debug!(url = %redacted(&url), "Sending request");

        let body = self.transport.get_json(url).await?;
        let envelope = Envelope::classify(body)?;
        debug!(envelope = envelope.key(), "Classified response");

        Ok(envelope.into_payload())
    }
}

/// Copy of `url` with the application code masked, for logging
fn redacted(url: &Url) -> Url {
    let mut shown = url.clone();
    if url.query_pairs().any(|(key, _)| key == "app_code") {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(key, value)| {
                let value = if key == "app_code" {
                    "***".to_string()
                } else {
                    value.into_owned()
                };
                (key.into_owned(), value)
            })
            .collect();
        shown.query_pairs_mut().clear().extend_pairs(pairs);
    }
    shown
}

/// Routing operations
#[derive(Debug, Clone, Copy)]
pub struct RouteApi<'a> {
    client: &'a HereClient,
}

impl RouteApi<'_> {
    /// Route from origin to destination via optional waypoints
    ///
    /// # Errors
    ///
    /// Returns a validation error if `origin`, `destination` or `mode` is
    /// missing or a stop lacks a coordinate; otherwise transport, envelope or
    /// shape errors from the service.
    #[instrument(skip_all, fields(waypoints = request.waypoints.len()))]
    pub async fn calculate(&self, request: &RouteRequest) -> Result<RouteResult, HereError> {
        let plan = request.plan(self.client.clock.as_ref())?;
        let payload = self.client.execute(&plan.request).await?;
        normalize::route(payload, &plan.labels, plan.departure)
    }

    /// Per-leg travel times along an ordered list of stops
    ///
    /// # Errors
    ///
    /// Returns `HereError::MissingArgument` or `HereError::InsufficientArguments`
    /// for fewer than two stops, a validation error for a stop without a
    /// coordinate, and otherwise transport, envelope or shape errors.
    #[instrument(skip_all, fields(stops = request.stops.len(), disable_traffic = request.disable_traffic))]
    pub async fn calculate_travel_times(
        &self,
        request: &TravelTimesRequest,
    ) -> Result<RouteResult, HereError> {
        let plan = request.plan(self.client.clock.as_ref())?;
        let payload = self.client.execute(&plan.request).await?;
        normalize::route(payload, &plan.labels, plan.departure)
    }
}

/// Matrix operations
#[derive(Debug, Clone, Copy)]
pub struct DistanceApi<'a> {
    client: &'a HereClient,
}

impl DistanceApi<'_> {
    /// Travel time and distance for every origin/destination pair
    ///
    /// # Errors
    ///
    /// Returns `HereError::MissingArgument` if either side is empty, a
    /// validation error for a point without a coordinate, and otherwise
    /// transport, envelope or shape errors.
    #[instrument(skip_all, fields(origins = request.origins.len(), destinations = request.destinations.len()))]
    pub async fn calculate_travel_times(
        &self,
        request: &MatrixRequest,
    ) -> Result<Vec<MatrixEntry>, HereError> {
        let plan = request.plan()?;
        let payload = self.client.execute(&plan.request).await?;
        normalize::matrix(payload, &plan.origins, &plan.destinations)
    }
}

/// Waypoint sequence operations
#[derive(Debug, Clone, Copy)]
pub struct SequenceApi<'a> {
    client: &'a HereClient,
}

impl SequenceApi<'_> {
    /// Find the fastest visiting order between a fixed start and end
    ///
    /// # Errors
    ///
    /// Returns `HereError::MissingArgument` if `start`, `end` or `waypoints` is
    /// missing, a validation error for a point without a coordinate, and
    /// otherwise transport, envelope or shape errors.
    #[instrument(skip_all, fields(waypoints = request.waypoints.len()))]
    pub async fn optimize(&self, request: &OptimizeRequest) -> Result<OptimizedRoute, HereError> {
        let plan = request.plan(self.client.clock.as_ref())?;
        let payload = self.client.execute(&plan.request).await?;
        normalize::sequence(payload, plan.departure)
    }
}

/// Geocoding operations
#[derive(Debug, Clone, Copy)]
pub struct AddressApi<'a> {
    client: &'a HereClient,
}

impl AddressApi<'_> {
    /// Resolve a postal address to a position and normalized address
    ///
    /// # Errors
    ///
    /// Returns `HereError::MissingArgument` if `street` or `zip` (or `city`,
    /// when configured) is missing, `HereError::GeocodeFailed` or
    /// `HereError::GeocodeIncomplete` for unusable answers, and otherwise
    /// transport, envelope or shape errors.
    #[instrument(skip_all, fields(zip = address.zip.as_deref().unwrap_or_default()))]
    pub async fn geocode(&self, address: &Address) -> Result<GeocodeResult, HereError> {
        let request = geocode_request(address, self.client.config.require_city)?;
        let payload = self.client.execute(&request).await?;
        normalize::geocode(payload)
    }
}
