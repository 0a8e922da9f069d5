//! HERE mapping service integration
//!
//! Client for the HERE routing 7.2, matrix routing 7.2, waypoint sequence v2
//! and geocoder 6.2 APIs (<https://developer.here.com>). Every operation
//! validates its arguments, issues exactly one GET and normalizes the answer
//! into the result entities of the `domain` crate.

pub mod client;
pub mod clock;
pub mod config;
pub mod encoding;
pub mod endpoint;
pub mod error;
pub mod normalize;
mod requests;
pub mod transport;
mod validation;

pub use client::{AddressApi, DistanceApi, HereClient, RouteApi, SequenceApi};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::HereConfig;
pub use encoding::{Query, parse_departure};
pub use endpoint::{Capability, Endpoint};
pub use error::HereError;
pub use requests::{
    DEFAULT_END_LABEL, DEFAULT_START_LABEL, MatrixRequest, OptimizeRequest, RouteRequest,
    TravelTimesRequest,
};
pub use transport::{Envelope, HttpTransport, Transport};
