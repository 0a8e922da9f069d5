//! Domain layer for the HERE mapping client
//!
//! Contains the value objects callers build requests from (locations, waypoints,
//! addresses, routing modes) and the normalized result entities every endpoint
//! client returns. This layer knows nothing about HTTP or the service's wire format.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
