//! Value Objects - Immutable, identity-less domain primitives

mod address;
mod geo_location;
mod routing_mode;
mod waypoint;

pub use address::Address;
pub use geo_location::GeoLocation;
pub use routing_mode::{RoutingMode, RoutingType, TrafficMode, TransportMode};
pub use waypoint::Waypoint;
