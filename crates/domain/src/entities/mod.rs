//! Result entities - normalized output of every endpoint client

mod geocode;
mod matrix;
mod route;
mod sequence;

pub use geocode::{GeocodeResult, GeocodedAddress};
pub use matrix::MatrixEntry;
pub use route::{LabeledPoint, Leg, RouteResult};
pub use sequence::{OptimizedRoute, OptimizedWaypoint};
