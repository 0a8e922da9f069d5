//! Geocoding results

use serde::{Deserialize, Serialize};

use crate::value_objects::GeoLocation;

/// Address components as resolved by the geocoder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodedAddress {
    /// House number and street name
    pub street: Option<String>,
    /// Apartment or suite, when the geocoder reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// City
    pub city: Option<String>,
    /// State or region
    pub state: Option<String>,
    /// Postal code
    pub zip: Option<String>,
    /// Country code
    pub country: Option<String>,
}

/// A resolved address with its display position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    /// Display position of the match
    pub location: GeoLocation,
    /// Resolved address components
    pub address: GeocodedAddress,
}
