//! Postal address used as geocoding input

use std::fmt;

use serde::{Deserialize, Serialize};

/// A partial postal address
///
/// Every component is optional at the type level; the geocoding client decides
/// which ones are mandatory and reports the first missing one by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street line, including the house number
    #[serde(default)]
    pub street: Option<String>,
    /// Apartment or suite
    #[serde(default)]
    pub unit: Option<String>,
    /// City or locality
    #[serde(default)]
    pub city: Option<String>,
    /// State or region code
    #[serde(default)]
    pub state: Option<String>,
    /// Postal code
    #[serde(default)]
    pub zip: Option<String>,
    /// Country code
    #[serde(default)]
    pub country: Option<String>,
}

impl Address {
    /// Create an address from its two mandatory components
    #[must_use]
    pub fn new(street: impl Into<String>, zip: impl Into<String>) -> Self {
        Self {
            street: Some(street.into()),
            zip: Some(zip.into()),
            ..Self::default()
        }
    }

    /// Set the unit
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Set the city
    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Set the state
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Set the country
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [
            &self.street,
            &self.unit,
            &self.city,
            &self.state,
            &self.zip,
            &self.country,
        ]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .filter(|part| !part.trim().is_empty())
        .collect();
        write!(f, "{}", parts.join(", "))
    }
}
