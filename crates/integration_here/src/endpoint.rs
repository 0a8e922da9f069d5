//! Endpoint descriptors and URL assembly
//!
//! Every operation is described by an [`Endpoint`]: which service host it talks
//! to ([`Capability`]) and the `/{resource}/{version}/{method}.json` path on it.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::config::HereConfig;
use crate::encoding::Query;
use crate::error::HereError;

/// Service capability, one per host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Point-to-point routing
    Routing,
    /// Many-to-many travel-time matrix
    Matrix,
    /// Waypoint sequence optimization
    Sequence,
    /// Address geocoding
    Geocoding,
}

impl Capability {
    /// Base URL configured for this capability
    #[must_use]
    pub fn base_url(self, config: &HereConfig) -> &str {
        match self {
            Self::Routing => &config.routing_base_url,
            Self::Matrix => &config.matrix_base_url,
            Self::Sequence => &config.sequence_base_url,
            Self::Geocoding => &config.geocoding_base_url,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Routing => "routing",
            Self::Matrix => "matrix",
            Self::Sequence => "sequence",
            Self::Geocoding => "geocoding",
        };
        f.write_str(name)
    }
}

/// A single service method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// Host the method lives on
    pub capability: Capability,
    /// First path segment
    pub resource: &'static str,
    /// API version segment, if the path has one
    pub version: Option<&'static str>,
    /// Method name, without the `.json` suffix
    pub method: &'static str,
}

impl Endpoint {
    /// Routing 7.2 route calculation
    pub const CALCULATE_ROUTE: Self = Self {
        capability: Capability::Routing,
        resource: "routing",
        version: Some("7.2"),
        method: "calculateroute",
    };

    /// Routing 7.2 matrix calculation
    pub const CALCULATE_MATRIX: Self = Self {
        capability: Capability::Matrix,
        resource: "routing",
        version: Some("7.2"),
        method: "calculatematrix",
    };

    /// Waypoint sequence v2
    pub const FIND_SEQUENCE: Self = Self {
        capability: Capability::Sequence,
        resource: "2",
        version: None,
        method: "findsequence",
    };

    /// Geocoder 6.2
    pub const GEOCODE: Self = Self {
        capability: Capability::Geocoding,
        resource: "6.2",
        version: None,
        method: "geocode",
    };

    /// Path of the method, e.g. `/routing/7.2/calculateroute.json`
    #[must_use]
    pub fn path(&self) -> String {
        match self.version {
            Some(version) => format!("/{}/{version}/{}.json", self.resource, self.method),
            None => format!("/{}/{}.json", self.resource, self.method),
        }
    }
}

/// Validated application credentials
///
/// Appended to every URL; never taken from a request.
#[derive(Debug, Clone)]
pub struct Credentials {
    app_id: String,
    app_code: SecretString,
}

impl Credentials {
    /// Extract credentials from configuration
    ///
    /// # Errors
    ///
    /// Returns `HereError::MissingArgument` naming `app_id` or `app_code` if
    /// either is absent or blank.
    pub fn from_config(config: &HereConfig) -> Result<Self, HereError> {
        let app_id = config
            .app_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| HereError::missing("app_id"))?;
        let app_code = config
            .app_code
            .as_ref()
            .filter(|code| !code.expose_secret().trim().is_empty())
            .ok_or_else(|| HereError::missing("app_code"))?;

        Ok(Self {
            app_id: app_id.to_string(),
            app_code: app_code.clone(),
        })
    }

    /// Application id
    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }
}

/// An encoded request, ready to be turned into a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRequest {
    /// Target method
    pub endpoint: Endpoint,
    /// Operation parameters
    pub query: Query,
}

impl EncodedRequest {
    /// Pair an endpoint with its query
    #[must_use]
    pub const fn new(endpoint: Endpoint, query: Query) -> Self {
        Self { endpoint, query }
    }

    /// Assemble the full URL, credentials last
    ///
    /// # Errors
    ///
    /// Returns `HereError::Configuration` if the configured base URL is invalid.
    pub fn url(&self, config: &HereConfig, credentials: &Credentials) -> Result<Url, HereError> {
        let base = self.endpoint.capability.base_url(config);
        let raw = format!("{}{}", base.trim_end_matches('/'), self.endpoint.path());
        let mut url = Url::parse(&raw).map_err(|e| {
            HereError::Configuration(format!(
                "invalid {} base URL '{base}': {e}",
                self.endpoint.capability
            ))
        })?;

        match &self.query {
            Query::Map(pairs) => {
                url.query_pairs_mut().extend_pairs(pairs);
            },
            Query::Inline(query) => url.set_query(Some(query)),
        }

        url.query_pairs_mut()
            .append_pair("app_id", &credentials.app_id)
            .append_pair("app_code", credentials.app_code.expose_secret());

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{InlineQuery, MapQuery};
    use domain::Waypoint;

    fn credentials() -> Credentials {
        Credentials::from_config(&HereConfig::new("my-id", "my-code")).unwrap()
    }

    #[test]
    fn endpoint_paths() {
        assert_eq!(
            Endpoint::CALCULATE_ROUTE.path(),
            "/routing/7.2/calculateroute.json"
        );
        assert_eq!(
            Endpoint::CALCULATE_MATRIX.path(),
            "/routing/7.2/calculatematrix.json"
        );
        assert_eq!(Endpoint::FIND_SEQUENCE.path(), "/2/findsequence.json");
        assert_eq!(Endpoint::GEOCODE.path(), "/6.2/geocode.json");
    }

    #[test]
    fn capabilities_use_distinct_hosts() {
        let config = HereConfig::default();
        assert_eq!(
            Capability::Routing.base_url(&config),
            "https://route.cit.api.here.com"
        );
        assert_eq!(
            Capability::Matrix.base_url(&config),
            "https://matrix.route.cit.api.here.com"
        );
        assert_eq!(
            Capability::Sequence.base_url(&config),
            "https://wse.cit.api.here.com"
        );
        assert_eq!(
            Capability::Geocoding.base_url(&config),
            "https://geocoder.cit.api.here.com"
        );
    }

    #[test]
    fn map_query_url_appends_credentials_last() {
        let config = HereConfig::new("my-id", "my-code");
        let request = EncodedRequest::new(
            Endpoint::GEOCODE,
            MapQuery::new()
                .param("street", "4629 North Broadway Street")
                .param("postalcode", "60640")
                .build(),
        );
        let url = request.url(&config, &credentials()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://geocoder.cit.api.here.com/6.2/geocode.json\
             ?street=4629+North+Broadway+Street&postalcode=60640&app_id=my-id&app_code=my-code"
        );
    }

    #[test]
    fn inline_query_url_is_kept_verbatim() {
        let config = HereConfig::new("my-id", "my-code");
        let query = InlineQuery::new()
            .waypoint(0, &Waypoint::new(41.28, -96.0042), "business")
            .unwrap()
            .segment("mode", "fastest;car;traffic:enabled")
            .build();
        let request = EncodedRequest::new(Endpoint::CALCULATE_ROUTE, query);
        let url = request.url(&config, &credentials()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://route.cit.api.here.com/routing/7.2/calculateroute.json\
             ?waypoint0=geo!41.28,-96.0042;;business&mode=fastest;car;traffic:enabled\
             &app_id=my-id&app_code=my-code"
        );
    }

    #[test]
    fn trailing_slash_on_base_url_is_tolerated() {
        let config = HereConfig::new("my-id", "my-code").with_base_url("http://localhost:8080/");
        let request = EncodedRequest::new(Endpoint::FIND_SEQUENCE, MapQuery::new().build());
        let url = request.url(&config, &credentials()).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/2/findsequence.json?app_id=my-id&app_code=my-code"
        );
    }

    #[test]
    fn invalid_base_url_is_a_configuration_error() {
        let config = HereConfig::new("my-id", "my-code").with_base_url("not a url");
        let request = EncodedRequest::new(Endpoint::GEOCODE, MapQuery::new().build());
        let err = request.url(&config, &credentials()).unwrap_err();
        assert!(matches!(err, HereError::Configuration(_)));
    }

    #[test]
    fn credentials_require_app_id() {
        let config = HereConfig {
            app_id: None,
            ..HereConfig::new("x", "code")
        };
        let err = Credentials::from_config(&config).unwrap_err();
        assert!(matches!(err, HereError::MissingArgument(ref n) if n == "app_id"));
    }

    #[test]
    fn credentials_require_app_code() {
        let config = HereConfig {
            app_code: Some(SecretString::from(String::from("  "))),
            ..HereConfig::new("id", "x")
        };
        let err = Credentials::from_config(&config).unwrap_err();
        assert!(matches!(err, HereError::MissingArgument(ref n) if n == "app_code"));
    }
}
