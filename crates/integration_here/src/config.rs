//! HERE client configuration

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Configuration for the HERE client
///
/// Credentials are optional here so that configuration can be assembled from
/// several sources; [`crate::HereClient::new`] rejects a configuration that is
/// still missing either of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HereConfig {
    /// Application id, sent as `app_id`
    #[serde(default)]
    pub app_id: Option<String>,

    /// Application code, sent as `app_code` (prefer env var HERE_APP_CODE)
    #[serde(default, skip_serializing)]
    pub app_code: Option<SecretString>,

    /// Base URL of the routing service
    #[serde(default = "default_routing_base_url")]
    pub routing_base_url: String,

    /// Base URL of the matrix routing service
    #[serde(default = "default_matrix_base_url")]
    pub matrix_base_url: String,

    /// Base URL of the waypoint sequence service
    #[serde(default = "default_sequence_base_url")]
    pub sequence_base_url: String,

    /// Base URL of the geocoder
    #[serde(default = "default_geocoding_base_url")]
    pub geocoding_base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Also require `city` when geocoding
    #[serde(default)]
    pub require_city: bool,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_routing_base_url() -> String {
    "https://route.cit.api.here.com".to_string()
}

fn default_matrix_base_url() -> String {
    "https://matrix.route.cit.api.here.com".to_string()
}

fn default_sequence_base_url() -> String {
    "https://wse.cit.api.here.com".to_string()
}

fn default_geocoding_base_url() -> String {
    "https://geocoder.cit.api.here.com".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("integration_here/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for HereConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            app_code: None,
            routing_base_url: default_routing_base_url(),
            matrix_base_url: default_matrix_base_url(),
            sequence_base_url: default_sequence_base_url(),
            geocoding_base_url: default_geocoding_base_url(),
            timeout_secs: default_timeout_secs(),
            require_city: false,
            user_agent: default_user_agent(),
        }
    }
}

impl HereConfig {
    /// Create a configuration with credentials and default endpoints
    #[must_use]
    pub fn new(app_id: impl Into<String>, app_code: impl Into<String>) -> Self {
        Self {
            app_id: Some(app_id.into()),
            app_code: Some(SecretString::from(app_code.into())),
            ..Self::default()
        }
    }

    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            ..Self::new("test-app-id", "test-app-code")
        }
    }

    /// Point every capability at the same host (mock servers, proxies)
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.routing_base_url = base_url.to_string();
        self.matrix_base_url = base_url.to_string();
        self.sequence_base_url = base_url.to_string();
        self.geocoding_base_url = base_url.to_string();
        self
    }

    /// Validate the configuration
    ///
    /// Credentials are checked by the client constructor, not here.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        let urls = [
            ("routing_base_url", &self.routing_base_url),
            ("matrix_base_url", &self.matrix_base_url),
            ("sequence_base_url", &self.sequence_base_url),
            ("geocoding_base_url", &self.geocoding_base_url),
        ];
        for (name, value) in urls {
            if value.trim().is_empty() {
                return Err(format!("{name} must not be empty"));
            }
            if url::Url::parse(value).is_err() {
                return Err(format!("{name} is not a valid URL: {value}"));
            }
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = HereConfig::default();
        assert!(config.app_id.is_none());
        assert!(config.app_code.is_none());
        assert_eq!(config.routing_base_url, "https://route.cit.api.here.com");
        assert_eq!(config.matrix_base_url, "https://matrix.route.cit.api.here.com");
        assert_eq!(config.sequence_base_url, "https://wse.cit.api.here.com");
        assert_eq!(config.geocoding_base_url, "https://geocoder.cit.api.here.com");
        assert_eq!(config.timeout_secs, 30);
        assert!(!config.require_city);
        assert!(config.user_agent.starts_with("integration_here/"));
    }

    #[test]
    fn test_new_sets_credentials() {
        let config = HereConfig::new("id", "code");
        assert_eq!(config.app_id.as_deref(), Some("id"));
        assert_eq!(
            config.app_code.as_ref().map(|code| code.expose_secret()),
            Some("code")
        );
    }

    #[test]
    fn test_testing_config() {
        let config = HereConfig::for_testing();
        assert_eq!(config.timeout_secs, 5);
        assert!(config.app_id.is_some());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_base_url() {
        let config = HereConfig::for_testing().with_base_url("http://127.0.0.1:9000");
        assert_eq!(config.routing_base_url, "http://127.0.0.1:9000");
        assert_eq!(config.geocoding_base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_validation_empty_url() {
        let config = HereConfig {
            matrix_base_url: String::new(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("matrix_base_url"));
    }

    #[test]
    fn test_validation_malformed_url() {
        let config = HereConfig {
            geocoding_base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let config = HereConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_app_code_is_not_serialized() {
        let config = HereConfig::new("id", "super-secret");
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"app_id\":\"id\""));
        assert!(!json.contains("super-secret"));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{ "app_id": "id", "app_code": "code", "require_city": true }"#;
        let config: HereConfig = serde_json::from_str(json).unwrap();
        assert!(config.require_city);
        assert_eq!(config.routing_base_url, "https://route.cit.api.here.com");
        assert_eq!(
            config.app_code.as_ref().map(|code| code.expose_secret()),
            Some("code")
        );
    }

    #[test]
    fn test_debug_redacts_app_code() {
        let config = HereConfig::new("id", "super-secret");
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
