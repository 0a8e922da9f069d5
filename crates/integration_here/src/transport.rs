//! HTTP transport and response envelopes
//!
//! The transport performs exactly one GET per operation and hands back the
//! parsed JSON body. The body is then classified into an [`Envelope`], whose
//! top-level key tells which API generation produced it.

use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::config::HereConfig;
use crate::error::HereError;

/// Something that can fetch a JSON document
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one GET and parse the body as JSON
    async fn get_json(&self, url: Url) -> Result<Value, HereError>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &HereConfig) -> Result<Self, HereError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip_all, fields(host = url.host_str().unwrap_or_default(), path = url.path()))]
    async fn get_json(&self, url: Url) -> Result<Value, HereError> {
        // reqwest errors carry the full URL, which includes app_code
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();
        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        debug!(%status, bytes = body.len(), "Received response");
        Ok(serde_json::from_str(&body)?)
    }
}

/// Known top-level response envelopes, in probing order
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// `{"response": {...}}` - routing and matrix 7.x
    Response(Value),
    /// `{"Response": {...}}` - geocoder 6.x
    LegacyResponse(Value),
    /// `{"results": [...]}` - waypoint sequence
    Results(Vec<Value>),
}

impl Envelope {
    /// Classify a response body; the first known key present wins
    ///
    /// # Errors
    ///
    /// Returns `HereError::NoResponse` if no known envelope key holds a value.
    pub fn classify(body: Value) -> Result<Self, HereError> {
        let Value::Object(mut map) = body else {
            return Err(HereError::NoResponse);
        };

        if let Some(payload) = map.remove("response").filter(|v| !v.is_null()) {
            return Ok(Self::Response(payload));
        }
        if let Some(payload) = map.remove("Response").filter(|v| !v.is_null()) {
            return Ok(Self::LegacyResponse(payload));
        }
        if let Some(Value::Array(results)) = map.remove("results") {
            return Ok(Self::Results(results));
        }

        Err(HereError::NoResponse)
    }

    /// Envelope key this body was classified under
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Response(_) => "response",
            Self::LegacyResponse(_) => "Response",
            Self::Results(_) => "results",
        }
    }

    /// Unwrap the payload regardless of which envelope carried it
    #[must_use]
    pub fn into_payload(self) -> Value {
        match self {
            Self::Response(payload) | Self::LegacyResponse(payload) => payload,
            Self::Results(results) => Value::Array(results),
        }
    }
}
