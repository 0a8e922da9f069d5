//! Query encoding
//!
//! The service speaks two query dialects. Newer endpoints take ordinary
//! key/value pairs ([`Query::Map`]); the travel-time route endpoint takes a
//! pre-assembled string in which each waypoint carries its own label
//! ([`Query::Inline`]). Both end up in the URL built by [`crate::endpoint`].

use chrono::{DateTime, SecondsFormat, Utc};
use domain::{RoutingMode, Waypoint};
use url::form_urlencoded;

use crate::error::HereError;

/// Encoded query parameters for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Ordered key/value pairs, form-encoded when the URL is built
    Map(Vec<(String, String)>),
    /// Pre-assembled `key=value&...` string, used verbatim
    Inline(String),
}

impl Query {
    /// Look up a parameter by key (first occurrence)
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match self {
            Self::Map(pairs) => pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone()),
            Self::Inline(query) => form_urlencoded::parse(query.as_bytes())
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.into_owned()),
        }
    }
}

/// Builder for [`Query::Map`]
#[derive(Debug, Default)]
pub struct MapQuery {
    pairs: Vec<(String, String)>,
}

impl MapQuery {
    /// Start an empty query
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    /// Append a parameter when `value` is present and not blank
    #[must_use]
    pub fn optional(self, key: &str, value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// Finish the query
    #[must_use]
    pub fn build(self) -> Query {
        Query::Map(self.pairs)
    }
}

/// Builder for [`Query::Inline`]
#[derive(Debug, Default)]
pub struct InlineQuery {
    buf: String,
}

impl InlineQuery {
    /// Start an empty query
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `waypoint{index}=geo!lat,lng;;label`
    ///
    /// # Errors
    ///
    /// Returns `HereError::InvalidCoordinate` if the waypoint lacks an axis.
    pub fn waypoint(mut self, index: usize, point: &Waypoint, label: &str) -> Result<Self, HereError> {
        let position = geo_position(point)?;
        let label: String = form_urlencoded::byte_serialize(label.as_bytes()).collect();
        self.push(&format!("waypoint{index}"), &format!("{position};;{label}"));
        Ok(self)
    }

    /// Append `mode=kind;transport;traffic:...`
    #[must_use]
    pub fn mode(mut self, mode: &RoutingMode) -> Self {
        self.push("mode", &mode.to_string());
        self
    }

    /// Append an arbitrary `key=value` segment; `value` is used as given
    #[must_use]
    pub fn segment(mut self, key: &str, value: &str) -> Self {
        self.push(key, value);
        self
    }

    fn push(&mut self, key: &str, value: &str) {
        if !self.buf.is_empty() {
            self.buf.push('&');
        }
        self.buf.push_str(key);
        self.buf.push('=');
        self.buf.push_str(value);
    }

    /// Finish the query
    #[must_use]
    pub fn build(self) -> Query {
        Query::Inline(self.buf)
    }
}

/// Render a waypoint as `"{lat},{lng}"` without rounding
///
/// # Errors
///
/// Returns `HereError::InvalidCoordinate` if either axis is missing or invalid.
pub fn coordinates(point: &Waypoint) -> Result<String, HereError> {
    Ok(point.location()?.to_string())
}

/// Render a waypoint in the routing grammar: `geo!lat,lng`, or
/// `geo!stopOver,{secs}!lat,lng` when a stop-over duration is set
///
/// # Errors
///
/// Returns `HereError::InvalidCoordinate` if either axis is missing or invalid.
pub fn geo_position(point: &Waypoint) -> Result<String, HereError> {
    let coords = coordinates(point)?;
    Ok(match point.stop_over_duration {
        Some(secs) => format!("geo!stopOver,{secs}!{coords}"),
        None => format!("geo!{coords}"),
    })
}

/// Full ISO-8601 timestamp with milliseconds, e.g. `2024-05-01T08:30:00.000Z`
#[must_use]
pub fn iso_timestamp(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// ISO-8601 timestamp with the fractional part and zone cut off and a literal
/// `Z` re-appended, e.g. `2024-05-01T08:30:00Z`
#[must_use]
pub fn iso_timestamp_seconds(time: &DateTime<Utc>) -> String {
    let full = iso_timestamp(time);
    let trimmed = full.split('.').next().unwrap_or(&full);
    format!("{trimmed}Z")
}

/// Parse a caller-supplied departure time
///
/// # Errors
///
/// Returns `HereError::InvalidDate` if `input` is not an RFC 3339 timestamp.
pub fn parse_departure(input: &str) -> Result<DateTime<Utc>, HereError> {
    DateTime::parse_from_rfc3339(input.trim())
        .map(|time| time.with_timezone(&Utc))
        .map_err(|e| HereError::InvalidDate(format!("'{input}': {e}")))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn departure() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap() + chrono::Duration::milliseconds(250)
    }

    #[test]
    fn coordinates_are_not_rounded() {
        let point = Waypoint::new(41.28, -96.0042);
        assert_eq!(coordinates(&point).unwrap(), "41.28,-96.0042");
    }

    #[test]
    fn coordinates_require_both_axes() {
        let point = Waypoint {
            lat: Some(41.28),
            ..Default::default()
        };
        assert!(matches!(
            coordinates(&point),
            Err(HereError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn geo_position_with_stop_over() {
        let point = Waypoint::new(41.28, -96.0042).with_stop_over(300);
        assert_eq!(geo_position(&point).unwrap(), "geo!stopOver,300!41.28,-96.0042");
        let point = Waypoint::new(41.28, -96.0042);
        assert_eq!(geo_position(&point).unwrap(), "geo!41.28,-96.0042");
    }

    #[test]
    fn inline_query_layout() {
        let mode = RoutingMode::fastest_car().with_traffic(domain::TrafficMode::Enabled);
        let query = InlineQuery::new()
            .waypoint(0, &Waypoint::new(41.28, -96.0042), "business")
            .unwrap()
            .waypoint(1, &Waypoint::new(41.2939, -96.0206), "1")
            .unwrap()
            .mode(&mode)
            .segment("departure", "2024-05-01T08:30:00.000Z")
            .build();

        assert_eq!(
            query,
            Query::Inline(
                "waypoint0=geo!41.28,-96.0042;;business&waypoint1=geo!41.2939,-96.0206;;1\
                 &mode=fastest;car;traffic:enabled&departure=2024-05-01T08:30:00.000Z"
                    .to_string()
            )
        );
    }

    #[test]
    fn inline_labels_are_escaped() {
        let query = InlineQuery::new()
            .waypoint(0, &Waypoint::new(1.0, 2.0), "my home & garden")
            .unwrap()
            .build();
        assert_eq!(
            query,
            Query::Inline("waypoint0=geo!1,2;;my+home+%26+garden".to_string())
        );
        assert_eq!(
            query.get("waypoint0").as_deref(),
            Some("geo!1,2;;my home & garden")
        );
    }

    #[test]
    fn map_query_keeps_order_and_skips_blank_optionals() {
        let query = MapQuery::new()
            .param("b", "2")
            .param("a", "1")
            .optional("c", Some("  "))
            .optional("d", None)
            .optional("e", Some("five"))
            .build();
        assert_eq!(
            query,
            Query::Map(vec![
                ("b".to_string(), "2".to_string()),
                ("a".to_string(), "1".to_string()),
                ("e".to_string(), "five".to_string()),
            ])
        );
        assert_eq!(query.get("a").as_deref(), Some("1"));
        assert!(query.get("c").is_none());
    }

    #[test]
    fn full_iso_timestamp() {
        assert_eq!(iso_timestamp(&departure()), "2024-05-01T08:30:00.250Z");
    }

    #[test]
    fn truncated_iso_timestamp() {
        assert_eq!(iso_timestamp_seconds(&departure()), "2024-05-01T08:30:00Z");
    }

    #[test]
    fn parse_departure_accepts_offsets() {
        let parsed = parse_departure("2024-05-01T10:30:00.250+02:00").unwrap();
        assert_eq!(parsed, departure());
    }

    #[test]
    fn parse_departure_rejects_garbage() {
        let err = parse_departure("next tuesday").unwrap_err();
        assert!(matches!(err, HereError::InvalidDate(_)));
        assert!(err.is_validation());
    }
}
