//! Response normalization
//!
//! Maps the service's wire shapes onto the stable result entities. Every
//! function takes the payload already unwrapped from its [`Envelope`](crate::transport::Envelope).

use chrono::{DateTime, Utc};
use domain::{
    GeoLocation, GeocodeResult, GeocodedAddress, LabeledPoint, Leg, MatrixEntry, OptimizedRoute,
    OptimizedWaypoint, RouteResult,
};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::HereError;

/// Normalize a routing payload into a [`RouteResult`]
///
/// Leg endpoints take the label echoed by the service when present, otherwise
/// the label assigned while encoding.
///
/// # Errors
///
/// Returns `HereError::NoResponse` if the payload holds no route, or
/// `HereError::Json` if it does not have the routing shape.
pub fn route(
    payload: Value,
    labels: &[String],
    start_time: DateTime<Utc>,
) -> Result<RouteResult, HereError> {
    let response: RawRouteResponse = serde_json::from_value(payload)?;
    let route = response.route.into_iter().next().ok_or(HereError::NoResponse)?;

    let legs: Vec<Leg> = route
        .leg
        .into_iter()
        .enumerate()
        .map(|(index, leg)| Leg {
            start: leg.start.into_labeled(labels, index),
            end: leg.end.into_labeled(labels, index + 1),
            travel_time: leg.travel_time,
            distance: leg.length,
        })
        .collect();

    let (travel_time, distance) = match route.summary {
        Some(summary) => (summary.travel_time, summary.distance),
        None => legs.iter().fold((0, 0), |(time, dist), leg| {
            (time + leg.travel_time, dist + leg.distance)
        }),
    };

    debug!(legs = legs.len(), travel_time, distance, "Normalized route");

    Ok(RouteResult {
        travel_time,
        distance,
        start_time,
        legs,
    })
}

/// Normalize a matrix payload into one entry per origin/destination pair
///
/// The result always has `origins.len() * destinations.len()` entries ordered
/// by origin then destination. Pairs the service could not route keep empty
/// times.
///
/// # Errors
///
/// Returns `HereError::Json` if the payload does not have the matrix shape.
pub fn matrix(
    payload: Value,
    origins: &[String],
    destinations: &[String],
) -> Result<Vec<MatrixEntry>, HereError> {
    let response: RawMatrixResponse = serde_json::from_value(payload)?;
    let width = destinations.len();

    let mut entries: Vec<MatrixEntry> = origins
        .iter()
        .flat_map(|start| {
            destinations.iter().map(move |end| MatrixEntry {
                start: start.clone(),
                end: end.clone(),
                travel_time: None,
                distance: None,
            })
        })
        .collect();

    for raw in response.matrix_entry {
        if raw.start_index >= origins.len() || raw.destination_index >= width {
            warn!(
                start_index = raw.start_index,
                destination_index = raw.destination_index,
                "Matrix entry outside the requested grid"
            );
            continue;
        }
        let entry = &mut entries[raw.start_index * width + raw.destination_index];
        if let Some(summary) = raw.summary {
            entry.travel_time = summary.travel_time;
            entry.distance = summary.distance;
        }
    }

    debug!(
        entries = entries.len(),
        routed = entries.iter().filter(|e| e.is_routed()).count(),
        "Normalized matrix"
    );

    Ok(entries)
}

/// Normalize a waypoint sequence payload into an [`OptimizedRoute`]
///
/// Waypoints are returned in visiting order.
///
/// # Errors
///
/// Returns `HereError::NoResponse` if the payload holds no result, or
/// `HereError::Json` if it does not have the sequence shape.
pub fn sequence(payload: Value, start_time: DateTime<Utc>) -> Result<OptimizedRoute, HereError> {
    let results: Vec<RawSequence> = serde_json::from_value(payload)?;
    let result = results.into_iter().next().ok_or(HereError::NoResponse)?;

    let mut waypoints: Vec<OptimizedWaypoint> = result
        .waypoints
        .into_iter()
        .map(|raw| OptimizedWaypoint {
            estimated_departure: raw
                .estimated_departure
                .as_deref()
                .and_then(|text| parse_estimate(&raw.id, text)),
            key: raw.id,
            latitude: raw.lat,
            longitude: raw.lng,
            sequence: raw.sequence,
        })
        .collect();
    waypoints.sort_by_key(|w| w.sequence);

    debug!(waypoints = waypoints.len(), "Normalized sequence");

    Ok(OptimizedRoute {
        time: result.time,
        distance: result.distance,
        start_time,
        waypoints,
    })
}

fn parse_estimate(id: &str, text: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(text) {
        Ok(time) => Some(time.with_timezone(&Utc)),
        Err(e) => {
            warn!(waypoint = id, estimate = text, error = %e, "Unparseable departure estimate");
            None
        },
    }
}

/// Normalize a geocoder payload into a [`GeocodeResult`]
///
/// Only the first result of the first view is used.
///
/// # Errors
///
/// Returns `HereError::GeocodeFailed` if no position came back,
/// `HereError::GeocodeIncomplete` if the position has no address, or
/// `HereError::Json` if the payload does not have the geocoder shape.
pub fn geocode(payload: Value) -> Result<GeocodeResult, HereError> {
    let response: RawGeocodeResponse = serde_json::from_value(payload)?;
    let location = response
        .view
        .into_iter()
        .next()
        .and_then(|view| view.result.into_iter().next())
        .and_then(|result| result.location)
        .ok_or(HereError::GeocodeFailed)?;

    let position = location.display_position.ok_or(HereError::GeocodeFailed)?;
    let position = GeoLocation::new(position.latitude, position.longitude).map_err(|e| {
        debug!(error = %e, "Geocoder returned an unusable position");
        HereError::GeocodeFailed
    })?;
    let address = location.address.ok_or(HereError::GeocodeIncomplete)?;

    Ok(GeocodeResult {
        location: position,
        address: address.into_geocoded(),
    })
}

/// Accepts a JSON number (integer or fractional) or a numeric string
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u64),
        Float(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(n) => Ok(n),
        Raw::Float(n) if n.is_finite() && n >= 0.0 => Ok(n.round() as u64),
        Raw::Float(n) => Err(de::Error::custom(format!("expected a non-negative number, got {n}"))),
        Raw::Text(text) => {
            let trimmed = text.trim();
            trimmed
                .parse::<u64>()
                .or_else(|_| {
                    trimmed
                        .parse::<f64>()
                        .ok()
                        .filter(|n| n.is_finite() && *n >= 0.0)
                        .map(|n| n.round() as u64)
                        .ok_or(())
                })
                .map_err(|()| de::Error::custom(format!("expected a number, got '{text}'")))
        },
    }
}

fn lenient_u64_opt<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapped(#[serde(deserialize_with = "lenient_u64")] u64);

    Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|Wrapped(n)| n))
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
struct RawRouteResponse {
    #[serde(default)]
    route: Vec<RawRoute>,
}

#[derive(Debug, Deserialize)]
struct RawRoute {
    #[serde(default)]
    leg: Vec<RawLeg>,
    summary: Option<RawSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLeg {
    start: RawRoutePoint,
    end: RawRoutePoint,
    #[serde(default, deserialize_with = "lenient_u64")]
    length: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    travel_time: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRoutePoint {
    mapped_position: RawPosition,
    user_label: Option<String>,
}

impl RawRoutePoint {
    fn into_labeled(self, labels: &[String], index: usize) -> LabeledPoint {
        let key = self
            .user_label
            .filter(|label| !label.trim().is_empty())
            .or_else(|| labels.get(index).cloned())
            .unwrap_or_else(|| index.to_string());
        LabeledPoint {
            key,
            latitude: self.mapped_position.latitude,
            longitude: self.mapped_position.longitude,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawPosition {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSummary {
    #[serde(default, deserialize_with = "lenient_u64")]
    distance: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    travel_time: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMatrixResponse {
    #[serde(default)]
    matrix_entry: Vec<RawMatrixEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMatrixEntry {
    start_index: usize,
    destination_index: usize,
    summary: Option<RawMatrixSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMatrixSummary {
    #[serde(default, deserialize_with = "lenient_u64_opt")]
    travel_time: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64_opt")]
    distance: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawSequence {
    #[serde(default)]
    waypoints: Vec<RawSequenceWaypoint>,
    #[serde(default, deserialize_with = "lenient_u64")]
    distance: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    time: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSequenceWaypoint {
    id: String,
    lat: f64,
    lng: f64,
    sequence: u32,
    estimated_departure: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawGeocodeResponse {
    #[serde(default)]
    view: Vec<RawView>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawView {
    #[serde(default)]
    result: Vec<RawGeocodeResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawGeocodeResult {
    location: Option<RawGeocodeLocation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawGeocodeLocation {
    display_position: Option<RawDisplayPosition>,
    address: Option<RawAddress>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawDisplayPosition {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawAddress {
    street: Option<String>,
    house_number: Option<String>,
    city: Option<String>,
    state: Option<String>,
    postal_code: Option<String>,
    country: Option<String>,
    #[serde(default)]
    additional_data: Vec<RawAdditionalData>,
}

impl RawAddress {
    fn into_geocoded(self) -> GeocodedAddress {
        let unit = self
            .additional_data
            .into_iter()
            .find(|data| data.key == "Unit")
            .map(|data| data.value);
        let street = match (self.house_number, self.street) {
            (Some(number), Some(street)) => Some(format!("{number} {street}")),
            (number, street) => street.or(number),
        };

        GeocodedAddress {
            street,
            unit,
            city: self.city,
            state: self.state,
            zip: self.postal_code,
            country: self.country,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawAdditionalData {
    value: String,
    key: String,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn departure() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap()
    }

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    fn position(lat: f64, lng: f64) -> Value {
        json!({ "latitude": lat, "longitude": lng })
    }

    fn route_payload() -> Value {
        json!({
            "route": [{
                "leg": [
                    {
                        "start": { "mappedPosition": position(41.28, -96.0042), "label": "Farnam St" },
                        "end": { "mappedPosition": position(41.2852, -96.011), "label": "Dodge St" },
                        "length": 1200,
                        "travelTime": 180
                    },
                    {
                        "start": { "mappedPosition": position(41.2852, -96.011), "label": "Dodge St" },
                        "end": { "mappedPosition": position(41.2939, -96.0206), "label": "Cass St", "userLabel": "home sweet home" },
                        "length": 1800,
                        "travelTime": 240
                    }
                ],
                "summary": { "distance": 3000, "travelTime": 420, "baseTime": 400, "trafficTime": 420 }
            }]
        })
    }

    #[test]
    fn route_maps_legs_and_summary() {
        let result = route(
            route_payload(),
            &labels(&["business", "my friend", "my home"]),
            departure(),
        )
        .unwrap();

        assert_eq!(result.travel_time, 420);
        assert_eq!(result.distance, 3000);
        assert_eq!(result.start_time, departure());
        assert_eq!(result.legs.len(), 2);
        assert_eq!(result.legs[0].start.key, "business");
        assert_eq!(result.legs[0].end.key, "my friend");
        assert_eq!(result.legs[1].start.key, "my friend");
        assert_eq!(result.legs[0].distance, 1200);
        assert_eq!(result.legs[0].travel_time, 180);
        assert!((result.legs[1].end.latitude - 41.2939).abs() < f64::EPSILON);
    }

    #[test]
    fn route_prefers_echoed_user_label() {
        let result = route(
            route_payload(),
            &labels(&["business", "my friend", "my home"]),
            departure(),
        )
        .unwrap();
        assert_eq!(result.legs[1].end.key, "home sweet home");
    }

    #[test]
    fn route_without_summary_sums_legs() {
        let mut payload = route_payload();
        payload["route"][0]
            .as_object_mut()
            .unwrap()
            .remove("summary");
        let result = route(payload, &labels(&["a", "b", "c"]), departure()).unwrap();
        assert_eq!(result.travel_time, 420);
        assert_eq!(result.distance, 3000);
    }

    #[test]
    fn route_falls_back_to_index_label() {
        let result = route(route_payload(), &[], departure()).unwrap();
        assert_eq!(result.legs[0].start.key, "0");
        assert_eq!(result.legs[0].end.key, "1");
    }

    #[test]
    fn empty_route_is_no_response() {
        let err = route(json!({ "route": [] }), &[], departure()).unwrap_err();
        assert!(matches!(err, HereError::NoResponse));
    }

    #[test]
    fn malformed_route_is_json_error() {
        let err = route(json!({ "route": "nope" }), &[], departure()).unwrap_err();
        assert!(matches!(err, HereError::Json(_)));
    }

    #[test]
    fn matrix_fills_full_grid() {
        let payload = json!({
            "matrixEntry": [
                { "startIndex": 1, "destinationIndex": 0, "summary": { "travelTime": 300, "distance": 2000 } },
                { "startIndex": 0, "destinationIndex": 1, "summary": { "travelTime": 120, "distance": 900 } },
                { "startIndex": 0, "destinationIndex": 0, "summary": { "travelTime": 60, "distance": 400 } },
                { "startIndex": 1, "destinationIndex": 1, "status": "failed" }
            ]
        });
        let entries = matrix(payload, &labels(&["business", "1"]), &labels(&["my home", "x"])).unwrap();

        assert_eq!(entries.len(), 4);
        let pairs: Vec<(&str, &str)> = entries
            .iter()
            .map(|e| (e.start.as_str(), e.end.as_str()))
            .collect();
        assert_eq!(
            pairs,
            [("business", "my home"), ("business", "x"), ("1", "my home"), ("1", "x")]
        );
        assert_eq!(entries[0].travel_time, Some(60));
        assert_eq!(entries[1].distance, Some(900));
        assert_eq!(entries[2].travel_time, Some(300));
        assert!(!entries[3].is_routed());
    }

    #[test]
    fn matrix_ignores_out_of_range_indexes() {
        let payload = json!({
            "matrixEntry": [
                { "startIndex": 5, "destinationIndex": 0, "summary": { "travelTime": 1, "distance": 1 } }
            ]
        });
        let entries = matrix(payload, &labels(&["a"]), &labels(&["b"])).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].is_routed());
    }

    fn sequence_payload() -> Value {
        json!([{
            "waypoints": [
                { "id": "end", "lat": 41.2939, "lng": -96.0206, "sequence": 3, "estimatedArrival": "2024-05-01T09:00:00Z", "estimatedDeparture": null },
                { "id": "start", "lat": 41.28, "lng": -96.0042, "sequence": 0, "estimatedArrival": null, "estimatedDeparture": "2024-05-01T08:30:00Z" },
                { "id": "2", "lat": 41.0, "lng": -96.0, "sequence": 1, "estimatedDeparture": "2024-05-01T10:45:00+02:00" },
                { "id": "my friend", "lat": 41.2852, "lng": -96.011, "sequence": 2, "estimatedDeparture": "sometime" }
            ],
            "distance": "12345",
            "time": "1800",
            "interconnections": []
        }])
    }

    #[test]
    fn sequence_orders_by_visit() {
        let result = sequence(sequence_payload(), departure()).unwrap();
        assert_eq!(result.visiting_order(), ["start", "2", "my friend", "end"]);
        assert_eq!(result.distance, 12_345);
        assert_eq!(result.time, 1800);
        assert_eq!(result.start_time, departure());
    }

    #[test]
    fn sequence_parses_departure_estimates() {
        let result = sequence(sequence_payload(), departure()).unwrap();
        assert_eq!(result.waypoints[0].estimated_departure, Some(departure()));
        assert_eq!(
            result.waypoints[1].estimated_departure,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 8, 45, 0).unwrap())
        );
        assert_eq!(result.waypoints[2].estimated_departure, None);
        assert_eq!(result.waypoints[3].estimated_departure, None);
    }

    #[test]
    fn sequence_accepts_numeric_totals() {
        let payload = json!([{ "waypoints": [], "distance": 10.6, "time": 20 }]);
        let result = sequence(payload, departure()).unwrap();
        assert_eq!(result.distance, 11);
        assert_eq!(result.time, 20);
    }

    #[test]
    fn empty_results_are_no_response() {
        let err = sequence(json!([]), departure()).unwrap_err();
        assert!(matches!(err, HereError::NoResponse));
    }

    fn geocode_payload() -> Value {
        json!({
            "MetaInfo": { "Timestamp": "2024-05-01T08:30:00.000+0000" },
            "View": [{
                "_type": "SearchResultsViewType",
                "ViewId": 0,
                "Result": [{
                    "Relevance": 1.0,
                    "MatchLevel": "houseNumber",
                    "Location": {
                        "LocationId": "NT_abc",
                        "DisplayPosition": { "Latitude": 41.96683, "Longitude": -87.65749 },
                        "Address": {
                            "Label": "4629 N Broadway St, Chicago, IL 60640, United States",
                            "Country": "USA",
                            "State": "IL",
                            "County": "Cook",
                            "City": "Chicago",
                            "District": "Uptown",
                            "Street": "N Broadway St",
                            "HouseNumber": "4629",
                            "PostalCode": "60640",
                            "AdditionalData": [
                                { "value": "United States", "key": "CountryName" },
                                { "value": "2B", "key": "Unit" }
                            ]
                        }
                    }
                }]
            }]
        })
    }

    #[test]
    fn geocode_maps_first_result() {
        let result = geocode(geocode_payload()).unwrap();
        assert!((result.location.latitude() - 41.96683).abs() < f64::EPSILON);
        assert!((result.location.longitude() + 87.65749).abs() < f64::EPSILON);
        assert_eq!(result.address.street.as_deref(), Some("4629 N Broadway St"));
        assert_eq!(result.address.unit.as_deref(), Some("2B"));
        assert_eq!(result.address.city.as_deref(), Some("Chicago"));
        assert_eq!(result.address.state.as_deref(), Some("IL"));
        assert_eq!(result.address.zip.as_deref(), Some("60640"));
        assert_eq!(result.address.country.as_deref(), Some("USA"));
    }

    #[test]
    fn geocode_without_unit() {
        let mut payload = geocode_payload();
        payload["View"][0]["Result"][0]["Location"]["Address"]["AdditionalData"] = json!([]);
        let result = geocode(payload).unwrap();
        assert!(result.address.unit.is_none());
    }

    #[test]
    fn geocode_without_results_fails() {
        let err = geocode(json!({ "View": [] })).unwrap_err();
        assert!(matches!(err, HereError::GeocodeFailed));

        let mut payload = geocode_payload();
        payload["View"][0]["Result"][0]["Location"]
            .as_object_mut()
            .unwrap()
            .remove("DisplayPosition");
        assert!(matches!(geocode(payload), Err(HereError::GeocodeFailed)));
    }

    #[test]
    fn geocode_without_address_is_incomplete() {
        let mut payload = geocode_payload();
        payload["View"][0]["Result"][0]["Location"]
            .as_object_mut()
            .unwrap()
            .remove("Address");
        assert!(matches!(geocode(payload), Err(HereError::GeocodeIncomplete)));
    }
}
