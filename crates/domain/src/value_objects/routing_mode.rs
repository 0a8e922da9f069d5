//! Routing mode value object
//!
//! The service describes how to route with a single semicolon-delimited segment,
//! e.g. `fastest;car;traffic:enabled`. [`RoutingMode`] is the typed form of that
//! segment and round-trips through its string representation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Optimization goal of the route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoutingType {
    /// Minimize travel time
    #[default]
    Fastest,
    /// Minimize distance
    Shortest,
    /// Trade time against distance
    Balanced,
}

impl RoutingType {
    /// Wire name of the routing type
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fastest => "fastest",
            Self::Shortest => "shortest",
            Self::Balanced => "balanced",
        }
    }
}

/// Means of transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransportMode {
    /// Passenger car
    #[default]
    Car,
    /// Walking
    Pedestrian,
    /// Heavy goods vehicle
    Truck,
    /// Bicycle
    Bicycle,
    /// Public transport with timetable
    PublicTransport,
    /// Car allowed on high-occupancy lanes
    CarHov,
}

impl TransportMode {
    /// Wire name of the transport mode
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Pedestrian => "pedestrian",
            Self::Truck => "truck",
            Self::Bicycle => "bicycle",
            Self::PublicTransport => "publicTransport",
            Self::CarHov => "carHOV",
        }
    }
}

/// Whether live and historical traffic is considered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrafficMode {
    /// Use traffic information
    Enabled,
    /// Ignore traffic information
    Disabled,
    /// Let the service decide
    Default,
}

impl TrafficMode {
    /// Map a "disable traffic" flag to a traffic mode
    #[must_use]
    pub const fn from_disabled(disabled: bool) -> Self {
        if disabled { Self::Disabled } else { Self::Enabled }
    }

    /// Wire name of the traffic mode
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
            Self::Default => "default",
        }
    }
}

/// Complete routing mode segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoutingMode {
    /// Optimization goal
    pub kind: RoutingType,
    /// Means of transport
    pub transport: TransportMode,
    /// Traffic handling; omitted from the segment when `None`
    pub traffic: Option<TrafficMode>,
}

impl RoutingMode {
    /// Create a mode without a traffic component
    #[must_use]
    pub const fn new(kind: RoutingType, transport: TransportMode) -> Self {
        Self {
            kind,
            transport,
            traffic: None,
        }
    }

    /// The fastest car route, traffic left unspecified
    #[must_use]
    pub const fn fastest_car() -> Self {
        Self::new(RoutingType::Fastest, TransportMode::Car)
    }

    /// Set the traffic component
    #[must_use]
    pub const fn with_traffic(mut self, traffic: TrafficMode) -> Self {
        self.traffic = Some(traffic);
        self
    }
}

impl fmt::Display for RoutingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.kind.as_str(), self.transport.as_str())?;
        if let Some(traffic) = self.traffic {
            write!(f, ";traffic:{}", traffic.as_str())?;
        }
        Ok(())
    }
}

impl FromStr for RoutingMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidRoutingMode(s.to_string());
        let mut segments = s.split(';').map(str::trim);

        let kind = match segments.next().map(str::to_lowercase).as_deref() {
            Some("fastest") => RoutingType::Fastest,
            Some("shortest") => RoutingType::Shortest,
            Some("balanced") => RoutingType::Balanced,
            _ => return Err(invalid()),
        };

        let transport = match segments.next().map(str::to_lowercase).as_deref() {
            Some("car") => TransportMode::Car,
            Some("pedestrian") => TransportMode::Pedestrian,
            Some("truck") => TransportMode::Truck,
            Some("bicycle") => TransportMode::Bicycle,
            Some("publictransport") => TransportMode::PublicTransport,
            Some("carhov") => TransportMode::CarHov,
            _ => return Err(invalid()),
        };

        let traffic = match segments.next() {
            None => None,
            Some(segment) => match segment.to_lowercase().as_str() {
                "traffic:enabled" => Some(TrafficMode::Enabled),
                "traffic:disabled" => Some(TrafficMode::Disabled),
                "traffic:default" => Some(TrafficMode::Default),
                _ => return Err(invalid()),
            },
        };

        if segments.next().is_some() {
            return Err(invalid());
        }

        Ok(Self {
            kind,
            transport,
            traffic,
        })
    }
}

impl TryFrom<String> for RoutingMode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RoutingMode> for String {
    fn from(mode: RoutingMode) -> Self {
        mode.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_without_traffic() {
        assert_eq!(RoutingMode::fastest_car().to_string(), "fastest;car");
    }

    #[test]
    fn renders_with_traffic() {
        let mode = RoutingMode::fastest_car().with_traffic(TrafficMode::Enabled);
        assert_eq!(mode.to_string(), "fastest;car;traffic:enabled");

        let mode = RoutingMode::new(RoutingType::Shortest, TransportMode::Pedestrian)
            .with_traffic(TrafficMode::Disabled);
        assert_eq!(mode.to_string(), "shortest;pedestrian;traffic:disabled");
    }

    #[test]
    fn parses_wire_form() {
        let mode: RoutingMode = "fastest;publicTransport;traffic:default".parse().unwrap();
        assert_eq!(mode.kind, RoutingType::Fastest);
        assert_eq!(mode.transport, TransportMode::PublicTransport);
        assert_eq!(mode.traffic, Some(TrafficMode::Default));
    }

    #[test]
    fn parses_without_traffic() {
        let mode: RoutingMode = "balanced;truck".parse().unwrap();
        assert_eq!(mode, RoutingMode::new(RoutingType::Balanced, TransportMode::Truck));
    }

    #[test]
    fn rejects_unknown_segments() {
        assert!("quickest;car".parse::<RoutingMode>().is_err());
        assert!("fastest;rocket".parse::<RoutingMode>().is_err());
        assert!("fastest;car;traffic:maybe".parse::<RoutingMode>().is_err());
        assert!("fastest;car;traffic:enabled;extra".parse::<RoutingMode>().is_err());
        assert!("".parse::<RoutingMode>().is_err());
    }

    #[test]
    fn traffic_from_disabled_flag() {
        assert_eq!(TrafficMode::from_disabled(true), TrafficMode::Disabled);
        assert_eq!(TrafficMode::from_disabled(false), TrafficMode::Enabled);
    }

    #[test]
    fn serde_uses_wire_form() {
        let mode = RoutingMode::fastest_car().with_traffic(TrafficMode::Disabled);
        let json = serde_json::to_string(&mode).unwrap();
        assert_eq!(json, r#""fastest;car;traffic:disabled""#);
        let back: RoutingMode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mode);
    }
}
