//! Shared types for map grouping and region checks

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Finite and within -90..=90 / -180..=180
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Event identifier as delivered by the events API (string or integer)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventId {
    Int(i64),
    Text(String),
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventId::Int(id) => write!(f, "{}", id),
            EventId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for EventId {
    fn from(id: i64) -> Self {
        EventId::Int(id)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        EventId::Text(id.to_string())
    }
}

impl Serialize for EventId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            EventId::Int(id) => serializer.serialize_i64(*id),
            EventId::Text(id) => serializer.serialize_str(id),
        }
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct EventIdVisitor;

        impl<'de> Visitor<'de> for EventIdVisitor {
            type Value = EventId;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a string or integer event id")
            }

            fn visit_str<E>(self, value: &str) -> Result<EventId, E>
            where
                E: de::Error,
            {
                Ok(EventId::Text(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<EventId, E>
            where
                E: de::Error,
            {
                Ok(EventId::Text(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<EventId, E>
            where
                E: de::Error,
            {
                Ok(EventId::Int(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<EventId, E>
            where
                E: de::Error,
            {
                // Ids beyond i64 keep their digits rather than failing the whole batch
                match i64::try_from(value) {
                    Ok(id) => Ok(EventId::Int(id)),
                    Err(_) => Ok(EventId::Text(value.to_string())),
                }
            }
        }

        deserializer.deserialize_any(EventIdVisitor)
    }
}

/// Anything that may carry a map position
pub trait Locatable {
    fn latitude(&self) -> Option<f64>;
    fn longitude(&self) -> Option<f64>;
}

impl<T: Locatable + ?Sized> Locatable for &T {
    fn latitude(&self) -> Option<f64> {
        (**self).latitude()
    }

    fn longitude(&self) -> Option<f64> {
        (**self).longitude()
    }
}

/// Event as loaded from the events API, with unknown fields passed through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPoint {
    pub id: EventId,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl EventPoint {
    pub fn new(id: impl Into<EventId>, latitude: Option<f64>, longitude: Option<f64>) -> Self {
        Self { id: id.into(), latitude, longitude, extra: serde_json::Map::new() }
    }

    /// Event pinned at a known position
    pub fn at(id: impl Into<EventId>, latitude: f64, longitude: f64) -> Self {
        Self::new(id, Some(latitude), Some(longitude))
    }
}

impl Locatable for EventPoint {
    fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    fn longitude(&self) -> Option<f64> {
        self.longitude
    }
}

/// Events sharing one rounded position (one map marker)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventGroup<E> {
    pub key: String,
    pub lat: f64,
    pub lng: f64,
    pub events: Vec<E>,
}

impl<E> EventGroup<E> {
    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// More than one event at this position; the map shows a count badge
    #[inline]
    pub fn is_cluster(&self) -> bool {
        self.events.len() > 1
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_validity() {
        assert!(Coordinate::new(57.48, -4.22).is_valid());
        assert!(Coordinate::new(-90.0, 180.0).is_valid());
        assert!(!Coordinate::new(90.5, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -180.1).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn test_event_point_deserialize_keeps_extra_fields() {
        let json = r#"{"id": 42, "latitude": 57.1, "longitude": null, "title": "Ceilidh"}"#;
        let event: EventPoint = serde_json::from_str(json).unwrap();

        assert_eq!(event.id, EventId::Int(42));
        assert_eq!(event.latitude, Some(57.1));
        assert_eq!(event.longitude, None);
        assert_eq!(event.extra["title"], "Ceilidh");
    }

    #[test]
    fn test_event_point_missing_coordinates_default_to_none() {
        let event: EventPoint = serde_json::from_str(r#"{"id": "evt-7"}"#).unwrap();
        assert_eq!(event.id, EventId::Text("evt-7".to_string()));
        assert!(event.latitude.is_none());
        assert!(event.longitude.is_none());
    }

    #[test]
    fn test_event_point_round_trips_extra_fields() {
        let json = r#"{"id":"a","latitude":57.0,"longitude":-4.0,"venue":"Eden Court"}"#;
        let event: EventPoint = serde_json::from_str(json).unwrap();
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["id"], "a");
        assert_eq!(value["venue"], "Eden Court");
    }

    #[test]
    fn test_group_cluster_flag() {
        let mut group = EventGroup {
            key: "57.0000,-4.0000".to_string(),
            lat: 57.0,
            lng: -4.0,
            events: vec![EventPoint::at(1, 57.0, -4.0)],
        };
        assert!(!group.is_cluster());
        group.events.push(EventPoint::at(2, 57.0, -4.0));
        assert!(group.is_cluster());
        assert_eq!(group.len(), 2);
        assert_eq!(group.coordinate(), Coordinate::new(57.0, -4.0));
    }
}
