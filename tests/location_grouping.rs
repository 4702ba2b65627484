//! Integration tests for map grouping, including custom event types

use hie_geo::domain::types::{EventId, EventPoint, Locatable};
use hie_geo::group_by_location;
use hie_geo::io::parse_events;
use hie_geo::services::LocationGrouper;

/// Caller-side type that is not an EventPoint
#[derive(Debug, Clone, PartialEq)]
struct Venue {
    name: &'static str,
    lat: Option<f64>,
    lng: Option<f64>,
}

impl Locatable for Venue {
    fn latitude(&self) -> Option<f64> {
        self.lat
    }

    fn longitude(&self) -> Option<f64> {
        self.lng
    }
}

fn venue(name: &'static str, lat: f64, lng: f64) -> Venue {
    Venue { name, lat: Some(lat), lng: Some(lng) }
}

#[test]
fn test_order_follows_first_occurrence() {
    let venues = vec![
        venue("A", 57.4778, -4.2247),
        venue("B", 56.8198, -5.1052),
        venue("C", 57.4778, -4.2247),
    ];
    let groups = group_by_location(venues);

    let names: Vec<Vec<&str>> =
        groups.iter().map(|g| g.events.iter().map(|v| v.name).collect()).collect();
    assert_eq!(names, vec![vec!["A", "C"], vec!["B"]]);
}

#[test]
fn test_rounding_boundary_splits() {
    // 57.12345 is exactly half way at 4 places and rounds away from zero
    let groups = group_by_location(vec![venue("x", 57.12345, -4.0), venue("y", 57.12341, -4.0)]);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].key, "57.1235,-4.0000");
    assert_eq!(groups[1].key, "57.1234,-4.0000");
}

#[test]
fn test_rounding_boundary_merges() {
    let groups = group_by_location(vec![venue("x", 57.12346, -4.0), venue("y", 57.12354, -4.0)]);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].lat, 57.1235);
    assert_eq!(groups[0].len(), 2);
}

#[test]
fn test_total_count_matches_located_events() {
    let venues = vec![
        venue("a", 57.0, -4.0),
        Venue { name: "b", lat: None, lng: Some(-4.0) },
        venue("c", 57.0, -4.0),
        Venue { name: "d", lat: Some(57.0), lng: None },
        venue("e", 58.2, -6.38),
    ];
    let located = venues.iter().filter(|v| v.lat.is_some() && v.lng.is_some()).count();
    let groups = group_by_location(&venues);

    let total: usize = groups.iter().map(|g| g.len()).sum();
    assert_eq!(total, located);
    assert_eq!(groups.len(), 2);
}

#[test]
fn test_group_loaded_events_serialises() {
    let content = r#"[
        {"id": 1, "latitude": 57.47781, "longitude": -4.22474, "title": "Ceilidh"},
        {"id": "2", "latitude": 57.47779, "longitude": -4.2247},
        {"id": 3, "latitude": null, "longitude": -4.0}
    ]"#;
    let events = parse_events(content).unwrap();
    let groups = LocationGrouper::default().group(events);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].events[0].id, EventId::Int(1));
    assert_eq!(groups[0].events[1].id, EventId::Text("2".to_string()));

    let value = serde_json::to_value(&groups).unwrap();
    assert_eq!(value[0]["key"], "57.4778,-4.2247");
    assert_eq!(value[0]["lat"], 57.4778);
    assert_eq!(value[0]["events"][0]["title"], "Ceilidh");
    assert_eq!(value[0]["events"][0]["latitude"], 57.47781);
}

#[test]
fn test_empty_and_unlocated_inputs() {
    assert!(group_by_location(Vec::<EventPoint>::new()).is_empty());
    assert!(group_by_location(vec![EventPoint::new(1, None, None)]).is_empty());
}
