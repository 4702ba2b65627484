//! Integration tests for configuration loading

use hie_geo::domain::rules::{HIE_BOUNDING_BOX, HIE_NARROW};
use hie_geo::infra::Config;
use hie_geo::services::{LocationGrouper, RegionClassifier};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_config_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();

    let config_content = r#"
[region]
rule_set = "hie-narrow"

[region.bounding_box]
min_lat = 56.0
max_lat = 59.0
min_lng = -8.0
max_lng = -2.5

[grouping]
precision = 3

[metrics]
report_on_exit = false
"#;

    temp_file.write_all(config_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();

    assert_eq!(config.rule_set(), &HIE_NARROW);
    assert_eq!(config.bounding_box().min_lat, 56.0);
    assert_eq!(config.bounding_box().max_lng, -2.5);
    assert_eq!(config.grouping_precision(), 3);
    assert!(!config.report_metrics_on_exit());
    assert_eq!(config.config_file(), temp_file.path().display().to_string());

    let classifier = RegionClassifier::from_config(&config);
    assert!(!classifier.is_in_region_by_postcode("PH27 1RH"));
    assert!(classifier.is_in_region_by_coordinate(58.9, -2.6));

    assert_eq!(LocationGrouper::from_config(&config).precision(), 3);
}

#[test]
fn test_shipped_default_config_parses() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/default.toml");
    let config = Config::from_file(path).unwrap();

    assert_eq!(config.rule_set().name, "hie-wide");
    assert_eq!(config.bounding_box(), HIE_BOUNDING_BOX);
    assert_eq!(config.grouping_precision(), 4);
}

#[test]
fn test_invalid_rule_set_reports_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[region]\nrule_set = \"hie-v3\"\n").unwrap();
    temp_file.flush().unwrap();

    let err = Config::from_file(temp_file.path()).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("Failed to parse config file"));
    assert!(message.contains("hie-v3"));
}

#[test]
fn test_load_from_path_fallback() {
    let config = Config::load_from_path("/nonexistent/config.toml");
    assert_eq!(config.rule_set().name, "hie-wide");
    assert_eq!(config.grouping_precision(), 4);
    assert_eq!(config.config_file(), "default");
}
