//! Tests for the recognised-label census

use super::*;
use std::io::Cursor;
use std::path::Path;

#[test]
fn test_counts_known_labels_by_label_text() {
    let parser = standard_parser();
    let content = [
        KNOWN_FIELDS_LINE,
        MIXED_LABELS_LINE,
        "2025-10-21T23:20:28+10:00,RPM=800,Engine RPM=810",
    ]
    .join("\n");
    let census = parser.census_reader(Cursor::new(content));

    assert_eq!(census.get("Vehicle Speed"), Some(&2));
    assert_eq!(census.get("Engine Coolant Temperature"), Some(&2));
    assert_eq!(census.get("Throttle Position"), Some(&1));
    assert_eq!(census.get("RPM"), Some(&1));
    assert_eq!(census.get("Engine RPM"), Some(&1));
    assert!(!census.contains_key("Custom Field"));
}

#[test]
fn test_census_stops_after_window() {
    let parser = standard_parser();
    let content = vec![KNOWN_FIELDS_LINE; 150].join("\n");
    let census = parser.census_reader(Cursor::new(content));

    assert_eq!(census.get("Vehicle Speed"), Some(&100));
}

#[test]
fn test_census_ignores_malformed_lines() {
    let parser = standard_parser();
    let content = format!("no commas here\nVehicle Speed=1,Fuel Level=2\n{}", KNOWN_FIELDS_LINE);
    let census = parser.census_reader(Cursor::new(content));

    // The first part of a line is always treated as the timestamp
    assert_eq!(census.get("Vehicle Speed"), Some(&1));
    assert_eq!(census.get("Fuel Level"), Some(&1));
}

#[test]
fn test_census_of_missing_file_is_empty() {
    let parser = standard_parser();
    assert!(parser.census_file(Path::new("/definitely/not/here.csv")).is_empty());
}
