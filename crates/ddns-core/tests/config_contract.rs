//! Contract Test: Configuration File
//!
//! Constraints verified:
//! - A file with all five keys loads to exactly those values
//! - A missing file is a fatal error
//! - Invalid JSON is a fatal configuration error

use ddns_core::{DdnsConfig, Error};
use std::io::Write;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn full_config_round_trips() {
    let file = write_config(
        r#"{
            "api_token": "cf-token",
            "zone_id": "023e105f4ecef8ad9ca31a8372d0c353",
            "record_id": "372e67954025e0ba6aaa6d586b9e0b59",
            "domain": "home.example.com",
            "check_interval": 5
        }"#,
    );

    let config = DdnsConfig::from_file(file.path()).expect("config loads");

    assert_eq!(
        config,
        DdnsConfig {
            api_token: "cf-token".to_string(),
            zone_id: "023e105f4ecef8ad9ca31a8372d0c353".to_string(),
            record_id: "372e67954025e0ba6aaa6d586b9e0b59".to_string(),
            domain: "home.example.com".to_string(),
            check_interval: 5,
            http_timeout_secs: 0,
        }
    );
    assert!(config.validate().is_ok());
}

#[test]
fn unknown_keys_are_ignored() {
    let file = write_config(r#"{"check_interval": 1, "comment": "home router"}"#);
    let config = DdnsConfig::from_file(file.path()).expect("config loads");
    assert_eq!(config.check_interval, 1);
}

#[test]
fn missing_file_is_fatal() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = DdnsConfig::from_file(dir.path().join("absent.json")).unwrap_err();

    assert!(matches!(err, Error::Io(_)), "got {:?}", err);
    assert!(err.is_fatal());
}

#[test]
fn invalid_json_is_fatal() {
    let file = write_config(r#"{"api_token": "cf-token", "#);
    let err = DdnsConfig::from_file(file.path()).unwrap_err();

    assert!(matches!(err, Error::Config(_)), "got {:?}", err);
    assert!(err.is_fatal());
}

#[test]
fn wrong_field_type_is_fatal() {
    let file = write_config(r#"{"check_interval": "five"}"#);
    let err = DdnsConfig::from_file(file.path()).unwrap_err();
    assert!(err.is_fatal());
}
