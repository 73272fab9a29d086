//! Config load / save integration tests.

use assert_fs::prelude::*;
use personas_core::{config, ClientConfig, ConfigError};
use predicates::prelude::predicate;

#[test]
fn save_then_load_roundtrips() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let cfg = ClientConfig {
        api_url: "http://backend.local:9090".into(),
        timeout_secs: Some(15),
    };
    config::save_at(home.path(), &cfg).expect("save");

    home.child(".personas/config.yaml")
        .assert(predicate::path::exists())
        .assert(predicate::str::contains("api_url: http://backend.local:9090"));
    home.child(".personas/config.yaml.tmp")
        .assert(predicate::path::missing());

    let loaded = config::load_at(home.path()).expect("load");
    assert_eq!(loaded, cfg);
}

#[test]
fn timeout_is_optional_in_file() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".personas/config.yaml")
        .write_str("api_url: http://x:1\n")
        .expect("write");
    let loaded = config::load_at(home.path()).expect("load");
    assert_eq!(loaded.api_url, "http://x:1");
    assert_eq!(loaded.timeout_secs, None);
}

#[test]
fn corrupt_yaml_reports_path() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".personas/config.yaml")
        .write_str(": : broken : [unclosed")
        .expect("write");
    let err = config::load_at(home.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains("config.yaml"));
}
