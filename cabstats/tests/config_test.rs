//! Tests for config module

use cabstats::config::{expand_tilde, Config};
use cabstats::query::{FilterRequest, QueryBuilder};
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.server.bind_addr, "localhost:8010");
    assert_eq!(config.server.static_dir, PathBuf::from("./static"));
    assert_eq!(config.analytics.endpoint, "http://localhost:8095");
    assert_eq!(config.analytics.dataset, "alltaxis");
    assert_eq!(config.analytics.year, 2016);
    assert_eq!(
        config.transform.output,
        PathBuf::from("2016_Green_Taxi_Trip_Data.csv")
    );
    assert_eq!(config.transform.taxi_type, "green");
    assert_eq!(config.observability.log_format, "pretty");
    assert!(config.observability.metrics_enabled);
}

#[test]
fn test_expand_tilde() {
    let home = dirs::home_dir().unwrap();

    let expanded = expand_tilde(&PathBuf::from("~/static")).unwrap();
    assert_eq!(expanded, home.join("static"));

    let expanded = expand_tilde(&PathBuf::from("~")).unwrap();
    assert_eq!(expanded, home);

    let expanded = expand_tilde(&PathBuf::from("/absolute/path")).unwrap();
    assert_eq!(expanded, PathBuf::from("/absolute/path"));

    let expanded = expand_tilde(&PathBuf::from("relative/path")).unwrap();
    assert_eq!(expanded, PathBuf::from("relative/path"));
}

#[test]
fn test_save_and_load() {
    let temp = tempdir().unwrap();
    let config_path = temp.path().join("cabstats.toml");

    let mut config = Config::default();
    config.server.bind_addr = "0.0.0.0:9999".to_string();
    config.analytics.year = 2017;
    config.analytics.dataset = "trips".to_string();
    config.transform.taxi_type = "yellow".to_string();

    config.save(&config_path).unwrap();

    let loaded = Config::load_or_create(&config_path).unwrap();
    assert_eq!(loaded.server.bind_addr, "0.0.0.0:9999");
    assert_eq!(loaded.analytics.year, 2017);
    assert_eq!(loaded.analytics.dataset, "trips");
    assert_eq!(loaded.transform.taxi_type, "yellow");
}

#[test]
fn test_load_or_create_writes_default() {
    let temp = tempdir().unwrap();
    let config_path = temp.path().join("nested/cabstats.toml");

    let config = Config::load_or_create(&config_path).unwrap();
    assert_eq!(config.server.bind_addr, "localhost:8010");
    assert!(config_path.exists());
}

#[test]
fn test_partial_file_uses_defaults() {
    let temp = tempdir().unwrap();
    let config_path = temp.path().join("cabstats.toml");
    std::fs::write(
        &config_path,
        r#"
[analytics]
year = 2015

[analytics.vendors]
fhv = "fhvtaxis"
"#,
    )
    .unwrap();

    let config = Config::load_or_create(&config_path).unwrap();
    assert_eq!(config.analytics.year, 2015);
    assert_eq!(config.analytics.dataset, "alltaxis");
    assert_eq!(config.analytics.vendors.len(), 1);

    let query = QueryBuilder::from_config(&config.analytics)
        .build(
            &FilterRequest::new("count(*)")
                .with_vendor("fhv")
                .with_period(cabstats::query::Period::Day)
                .with_month(12),
        )
        .unwrap();
    assert!(query.statement().contains("FROM fhvtaxis"));
    assert!(query.statement().contains("pickupDate >= \"2015-12-01 00:00:00\""));
}

#[test]
fn test_load_does_not_write_default() {
    let temp = tempdir().unwrap();
    let config_path = temp.path().join("cabstats.toml");

    let config = Config::load(&config_path).unwrap();
    assert_eq!(config.analytics.username, "user");
    assert_eq!(config.transform.taxi_type, "green");
    assert!(!config_path.exists());

    std::fs::write(&config_path, "[transform]\ntaxi_type = \"yellow\"\n").unwrap();
    let config = Config::load(&config_path).unwrap();
    assert_eq!(config.transform.taxi_type, "yellow");
}
