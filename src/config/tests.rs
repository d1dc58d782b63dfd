use std::io::Write;

use super::*;

#[test]
fn defaults_apply_when_nothing_is_configured() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
    assert_eq!(settings.cache.blog_feed_ttl_seconds.get(), 3600);
    assert_eq!(settings.cache.blog_post_ttl_seconds.get(), 3600);
    assert_eq!(settings.cache.store_capacity, 1000);
}

#[test]
fn json_logging_selects_json_format() {
    let mut raw = RawSettings::default();
    raw.logging.json = Some(true);
    raw.logging.level = Some("debug".to_string());

    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn unknown_log_level_is_rejected() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("chatty".to_string());

    let err = Settings::from_raw(raw).expect_err("invalid level");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "logging.level",
            ..
        }
    ));
}

#[test]
fn zero_ttl_is_rejected() {
    let mut raw = RawSettings::default();
    raw.cache.blog_post_ttl_seconds = Some(0);

    let err = Settings::from_raw(raw).expect_err("zero ttl");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "cache.blog_post_ttl_seconds",
            ..
        }
    ));
}

#[test]
fn zero_store_capacity_is_rejected() {
    let mut raw = RawSettings::default();
    raw.cache.store_capacity = Some(0);

    let err = Settings::from_raw(raw).expect_err("zero capacity");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "cache.store_capacity",
            ..
        }
    ));
}

#[test]
fn explicit_file_overrides_defaults() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp config file");
    writeln!(
        file,
        "[cache]\nblog_feed_ttl_seconds = 60\nstore_capacity = 16\n\n[logging]\nlevel = \"warn\""
    )
    .expect("write config");

    let settings = load(Some(file.path())).expect("settings from file");

    assert_eq!(settings.cache.blog_feed_ttl_seconds.get(), 60);
    assert_eq!(settings.cache.blog_post_ttl_seconds.get(), 3600);
    assert_eq!(settings.cache.store_capacity, 16);
    assert_eq!(settings.logging.level, LevelFilter::WARN);
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("absent.toml");

    let err = load(Some(missing.as_path())).expect_err("missing file");
    assert!(matches!(err, LoadError::Build(_)));
}
