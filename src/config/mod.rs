//! Configuration layer: typed settings with layered precedence (file → env).

use std::{num::NonZeroU64, path::Path, str::FromStr};

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "quietfeed";
const ENV_PREFIX: &str = "QUIETFEED";
const DEFAULT_BLOG_FEED_TTL_SECS: u64 = 3600;
const DEFAULT_BLOG_POST_TTL_SECS: u64 = 3600;
const DEFAULT_STORE_CAPACITY: usize = 1000;

#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub blog_feed_ttl_seconds: NonZeroU64,
    pub blog_post_ttl_seconds: NonZeroU64,
    pub store_capacity: usize,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → explicit file → environment).
pub fn load(config_file: Option<&Path>) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = config_file {
        builder = builder.add_source(File::from(path).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let raw: RawSettings = builder.build()?.try_deserialize()?;
    Settings::from_raw(raw)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            logging: LoggingSettings {
                level: LevelFilter::INFO,
                format: LogFormat::Compact,
            },
            cache: CacheSettings::default(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            blog_feed_ttl_seconds: NonZeroU64::new(DEFAULT_BLOG_FEED_TTL_SECS)
                .unwrap_or(NonZeroU64::MIN),
            blog_post_ttl_seconds: NonZeroU64::new(DEFAULT_BLOG_POST_TTL_SECS)
                .unwrap_or(NonZeroU64::MIN),
            store_capacity: DEFAULT_STORE_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    cache: RawCacheSettings,
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings { logging, cache } = raw;

        let logging = build_logging_settings(logging)?;
        let cache = build_cache_settings(cache)?;

        Ok(Self { logging, cache })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_cache_settings(cache: RawCacheSettings) -> Result<CacheSettings, LoadError> {
    let blog_feed_ttl_seconds = non_zero_u64(
        cache
            .blog_feed_ttl_seconds
            .unwrap_or(DEFAULT_BLOG_FEED_TTL_SECS),
        "cache.blog_feed_ttl_seconds",
    )?;
    let blog_post_ttl_seconds = non_zero_u64(
        cache
            .blog_post_ttl_seconds
            .unwrap_or(DEFAULT_BLOG_POST_TTL_SECS),
        "cache.blog_post_ttl_seconds",
    )?;

    let store_capacity = cache.store_capacity.unwrap_or(DEFAULT_STORE_CAPACITY);
    if store_capacity == 0 {
        return Err(LoadError::invalid(
            "cache.store_capacity",
            "must be greater than zero",
        ));
    }

    Ok(CacheSettings {
        blog_feed_ttl_seconds,
        blog_post_ttl_seconds,
        store_capacity,
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCacheSettings {
    blog_feed_ttl_seconds: Option<u64>,
    blog_post_ttl_seconds: Option<u64>,
    store_capacity: Option<usize>,
}

fn non_zero_u64(value: u64, key: &'static str) -> Result<NonZeroU64, LoadError> {
    NonZeroU64::new(value).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}

#[cfg(test)]
mod tests;
