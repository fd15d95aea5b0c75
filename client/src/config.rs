//! Configuration management for the client.

use crate::controller::SyncOptions;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Longest accepted sync interval (one week).
pub const MAX_SYNC_INTERVAL_SECS: u64 = 7 * 24 * 60 * 60;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// File backing local storage (local quotes, mock server, preferences)
    pub storage_path: PathBuf,
    /// Time between periodic sync cycles
    pub sync_interval: Duration,
    /// Start a sync cycle right after each local add/import
    pub sync_on_write: bool,
    /// Base URL of an HTTP remote; the storage mock is used when unset
    pub remote_url: Option<String>,
    /// Simulated round trip of the storage mock
    pub mock_latency: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("quotebook.json"),
            sync_interval: Duration::from_secs(30),
            sync_on_write: false,
            remote_url: None,
            mock_latency: Duration::from_millis(500),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let storage_path = lookup("QUOTEBOOK_STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.storage_path);

        let sync_interval = match lookup("QUOTEBOOK_SYNC_INTERVAL_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if (1..=MAX_SYNC_INTERVAL_SECS).contains(&secs) => {
                    Duration::from_secs(secs)
                }
                _ => return Err(ConfigError::InvalidSyncInterval(raw)),
            },
            None => defaults.sync_interval,
        };

        let sync_on_write = match lookup("QUOTEBOOK_SYNC_ON_WRITE") {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidSyncOnWrite(raw))?,
            None => defaults.sync_on_write,
        };

        let remote_url = lookup("QUOTEBOOK_REMOTE_URL").filter(|url| !url.trim().is_empty());

        let mock_latency = match lookup("QUOTEBOOK_MOCK_LATENCY_MS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::InvalidMockLatency(raw))?,
            None => defaults.mock_latency,
        };

        Ok(Self {
            storage_path,
            sync_interval,
            sync_on_write,
            remote_url,
            mock_latency,
        })
    }

    /// Options for the sync controller.
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            interval: self.sync_interval,
            sync_on_write: self.sync_on_write,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid QUOTEBOOK_SYNC_INTERVAL_SECS value: {0}")]
    InvalidSyncInterval(String),

    #[error("Invalid QUOTEBOOK_SYNC_ON_WRITE value: {0}")]
    InvalidSyncOnWrite(String),

    #[error("Invalid QUOTEBOOK_MOCK_LATENCY_MS value: {0}")]
    InvalidMockLatency(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.sync_interval, Duration::from_secs(30));
        assert!(!config.sync_on_write);
    }

    #[test]
    fn reads_all_values() {
        let config = Config::from_lookup(lookup(&[
            ("QUOTEBOOK_STORAGE_PATH", "/tmp/q.json"),
            ("QUOTEBOOK_SYNC_INTERVAL_SECS", "5"),
            ("QUOTEBOOK_SYNC_ON_WRITE", "yes"),
            ("QUOTEBOOK_REMOTE_URL", "http://localhost:3000"),
            ("QUOTEBOOK_MOCK_LATENCY_MS", "0"),
        ]))
        .unwrap();

        assert_eq!(config.storage_path, PathBuf::from("/tmp/q.json"));
        assert_eq!(config.sync_interval, Duration::from_secs(5));
        assert!(config.sync_on_write);
        assert_eq!(config.remote_url.as_deref(), Some("http://localhost:3000"));
        assert_eq!(config.mock_latency, Duration::ZERO);

        let options = config.sync_options();
        assert_eq!(options.interval, Duration::from_secs(5));
        assert!(options.sync_on_write);
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            Config::from_lookup(lookup(&[("QUOTEBOOK_SYNC_INTERVAL_SECS", "0")])),
            Err(ConfigError::InvalidSyncInterval("0".into()))
        );
        assert_eq!(
            Config::from_lookup(lookup(&[("QUOTEBOOK_SYNC_INTERVAL_SECS", "soon")])),
            Err(ConfigError::InvalidSyncInterval("soon".into()))
        );
        assert_eq!(
            Config::from_lookup(lookup(&[("QUOTEBOOK_SYNC_ON_WRITE", "maybe")])),
            Err(ConfigError::InvalidSyncOnWrite("maybe".into()))
        );
        assert_eq!(
            Config::from_lookup(lookup(&[("QUOTEBOOK_MOCK_LATENCY_MS", "-1")])),
            Err(ConfigError::InvalidMockLatency("-1".into()))
        );
    }

    #[test]
    fn sync_interval_upper_bound() {
        let max = MAX_SYNC_INTERVAL_SECS.to_string();
        let config =
            Config::from_lookup(lookup(&[("QUOTEBOOK_SYNC_INTERVAL_SECS", max.as_str())]))
                .unwrap();
        assert_eq!(config.sync_interval, Duration::from_secs(MAX_SYNC_INTERVAL_SECS));

        let over = (MAX_SYNC_INTERVAL_SECS + 1).to_string();
        assert_eq!(
            Config::from_lookup(lookup(&[("QUOTEBOOK_SYNC_INTERVAL_SECS", over.as_str())])),
            Err(ConfigError::InvalidSyncInterval(over))
        );

        let huge = u64::MAX.to_string();
        assert_eq!(
            Config::from_lookup(lookup(&[("QUOTEBOOK_SYNC_INTERVAL_SECS", huge.as_str())])),
            Err(ConfigError::InvalidSyncInterval(huge))
        );
    }

    #[test]
    fn blank_remote_url_means_mock() {
        let config = Config::from_lookup(lookup(&[("QUOTEBOOK_REMOTE_URL", "  ")])).unwrap();
        assert_eq!(config.remote_url, None);
    }
}
