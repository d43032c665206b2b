//! Observer configuration: TOML file with per-field env overrides.
//!
//! Resolution order per field: environment variable, then TOML value,
//! then built-in default. The TOML path itself comes from
//! `OBSERVER_CONFIG_PATH`, falling back to `config/observer.toml`; a
//! missing file is not an error (env/defaults still apply).

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_CONFIG_PATH: &str = "config/observer.toml";
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_NEUTRAL_IMPORTANCE: f64 = 1.0;
pub const DEFAULT_REFRESH_SECS: u64 = 30;

pub const ENV_CONFIG_PATH: &str = "OBSERVER_CONFIG_PATH";
pub const ENV_BASE_URL: &str = "OBSERVER_BASE_URL";
pub const ENV_COUNTRY: &str = "OBSERVER_COUNTRY";
pub const ENV_DEBOUNCE_MS: &str = "OBSERVER_DEBOUNCE_MS";
pub const ENV_NEUTRAL_IMPORTANCE: &str = "OBSERVER_NEUTRAL_IMPORTANCE";
pub const ENV_REFRESH_SECS: &str = "OBSERVER_REFRESH_SECS";

#[derive(Debug, Clone, Default, Deserialize)]
struct FileConfig {
    base_url: Option<String>,
    country: Option<String>,
    debounce_ms: Option<u64>,
    neutral_importance: Option<f64>,
    refresh_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObserverConfig {
    /// Backend base URL; the only field with no default.
    pub base_url: String,
    /// Optional country scope appended to feed queries.
    pub country: Option<String>,
    /// Quiet interval for debounced input.
    pub debounce_ms: u64,
    /// Importance substituted for missing/malformed scores.
    pub neutral_importance: f64,
    /// Watch-mode re-projection period.
    pub refresh_secs: u64,
}

impl ObserverConfig {
    /// Load using `OBSERVER_CONFIG_PATH` (or the default path) plus env
    /// overrides. Fails only when no base URL is configured anywhere.
    pub fn load() -> Result<Self> {
        let path = std::env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let file = match fs::read_to_string(&path) {
            Ok(content) => toml::from_str::<FileConfig>(&content)
                .with_context(|| format!("parsing {}", path.display()))?,
            Err(_) => {
                debug!(path = %path.display(), "no config file, using env/defaults");
                FileConfig::default()
            }
        };
        Self::from_parts(file)
    }

    fn from_parts(file: FileConfig) -> Result<Self> {
        let base_url = std::env::var(ENV_BASE_URL)
            .ok()
            .or(file.base_url)
            .context("no backend base URL configured (OBSERVER_BASE_URL or config file)")?;
        let country = std::env::var(ENV_COUNTRY).ok().or(file.country);
        let debounce_ms = env_u64(ENV_DEBOUNCE_MS)
            .or(file.debounce_ms)
            .unwrap_or(DEFAULT_DEBOUNCE_MS);
        let refresh_secs = env_u64(ENV_REFRESH_SECS)
            .or(file.refresh_secs)
            .unwrap_or(DEFAULT_REFRESH_SECS);
        let neutral_importance = env_f64(ENV_NEUTRAL_IMPORTANCE)
            .or(file.neutral_importance)
            .unwrap_or(DEFAULT_NEUTRAL_IMPORTANCE);

        Ok(Self {
            base_url,
            country,
            debounce_ms,
            neutral_importance,
            refresh_secs,
        })
    }
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn env_f64(name: &str) -> Option<f64> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn clear_env() {
        for k in [
            ENV_BASE_URL,
            ENV_COUNTRY,
            ENV_DEBOUNCE_MS,
            ENV_NEUTRAL_IMPORTANCE,
            ENV_REFRESH_SECS,
        ] {
            env::remove_var(k);
        }
    }

    #[serial_test::serial]
    #[test]
    fn file_values_with_defaults() {
        clear_env();
        let file: FileConfig = toml::from_str(
            r#"
            base_url = "https://feed.example.org/api"
            country = "ukraine"
            debounce_ms = 250
            "#,
        )
        .unwrap();
        let cfg = ObserverConfig::from_parts(file).unwrap();
        assert_eq!(cfg.base_url, "https://feed.example.org/api");
        assert_eq!(cfg.country.as_deref(), Some("ukraine"));
        assert_eq!(cfg.debounce_ms, 250);
        assert_eq!(cfg.refresh_secs, DEFAULT_REFRESH_SECS);
        assert_eq!(cfg.neutral_importance, DEFAULT_NEUTRAL_IMPORTANCE);
    }

    #[serial_test::serial]
    #[test]
    fn env_overrides_file() {
        clear_env();
        env::set_var(ENV_BASE_URL, "https://other.example.org");
        env::set_var(ENV_DEBOUNCE_MS, "100");
        env::set_var(ENV_NEUTRAL_IMPORTANCE, "0.5");
        let file: FileConfig = toml::from_str(r#"base_url = "https://feed.example.org""#).unwrap();
        let cfg = ObserverConfig::from_parts(file).unwrap();
        assert_eq!(cfg.base_url, "https://other.example.org");
        assert_eq!(cfg.debounce_ms, 100);
        assert_eq!(cfg.neutral_importance, 0.5);
        clear_env();
    }

    #[serial_test::serial]
    #[test]
    fn missing_base_url_is_an_error() {
        clear_env();
        assert!(ObserverConfig::from_parts(FileConfig::default()).is_err());
    }
}
