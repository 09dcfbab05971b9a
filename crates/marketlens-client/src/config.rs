//! Client configuration.
//!
//! Resolution order: built-in defaults, then `~/.config/marketlens/config.toml`,
//! then environment variables (`MARKETLENS_BASE_URL`, `MARKETLENS_POLL_INTERVAL_MS`).
//! The CLI applies its own flags on top.

use marketlens_core::form::ValidationMode;
use marketlens_core::{LensError, Result, SessionPolicy};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;
const DEFAULT_LOCAL_STEP_INTERVAL_MS: u64 = 3_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub poll_interval_ms: u64,
    pub local_step_interval_ms: u64,
    pub validation: ValidationMode,
    pub session_policy: SessionPolicy,
    pub output_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            local_step_interval_ms: DEFAULT_LOCAL_STEP_INTERVAL_MS,
            validation: ValidationMode::default(),
            session_policy: SessionPolicy::default(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl ClientConfig {
    /// Loads the config file (if any) and applies environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            LensError::config(format!(
                "Failed to read configuration file at {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Applies `MARKETLENS_*` environment overrides.
    pub fn apply_env(&mut self) {
        if let Ok(url) = env::var("MARKETLENS_BASE_URL") {
            if !url.trim().is_empty() {
                self.base_url = url.trim().to_string();
            }
        }
        if let Ok(raw) = env::var("MARKETLENS_POLL_INTERVAL_MS") {
            match raw.trim().parse() {
                Ok(ms) => self.poll_interval_ms = ms,
                Err(_) => tracing::warn!(
                    "[Config] Ignoring invalid MARKETLENS_POLL_INTERVAL_MS: {}",
                    raw
                ),
            }
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn local_step_interval(&self) -> Duration {
        Duration::from_millis(self.local_step_interval_ms.max(1))
    }

    /// Base URL without a trailing slash.
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// Returns `~/.config/marketlens/config.toml`, if a home directory exists.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("marketlens").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.validation, ValidationMode::Strict);
        assert_eq!(config.session_policy, SessionPolicy::PerPageLoad);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ClientConfig::from_toml(
            r#"
base_url = "https://analysis.example.org/"
validation = "basic"
session_policy = "per_submission"
"#,
        )
        .unwrap();
        assert_eq!(config.normalized_base_url(), "https://analysis.example.org");
        assert_eq!(config.validation, ValidationMode::Basic);
        assert_eq!(config.session_policy, SessionPolicy::PerSubmission);
        assert_eq!(config.local_step_interval_ms, DEFAULT_LOCAL_STEP_INTERVAL_MS);
    }

    #[test]
    fn test_from_file_reports_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "poll_interval_ms = \"soon\"").unwrap();
        let err = ClientConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("TOML"));
    }
}
