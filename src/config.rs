use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::paths;

/// Application configuration, loaded from config.toml.
///
/// serde's `default` attribute means: if a field is missing from the TOML file,
/// use the value from the Default implementation instead of failing to parse.
/// The file itself is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub timer: TimerConfig,
    pub stats: StatsConfig,
}

/// Where the Pomodoro backend lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    /// Per-request timeout. A hung backend turns into a transport failure.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Countdown length at startup. Coerced into 1..=60 like any typed input.
    pub default_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Year always offered by the year filter, even before any data exists.
    pub baseline_year: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            timer: TimerConfig::default(),
            stats: StatsConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".into(),
            timeout_secs: 10,
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_minutes: crate::timer::engine::DEFAULT_MINUTES as i64,
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            baseline_year: crate::stats::BASELINE_YEAR,
        }
    }
}

impl ServerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Load the application config from $XDG_CONFIG_HOME/pomotracker/config.toml.
/// If the file doesn't exist, returns defaults.
pub fn load_config() -> Result<AppConfig> {
    load_config_from(&paths::config_file())
}

pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.base_url, "http://127.0.0.1:8000");
        assert_eq!(cfg.timer.default_minutes, 25);
        assert_eq!(cfg.stats.baseline_year, 2025);
    }

    #[test]
    fn parse_partial_toml() {
        // If the user only specifies some fields, the rest should use defaults
        let toml_str = r#"
[server]
base_url = "http://pomo.local:9000"
"#;
        let cfg: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.server.base_url, "http://pomo.local:9000");
        assert_eq!(cfg.server.timeout_secs, 10);
        assert_eq!(cfg.timer.default_minutes, 25);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let cfg = load_config_from(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(cfg.timer.default_minutes, 25);
    }

    #[test]
    fn load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[timer]\ndefault_minutes = 50\n[stats]\nbaseline_year = 2030\n")
            .unwrap();
        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.timer.default_minutes, 50);
        assert_eq!(cfg.stats.baseline_year, 2030);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[timer\n").unwrap();
        assert!(load_config_from(&path).is_err());
    }

    #[test]
    fn zero_timeout_is_raised_to_one_second() {
        let server = ServerConfig {
            timeout_secs: 0,
            ..ServerConfig::default()
        };
        assert_eq!(server.timeout(), Duration::from_secs(1));
    }

    #[test]
    fn roundtrip_toml() {
        let cfg = AppConfig::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let loaded: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(loaded.server.base_url, cfg.server.base_url);
    }
}
