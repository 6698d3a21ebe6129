//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::Project;
use crate::engine::config::{ConfigField, TestConfig};

/// Default delay between progress ticks of a live test run
pub const DEFAULT_TICK_MS: u64 = 100;

/// DroneForge configuration with layered hierarchy
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default author for new builds
    pub author: Option<String>,

    /// Default output format
    pub default_format: Option<String>,

    /// Milliseconds between progress ticks in live mode
    pub tick_ms: Option<u64>,

    /// Test-condition defaults
    pub wind_speed: Option<f64>,
    pub temperature: Option<f64>,
    pub altitude: Option<f64>,
    pub humidity: Option<f64>,
    pub precision: Option<f64>,
}

/// Keys accepted by `config set`, with a short description
pub const VALID_KEYS: &[(&str, &str)] = &[
    ("author", "Default author recorded on new builds"),
    ("default_format", "Default output format (yaml, json, tsv, etc.)"),
    ("tick_ms", "Milliseconds between progress ticks in `test run --live`"),
    ("wind_speed", "Default wind speed in km/h (0-100)"),
    ("temperature", "Default air temperature in °C (-20 to 50)"),
    ("altitude", "Default test altitude in m (0-500)"),
    ("humidity", "Default humidity / rain intensity in % (0-100)"),
    ("precision", "Default precision / rotation level (1-10)"),
];

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let project = Project::discover().ok();
        Self::load_for(project.as_ref())
    }

    /// Load configuration using an explicit project (or none)
    pub fn load_for(project: Option<&Project>) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/droneforge/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Project config (.droneforge/config.yaml)
        if let Some(project) = project {
            if let Some(project_config) = Self::read_file(&project.config_dir().join("config.yaml")) {
                config.merge(project_config);
            }
        }

        // 4. Environment variables
        if let Ok(author) = std::env::var("DRONEFORGE_AUTHOR") {
            config.author = Some(author);
        }
        if let Ok(format) = std::env::var("DRONEFORGE_FORMAT") {
            config.default_format = Some(format);
        }

        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Option<Config>>(&contents) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::warn!("ignoring unreadable config {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "droneforge")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.author.is_some() {
            self.author = other.author;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.tick_ms.is_some() {
            self.tick_ms = other.tick_ms;
        }
        if other.wind_speed.is_some() {
            self.wind_speed = other.wind_speed;
        }
        if other.temperature.is_some() {
            self.temperature = other.temperature;
        }
        if other.altitude.is_some() {
            self.altitude = other.altitude;
        }
        if other.humidity.is_some() {
            self.humidity = other.humidity;
        }
        if other.precision.is_some() {
            self.precision = other.precision;
        }
    }

    fn field(&self, field: ConfigField) -> Option<f64> {
        match field {
            ConfigField::WindSpeed => self.wind_speed,
            ConfigField::Temperature => self.temperature,
            ConfigField::Altitude => self.altitude,
            ConfigField::Humidity => self.humidity,
            ConfigField::Precision => self.precision,
        }
    }

    /// Test conditions: slider defaults overlaid with configured values
    pub fn test_config(&self) -> TestConfig {
        ConfigField::all()
            .iter()
            .fold(TestConfig::default(), |acc, field| match self.field(*field) {
                Some(value) => acc.with(*field, value),
                None => acc,
            })
    }

    pub fn tick_ms(&self) -> u64 {
        self.tick_ms.unwrap_or(DEFAULT_TICK_MS)
    }

    /// Display value of a single key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "author" => self.author.clone(),
            "default_format" => self.default_format.clone(),
            "tick_ms" => self.tick_ms.map(|v| v.to_string()),
            other => ConfigField::from_key(other)
                .and_then(|f| self.field(f))
                .map(|v| v.to_string()),
        }
    }

    /// Get the author name, falling back to git config or username
    pub fn author(&self) -> String {
        if let Some(ref author) = self.author {
            return author.clone();
        }

        if let Ok(output) = std::process::Command::new("git")
            .args(["config", "user.name"])
            .output()
        {
            if output.status.success() {
                let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !name.is_empty() {
                    return name;
                }
            }
        }

        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string())
    }
}

/// Typed YAML value for a config key, so numeric keys stay numeric on disk
pub fn typed_value(key: &str, raw: &str) -> Result<serde_yml::Value, String> {
    if !VALID_KEYS.iter().any(|(k, _)| *k == key) {
        return Err(format!(
            "Unknown config key '{}'. Run 'droneforge config keys' to list valid keys",
            key
        ));
    }

    if key == "tick_ms" {
        let ms: u64 = raw
            .parse()
            .map_err(|_| format!("tick_ms must be a whole number of milliseconds, got '{}'", raw))?;
        return Ok(serde_yml::Value::Number(ms.into()));
    }

    if ConfigField::from_key(key).is_some() {
        let value: f64 = raw
            .parse()
            .map_err(|_| format!("{} must be a number, got '{}'", key, raw))?;
        return Ok(serde_yml::Value::Number(value.into()));
    }

    Ok(serde_yml::Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_later_layer() {
        let mut base: Config = serde_yml::from_str("author: alice\nwind_speed: 10\n").unwrap();
        let project: Config = serde_yml::from_str("wind_speed: 35\ntick_ms: 20\n").unwrap();
        base.merge(project);

        assert_eq!(base.author.as_deref(), Some("alice"));
        assert_eq!(base.wind_speed, Some(35.0));
        assert_eq!(base.tick_ms(), 20);
    }

    #[test]
    fn test_test_config_overlays_defaults() {
        let config: Config = serde_yml::from_str("humidity: 80\nprecision: 9\n").unwrap();
        let test = config.test_config();
        assert_eq!(test.humidity, 80.0);
        assert_eq!(test.precision, 9.0);
        assert_eq!(test.wind_speed, TestConfig::default().wind_speed);
    }

    #[test]
    fn test_get_reports_values() {
        let config: Config = serde_yml::from_str("default_format: json\naltitude: 120\n").unwrap();
        assert_eq!(config.get("default_format").as_deref(), Some("json"));
        assert_eq!(config.get("altitude").as_deref(), Some("120"));
        assert_eq!(config.get("tick_ms"), None);
        assert_eq!(config.get("nonsense"), None);
    }

    #[test]
    fn test_typed_values() {
        assert_eq!(
            typed_value("author", "Sam").unwrap(),
            serde_yml::Value::String("Sam".into())
        );
        assert!(typed_value("wind_speed", "35").unwrap().is_number());
        assert!(typed_value("tick_ms", "fast").is_err());
        assert!(typed_value("gravity", "9.8").is_err());
    }

    #[test]
    fn test_empty_file_reads_as_none() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "# only comments\n").unwrap();
        assert_eq!(Config::read_file(&path), None);
    }
}
