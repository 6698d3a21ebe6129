//! Environmental test parameters (the config "sliders")

use serde::{Deserialize, Serialize};

/// Environmental parameters for a simulated flight test
///
/// Each test reads only the fields it cares about. The engine never
/// validates these; callers that take user input apply [`TestConfig::clamped`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    /// Wind speed in km/h (0-100)
    pub wind_speed: f64,
    /// Air temperature in °C (-20 to 50)
    pub temperature: f64,
    /// Altitude in metres (0-500)
    pub altitude: f64,
    /// Relative humidity / rain intensity in % (0-100)
    pub humidity: f64,
    /// Precision or rotation-speed level (1-10)
    pub precision: f64,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            wind_speed: 20.0,
            temperature: 25.0,
            altitude: 50.0,
            humidity: 40.0,
            precision: 5.0,
        }
    }
}

impl TestConfig {
    /// Copy with every field forced into its slider range
    pub fn clamped(&self) -> Self {
        Self {
            wind_speed: ConfigField::WindSpeed.clamp(self.wind_speed),
            temperature: ConfigField::Temperature.clamp(self.temperature),
            altitude: ConfigField::Altitude.clamp(self.altitude),
            humidity: ConfigField::Humidity.clamp(self.humidity),
            precision: ConfigField::Precision.clamp(self.precision),
        }
    }

    pub fn get(&self, field: ConfigField) -> f64 {
        match field {
            ConfigField::WindSpeed => self.wind_speed,
            ConfigField::Temperature => self.temperature,
            ConfigField::Altitude => self.altitude,
            ConfigField::Humidity => self.humidity,
            ConfigField::Precision => self.precision,
        }
    }

    /// Copy with one field replaced
    pub fn with(&self, field: ConfigField, value: f64) -> Self {
        let mut next = *self;
        match field {
            ConfigField::WindSpeed => next.wind_speed = value,
            ConfigField::Temperature => next.temperature = value,
            ConfigField::Altitude => next.altitude = value,
            ConfigField::Humidity => next.humidity = value,
            ConfigField::Precision => next.precision = value,
        }
        next
    }
}

/// One field of [`TestConfig`] with its slider bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigField {
    WindSpeed,
    Temperature,
    Altitude,
    Humidity,
    Precision,
}

impl ConfigField {
    pub fn all() -> &'static [ConfigField] {
        &[
            ConfigField::WindSpeed,
            ConfigField::Temperature,
            ConfigField::Altitude,
            ConfigField::Humidity,
            ConfigField::Precision,
        ]
    }

    /// Config key (matches the serialized field name)
    pub fn key(&self) -> &'static str {
        match self {
            ConfigField::WindSpeed => "wind_speed",
            ConfigField::Temperature => "temperature",
            ConfigField::Altitude => "altitude",
            ConfigField::Humidity => "humidity",
            ConfigField::Precision => "precision",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            ConfigField::WindSpeed => "km/h",
            ConfigField::Temperature => "°C",
            ConfigField::Altitude => "m",
            ConfigField::Humidity => "%",
            ConfigField::Precision => "level",
        }
    }

    /// Inclusive slider range
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            ConfigField::WindSpeed => (0.0, 100.0),
            ConfigField::Temperature => (-20.0, 50.0),
            ConfigField::Altitude => (0.0, 500.0),
            ConfigField::Humidity => (0.0, 100.0),
            ConfigField::Precision => (1.0, 10.0),
        }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        let (min, max) = self.bounds();
        if value.is_nan() {
            return min;
        }
        value.clamp(min, max)
    }

    pub fn from_key(key: &str) -> Option<Self> {
        ConfigField::all().iter().copied().find(|f| f.key() == key)
    }
}

impl std::fmt::Display for ConfigField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_slider_defaults() {
        let config = TestConfig::default();
        assert_eq!(config.wind_speed, 20.0);
        assert_eq!(config.temperature, 25.0);
        assert_eq!(config.altitude, 50.0);
        assert_eq!(config.humidity, 40.0);
        assert_eq!(config.precision, 5.0);
    }

    #[test]
    fn test_clamped_applies_bounds() {
        let wild = TestConfig {
            wind_speed: 250.0,
            temperature: -40.0,
            altitude: -5.0,
            humidity: 120.0,
            precision: 0.0,
        };
        let clamped = wild.clamped();
        assert_eq!(clamped.wind_speed, 100.0);
        assert_eq!(clamped.temperature, -20.0);
        assert_eq!(clamped.altitude, 0.0);
        assert_eq!(clamped.humidity, 100.0);
        assert_eq!(clamped.precision, 1.0);
    }

    #[test]
    fn test_clamp_handles_nan() {
        assert_eq!(ConfigField::Precision.clamp(f64::NAN), 1.0);
    }

    #[test]
    fn test_with_replaces_single_field() {
        let config = TestConfig::default().with(ConfigField::Humidity, 90.0);
        assert_eq!(config.humidity, 90.0);
        assert_eq!(config.wind_speed, 20.0);
    }

    #[test]
    fn test_field_keys_roundtrip() {
        for field in ConfigField::all() {
            assert_eq!(ConfigField::from_key(field.key()), Some(*field));
        }
        assert_eq!(ConfigField::from_key("gravity"), None);
    }
}
