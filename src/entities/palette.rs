//! Drone colour palette stored alongside a build

use serde::{Deserialize, Serialize};

/// Preset swatches offered for every part
pub const PRESET_COLORS: &[&str] = &[
    "#00D4FF", "#8B5CF6", "#EC4899", "#EF4444", "#F59E0B", "#22C55E", "#06B6D4", "#3B82F6",
    "#A855F7", "#F97316", "#14B8A6", "#84CC16", "#FBBF24", "#FB7185", "#818CF8",
];

/// Colourable parts of the drone
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorPart {
    Motors,
    Frame,
    Propellers,
    Battery,
    Leds,
}

impl std::fmt::Display for ColorPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorPart::Motors => write!(f, "motors"),
            ColorPart::Frame => write!(f, "frame"),
            ColorPart::Propellers => write!(f, "propellers"),
            ColorPart::Battery => write!(f, "battery"),
            ColorPart::Leds => write!(f, "leds"),
        }
    }
}

/// Colour per drone part, as `#RRGGBB` strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DroneColors {
    pub motors: String,
    pub frame: String,
    pub propellers: String,
    pub battery: String,
    pub leds: String,
}

impl Default for DroneColors {
    fn default() -> Self {
        Self {
            motors: "#00D4FF".to_string(),
            frame: "#2a2a4a".to_string(),
            propellers: "#1a1a2e".to_string(),
            battery: "#F59E0B".to_string(),
            leds: "#22C55E".to_string(),
        }
    }
}

impl DroneColors {
    pub fn get(&self, part: ColorPart) -> &str {
        match part {
            ColorPart::Motors => &self.motors,
            ColorPart::Frame => &self.frame,
            ColorPart::Propellers => &self.propellers,
            ColorPart::Battery => &self.battery,
            ColorPart::Leds => &self.leds,
        }
    }

    /// Return a copy with one part recoloured
    ///
    /// The colour is normalized to `#RRGGBB`; anything else is rejected.
    pub fn with_color(&self, part: ColorPart, color: &str) -> Result<Self, String> {
        let color = normalize_hex(color)?;
        let mut next = self.clone();
        match part {
            ColorPart::Motors => next.motors = color,
            ColorPart::Frame => next.frame = color,
            ColorPart::Propellers => next.propellers = color,
            ColorPart::Battery => next.battery = color,
            ColorPart::Leds => next.leds = color,
        }
        Ok(next)
    }

    /// Iterate (part, colour) pairs in display order
    pub fn iter(&self) -> impl Iterator<Item = (ColorPart, &str)> {
        [
            ColorPart::Motors,
            ColorPart::Frame,
            ColorPart::Propellers,
            ColorPart::Battery,
            ColorPart::Leds,
        ]
        .into_iter()
        .map(move |part| (part, self.get(part)))
    }
}

/// Accept "#RRGGBB" or "RRGGBB" (any case) and return "#RRGGBB"
pub fn normalize_hex(color: &str) -> Result<String, String> {
    let trimmed = color.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("Invalid colour '{}'. Use #RRGGBB", color));
    }
    Ok(format!("#{}", digits))
}

/// Split a `#RRGGBB` colour into its components
pub fn hex_to_rgb(color: &str) -> Option<(u8, u8, u8)> {
    let digits = color.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some((r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette() {
        let colors = DroneColors::default();
        assert_eq!(colors.motors, "#00D4FF");
        assert_eq!(colors.leds, "#22C55E");
    }

    #[test]
    fn test_with_color_replaces_one_part() {
        let colors = DroneColors::default();
        let next = colors.with_color(ColorPart::Frame, "ec4899").unwrap();
        assert_eq!(next.frame, "#ec4899");
        assert_eq!(next.motors, colors.motors);
        // original untouched
        assert_eq!(colors.frame, "#2a2a4a");
    }

    #[test]
    fn test_rejects_bad_colors() {
        let colors = DroneColors::default();
        assert!(colors.with_color(ColorPart::Leds, "red").is_err());
        assert!(colors.with_color(ColorPart::Leds, "#12345").is_err());
        assert!(colors.with_color(ColorPart::Leds, "#GGGGGG").is_err());
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#00D4FF"), Some((0x00, 0xD4, 0xFF)));
        assert_eq!(hex_to_rgb("00D4FF"), None);
    }

    #[test]
    fn test_partial_palette_fills_defaults() {
        let colors: DroneColors = serde_yml::from_str("motors: '#EF4444'\n").unwrap();
        assert_eq!(colors.motors, "#EF4444");
        assert_eq!(colors.frame, "#2a2a4a");
    }

    #[test]
    fn test_presets_are_valid() {
        for preset in PRESET_COLORS {
            assert!(normalize_hex(preset).is_ok());
        }
    }
}
