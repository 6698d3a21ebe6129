//! Built-in catalogs: drone components and the flight-test library
//!
//! The component table is embedded at compile time from
//! `catalog/components.yaml`.

use rust_embed::Embed;
use thiserror::Error;

use crate::engine::config::ConfigField;
use crate::engine::TestId;
use crate::entities::component::{Component, ComponentCategory};

#[derive(Embed)]
#[folder = "catalog/"]
struct EmbeddedCatalog;

const COMPONENTS_FILE: &str = "components.yaml";

/// Errors raised while loading or querying the catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("embedded catalog file '{0}' is missing")]
    Missing(&'static str),

    #[error("embedded catalog is not valid YAML: {0}")]
    Parse(#[from] serde_yml::Error),

    #[error("unknown component '{0}' (run `droneforge catalog list` to see available parts)")]
    UnknownComponent(String),
}

/// The fixed component table offered by the builder
#[derive(Debug, Clone)]
pub struct Catalog {
    components: Vec<Component>,
}

impl Catalog {
    /// Load the embedded catalog
    pub fn builtin() -> Result<Self, CatalogError> {
        let file = EmbeddedCatalog::get(COMPONENTS_FILE)
            .ok_or(CatalogError::Missing(COMPONENTS_FILE))?;
        let text = String::from_utf8_lossy(&file.data);
        Self::from_yaml(&text)
    }

    /// Parse a catalog from YAML text (a list of components)
    pub fn from_yaml(text: &str) -> Result<Self, CatalogError> {
        let components: Vec<Component> = serde_yml::from_str(text)?;
        log::debug!("loaded catalog with {} components", components.len());
        Ok(Self { components })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Look up a component by catalog id (case-insensitive)
    pub fn get(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id.eq_ignore_ascii_case(id))
    }

    /// Look up a component, failing with a descriptive error
    pub fn require(&self, id: &str) -> Result<&Component, CatalogError> {
        self.get(id)
            .ok_or_else(|| CatalogError::UnknownComponent(id.to_string()))
    }

    /// Components of one category, in catalog order
    pub fn by_category(&self, category: ComponentCategory) -> impl Iterator<Item = &Component> {
        self.components.iter().filter(move |c| c.category == category)
    }
}

/// Difficulty tier of a flight test
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestTier {
    Basic,
    Advanced,
    Extreme,
}

impl std::fmt::Display for TestTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestTier::Basic => write!(f, "Basic"),
            TestTier::Advanced => write!(f, "Advanced"),
            TestTier::Extreme => write!(f, "Extreme"),
        }
    }
}

/// Descriptor of one entry in the test library
#[derive(Debug, Clone, serde::Serialize)]
pub struct TestInfo {
    pub id: TestId,
    pub name: &'static str,
    pub description: &'static str,
    pub duration: &'static str,
    pub tier: TestTier,
    /// Config fields this test reads, in slider order
    pub settings: &'static [ConfigField],
}

/// The test library, in display order
pub const TEST_LIBRARY: &[TestInfo] = &[
    TestInfo {
        id: TestId::Hover,
        name: "Hover Stability",
        description: "Test drone stability during stationary hover",
        duration: "30s",
        tier: TestTier::Basic,
        settings: &[ConfigField::WindSpeed, ConfigField::Altitude],
    },
    TestInfo {
        id: TestId::Ascent,
        name: "Vertical Ascent",
        description: "Measure climb rate and power consumption",
        duration: "45s",
        tier: TestTier::Basic,
        settings: &[ConfigField::Altitude, ConfigField::Temperature],
    },
    TestInfo {
        id: TestId::Rotation,
        name: "Yaw Rotation",
        description: "Test rotation speed and accuracy",
        duration: "20s",
        tier: TestTier::Basic,
        settings: &[ConfigField::Precision],
    },
    TestInfo {
        id: TestId::Wind,
        name: "Wind Resistance",
        description: "Simulate various wind conditions",
        duration: "60s",
        tier: TestTier::Advanced,
        settings: &[ConfigField::WindSpeed, ConfigField::Altitude],
    },
    TestInfo {
        id: TestId::Speed,
        name: "Max Speed Test",
        description: "Determine maximum forward velocity",
        duration: "90s",
        tier: TestTier::Advanced,
        settings: &[ConfigField::Precision, ConfigField::WindSpeed],
    },
    TestInfo {
        id: TestId::Thermal,
        name: "Thermal Analysis",
        description: "Monitor motor and ESC temperatures",
        duration: "120s",
        tier: TestTier::Advanced,
        settings: &[ConfigField::Temperature, ConfigField::Humidity],
    },
    TestInfo {
        id: TestId::Weather,
        name: "Weather Sim",
        description: "Combined rain and wind simulation",
        duration: "180s",
        tier: TestTier::Extreme,
        settings: &[ConfigField::WindSpeed, ConfigField::Humidity, ConfigField::Temperature],
    },
    TestInfo {
        id: TestId::Waypoint,
        name: "Waypoint Navigation",
        description: "Test autonomous navigation accuracy",
        duration: "300s",
        tier: TestTier::Extreme,
        settings: &[ConfigField::Precision, ConfigField::WindSpeed, ConfigField::Altitude],
    },
];

/// Look up the library entry for a test; the stability fallback has none
pub fn test_info(id: TestId) -> Option<&'static TestInfo> {
    TEST_LIBRARY.iter().find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.len(), 36);
        for category in ComponentCategory::all() {
            assert!(
                catalog.by_category(*category).count() > 0,
                "no components in {}",
                category
            );
        }
    }

    #[test]
    fn test_catalog_ids_are_unique() {
        let catalog = Catalog::builtin().unwrap();
        let mut ids: Vec<&str> = catalog.iter().map(|c| c.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = Catalog::builtin().unwrap();
        let battery = catalog.get("battery-6s").unwrap();
        assert_eq!(battery.name, "LiPo 6S 2200mAh");
        assert_eq!(battery.specs.power.as_deref(), Some("22.2V"));
        assert!(catalog.get("BATTERY-6S").is_some());
        assert!(matches!(
            catalog.require("warp-drive"),
            Err(CatalogError::UnknownComponent(_))
        ));
    }

    #[test]
    fn test_every_catalog_weight_parses() {
        let catalog = Catalog::builtin().unwrap();
        for component in catalog.iter() {
            assert!(component.weight_grams() > 0, "{} has no weight", component.id);
        }
    }

    #[test]
    fn test_library_covers_every_test_kind() {
        assert_eq!(TEST_LIBRARY.len(), 8);
        for id in TestId::all() {
            assert!(test_info(*id).is_some(), "{} missing from library", id);
        }
        assert!(test_info(TestId::Stability).is_none());
    }
}
