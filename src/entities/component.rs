//! Component entity types - catalog parts and their placements in a build

use serde::{Deserialize, Serialize};

use crate::core::identity::InstanceId;
use crate::engine::parse;

/// Component category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentCategory {
    Motors,
    Propellers,
    Frames,
    Power,
    Electronics,
    Sensors,
    Cameras,
    Accessories,
}

impl ComponentCategory {
    /// All categories in catalog display order
    pub fn all() -> &'static [ComponentCategory] {
        &[
            ComponentCategory::Motors,
            ComponentCategory::Propellers,
            ComponentCategory::Frames,
            ComponentCategory::Power,
            ComponentCategory::Electronics,
            ComponentCategory::Sensors,
            ComponentCategory::Cameras,
            ComponentCategory::Accessories,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentCategory::Motors => "Motors",
            ComponentCategory::Propellers => "Propellers",
            ComponentCategory::Frames => "Frames",
            ComponentCategory::Power => "Power",
            ComponentCategory::Electronics => "Electronics",
            ComponentCategory::Sensors => "Sensors",
            ComponentCategory::Cameras => "Cameras",
            ComponentCategory::Accessories => "Accessories",
        }
    }
}

impl std::fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ComponentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentCategory::all()
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "Invalid category: {}. Use motors, propellers, frames, power, electronics, sensors, cameras, or accessories",
                    s
                )
            })
    }
}

/// Free-text physical specification of a component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentSpecs {
    /// Weight in grams, e.g. "45g"
    #[serde(default)]
    pub weight: String,

    /// Supply voltage, e.g. "14.8V"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<String>,

    /// Static thrust in grams-force, e.g. "850g"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thrust: Option<String>,
}

/// A catalog entry describing one drone part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Catalog identifier (e.g. "motor-2212")
    pub id: String,

    /// Display name
    pub name: String,

    /// Component category
    pub category: ComponentCategory,

    /// Physical specs
    #[serde(default)]
    pub specs: ComponentSpecs,
}

impl Component {
    /// Weight in whole grams (0 when missing or unparsable)
    pub fn weight_grams(&self) -> u32 {
        parse::grams(Some(&self.specs.weight))
    }

    /// Thrust in whole grams-force (0 when missing or unparsable)
    pub fn thrust_grams(&self) -> u32 {
        parse::grams(self.specs.thrust.as_deref())
    }
}

/// Position of a placed component in the workspace
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl std::str::FromStr for Position {
    type Err = String;

    /// Parse "x,y" or "x,y,z"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(format!("Invalid position '{}'. Use x,y or x,y,z", s));
        }

        let mut coords = [0.0_f64; 3];
        for (slot, part) in coords.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| format!("Invalid coordinate '{}' in position '{}'", part, s))?;
        }

        Ok(Position::new(coords[0], coords[1], coords[2]))
    }
}

/// A component instance placed into a build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedComponent {
    /// Unique id of this placement
    pub instance_id: InstanceId,

    /// The catalog component (fields are stored inline)
    #[serde(flatten)]
    pub component: Component,

    /// Where the component sits in the workspace
    #[serde(default)]
    pub position: Position,
}

impl PlacedComponent {
    /// Place a catalog component at the given position with a fresh instance id
    pub fn place(component: Component, position: Position) -> Self {
        Self {
            instance_id: InstanceId::new(),
            component,
            position,
        }
    }

    pub fn id(&self) -> &str {
        &self.component.id
    }

    pub fn name(&self) -> &str {
        &self.component.name
    }

    pub fn category(&self) -> ComponentCategory {
        self.component.category
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn motor() -> Component {
        Component {
            id: "motor-2212".to_string(),
            name: "Motor 2212".to_string(),
            category: ComponentCategory::Motors,
            specs: ComponentSpecs {
                weight: "45g".to_string(),
                power: None,
                thrust: Some("850g".to_string()),
            },
        }
    }

    #[test]
    fn test_component_weight_and_thrust() {
        let cmp = motor();
        assert_eq!(cmp.weight_grams(), 45);
        assert_eq!(cmp.thrust_grams(), 850);
    }

    #[test]
    fn test_malformed_specs_degrade_to_zero() {
        let mut cmp = motor();
        cmp.specs.weight = "unknown".to_string();
        cmp.specs.thrust = None;
        assert_eq!(cmp.weight_grams(), 0);
        assert_eq!(cmp.thrust_grams(), 0);
    }

    #[test]
    fn test_category_serialization() {
        let yaml = serde_yml::to_string(&motor()).unwrap();
        assert!(yaml.contains("category: Motors"));
    }

    #[test]
    fn test_category_from_str_is_case_insensitive() {
        assert_eq!("frames".parse::<ComponentCategory>().unwrap(), ComponentCategory::Frames);
        assert_eq!("POWER".parse::<ComponentCategory>().unwrap(), ComponentCategory::Power);
        assert!("attachments".parse::<ComponentCategory>().is_err());
    }

    #[test]
    fn test_position_parsing() {
        assert_eq!("1,2".parse::<Position>().unwrap(), Position::new(1.0, 2.0, 0.0));
        assert_eq!("1.5, -2, 3".parse::<Position>().unwrap(), Position::new(1.5, -2.0, 3.0));
        assert!("1".parse::<Position>().is_err());
        assert!("a,b".parse::<Position>().is_err());
    }

    #[test]
    fn test_placed_component_flattens_fields() {
        let placed = PlacedComponent::place(motor(), Position::new(10.0, 20.0, 0.0));
        let yaml = serde_yml::to_string(&placed).unwrap();
        assert!(yaml.contains("id: motor-2212"));
        assert!(yaml.contains("instance_id: PLC-"));

        let parsed: PlacedComponent = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed, placed);
    }
}
