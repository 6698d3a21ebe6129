//! Build entity - an ordered set of placed components plus a colour palette
//!
//! A `Build` is treated as an immutable value: every edit returns a new
//! build and leaves the previous one untouched. The evaluation engine only
//! ever sees a snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::identity::InstanceId;
use crate::entities::component::{Component, PlacedComponent, Position};
use crate::entities::palette::DroneColors;

/// A drone build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Build {
    /// Build name (also the file stem on disk)
    pub name: String,

    /// Author who created the build
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Colour palette
    #[serde(default)]
    pub colors: DroneColors,

    /// Placed components in placement order
    #[serde(default)]
    pub components: Vec<PlacedComponent>,
}

impl Build {
    /// Create an empty build
    pub fn new(name: impl Into<String>, author: Option<String>) -> Self {
        Self {
            name: name.into(),
            author,
            created: Utc::now(),
            colors: DroneColors::default(),
            components: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// New build with `component` placed at the end
    pub fn with_added(&self, component: Component, position: Position) -> Self {
        self.with_placed(PlacedComponent::place(component, position))
    }

    /// New build with an already-placed component appended
    pub fn with_placed(&self, placed: PlacedComponent) -> Self {
        let mut next = self.clone();
        next.components.push(placed);
        next
    }

    /// New build without the given instance (unchanged if it isn't present)
    pub fn without(&self, instance_id: &InstanceId) -> Self {
        let mut next = self.clone();
        next.components.retain(|c| &c.instance_id != instance_id);
        next
    }

    /// New build with every component removed; name and palette are kept
    pub fn cleared(&self) -> Self {
        let mut next = self.clone();
        next.components.clear();
        next
    }

    /// New build with a different palette
    pub fn with_colors(&self, colors: DroneColors) -> Self {
        let mut next = self.clone();
        next.colors = colors;
        next
    }

    /// Resolve a reference to one placed component
    ///
    /// Accepts `@N` (1-based placement order), a full instance id, or a
    /// unique, case-insensitive prefix of an instance id.
    pub fn resolve(&self, reference: &str) -> Result<&PlacedComponent, ResolveError> {
        if let Some(num) = reference.strip_prefix('@') {
            let index: usize = num
                .parse()
                .map_err(|_| ResolveError::NotFound(reference.to_string()))?;
            return index
                .checked_sub(1)
                .and_then(|i| self.components.get(i))
                .ok_or_else(|| ResolveError::NotFound(reference.to_string()));
        }

        let needle = reference.to_uppercase();
        let matches: Vec<&PlacedComponent> = self
            .components
            .iter()
            .filter(|c| c.instance_id.to_string().starts_with(&needle))
            .collect();

        match matches.as_slice() {
            [only] => Ok(only),
            [] => Err(ResolveError::NotFound(reference.to_string())),
            _ => Err(ResolveError::Ambiguous(reference.to_string(), matches.len())),
        }
    }
}

/// Failure to resolve a placed-component reference
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no placed component matches '{0}'")]
    NotFound(String),

    #[error("'{0}' matches {1} placed components; use a longer prefix or @N")]
    Ambiguous(String, usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::component::{ComponentCategory, ComponentSpecs};

    fn part(id: &str, category: ComponentCategory) -> Component {
        Component {
            id: id.to_string(),
            name: id.to_string(),
            category,
            specs: ComponentSpecs {
                weight: "10g".to_string(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_edits_return_new_values() {
        let empty = Build::new("racer", None);
        let one = empty.with_added(part("frame-x", ComponentCategory::Frames), Position::default());
        let two = one.with_added(part("motor-2212", ComponentCategory::Motors), Position::default());

        assert!(empty.is_empty());
        assert_eq!(one.len(), 1);
        assert_eq!(two.len(), 2);
        assert_eq!(two.components[0].id(), "frame-x");
        assert_eq!(two.components[1].id(), "motor-2212");
    }

    #[test]
    fn test_without_removes_only_that_instance() {
        let build = Build::new("quad", None)
            .with_added(part("motor-2212", ComponentCategory::Motors), Position::default())
            .with_added(part("motor-2212", ComponentCategory::Motors), Position::default());

        let first = build.components[0].instance_id;
        let after = build.without(&first);

        assert_eq!(after.len(), 1);
        assert_ne!(after.components[0].instance_id, first);
        assert_eq!(build.len(), 2);
    }

    #[test]
    fn test_cleared_keeps_palette() {
        let build = Build::new("quad", None)
            .with_added(part("frame-h", ComponentCategory::Frames), Position::default());
        let colors = build
            .colors
            .with_color(crate::entities::palette::ColorPart::Leds, "#EF4444")
            .unwrap();
        let cleared = build.with_colors(colors.clone()).cleared();

        assert!(cleared.is_empty());
        assert_eq!(cleared.colors, colors);
        assert_eq!(cleared.name, "quad");
    }

    #[test]
    fn test_resolve_by_index_and_prefix() {
        let build = Build::new("quad", None)
            .with_added(part("frame-x", ComponentCategory::Frames), Position::default())
            .with_added(part("fc-f4", ComponentCategory::Electronics), Position::default());

        assert_eq!(build.resolve("@2").unwrap().id(), "fc-f4");
        assert!(matches!(build.resolve("@3"), Err(ResolveError::NotFound(_))));
        assert!(matches!(build.resolve("@0"), Err(ResolveError::NotFound(_))));

        let full = build.components[0].instance_id.to_string();
        assert_eq!(build.resolve(&full).unwrap().id(), "frame-x");
        assert_eq!(build.resolve(&full.to_lowercase()).unwrap().id(), "frame-x");

        // "PLC-" is shared by every instance
        assert!(matches!(build.resolve("PLC-"), Err(ResolveError::Ambiguous(_, 2))));
    }

    #[test]
    fn test_build_roundtrip_preserves_fields() {
        let build = Build::new("roundtrip", Some("pilot".to_string()))
            .with_added(part("gps", ComponentCategory::Sensors), Position::new(1.0, 2.0, 3.0));

        let yaml = serde_yml::to_string(&build).unwrap();
        let parsed: Build = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed, build);

        let json = serde_json::to_string(&build).unwrap();
        let parsed: Build = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, build);
    }
}
