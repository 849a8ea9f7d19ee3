//! Read-only component registry used for prop and variant validation.
//!
//! ```json
//! {
//!   "components": {
//!     "Button": {
//!       "props": { "size": { "type": "string" }, "disabled": { "type": "boolean" } },
//!       "variants": ["solid", "outline", "ghost", "link"]
//!     },
//!     "Tabs": { "requiresSubcomponents": true }
//!   }
//! }
//! ```
//!
//! When no registry is supplied, validation degrades to permissive warnings.

use crate::errors::RegistryError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Variants cycled through when the registry has none for a component
pub const DEFAULT_VARIANTS: [&str; 3] = ["solid", "outline", "ghost"];

/// Lookup seam over the external component data source
pub trait ComponentRegistry {
    fn component(&self, component_type: &str) -> Option<&ComponentDefinition>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinition {
    #[serde(default)]
    pub props: BTreeMap<String, PropDefinition>,
    #[serde(default)]
    pub variants: Vec<String>,
    #[serde(default)]
    pub requires_subcomponents: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropDefinition {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ComponentDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prop(mut self, name: impl Into<String>, kind: impl Into<String>) -> Self {
        self.props.insert(
            name.into(),
            PropDefinition {
                kind: Some(kind.into()),
                ..PropDefinition::default()
            },
        );
        self
    }

    pub fn with_variants(mut self, variants: &[&str]) -> Self {
        self.variants = variants.iter().map(|v| v.to_string()).collect();
        self
    }

    pub fn requiring_subcomponents(mut self) -> Self {
        self.requires_subcomponents = true;
        self
    }

    pub fn has_prop(&self, name: &str) -> bool {
        self.props.contains_key(name)
    }
}

/// Static registry loaded from JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub components: BTreeMap<String, ComponentDefinition>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(source: &str) -> Result<Self, RegistryError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json(&source)
    }

    pub fn with_component(
        mut self,
        component_type: impl Into<String>,
        definition: ComponentDefinition,
    ) -> Self {
        self.components.insert(component_type.into(), definition);
        self
    }
}

impl ComponentRegistry for Registry {
    fn component(&self, component_type: &str) -> Option<&ComponentDefinition> {
        self.components.get(component_type)
    }
}

/// Variants to validate or cycle against for `component_type`
pub fn allowed_variants(
    registry: Option<&dyn ComponentRegistry>,
    component_type: &str,
) -> Vec<String> {
    registry
        .and_then(|r| r.component(component_type))
        .filter(|definition| !definition.variants.is_empty())
        .map(|definition| definition.variants.clone())
        .unwrap_or_else(|| DEFAULT_VARIANTS.iter().map(|v| v.to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_registry() {
        let json = r#"{
            "components": {
                "Button": {
                    "props": { "size": { "type": "string" }, "disabled": { "type": "boolean", "required": false } },
                    "variants": ["solid", "outline", "ghost", "link"]
                },
                "Tabs": { "requiresSubcomponents": true }
            }
        }"#;

        let registry = Registry::from_json(json).unwrap();
        let button = registry.component("Button").unwrap();
        assert!(button.has_prop("size"));
        assert_eq!(button.props["disabled"].kind.as_deref(), Some("boolean"));
        assert_eq!(button.variants.len(), 4);
        assert!(registry.component("Tabs").unwrap().requires_subcomponents);
        assert!(registry.component("Unknown").is_none());
    }

    #[test]
    fn test_allowed_variants_fall_back_to_defaults() {
        let registry = Registry::new()
            .with_component("Badge", ComponentDefinition::new())
            .with_component(
                "Button",
                ComponentDefinition::new().with_variants(&["primary", "secondary"]),
            );

        assert_eq!(allowed_variants(None, "Button"), DEFAULT_VARIANTS.to_vec());
        assert_eq!(
            allowed_variants(Some(&registry), "Badge"),
            DEFAULT_VARIANTS.to_vec()
        );
        assert_eq!(
            allowed_variants(Some(&registry), "Button"),
            vec!["primary", "secondary"]
        );
    }
}
