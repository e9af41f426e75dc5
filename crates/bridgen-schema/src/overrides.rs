//! Per-property customization supplied by the caller.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Overrides for one property, nested the same way as the schema it customizes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverrideInfo {
    /// Target name to use verbatim instead of the transformed key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Explicit type token; also replaces the derived name of an object type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    /// Opaque type token (assets, archives); replaces the structural type entirely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opaque_type: Option<String>,
    /// Drop the property from the type model.
    pub omit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
    /// Treat the property as computed-only: never an input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computed_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items_one: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_new: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecation_message: Option<String>,
    /// Overrides for child properties of a block, keyed by source key.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, OverrideInfo>,
    /// Override for the element of a collection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elem: Option<Box<OverrideInfo>>,
}

/// A default value: a literal, environment variables to check in order, or both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DefaultSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub env_vars: Vec<String>,
}

impl DefaultSpec {
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.env_vars.is_empty()
    }
}

impl OverrideInfo {
    pub fn renamed(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn omitted() -> Self {
        Self {
            omit: true,
            ..Default::default()
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, info: OverrideInfo) -> Self {
        self.fields.insert(key.into(), info);
        self
    }

    pub fn with_elem(mut self, info: OverrideInfo) -> Self {
        self.elem = Some(Box::new(info));
        self
    }

    pub fn field(&self, key: &str) -> Option<&OverrideInfo> {
        self.fields.get(key)
    }

    pub fn has_default(&self) -> bool {
        self.default.as_ref().is_some_and(|d| !d.is_empty())
    }

    /// The explicit rename, if set and non-empty.
    pub fn rename(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }
}
