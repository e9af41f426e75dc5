//! Source schema nodes.

use crate::overrides::OverrideInfo;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The shape of a schema node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    Bool,
    Int,
    Float,
    #[default]
    String,
    List,
    Set,
    Map,
    /// A nested resource-shaped block with named fields.
    Block,
    /// Any value; element information is ignored.
    Dynamic,
}

impl SchemaKind {
    pub fn is_scalar(self) -> bool {
        matches!(self, Self::Bool | Self::Int | Self::Float | Self::String)
    }

    pub fn is_collection(self) -> bool {
        matches!(self, Self::List | Self::Set | Self::Map)
    }
}

/// A single declarative description of one configuration field.
///
/// Immutable input: nothing in bridgen mutates a schema after it is handed over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchemaNode {
    pub kind: SchemaKind,
    /// Element schema for `list`, `set` and `map`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<Box<SchemaNode>>,
    /// Child fields for `block`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub nested_fields: BTreeMap<String, SchemaNode>,
    pub optional: bool,
    pub required: bool,
    pub computed: bool,
    pub write_only: bool,
    pub force_new: bool,
    /// Upper bound on collection size; `Some(1)` marks a max-items-one collection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub deprecated: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub removed_reason: String,
}

impl SchemaNode {
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    pub fn bool() -> Self {
        Self::new(SchemaKind::Bool)
    }

    pub fn int() -> Self {
        Self::new(SchemaKind::Int)
    }

    pub fn float() -> Self {
        Self::new(SchemaKind::Float)
    }

    pub fn string() -> Self {
        Self::new(SchemaKind::String)
    }

    pub fn dynamic() -> Self {
        Self::new(SchemaKind::Dynamic)
    }

    pub fn list(element: SchemaNode) -> Self {
        Self {
            element: Some(Box::new(element)),
            ..Self::new(SchemaKind::List)
        }
    }

    pub fn set(element: SchemaNode) -> Self {
        Self {
            element: Some(Box::new(element)),
            ..Self::new(SchemaKind::Set)
        }
    }

    /// A map; `None` leaves the element undeclared.
    pub fn map(element: Option<SchemaNode>) -> Self {
        Self {
            element: element.map(Box::new),
            ..Self::new(SchemaKind::Map)
        }
    }

    pub fn block<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, SchemaNode)>,
    {
        Self {
            nested_fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            ..Self::new(SchemaKind::Block)
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn write_only(mut self) -> Self {
        self.write_only = true;
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn max_items_one(mut self) -> Self {
        self.max_items = Some(1);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_deprecation(mut self, message: impl Into<String>) -> Self {
        self.deprecated = message.into();
        self
    }

    pub fn with_removed(mut self, reason: impl Into<String>) -> Self {
        self.removed_reason = reason.into();
        self
    }

    pub fn is_removed(&self) -> bool {
        !self.removed_reason.is_empty()
    }

    pub fn is_deprecated(&self) -> bool {
        !self.deprecated.is_empty()
    }

    /// Whether a user can set this field (optional or required, and not forced computed-only).
    pub fn is_settable(&self, info: Option<&OverrideInfo>) -> bool {
        let computed_only = info.and_then(|i| i.computed_only).unwrap_or(false);
        (self.optional || self.required) && !computed_only
    }

    /// Whether this collection should project as its single element.
    ///
    /// An explicit override wins; otherwise a `list`/`set` with `max_items == 1` qualifies.
    pub fn is_max_items_one(&self, info: Option<&OverrideInfo>) -> bool {
        if !matches!(self.kind, SchemaKind::List | SchemaKind::Set) {
            return false;
        }
        if let Some(explicit) = info.and_then(|i| i.max_items_one) {
            return explicit;
        }
        self.max_items == Some(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_items_one_from_schema_and_override() {
        let single = SchemaNode::list(SchemaNode::string()).max_items_one();
        assert!(single.is_max_items_one(None));

        let forced_off = OverrideInfo {
            max_items_one: Some(false),
            ..Default::default()
        };
        assert!(!single.is_max_items_one(Some(&forced_off)));

        let forced_on = OverrideInfo {
            max_items_one: Some(true),
            ..Default::default()
        };
        let many = SchemaNode::set(SchemaNode::int());
        assert!(!many.is_max_items_one(None));
        assert!(many.is_max_items_one(Some(&forced_on)));

        // Maps never flatten.
        assert!(!SchemaNode::map(None).is_max_items_one(Some(&forced_on)));
    }

    #[test]
    fn settable_respects_computed_only() {
        let field = SchemaNode::string().optional();
        assert!(field.is_settable(None));

        let info = OverrideInfo {
            computed_only: Some(true),
            ..Default::default()
        };
        assert!(!field.is_settable(Some(&info)));
        assert!(!SchemaNode::string().computed().is_settable(None));
    }

    #[test]
    fn deserialize_from_json() {
        let node: SchemaNode = serde_json::from_value(serde_json::json!({
            "kind": "list",
            "optional": true,
            "maxItems": 1,
            "element": {
                "kind": "block",
                "nestedFields": {
                    "name": { "kind": "string", "required": true }
                }
            }
        }))
        .unwrap();

        assert_eq!(node.kind, SchemaKind::List);
        assert!(node.is_max_items_one(None));
        let element = node.element.unwrap();
        assert!(element.nested_fields["name"].required);
    }
}
