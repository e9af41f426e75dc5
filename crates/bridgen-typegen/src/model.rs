//! Target type model.
//!
//! The builder turns each provider schema into a tree of [`TypeNode`]s. Object nodes carry a
//! declared name that is unique per [`Direction`]; see [`TypeRegistry`](crate::TypeRegistry).

use bridgen_schema::DefaultSpec;
use serde::{Deserialize, Serialize};

/// Which namespace a declared type lives in.
///
/// Input types (arguments, lookup state) and output types (resource outputs, function
/// results) may share a name without conflicting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    pub fn of(is_output: bool) -> Self {
        if is_output {
            Direction::Output
        } else {
            Direction::Input
        }
    }
}

/// The kind of a target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Bool,
    Int,
    Float,
    String,
    List,
    Set,
    Map,
    Object,
    /// Dynamically typed value.
    Any,
    /// A caller-declared type known only by its token.
    Opaque,
}

/// A node of the target type model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeNode {
    pub kind: TypeKind,
    /// Element type of `list`, `set` and `map`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<Box<TypeNode>>,
    /// Globally unique name of an `object` type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_name: Option<String>,
    /// Properties of an `object` type, sorted by source key.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyNode>,
    /// Explicit type token supplied by an override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_token: Option<String>,
    /// Documentation of a declared top-level type.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub doc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecation_message: Option<String>,
}

/// A named property of an object type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyNode {
    /// Key as it appears in the provider schema.
    pub source_key: String,
    /// Target identifier; unique among siblings.
    pub target_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub doc: String,
    pub optional: bool,
    pub is_output: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_config: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub force_new: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecation_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultSpec>,
    /// `None` when the property was omitted by an override or is write-only.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeNode>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl TypeNode {
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            element: None,
            declared_name: None,
            properties: Vec::new(),
            type_token: None,
            doc: String::new(),
            deprecation_message: None,
        }
    }

    pub fn string() -> Self {
        Self::new(TypeKind::String)
    }

    pub fn collection(kind: TypeKind, element: Option<TypeNode>) -> Self {
        Self {
            element: element.map(Box::new),
            ..Self::new(kind)
        }
    }

    pub fn object(declared_name: impl Into<String>, properties: Vec<PropertyNode>) -> Self {
        Self {
            declared_name: Some(declared_name.into()),
            properties,
            ..Self::new(TypeKind::Object)
        }
    }

    pub fn opaque(token: Option<String>) -> Self {
        Self {
            type_token: token,
            ..Self::new(TypeKind::Opaque)
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    /// Sets the deprecation message, keeping the current one when `message` is `None`.
    pub fn with_deprecation(mut self, message: Option<String>) -> Self {
        if message.is_some() {
            self.deprecation_message = message;
        }
        self
    }

    pub fn property(&self, target_name: &str) -> Option<&PropertyNode> {
        self.properties.iter().find(|p| p.target_name == target_name)
    }

    /// Structural equality that ignores documentation and deprecation text.
    ///
    /// Two object nodes with the same declared name must satisfy this, otherwise the name is
    /// claimed by two different types.
    pub fn same_logical_type(&self, other: &TypeNode) -> bool {
        self.kind == other.kind
            && self.declared_name == other.declared_name
            && self.type_token == other.type_token
            && match (&self.element, &other.element) {
                (Some(a), Some(b)) => a.same_logical_type(b),
                (None, None) => true,
                _ => false,
            }
            && self.properties.len() == other.properties.len()
            && self
                .properties
                .iter()
                .zip(&other.properties)
                .all(|(a, b)| a.same_logical_property(b))
    }
}

impl PropertyNode {
    fn same_logical_property(&self, other: &PropertyNode) -> bool {
        self.source_key == other.source_key
            && self.target_name == other.target_name
            && self.optional == other.optional
            && match (&self.ty, &other.ty) {
                (Some(a), Some(b)) => a.same_logical_type(b),
                (None, None) => true,
                _ => false,
            }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(name: &str, optional: bool, ty: TypeNode) -> PropertyNode {
        PropertyNode {
            source_key: name.to_string(),
            target_name: name.to_string(),
            doc: String::new(),
            optional,
            is_output: false,
            is_config: false,
            force_new: false,
            deprecation_message: None,
            default: None,
            ty: Some(ty),
        }
    }

    #[test]
    fn logical_equality_ignores_docs() {
        let mut a = TypeNode::object("Website", vec![prop("index", true, TypeNode::string())]);
        let b = a.clone().with_doc("something else");
        a.properties[0].doc = "documented".to_string();
        assert!(a.same_logical_type(&b));
    }

    #[test]
    fn logical_equality_checks_shape() {
        let a = TypeNode::object("Website", vec![prop("index", true, TypeNode::string())]);
        let b = TypeNode::object("Website", vec![prop("index", false, TypeNode::string())]);
        let c = TypeNode::object(
            "Website",
            vec![prop("index", true, TypeNode::new(TypeKind::Int))],
        );
        assert!(!a.same_logical_type(&b));
        assert!(!a.same_logical_type(&c));
    }

    #[test]
    fn serializes_compactly() {
        let node = TypeNode::collection(TypeKind::Map, Some(TypeNode::string()));
        insta::assert_snapshot!(
            serde_json::to_string(&node).unwrap(),
            @r#"{"kind":"map","element":{"kind":"string"}}"#
        );
    }
}
