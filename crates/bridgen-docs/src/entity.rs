use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which kind of entity a documentation page describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocKind {
    Resource,
    DataSource,
}

impl fmt::Display for DocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocKind::Resource => f.write_str("resource"),
            DocKind::DataSource => f.write_str("data source"),
        }
    }
}

/// Structured documentation for one resource or data source.
///
/// Built once from the entity's Markdown page and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntityDocs {
    pub description: String,
    pub import_instructions: String,
    /// Argument docs keyed by dot-joined path (`website`, `settings.backup_configuration`).
    pub arguments: BTreeMap<String, ArgumentDoc>,
    /// Output-only attribute descriptions, flat.
    pub attributes: BTreeMap<String, String>,
}

/// Documentation for one argument.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArgumentDoc {
    pub description: String,
    /// Descriptions of the arguments of a nested block, keyed by their own key.
    pub nested_arguments: BTreeMap<String, String>,
    /// Set when the entry was recorded from inside a nested-block listing.
    pub is_nested: bool,
}

impl EntityDocs {
    pub fn argument(&self, path: &str) -> Option<&ArgumentDoc> {
        self.arguments.get(path)
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_empty()
            && self.import_instructions.is_empty()
            && self.arguments.is_empty()
            && self.attributes.is_empty()
    }
}
