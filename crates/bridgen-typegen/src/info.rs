//! Gatherer inputs: the provider's schema and the caller's mapping tables.

use bridgen_schema::{OverrideInfo, SchemaNode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fields of one resource, data source or the provider configuration, keyed by source key.
pub type Block = BTreeMap<String, SchemaNode>;

/// Everything a provider declares.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProviderSchema {
    pub config: Block,
    pub resources: BTreeMap<String, Block>,
    pub data_sources: BTreeMap<String, Block>,
}

/// Caller-supplied mapping of a provider onto the target package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProviderInfo {
    /// Provider name; also the prefix (`{name}_`) of every upstream resource name.
    pub name: String,
    pub version: String,
    /// Overrides for provider configuration fields.
    pub config: BTreeMap<String, OverrideInfo>,
    /// Configuration that exists only on the target side.
    pub extra_config: BTreeMap<String, ConfigInfo>,
    pub resources: BTreeMap<String, ResourceInfo>,
    pub data_sources: BTreeMap<String, ResourceInfo>,
    pub overlay: Option<OverlayInfo>,
}

/// Mapping of one resource or data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceInfo {
    /// Target token `pkg:module:Name`; derived from the upstream name when absent.
    pub token: Option<String>,
    /// Overrides for top-level fields.
    pub fields: BTreeMap<String, OverrideInfo>,
    /// Replaces the import section of the parsed docs.
    pub import_details: Option<String>,
    /// Upstream name whose documentation page describes this entity, when it is not its own.
    pub docs_source: Option<String>,
}

impl ResourceInfo {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::default()
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, info: OverrideInfo) -> Self {
        self.fields.insert(key.into(), info);
        self
    }
}

/// A target-only configuration entry, declared by schema, override or both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigInfo {
    pub schema: Option<SchemaNode>,
    pub info: Option<OverrideInfo>,
}

/// Hand-written files to add to the generated package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayInfo {
    /// Files added to the module this overlay describes.
    pub dest_files: Vec<String>,
    /// Overlays of sub-modules; only one level is allowed.
    pub modules: BTreeMap<String, OverlayInfo>,
}
