//! Source/target name tables for tooling that maps between the two later.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where a renamed property lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameScope<'a> {
    /// Provider configuration.
    Config,
    /// A resource or function token, or a declared object type name.
    Type(&'a str),
}

/// Rename tables produced while gathering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Renames {
    /// Resource token to upstream resource name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub resources: BTreeMap<String, String>,
    /// Function token to upstream data source name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub functions: BTreeMap<String, String>,
    /// Owner (token or declared type) to target property name to source key.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub renamed_properties: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub renamed_config_properties: BTreeMap<String, String>,
}

impl Renames {
    pub fn record_resource(&mut self, token: &str, raw_name: &str) {
        self.resources.insert(token.to_string(), raw_name.to_string());
    }

    pub fn record_function(&mut self, token: &str, raw_name: &str) {
        self.functions.insert(token.to_string(), raw_name.to_string());
    }

    /// Records `target_name` as a rename of `source_key`; identical names are not recorded.
    pub fn record_property(&mut self, scope: RenameScope<'_>, source_key: &str, target_name: &str) {
        if source_key == target_name {
            return;
        }
        let table = match scope {
            RenameScope::Config => &mut self.renamed_config_properties,
            RenameScope::Type(owner) => self
                .renamed_properties
                .entry(owner.to_string())
                .or_default(),
        };
        table.insert(target_name.to_string(), source_key.to_string());
    }

    /// The source key behind `target_name`, or `None` if it was not renamed.
    pub fn source_key(&self, scope: RenameScope<'_>, target_name: &str) -> Option<&str> {
        let table = match scope {
            RenameScope::Config => Some(&self.renamed_config_properties),
            RenameScope::Type(owner) => self.renamed_properties.get(owner),
        };
        table.and_then(|t| t.get(target_name)).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_real_renames_recorded() {
        let mut renames = Renames::default();
        let owner = RenameScope::Type("aws:s3/bucket:Bucket");
        renames.record_property(owner, "bucket", "bucket");
        renames.record_property(owner, "cors_rule", "corsRules");
        renames.record_property(RenameScope::Config, "access_key", "accessKey");

        assert_eq!(renames.source_key(owner, "corsRules"), Some("cors_rule"));
        assert_eq!(renames.source_key(owner, "bucket"), None);
        assert_eq!(
            renames.source_key(RenameScope::Config, "accessKey"),
            Some("access_key")
        );
        insta::assert_snapshot!(
            serde_json::to_string(&renames).unwrap(),
            @r#"{"renamedProperties":{"aws:s3/bucket:Bucket":{"corsRules":"cors_rule"}},"renamedConfigProperties":{"accessKey":"access_key"}}"#
        );
    }
}
