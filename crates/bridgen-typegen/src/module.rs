//! Module graph handed to emitters.

use crate::error::BuildError;
use crate::model::{PropertyNode, TypeNode};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Name of the module holding provider configuration.
pub const CONFIG_MODULE: &str = "config";

/// A generated package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ResourceType>,
    /// Modules by name; the root module is `""`.
    pub modules: BTreeMap<String, Module>,
}

impl Package {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            provider: None,
            modules: BTreeMap::new(),
        }
    }

    /// Adds `module`, merging it into an existing module of the same name.
    pub fn add_module(&mut self, module: Module) -> Result<(), BuildError> {
        match self.modules.get_mut(&module.name) {
            Some(existing) => existing.merge(module),
            None => {
                self.modules.insert(module.name.clone(), module);
                Ok(())
            }
        }
    }

    pub fn add_modules(
        &mut self,
        modules: impl IntoIterator<Item = Module>,
    ) -> Result<(), BuildError> {
        for module in modules {
            self.add_module(module)?;
        }
        Ok(())
    }

    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }
}

/// One module of a package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub name: String,
    /// Whether this is the configuration module.
    pub config: bool,
    /// Members in insertion order.
    pub members: Vec<Member>,
}

impl Module {
    /// A module named [`CONFIG_MODULE`] is the configuration module.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            config: name == CONFIG_MODULE,
            name,
            members: Vec::new(),
        }
    }

    pub fn config_module() -> Self {
        Self::new(CONFIG_MODULE)
    }

    pub fn add_member(&mut self, member: Member) -> Result<(), BuildError> {
        if self.member(member.name()).is_some() {
            return Err(BuildError::DuplicateMember {
                module: self.name.clone(),
                member: member.name().to_string(),
            });
        }
        self.members.push(member);
        Ok(())
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name() == name)
    }

    /// Appends the members of `other`, which must have the same name and classification.
    pub fn merge(&mut self, other: Module) -> Result<(), BuildError> {
        if self.name != other.name {
            return Err(BuildError::ModuleMismatch {
                module: self.name.clone(),
                other: other.name,
            });
        }
        if self.config != other.config {
            return Err(BuildError::ConfigModuleMismatch {
                module: self.name.clone(),
            });
        }
        for member in other.members {
            self.add_member(member)?;
        }
        Ok(())
    }
}

/// Anything a module exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Member {
    Resource(ResourceType),
    Function(FunctionType),
    /// A configuration variable.
    Variable(PropertyNode),
    Overlay(OverlayFile),
}

impl Member {
    pub fn name(&self) -> &str {
        match self {
            Member::Resource(r) => &r.name,
            Member::Function(f) => &f.name,
            Member::Variable(v) => &v.target_name,
            Member::Overlay(o) => &o.name,
        }
    }
}

/// A generated resource: its constructor arguments, outputs and lookup state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceType {
    pub name: String,
    /// Upstream name; empty for the provider resource.
    pub raw_name: String,
    pub token: String,
    pub doc: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub import_instructions: String,
    pub is_provider: bool,
    /// `{Name}Args`.
    pub args: TypeNode,
    /// Output properties; empty for the provider.
    pub outputs: Vec<PropertyNode>,
    /// `{Name}State`: every property optional.
    pub state: TypeNode,
    /// Target names of required inputs.
    pub required_inputs: BTreeSet<String>,
}

/// A generated function backed by a data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionType {
    pub name: String,
    pub raw_name: String,
    pub token: String,
    pub doc: String,
    /// `{Name}Args`, absent when the function takes no arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<TypeNode>,
    /// `{Name}Result`.
    pub result: TypeNode,
    pub required_args: BTreeSet<String>,
}

/// A hand-written file exported from a module as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayFile {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay(name: &str) -> Member {
        Member::Overlay(OverlayFile {
            name: name.to_string(),
        })
    }

    #[test]
    fn duplicate_member_rejected() {
        let mut module = Module::new("s3");
        module.add_member(overlay("util.ts")).unwrap();
        let err = module.add_member(overlay("util.ts")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "module `s3` already has a member named `util.ts`"
        );
    }

    #[test]
    fn merge_concatenates() {
        let mut a = Module::new("s3");
        a.add_member(overlay("a.ts")).unwrap();
        let mut b = Module::new("s3");
        b.add_member(overlay("b.ts")).unwrap();
        a.merge(b).unwrap();
        let names: Vec<&str> = a.members.iter().map(Member::name).collect();
        assert_eq!(names, vec!["a.ts", "b.ts"]);
    }

    #[test]
    fn merge_checks_classification() {
        let mut package = Package::new("aws", "1.0.0");
        package.add_module(Module::config_module()).unwrap();
        package.add_module(Module::new(CONFIG_MODULE)).unwrap();
        assert!(package.module(CONFIG_MODULE).unwrap().config);

        let plain = Module {
            config: false,
            ..Module::new(CONFIG_MODULE)
        };
        let err = package.add_module(plain).unwrap_err();
        assert!(matches!(err, BuildError::ConfigModuleMismatch { .. }));

        let mut s3 = Module::new("s3");
        assert!(matches!(
            s3.merge(Module::new("ec2")),
            Err(BuildError::ModuleMismatch { .. })
        ));
    }
}
