//! Error types for type model construction and gathering.

use bridgen_docs::DocKind;
use std::fmt;

/// Structural errors. Any of these aborts the build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("type `{name}` declared at {path} conflicts with an existing type of the same name")]
    DuplicateTypeName { name: String, path: String },
    #[error("duplicate property `{name}` at {path}")]
    DuplicateProperty { name: String, path: String },
    #[error("required property {path} cannot be omitted")]
    RequiredOmitted { path: String },
    #[error("{path} has neither a schema nor an override")]
    MissingSchema { path: String },
    #[error("module `{module}` already has a member named `{member}`")]
    DuplicateMember { module: String, member: String },
    #[error("cannot merge module `{other}` into module `{module}`")]
    ModuleMismatch { module: String, other: String },
    #[error("cannot combine config and non-config modules named `{module}`")]
    ConfigModuleMismatch { module: String },
    #[error("`{name}` does not start with the provider prefix `{prefix}`")]
    MissingPrefix { name: String, prefix: String },
    #[error("invalid token `{token}`: expected `package:module:name`")]
    InvalidToken { token: String },
    #[error("overlay module `{module}` is more than one level deep")]
    NestedOverlay { module: String },
}

/// Errors returned by [`gather`](crate::gather).
#[derive(Debug, thiserror::Error)]
pub enum GatherError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Mappings(#[from] MappingErrors),
}

/// Errors returned by an [`Emitter`](crate::Emitter).
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("failed to serialize package: {0}")]
    Json(#[from] serde_json::Error),
}

/// One schema/mapping disagreement.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Mismatch {
    pub kind: DocKind,
    pub name: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}`", self.kind, self.name)
    }
}

/// Every mapping mismatch found in one gathering pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingErrors {
    /// Schema entries with no explicit mapping.
    pub missing: Vec<Mismatch>,
    /// Explicit mappings with no schema entry.
    pub extra: Vec<Mismatch>,
}

impl MappingErrors {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

impl fmt::Display for MappingErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(items: &[Mismatch]) -> String {
            items
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        }

        let mut parts = Vec::new();
        if !self.missing.is_empty() {
            parts.push(format!("missing mappings for {}", list(&self.missing)));
        }
        if !self.extra.is_empty() {
            parts.push(format!(
                "mappings without a schema entry for {}",
                list(&self.extra)
            ));
        }
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for MappingErrors {}
