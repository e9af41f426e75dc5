use serde::{Deserialize, Serialize};

/// How a class of mapping mismatch is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Log and skip the entity.
    #[default]
    Warn,
    /// Collect into [`MappingErrors`](crate::MappingErrors) and fail the gathering pass.
    Error,
}

/// Strictness for the two kinds of schema/mapping mismatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingPolicy {
    /// A schema entry with no explicit mapping.
    pub missing: Strictness,
    /// An explicit mapping with no schema entry.
    pub extra: Strictness,
}

impl MappingPolicy {
    pub fn strict() -> Self {
        Self {
            missing: Strictness::Error,
            extra: Strictness::Error,
        }
    }
}
