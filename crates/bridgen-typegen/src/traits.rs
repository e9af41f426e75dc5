//! The seam between the gathered package and language emitters.

use crate::error::EmitError;
use crate::module::Package;
use std::collections::BTreeMap;

/// Generated files, keyed by path relative to the output directory.
pub type Files = BTreeMap<String, String>;

/// Turns a gathered [`Package`] into files.
///
/// Emitters must be deterministic: the same package yields byte-identical files.
///
/// ```ignore
/// struct Listing;
///
/// impl Emitter for Listing {
///     fn name(&self) -> &'static str { "listing" }
///     fn emit(&self, package: &Package) -> Result<Files, EmitError> {
///         let names = package.modules.keys().cloned().collect::<Vec<_>>().join("\n");
///         Ok(Files::from([("modules.txt".to_string(), names)]))
///     }
/// }
/// ```
pub trait Emitter: Send + Sync {
    /// Unique emitter identifier (e.g. "json").
    fn name(&self) -> &'static str;

    fn emit(&self, package: &Package) -> Result<Files, EmitError>;
}

/// Serializes the whole package as one pretty-printed JSON document.
///
/// Every collection in the model is ordered, so the output is stable and suitable for
/// golden-file comparisons.
#[derive(Debug, Clone)]
pub struct JsonEmitter {
    pub file_name: String,
}

impl Default for JsonEmitter {
    fn default() -> Self {
        Self {
            file_name: "schema.json".to_string(),
        }
    }
}

impl Emitter for JsonEmitter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn emit(&self, package: &Package) -> Result<Files, EmitError> {
        let mut json = serde_json::to_string_pretty(package)?;
        json.push('\n');
        Ok(Files::from([(self.file_name.clone(), json)]))
    }
}
