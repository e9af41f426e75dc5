//! Configuration for bridgen builds.
//!
//! Loaded from a TOML file, then overlaid with environment policy flags, which always win.
//!
//! Example bridgen.toml:
//! ```toml
//! [generate]
//! workers = 8
//! batch_size = 32
//!
//! [mappings]
//! missing = "warn"
//! extra = "error"
//!
//! [docs]
//! base_url = "https://www.terraform.io"
//! ```

use bridgen_docs::DEFAULT_DOCS_BASE_URL;
use bridgen_typegen::{MappingPolicy, Strictness};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Upgrades the missing-mapping policy to `error` when truthy.
pub const MISSING_MAPPING_ERROR_ENV: &str = "BRIDGEN_MISSING_MAPPING_ERROR";
/// Upgrades the extra-mapping policy to `error` when truthy.
pub const EXTRA_MAPPING_ERROR_ENV: &str = "BRIDGEN_EXTRA_MAPPING_ERROR";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Documentation parsing parallelism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Maximum concurrent parse tasks; `<= 0` means one task per batch.
    pub workers: isize,
    /// Entities per batch; `<= 0` means a single batch on the calling thread.
    pub batch_size: isize,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            workers: 8,
            batch_size: 32,
        }
    }
}

/// Documentation rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Prefix for root-relative links in upstream docs.
    pub base_url: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DOCS_BASE_URL.to_string(),
        }
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BridgenConfig {
    pub generate: GenerateConfig,
    pub mappings: MappingPolicy,
    pub docs: DocsConfig,
}

impl BridgenConfig {
    /// Loads `path` and applies the process environment.
    ///
    /// A missing file yields the defaults; an unreadable or malformed one is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_file(path)?.unwrap_or_default();
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Parses a config file without consulting the environment. `Ok(None)` if it does not exist.
    pub fn load_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file; using defaults");
                return Ok(None);
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&content)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Upgrades mapping policies from environment flags read through `var`.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if var(MISSING_MAPPING_ERROR_ENV).is_some_and(|v| is_truthy(&v)) {
            self.mappings.missing = Strictness::Error;
        }
        if var(EXTRA_MAPPING_ERROR_ENV).is_some_and(|v| is_truthy(&v)) {
            self.mappings.extra = Strictness::Error;
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::TempDir;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("bridgen.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{content}").unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = BridgenConfig::default();
        assert_eq!(config.generate.workers, 8);
        assert_eq!(config.generate.batch_size, 32);
        assert_eq!(config.mappings, MappingPolicy::default());
        assert_eq!(config.docs.base_url, "https://www.terraform.io");
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let loaded = BridgenConfig::load_file(&dir.path().join("absent.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[generate]
workers = 2
batch_size = 0

[mappings]
extra = "error"

[docs]
base_url = "https://docs.example.com"
"#,
        );

        let config = BridgenConfig::load_file(&path).unwrap().unwrap();
        assert_eq!(config.generate.workers, 2);
        assert_eq!(config.generate.batch_size, 0);
        assert_eq!(config.mappings.missing, Strictness::Warn);
        assert_eq!(config.mappings.extra, Strictness::Error);
        assert_eq!(config.docs.base_url, "https://docs.example.com");
    }

    #[test]
    fn test_partial_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[generate]\nworkers = -1\n");

        let config = BridgenConfig::load_file(&path).unwrap().unwrap();
        assert_eq!(config.generate.workers, -1);
        assert_eq!(config.generate.batch_size, 32); // default
        assert_eq!(config.docs, DocsConfig::default());
    }

    #[test]
    fn test_malformed_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[mappings]\nmissing = \"sometimes\"\n");

        let err = BridgenConfig::load_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_env_upgrades_policy() {
        let mut config = BridgenConfig::default();
        config.apply_env(env(&[(MISSING_MAPPING_ERROR_ENV, "TRUE")]));
        assert_eq!(config.mappings.missing, Strictness::Error);
        assert_eq!(config.mappings.extra, Strictness::Warn);

        config.apply_env(env(&[(EXTRA_MAPPING_ERROR_ENV, " on ")]));
        assert_eq!(config.mappings.extra, Strictness::Error);
    }

    #[test]
    fn test_env_wins_over_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[mappings]\nmissing = \"warn\"\n");

        let mut config = BridgenConfig::load_file(&path).unwrap().unwrap();
        config.apply_env(env(&[(MISSING_MAPPING_ERROR_ENV, "yes")]));
        assert_eq!(config.mappings.missing, Strictness::Error);
    }

    #[test]
    fn test_falsy_env_values() {
        for value in ["0", "false", "no", "off", "", "maybe"] {
            let mut config = BridgenConfig::default();
            config.apply_env(env(&[
                (MISSING_MAPPING_ERROR_ENV, value),
                (EXTRA_MAPPING_ERROR_ENV, value),
            ]));
            assert_eq!(config.mappings, MappingPolicy::default(), "value {value:?}");
        }
    }
}
