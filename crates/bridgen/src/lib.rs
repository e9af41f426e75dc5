//! bridgen: bridge an upstream provider into a normalized, documented type model.
//!
//! The facade ties the workspace together:
//!
//! - [`BridgenConfig`] loads `bridgen.toml` and the environment policy flags.
//! - [`DocsSource`] supplies raw Markdown pages; [`StaticDocs`] keeps them in memory.
//! - [`generate`] parses every page on the batch runner and gathers the provider into a
//!   [`Package`](bridgen_typegen::Package).
//!
//! The member crates are re-exported as [`schema`], [`docs`], [`batch`] and [`typegen`].

pub mod config;
pub mod error;
pub mod pipeline;
pub mod source;

pub use bridgen_batch as batch;
pub use bridgen_docs as docs;
pub use bridgen_schema as schema;
pub use bridgen_typegen as typegen;

pub use config::{BridgenConfig, ConfigError, DocsConfig, GenerateConfig};
pub use error::Error;
pub use pipeline::generate;
pub use source::{DocsCache, DocsSource, SourceError, StaticDocs};
