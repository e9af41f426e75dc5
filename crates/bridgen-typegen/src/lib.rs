//! Normalized type model for bridged providers.
//!
//! `bridgen-typegen` turns a provider schema, the caller's mapping tables and parsed upstream
//! documentation into a [`Package`]: modules of resources, functions and configuration
//! variables whose types are [`TypeNode`] trees with target names, resolved optionality and a
//! description on every property.
//!
//! # Architecture
//!
//! ```text
//! Inputs                    Model                       Output
//! ──────────────────     ───────────────────────     ──────────────────
//! ProviderSchema   ─┐                                ┌─> Package (modules)
//! ProviderInfo     ─┼─> gather ──> TypeBuilder ──────┼─> Renames
//! DocsMap          ─┘   (gather.rs) (builder.rs)     ├─> TypeRegistry
//!                                                    └─> Emitter (JSON, ...)
//! ```
//!
//! # Example
//!
//! ```
//! use bridgen_schema::SchemaNode;
//! use bridgen_typegen::{DocsMap, GatherOptions, ProviderInfo, ProviderSchema, ResourceInfo, gather};
//! use std::collections::BTreeMap;
//!
//! let schema = ProviderSchema {
//!     resources: BTreeMap::from([(
//!         "test_widget".to_string(),
//!         BTreeMap::from([("display_name".to_string(), SchemaNode::string().required())]),
//!     )]),
//!     ..ProviderSchema::default()
//! };
//! let info = ProviderInfo {
//!     name: "test".to_string(),
//!     resources: BTreeMap::from([("test_widget".to_string(), ResourceInfo::default())]),
//!     ..ProviderInfo::default()
//! };
//!
//! let gathered = gather(&schema, &info, &DocsMap::new(), &GatherOptions::default()).unwrap();
//! let module = gathered.package.module("widget").unwrap();
//! assert!(module.member("Widget").is_some());
//! ```

pub mod builder;
pub mod error;
pub mod gather;
pub mod info;
pub mod model;
pub mod module;
pub mod naming;
pub mod path;
pub mod policy;
pub mod registry;
pub mod renames;
pub mod traits;

pub use builder::{Position, TypeBuilder};
pub use error::{BuildError, EmitError, GatherError, MappingErrors, Mismatch};
pub use gather::{DocsMap, GatherOptions, Gathered, gather};
pub use info::{Block, ConfigInfo, OverlayInfo, ProviderInfo, ProviderSchema, ResourceInfo};
pub use model::{Direction, PropertyNode, TypeKind, TypeNode};
pub use module::{FunctionType, Member, Module, OverlayFile, Package, ResourceType};
pub use naming::EntityName;
pub use path::TypePath;
pub use policy::{MappingPolicy, Strictness};
pub use registry::TypeRegistry;
pub use renames::{RenameScope, Renames};
pub use traits::{Emitter, Files, JsonEmitter};
