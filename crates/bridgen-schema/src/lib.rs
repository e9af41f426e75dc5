//! Provider schema input model for bridgen.
//!
//! Three things live here because every later stage needs them:
//!
//! - [`SchemaNode`]: the provider's declarative description of one configuration field,
//!   recursively nested through collection elements and blocks.
//! - [`OverrideInfo`]: caller-supplied per-property customization (renames, explicit types,
//!   omission, optionality, defaults), mirroring the schema's nesting.
//! - [`names`]: the name transformer mapping source keys to target identifiers.
//!
//! # Example
//!
//! ```
//! use bridgen_schema::{SchemaNode, names};
//!
//! let field = SchemaNode::string().optional();
//! assert!(field.optional);
//! assert_eq!(names::property_name("instance_type", None), "instanceType");
//! ```

pub mod names;
mod overrides;
mod schema;

pub use overrides::{DefaultSpec, OverrideInfo};
pub use schema::{SchemaKind, SchemaNode};
