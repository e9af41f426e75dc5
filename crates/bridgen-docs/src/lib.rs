//! Documentation association for bridgen.
//!
//! Upstream providers document each resource in a free-form Markdown page. This crate turns such
//! a page into an [`EntityDocs`] record ([`parse`]) and picks the single description to attach to
//! a property at a given nesting path ([`resolve`]).
//!
//! ```text
//! markdown bytes ──parse──> EntityDocs ──resolve(path)──> description
//!                              │
//!                              └── cleaned by Reformatter (links, code spans, whitespace)
//! ```
//!
//! # Example
//!
//! ```
//! use bridgen_docs::{parse, resolve, Reformatter};
//!
//! let docs = parse(b"## Argument Reference\n\n* `bucket` - (Optional) The bucket name.\n");
//! let found = resolve(&docs, &["bucket".to_string()], "", &Reformatter::default());
//! assert_eq!(found.text, "The bucket name.");
//! ```

mod entity;
mod parser;
mod reformat;
mod resolve;

pub use entity::{ArgumentDoc, DocKind, EntityDocs};
pub use parser::{ParseOptions, footer_links, parse, parse_with};
pub use reformat::{DEFAULT_DOCS_BASE_URL, Reformatter};
pub use resolve::{Resolved, resolve};
