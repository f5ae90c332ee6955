//! Blueprint-driven template resolution and rendering.
//!
//! `blueprint-templates` maps (collection, blueprint) identifier pairs to
//! template files on disk, picks a rendering engine by file suffix, and
//! renders with caller-supplied data. It is the kind of layer a content
//! system puts between "which entry is this" and "what text do we emit".
//!
//! # Resolution
//!
//! Templates live under a root directory as
//! `{root}/{collection}/{blueprint}{suffix}`. Suffixes are probed in
//! priority order and the first existing file wins. When no specific
//! template exists, an optional `{root}/default{suffix}` template serves as
//! a global fallback.
//!
//! # Quick Start
//!
//! ```rust
//! use blueprint_templates::{MemoryFilesystem, TemplateResolver};
//! use serde_json::json;
//!
//! let fs = MemoryFilesystem::new();
//! fs.insert("/templates/posts/article.jinja", "Hello {{ name }}");
//!
//! let mut resolver = TemplateResolver::with_filesystem("/templates", fs);
//!
//! let output = resolver
//!     .render("posts", "article", &json!({"name": "Ada"}))
//!     .unwrap();
//! assert_eq!(output.as_deref(), Some("Hello Ada"));
//!
//! // No template, no default: a normal outcome, not an error.
//! assert_eq!(resolver.render("posts", "missing", &json!({})).unwrap(), None);
//! ```
//!
//! # Modules
//!
//! - [`resolver`] - lookup, caching, and default fallback
//! - [`engine`] - the [`TemplateEngine`] trait and bundled engines
//! - [`fs`] - the [`Filesystem`] capability and its disk/memory backends

pub mod engine;
mod error;
pub mod fs;
pub mod resolver;

pub use engine::{MiniJinjaEngine, SimpleEngine, TemplateEngine};
pub use error::RenderError;
pub use fs::{DiskFilesystem, Filesystem, MemoryFilesystem};
pub use resolver::{default_engines, SuffixTable, TemplateRecord, TemplateResolver};
