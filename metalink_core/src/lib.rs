//! `metalink_core` links the metadata of static content units (lessons,
//! articles, docs pages) at build time. It reads each unit's frontmatter
//! without touching its body, resolves references between units into
//! shallow summaries, and produces plain serializable props for pages that
//! only need metadata.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Content directory
//!   → Loader (lists entries, reads frontmatter only, loads concurrently)
//!   → Registry (unique identifiers, frozen after discovery)
//!   → Resolver (references → { id, title } summaries, depth 1)
//!   → Props serializer (scalars, scalar lists and reference summaries)
//! ```
//!
//! ## Modules
//!
//! - [`config`] — Configuration loading from `metalink.toml`.
//! - [`frontmatter`] — YAML (`---`) and TOML (`+++`) frontmatter extraction.
//!
//! ## Key Types
//!
//! - [`ContentSource`] — Lists entries and reads metadata or bodies. See
//!   [`FsSource`] and [`MemorySource`].
//! - [`Registry`] / [`FrozenRegistry`] — Identifier → unit mapping.
//! - [`ResolvedMetadata`] — A record with references resolved to
//!   [`ReferenceSummary`] values.
//! - [`PageProps`] — The serializable payload for one page.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use metalink_core::build;
//! use std::path::Path;
//!
//! let output = build(Path::new(".")).unwrap();
//! for (id, props) in &output.props {
//! 	println!("{id}: {}", serde_json::to_string(props).unwrap());
//! }
//! ```

pub use build::*;
pub use error::*;
pub use loader::*;
pub use props::*;
pub use registry::*;
pub use resolver::*;
pub use unit::*;
pub use value::*;

mod build;
pub mod config;
#[allow(unused_assignments)]
mod error;
pub mod frontmatter;
mod loader;
mod props;
mod registry;
mod resolver;
mod unit;
mod value;

#[cfg(test)]
mod __fixtures;
