//! # zscope-core — Foundational Types for zscope
//!
//! This crate defines the immutable inputs of a schema generation run. Every
//! other crate in the workspace depends on `zscope-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One registry value per run.** `ModelRegistry` holds every model, its
//!    fields, and every enum. It is built once (deserialized from JSON/YAML or
//!    assembled in code) and only ever borrowed afterwards.
//!
//! 2. **Allow entries are resolved at ingestion.** Raw allow-list entries
//!    (bare strings or `{ name, type, message }` objects) are converted into
//!    the `AllowEntry` tagged union once, when the `AllowList` is built.
//!    Malformed entries are dropped there with a warning and never reach the
//!    synthesis engine.
//!
//! 3. **Path identity ignores list markers.** `tags[]` and `tags` name the same
//!    path segment for every allow decision. Normalization lives in one place
//!    (`allow::normalize_key`).
//!
//! 4. **Insertion order is preserved.** Models, fields, enums, and synonym
//!    tables use `IndexMap`, so generated output follows input order and is
//!    byte-for-byte reproducible.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `zscope-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod allow;
pub mod document;
pub mod error;
pub mod registry;
pub mod synonym;

// Re-export primary types for ergonomic imports.
pub use allow::{
    normalize_key, normalize_path, AllowEntry, AllowList, Descendant, FieldOverride, RawAllowEntry,
    TypeOverride,
};
pub use document::{load_document, parse_document, DocumentFormat};
pub use error::CoreError;
pub use registry::{EnumRegistry, Field, Model, ModelRegistry, ScalarType, SCALAR_TYPE_COUNT};
pub use synonym::{find_actual_model_name, resolve_model_name, SynonymTable};
