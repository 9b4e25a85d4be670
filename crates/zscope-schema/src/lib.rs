//! # zscope-schema — Path-Scoped Zod Schema Synthesis
//!
//! Builds a Zod validation schema that covers exactly the paths of an
//! allow list, resolved against a model registry.
//!
//! ## Pipeline
//!
//! 1. [`synthesize`] walks each allow-list entry segment by segment,
//!    resolving fields, relations, enums and query operators, and produces
//!    a small [`SchemaNode`] tree (or nothing, when the entry cannot be
//!    typed).
//! 2. [`builder`] folds the trees of a target into one, using the merge
//!    rules of [`node`].
//! 3. [`render`] turns the merged tree into Zod source text and wraps it in
//!    a module exporting `<model>Schema` and `<model>Type`.
//!
//! Relations met along the way are expanded by [`expand`] (whole-model
//! expansion with a cycle guard) or, when write operations are allowed
//! beneath them, by [`operations`].
//!
//! ## Determinism
//!
//! Output depends only on the registry, synonyms and allow list. Key order
//! follows allow-list order for synthesized sections and registry field
//! order for whole-model expansions.
//!
//! ## Crate Policy
//!
//! - Depends only on `zscope-core` internally.
//! - Synthesis is pure: no I/O, no global state.
//! - Unresolvable branches are omitted or rendered as `z.any()`; the only
//!   hard error is a target model that cannot be used.

pub mod builder;
pub mod context;
pub mod dsl;
pub mod error;
pub mod expand;
pub mod mapping;
pub mod node;
pub mod operations;
pub mod render;
pub mod synthesize;

pub use builder::{build_schema, build_sections, generate_module};
pub use context::SchemaContext;
pub use dsl::{custom_type, Expr};
pub use error::GenerateError;
pub use expand::{expand_model, Trail};
pub use mapping::{map_type, scalar_expr};
pub use node::SchemaNode;
pub use operations::{relation_operations, RelationOp};
pub use render::{render_module, render_node};
pub use synthesize::{synthesize, Operator};

use zscope_core::{AllowList, ModelRegistry, SynonymTable};

/// Generate the module source for one target.
///
/// Convenience wrapper around [`SchemaContext`] and [`generate_module`].
pub fn generate(
    registry: &ModelRegistry,
    synonyms: &SynonymTable,
    allow: &AllowList,
    model: &str,
) -> Result<String, GenerateError> {
    generate_module(&SchemaContext::new(registry, synonyms, allow), model)
}
