//! # Section Builder
//!
//! Folds every allow-list entry of a target into one tree rooted at the
//! target model, then renders it. The top-level keys of the tree are the
//! schema's sections (`where`, `select`, `data`, ...).

use indexmap::IndexMap;

use crate::context::SchemaContext;
use crate::dsl::{is_bare_identifier, Expr};
use crate::error::GenerateError;
use crate::node::SchemaNode;
use crate::render::{render_module, render_node};
use crate::synthesize::synthesize;

/// Merge the trees of every allow-list entry for `model`.
///
/// Entries that contribute nothing are logged at debug level and skipped.
///
/// # Errors
///
/// Returns [`GenerateError::UnknownModel`] if `model` is not registered.
pub fn build_schema(ctx: &SchemaContext<'_>, model: &str) -> Result<SchemaNode, GenerateError> {
    if !ctx.registry.contains_model(model) {
        tracing::warn!(model, "target model not found in registry");
        return Err(GenerateError::UnknownModel {
            model: model.to_string(),
        });
    }

    let mut root = SchemaNode::empty_object();
    for entry in ctx.allow.entries() {
        let segments: Vec<String> = entry.path().split('.').map(str::to_string).collect();
        match synthesize(ctx, &segments, 0, model, "", entry.field_override()) {
            Some(tree) => root = root.merge(tree),
            None => tracing::debug!(model, path = entry.path(), "allow-list entry contributes nothing"),
        }
    }
    Ok(root)
}

/// Render each top-level section of the schema for `model`.
pub fn build_sections(
    ctx: &SchemaContext<'_>,
    model: &str,
) -> Result<IndexMap<String, Expr>, GenerateError> {
    let root = build_schema(ctx, model)?;
    Ok(root
        .as_object()
        .map(|sections| {
            sections
                .iter()
                .map(|(key, node)| (key.clone(), render_node(node)))
                .collect()
        })
        .unwrap_or_default())
}

/// Generate the complete module source for `model`.
///
/// # Errors
///
/// Returns [`GenerateError::InvalidModelName`] if `model` cannot prefix the
/// exported identifiers, and [`GenerateError::UnknownModel`] if it is not
/// registered.
pub fn generate_module(ctx: &SchemaContext<'_>, model: &str) -> Result<String, GenerateError> {
    if !is_bare_identifier(model) {
        return Err(GenerateError::InvalidModelName {
            model: model.to_string(),
        });
    }
    let root = build_schema(ctx, model)?;
    let module = render_module(model, &render_node(&root));
    tracing::debug!(model, bytes = module.len(), "generated schema module");
    Ok(module)
}
