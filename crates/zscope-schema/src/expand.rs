//! # Whole-Model Expansion
//!
//! Expands a model into `z.object({...})` over the fields allowed beneath a
//! path. Used for relation types met during type mapping and for the data
//! payloads of relation operations (`create`, `update.data`, ...).
//!
//! ## Cycle Guard
//!
//! Models reference each other (`user.posts -> post.author -> user`). The
//! [`Trail`] is the chain of models currently being expanded on this branch;
//! revisiting one renders `z.any()` instead of recursing. The trail is an
//! immutable linked stack living on the call stack, so sibling branches can
//! never observe each other's entries and nothing has to be popped by hand.

use crate::context::{join_path, SchemaContext};
use crate::dsl::Expr;
use crate::mapping::{is_leaf_type, map_type};

/// Models being expanded on the current branch, innermost first.
#[derive(Debug, Clone, Copy, Default)]
pub enum Trail<'t> {
    /// No expansion in progress.
    #[default]
    Empty,
    /// `model` is being expanded beneath `parent`.
    Visiting {
        /// Model being expanded.
        model: &'t str,
        /// Enclosing expansions.
        parent: &'t Trail<'t>,
    },
}

impl<'t> Trail<'t> {
    /// A trail extended by `model`.
    pub fn push<'n>(&'n self, model: &'n str) -> Trail<'n> {
        Trail::Visiting { model, parent: self }
    }

    /// Whether `model` is already being expanded.
    pub fn contains(&self, model: &str) -> bool {
        let mut cursor = self;
        while let Trail::Visiting { model: m, parent } = cursor {
            if *m == model {
                return true;
            }
            cursor = parent;
        }
        false
    }
}

/// Expand `model_name` at `path`.
///
/// Only fields whose `<path>.<field>` is allowed are included. Optional
/// fields are marked nullable. A model with no allowed fields renders as
/// `z.object({})`; an unknown model or a model already on `trail` renders as
/// `z.any()`.
pub fn expand_model(ctx: &SchemaContext<'_>, model_name: &str, path: &str, trail: &Trail<'_>) -> Expr {
    if trail.contains(model_name) {
        tracing::debug!(model = model_name, path, "relation cycle, using z.any()");
        return Expr::any();
    }
    let Some(model) = ctx.registry.model(model_name) else {
        tracing::warn!(model = model_name, path, "model not found for relation expansion");
        return Expr::any();
    };

    let trail = trail.push(model_name);
    let mut fields = Vec::new();
    for (name, field) in model.fields() {
        let field_path = join_path(path, name);
        if !ctx.is_allowed(&field_path) {
            continue;
        }
        let expr = if is_leaf_type(ctx, &field.field_type) {
            map_type(ctx, &field.field_type, &field_path, None, &trail)
        } else {
            let target = ctx.resolve_model(&field.field_type).unwrap_or(field.field_type.as_str());
            expand_model(ctx, target, &field_path, &trail)
        };
        let expr = if field.is_optional { expr.nullish() } else { expr };
        fields.push((name, expr));
    }
    Expr::object(fields)
}
