//! # Type Mapping
//!
//! Maps a registry `fieldType` to a Zod expression.
//!
//! | Type | Expression |
//! |------|------------|
//! | `String` | `z.string()` |
//! | `Int` | `z.number().int()` |
//! | `Float` | `z.number()` |
//! | `Boolean` | `z.boolean()` |
//! | `DateTime` | `z.date()` |
//! | `Json` | `z.any()` |
//! | `BigInt` | `z.bigint()` |
//! | `Decimal` | `z.string()` |
//! | `Bytes` | `z.instanceof(Buffer)` |
//! | enum name | `z.enum([...members])` |
//! | model name | whole-model expansion, if the path is allowed |
//! | anything else | `z.any()` |

use zscope_core::ScalarType;

use crate::context::SchemaContext;
use crate::dsl::Expr;
use crate::expand::{expand_model, Trail};

/// The expression for a scalar tag.
pub fn scalar_expr(scalar: ScalarType) -> Expr {
    match scalar {
        ScalarType::String => Expr::string(),
        ScalarType::Int => Expr::raw("z.number().int()"),
        ScalarType::Float => Expr::number(),
        ScalarType::Boolean => Expr::boolean(),
        ScalarType::DateTime => Expr::raw("z.date()"),
        ScalarType::Json => Expr::any(),
        ScalarType::BigInt => Expr::raw("z.bigint()"),
        ScalarType::Decimal => Expr::string(),
        ScalarType::Bytes => Expr::raw("z.instanceof(Buffer)"),
    }
}

/// Whether a type tag is a scalar or a registered enum.
pub fn is_leaf_type(ctx: &SchemaContext<'_>, type_tag: &str) -> bool {
    ScalarType::is_scalar(type_tag) || ctx.registry.is_enum(type_tag)
}

/// Map a type tag found at `path` to an expression.
///
/// `allowed_values`, when non-empty, narrows a scalar or enum type to an
/// enum of exactly those literals. Model types expand into an object of
/// their allowed fields; `trail` is the chain of models already being
/// expanded above this point.
pub fn map_type(
    ctx: &SchemaContext<'_>,
    type_tag: &str,
    path: &str,
    allowed_values: Option<&[String]>,
    trail: &Trail<'_>,
) -> Expr {
    if is_leaf_type(ctx, type_tag) {
        if let Some(values) = allowed_values.filter(|v| !v.is_empty()) {
            return Expr::enumeration(values);
        }
        if let Some(members) = ctx.registry.enum_values(type_tag) {
            return Expr::enumeration(members);
        }
        return type_tag.parse().map(scalar_expr).unwrap_or_else(|_| Expr::any());
    }

    let Some(model) = ctx.resolve_model(type_tag) else {
        tracing::debug!(type_tag, path, "unknown type, using z.any()");
        return Expr::any();
    };
    if !ctx.is_allowed(path) {
        tracing::debug!(model, path, "relation path not allowed, using z.any()");
        return Expr::any();
    }
    expand_model(ctx, model, path, trail)
}
