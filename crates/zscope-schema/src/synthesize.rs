//! # Schema Synthesis
//!
//! Walks one allow-listed path segment by segment and builds the schema
//! tree it contributes. Every call produces a single-key object
//! `{ segment: value }`, or nothing when the branch cannot be typed.
//!
//! ## Dispatch
//!
//! Each segment is classified in this order:
//!
//! 1. Logical operators (`AND`, `OR`, `NOT`): the rest of the path, in a
//!    one-element list.
//! 2. Quantifiers (`some`, `every`, `none`): the rest of the path against
//!    the related model of the preceding field.
//! 3. Pagination (`take`, `skip`, `limit`): `z.number()`.
//! 4. String matching (`contains`, `startsWith`, `endsWith`, `search`):
//!    `z.string()`.
//! 5. Membership (`in`, `notIn`): an array of the preceding field's type,
//!    narrowed to an enum when literal values are listed beneath the path.
//! 6. Comparison (`equals`, `lt`, `lte`, `gt`, `gte`, `not`): the preceding
//!    field's type.
//! 7. The last segment: a field of the model in scope.
//! 8. Any other segment: descend into the next one.
//!
//! ## Relation operations
//!
//! Once write operations (`connect`, `create`, ...) are allowed beneath a
//! relation, every entry passing through it renders the same operation set.
//! Deeper entries never contribute a plain nested shape of their own.
//!
//! ## Absence
//!
//! A branch that cannot be resolved (path not allowed, unknown field,
//! operator without a preceding field) yields `None`, and so does every
//! ancestor that depended on it. Synthesis never fails.

use indexmap::{IndexMap, IndexSet};
use zscope_core::{normalize_key, Field, FieldOverride};

use crate::context::{join_path, SchemaContext};
use crate::dsl::{custom_type, Expr};
use crate::expand::Trail;
use crate::mapping::{is_leaf_type, map_type};
use crate::node::SchemaNode;
use crate::operations::{allowed_operations, relation_operations, RelationOp};

/// Query operator families recognized as path segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `AND`, `OR`, `NOT`.
    Logical,
    /// `some`, `every`, `none`.
    Quantifier,
    /// `take`, `skip`, `limit`.
    Pagination,
    /// `contains`, `startsWith`, `endsWith`, `search`.
    StringMatch,
    /// `in`, `notIn`.
    Membership,
    /// `equals`, `lt`, `lte`, `gt`, `gte`, `not`.
    Comparison,
}

impl Operator {
    /// Classify a normalized path segment.
    pub fn classify(segment: &str) -> Option<Self> {
        match segment {
            "AND" | "OR" | "NOT" => Some(Self::Logical),
            "some" | "every" | "none" => Some(Self::Quantifier),
            "take" | "skip" | "limit" => Some(Self::Pagination),
            "contains" | "startsWith" | "endsWith" | "search" => Some(Self::StringMatch),
            "in" | "notIn" => Some(Self::Membership),
            "equals" | "lt" | "lte" | "gt" | "gte" | "not" => Some(Self::Comparison),
            _ => None,
        }
    }
}

/// Synthesize the tree contributed by `segments[index..]`.
///
/// `current_path` is the normalized path before `segments[index]`; `model`
/// is the model to fall back to when no segment of `current_path` names
/// one. `field_override` applies at the path's last segment.
pub fn synthesize(
    ctx: &SchemaContext<'_>,
    segments: &[String],
    index: usize,
    model: &str,
    current_path: &str,
    field_override: Option<&FieldOverride>,
) -> Option<SchemaNode> {
    let raw = segments.get(index)?;
    let key = normalize_key(raw);
    let new_path = join_path(current_path, &key);
    if !ctx.is_allowed(&new_path) {
        tracing::debug!(path = %new_path, "path not allowed");
        return None;
    }

    let scope = ctx.model_for_path(current_path).unwrap_or(model);
    let step = Step {
        ctx,
        segments,
        index,
        key: &key,
        is_list: raw.ends_with("[]"),
        scope,
        new_path: &new_path,
        field_override,
    };

    let value = match Operator::classify(&key) {
        Some(op) => step.operator(op),
        None if index + 1 == segments.len() => step.terminal(),
        None => step.descend(),
    }?;
    Some(SchemaNode::single(key.clone(), value))
}

/// One segment being resolved.
struct Step<'s> {
    ctx: &'s SchemaContext<'s>,
    segments: &'s [String],
    index: usize,
    key: &'s str,
    is_list: bool,
    scope: &'s str,
    new_path: &'s str,
    field_override: Option<&'s FieldOverride>,
}

impl<'s> Step<'s> {
    /// The field named by the preceding segment, on the model in scope.
    fn parent_field(&self) -> Option<&'s Field> {
        let parent = self.segments.get(self.index.checked_sub(1)?)?;
        self.ctx.registry.field(self.scope, &normalize_key(parent))
    }

    fn remaining(&self) -> &'s [String] {
        &self.segments[self.index + 1..]
    }

    fn recurse(&self, segments: &[String], index: usize, model: &str) -> Option<SchemaNode> {
        synthesize(self.ctx, segments, index, model, self.new_path, self.field_override)
    }

    fn operator(&self, op: Operator) -> Option<SchemaNode> {
        match op {
            Operator::Logical => {
                let child = self.recurse(self.remaining(), 0, self.scope)?;
                Some(SchemaNode::list_of(child))
            }
            Operator::Quantifier => {
                let target = self
                    .parent_field()
                    .map(|f| self.ctx.resolve_model(&f.field_type).unwrap_or(f.field_type.as_str()))
                    .unwrap_or(self.scope);
                self.recurse(self.remaining(), 0, target)
            }
            Operator::Pagination => Some(SchemaNode::Leaf(Expr::number())),
            Operator::StringMatch => Some(SchemaNode::Leaf(Expr::string())),
            Operator::Membership => {
                let field = self.parent_field()?;
                let literals = self.listed_literals();
                let element = map_type(
                    self.ctx,
                    &field.field_type,
                    self.new_path,
                    Some(literals.as_slice()),
                    &Trail::Empty,
                );
                Some(SchemaNode::Leaf(Expr::array(element)))
            }
            Operator::Comparison => {
                let field = self.parent_field()?;
                let expr = map_type(self.ctx, &field.field_type, self.new_path, None, &Trail::Empty);
                Some(SchemaNode::Leaf(expr))
            }
        }
    }

    /// Literal values declared beneath this path (`where.role.in.ADMIN`).
    fn listed_literals(&self) -> Vec<String> {
        let literals: IndexSet<String> = self
            .ctx
            .allow
            .descendants(self.new_path)
            .iter()
            .map(|d| {
                d.normalized_remaining
                    .iter()
                    .filter(|s| !s.is_empty())
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(".")
            })
            .filter(|literal| !literal.is_empty())
            .collect();
        literals.into_iter().collect()
    }

    fn terminal(&self) -> Option<SchemaNode> {
        match self.ctx.registry.field(self.scope, self.key) {
            Some(field) if is_leaf_type(self.ctx, &field.field_type) => {
                Some(self.leaf(Some(field), &field.field_type))
            }
            Some(field) => Some(self.relation(field)),
            None if self.ctx.registry.is_enum(self.key) => Some(self.leaf(None, self.key)),
            None => {
                tracing::debug!(model = self.scope, field = self.key, "field not found");
                None
            }
        }
    }

    /// A scalar or enum leaf with the entry's override applied.
    fn leaf(&self, field: Option<&Field>, type_tag: &str) -> SchemaNode {
        let override_type = self.field_override.and_then(|o| o.type_override.as_ref());
        let base = match override_type {
            Some(ty) => custom_type(ty),
            None => map_type(self.ctx, type_tag, self.new_path, None, &Trail::Empty),
        };
        let carries_nullish = base.is_nullish();
        let expr = match self.field_override.and_then(|o| o.message.as_deref()) {
            Some(message) => base.with_message(message),
            None => base,
        };
        let expr = if field.is_some_and(|f| f.is_optional) && !carries_nullish {
            expr.nullish()
        } else {
            expr
        };

        let node = SchemaNode::Leaf(expr);
        if self.is_list {
            SchemaNode::list_of(node)
        } else {
            node
        }
    }

    /// A relation field as the last segment.
    fn relation(&self, field: &Field) -> SchemaNode {
        let Some(target) = self.ctx.resolve_model(&field.field_type) else {
            tracing::warn!(
                field = self.key,
                model = %field.field_type,
                path = self.new_path,
                "relation target not in registry, using z.any()"
            );
            return SchemaNode::Leaf(Expr::any());
        };

        if allowed_operations(self.ctx, self.new_path).is_empty() {
            let nested = self.nested(target, false);
            return if self.is_list {
                SchemaNode::list_of(nested)
            } else if field.is_optional {
                nested.optional()
            } else {
                nested
            };
        }

        let Some(schemas) = relation_operations(self.ctx, target, self.new_path, field.is_list) else {
            return SchemaNode::Leaf(Expr::any());
        };
        let ops: IndexMap<String, SchemaNode> = schemas
            .into_iter()
            .map(|(op, expr)| (op.as_str().to_string(), SchemaNode::Leaf(expr)))
            .collect();
        let node = SchemaNode::Object(ops).merge(self.nested(target, true));
        if field.is_optional {
            node.optional()
        } else {
            node
        }
    }

    /// Entries declared beneath this relation, synthesized against `target`.
    fn nested(&self, target: &str, skip_operations: bool) -> SchemaNode {
        self.ctx
            .allow
            .descendants(self.new_path)
            .into_iter()
            .filter(|d| {
                !(skip_operations
                    && d.normalized_remaining
                        .first()
                        .is_some_and(|s| RelationOp::is_operation(s)))
            })
            .filter_map(|d| {
                synthesize(self.ctx, d.remaining, 0, target, self.new_path, d.entry.field_override())
            })
            .fold(SchemaNode::empty_object(), SchemaNode::merge)
    }

    /// A non-terminal plain segment.
    ///
    /// A relation with write operations allowed beneath it renders as its
    /// whole operation set, the same tree the relation would produce as a
    /// terminal segment.
    fn descend(&self) -> Option<SchemaNode> {
        let next_model = match self.ctx.registry.field(self.scope, self.key) {
            Some(field) if !is_leaf_type(self.ctx, &field.field_type) => {
                if !allowed_operations(self.ctx, self.new_path).is_empty() {
                    return Some(self.relation(field));
                }
                match self.ctx.resolve_model(&field.field_type) {
                    Some(target) => target,
                    None => {
                        tracing::warn!(
                            field = self.key,
                            model = %field.field_type,
                            path = self.new_path,
                            "relation target not in registry, using z.any()"
                        );
                        return Some(SchemaNode::Leaf(Expr::any()));
                    }
                }
            }
            _ => self.scope,
        };
        let child = self.recurse(self.segments, self.index + 1, next_model)?;
        Some(if self.is_list {
            SchemaNode::list_of(child)
        } else {
            child
        })
    }
}
