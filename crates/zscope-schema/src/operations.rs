//! # Relation Operations
//!
//! Write payloads address related records through nested operations
//! (`connect`, `create`, `update`, ...). When the allow list grants
//! `<relation>.<op>`, the relation renders as an object of operation
//! schemas instead of a plain nested object.
//!
//! Operations that address existing records need a unique scalar field on
//! the related model (the first field flagged unique or id). A related
//! model without one cannot be addressed and the whole relation falls back
//! to `z.any()`.
//!
//! Payload schemas (`M` below) are whole-model expansions at the listed
//! path, so only fields allowed beneath that path appear.
//!
//! | Operation | Schema | `M` path |
//! |-----------|--------|----------|
//! | `connect` | `z.object({ u: T })` | |
//! | `connectOrCreate` | `z.object({ where: z.object({ u: T }), create: M })` | `.connectOrCreate.create` |
//! | `create` | `M` | `.create` |
//! | `createMany` | `z.object({ data: z.array(M), skipDuplicates: z.boolean().nullish() }).nullish()` | `.createMany.data` |
//! | `delete` | list: `z.object({ delete: z.array(z.object({ u: T })) }).nullish()`, single: `z.object({ delete: z.boolean() }).nullish()` | |
//! | `deleteMany` | `z.object({ where: z.object({}).nullish() }).nullish()` | |
//! | `disconnect` | as `delete` | |
//! | `set` | `z.object({ set: W }).nullish()`, `W` the unique object (array of them for lists) | |
//! | `update` | list: `z.object({ update: z.array(z.object({ where, data: M })) }).nullish()`, single: `z.object({ update: z.object({ data: M }) }).nullish()` | `.update.data` |
//! | `updateMany` | `z.object({ where: z.object({}).nullish(), data: M }).nullish()` | `.updateMany.data` |
//! | `upsert` | `z.object({ where, create: M1, update: M2 })` | `.upsert.create`, `.upsert.update` |

use std::str::FromStr;

use crate::context::{join_path, SchemaContext};
use crate::dsl::Expr;
use crate::expand::{expand_model, Trail};
use crate::mapping::map_type;

/// A nested write operation on a relation field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationOp {
    /// Link existing records.
    Connect,
    /// Link an existing record or create it.
    ConnectOrCreate,
    /// Create a related record.
    Create,
    /// Create several related records.
    CreateMany,
    /// Delete related records.
    Delete,
    /// Delete related records matching a filter.
    DeleteMany,
    /// Unlink related records.
    Disconnect,
    /// Replace the set of linked records.
    Set,
    /// Update related records.
    Update,
    /// Update related records matching a filter.
    UpdateMany,
    /// Update a related record or create it.
    Upsert,
}

impl RelationOp {
    /// All operations in emission order.
    pub fn all() -> &'static [RelationOp] {
        &[
            Self::Connect,
            Self::ConnectOrCreate,
            Self::Create,
            Self::CreateMany,
            Self::Delete,
            Self::DeleteMany,
            Self::Disconnect,
            Self::Set,
            Self::Update,
            Self::UpdateMany,
            Self::Upsert,
        ]
    }

    /// The path segment naming this operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::ConnectOrCreate => "connectOrCreate",
            Self::Create => "create",
            Self::CreateMany => "createMany",
            Self::Delete => "delete",
            Self::DeleteMany => "deleteMany",
            Self::Disconnect => "disconnect",
            Self::Set => "set",
            Self::Update => "update",
            Self::UpdateMany => "updateMany",
            Self::Upsert => "upsert",
        }
    }

    /// Whether `segment` names an operation.
    pub fn is_operation(segment: &str) -> bool {
        segment.parse::<RelationOp>().is_ok()
    }
}

impl std::fmt::Display for RelationOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| format!("unknown relation operation: {s:?}"))
    }
}

/// Operations allowed directly beneath `path`, in emission order.
pub fn allowed_operations(ctx: &SchemaContext<'_>, path: &str) -> Vec<RelationOp> {
    RelationOp::all()
        .iter()
        .copied()
        .filter(|op| ctx.is_allowed(&join_path(path, op.as_str())))
        .collect()
}

/// Schemas for every allowed operation on a relation to `model_name`.
///
/// Returns `None` when the related model is unknown or has no unique
/// scalar field to address records by.
pub fn relation_operations(
    ctx: &SchemaContext<'_>,
    model_name: &str,
    path: &str,
    is_list: bool,
) -> Option<Vec<(RelationOp, Expr)>> {
    let model = ctx.registry.model(model_name)?;
    let Some((unique_name, unique_field)) = model.unique_scalar_field() else {
        tracing::warn!(model = model_name, path, "no unique scalar field found for relation operations");
        return None;
    };

    let trail = Trail::Empty;
    let builder = OperationBuilder {
        ctx,
        model: model_name,
        path,
        is_list,
        unique_name,
        trail: &trail,
    };

    Some(
        allowed_operations(ctx, path)
            .into_iter()
            .map(|op| {
                let where_path = join_path(&join_path(&join_path(path, op.as_str()), "where"), unique_name);
                let unique_type = map_type(ctx, &unique_field.field_type, &where_path, None, &trail);
                (op, builder.schema(op, unique_type))
            })
            .collect(),
    )
}

struct OperationBuilder<'b> {
    ctx: &'b SchemaContext<'b>,
    model: &'b str,
    path: &'b str,
    is_list: bool,
    unique_name: &'b str,
    trail: &'b Trail<'b>,
}

impl OperationBuilder<'_> {
    /// Expansion of the related model beneath `<path>.<suffix>`.
    fn payload(&self, suffix: &str) -> Expr {
        expand_model(self.ctx, self.model, &join_path(self.path, suffix), self.trail)
    }

    fn unique(&self, unique_type: &Expr) -> Expr {
        Expr::object([(self.unique_name, unique_type.clone())])
    }

    fn unique_list_or_flag(&self, unique_type: &Expr) -> Expr {
        if self.is_list {
            Expr::array(self.unique(unique_type))
        } else {
            Expr::boolean()
        }
    }

    fn schema(&self, op: RelationOp, unique_type: Expr) -> Expr {
        let where_unique = self.unique(&unique_type);
        match op {
            RelationOp::Connect => where_unique,
            RelationOp::ConnectOrCreate => Expr::object([
                ("where", where_unique),
                ("create", self.payload("connectOrCreate.create")),
            ]),
            RelationOp::Create => self.payload("create"),
            RelationOp::CreateMany => Expr::object([
                ("data", Expr::array(self.payload("createMany.data"))),
                ("skipDuplicates", Expr::boolean().nullish()),
            ])
            .nullish(),
            RelationOp::Delete | RelationOp::Disconnect => {
                Expr::object([(op.as_str(), self.unique_list_or_flag(&unique_type))]).nullish()
            }
            RelationOp::DeleteMany => {
                Expr::object([("where", Expr::object(std::iter::empty()).nullish())]).nullish()
            }
            RelationOp::Set => {
                let target = if self.is_list {
                    Expr::array(where_unique)
                } else {
                    where_unique
                };
                Expr::object([("set", target)]).nullish()
            }
            RelationOp::Update => {
                let data = self.payload("update.data");
                let update = if self.is_list {
                    Expr::array(Expr::object([("where", where_unique), ("data", data)]))
                } else {
                    Expr::object([("data", data)])
                };
                Expr::object([("update", update)]).nullish()
            }
            RelationOp::UpdateMany => Expr::object([
                ("where", Expr::object(std::iter::empty()).nullish()),
                ("data", self.payload("updateMany.data")),
            ])
            .nullish(),
            RelationOp::Upsert => Expr::object([
                ("where", where_unique),
                ("create", self.payload("upsert.create")),
                ("update", self.payload("upsert.update")),
            ]),
        }
    }
}
