//! # Rendering
//!
//! Turns a merged [`SchemaNode`] tree into Zod source text and wraps the
//! result in a TypeScript module.

use crate::dsl::Expr;
use crate::node::SchemaNode;

/// Render a tree to a single expression.
///
/// Array elements are merged into one representative before wrapping in
/// `z.array(...)`; an empty array renders as `z.array(z.any())`.
pub fn render_node(node: &SchemaNode) -> Expr {
    match node {
        SchemaNode::Leaf(expr) => expr.clone(),
        SchemaNode::Object(fields) => {
            Expr::object(fields.iter().map(|(k, v)| (k.as_str(), render_node(v))))
        }
        SchemaNode::Array(elements) => {
            let merged = elements.iter().cloned().reduce(SchemaNode::merge);
            Expr::array(merged.as_ref().map_or_else(Expr::any, render_node))
        }
        SchemaNode::Optional(inner) => render_node(inner).nullish(),
    }
}

/// The generated module for one target.
///
/// ```text
/// import { z } from 'zod';
///
/// export const userSchema = z.object({ ... });
///
/// export type userType = z.infer<typeof userSchema>;
/// ```
pub fn render_module(model: &str, root: &Expr) -> String {
    format!(
        "import {{ z }} from 'zod';\n\n\
         export const {model}Schema = {root};\n\n\
         export type {model}Type = z.infer<typeof {model}Schema>;\n"
    )
}
