//! # Intermediate Schema Tree
//!
//! Each allow-list entry synthesizes a small tree; the trees of one target
//! are merged into a single accumulator and rendered once.
//!
//! ## Merge Rules
//!
//! | Left | Right | Result |
//! |------|-------|--------|
//! | `Array(a)` | `Array(b)` | `Array(a ++ b)` |
//! | `Object(a)` | `Object(b)` | per-key recursive merge, new keys appended |
//! | `Optional(a)` | any `b` | `Optional(merge(a, b))` |
//! | any `a` | `Optional(b)` | `Optional(merge(a, b))` |
//! | anything else | `b` | `b` |

use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::dsl::Expr;

/// A node of the intermediate schema tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNode {
    /// A rendered expression.
    Leaf(Expr),
    /// Named children in insertion order.
    Object(IndexMap<String, SchemaNode>),
    /// Elements merged into one representative at render time.
    Array(Vec<SchemaNode>),
    /// A nullable wrapper.
    Optional(Box<SchemaNode>),
}

impl SchemaNode {
    /// An object with no keys.
    pub fn empty_object() -> Self {
        Self::Object(IndexMap::new())
    }

    /// A single-key object `{ key: value }`.
    pub fn single(key: impl Into<String>, value: SchemaNode) -> Self {
        let mut map = IndexMap::with_capacity(1);
        map.insert(key.into(), value);
        Self::Object(map)
    }

    /// A one-element array.
    pub fn list_of(element: SchemaNode) -> Self {
        Self::Array(vec![element])
    }

    /// Wrap in [`SchemaNode::Optional`] unless already optional.
    pub fn optional(self) -> Self {
        if matches!(self, Self::Optional(_)) {
            self
        } else {
            Self::Optional(Box::new(self))
        }
    }

    /// The children of an object node.
    pub fn as_object(&self) -> Option<&IndexMap<String, SchemaNode>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Merge `other` into `self`; see the module table for the rules.
    pub fn merge(self, other: SchemaNode) -> SchemaNode {
        match (self, other) {
            (Self::Optional(a), Self::Optional(b)) => Self::Optional(Box::new((*a).merge(*b))),
            (Self::Optional(a), b) => Self::Optional(Box::new((*a).merge(b))),
            (a, Self::Optional(b)) => Self::Optional(Box::new(a.merge(*b))),
            (Self::Array(mut a), Self::Array(b)) => {
                a.extend(b);
                Self::Array(a)
            }
            (Self::Object(mut a), Self::Object(b)) => {
                for (key, value) in b {
                    match a.entry(key) {
                        Entry::Occupied(mut slot) => {
                            let current = std::mem::replace(slot.get_mut(), Self::empty_object());
                            *slot.get_mut() = current.merge(value);
                        }
                        Entry::Vacant(slot) => {
                            slot.insert(value);
                        }
                    }
                }
                Self::Object(a)
            }
            (_, b) => b,
        }
    }
}
