//! # Allow Lists
//!
//! An allow list is the set of dotted field paths a generated schema may
//! cover. Each entry is either a bare path (`where.id`) or a structured
//! entry carrying a custom type and/or validation message:
//!
//! ```yaml
//! - where.id
//! - name: select.email
//!   type: email
//!   message: "must be an email"
//! ```
//!
//! ## Matching
//!
//! A path is allowed when it equals an entry, or when it is a strict segment
//! prefix of an entry (`where` is allowed by `where.id`). The `[]` list
//! marker is stripped from every segment before comparing, so `tags[]` and
//! `tags` are the same segment. There are no wildcards.
//!
//! ## Ingestion
//!
//! Raw entries are resolved into [`AllowEntry`] once, when the list is built.
//! Structured entries without a `name`, and values that are neither strings
//! nor objects, are dropped with a warning.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Strip every `[]` list marker from a path segment.
pub fn normalize_key(key: &str) -> String {
    key.replace("[]", "")
}

/// Normalize every segment of a dotted path.
pub fn normalize_path(path: &str) -> String {
    path.split('.').map(normalize_key).collect::<Vec<_>>().join(".")
}

fn split_normalized(path: &str) -> Vec<String> {
    path.split('.').map(normalize_key).collect()
}

// ---------------------------------------------------------------------------
// Entry types
// ---------------------------------------------------------------------------

/// A custom type attached to an allow-list entry.
///
/// Named types are strings such as `email`, `length(2,40)` or `uuid?`.
/// Lists and objects nest named types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeOverride {
    /// A named or parameterized custom type.
    Named(String),
    /// An array type; only the first element is significant.
    List(Vec<TypeOverride>),
    /// An object type, keys in declaration order.
    Object(IndexMap<String, TypeOverride>),
    /// Any other value. Renders as the any-fallback.
    Other(serde_json::Value),
}

/// Custom type and message carried by a structured entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldOverride {
    /// Replaces the type derived from the registry.
    pub type_override: Option<TypeOverride>,
    /// Validation message attached to the leaf.
    pub message: Option<String>,
}

impl FieldOverride {
    /// Whether the override changes nothing.
    pub fn is_empty(&self) -> bool {
        self.type_override.is_none() && self.message.is_none()
    }
}

/// A resolved allow-list entry.
#[derive(Debug, Clone, PartialEq)]
pub enum AllowEntry {
    /// A bare dotted path.
    Bare(String),
    /// A dotted path with a custom type and/or message.
    Override {
        /// Dotted path.
        path: String,
        /// Type and message applied at the path's terminal segment.
        field: FieldOverride,
    },
}

impl AllowEntry {
    /// The entry's dotted path, as written.
    pub fn path(&self) -> &str {
        match self {
            Self::Bare(path) | Self::Override { path, .. } => path,
        }
    }

    /// The override carried by the entry, if any.
    pub fn field_override(&self) -> Option<&FieldOverride> {
        match self {
            Self::Bare(_) => None,
            Self::Override { field, .. } => Some(field),
        }
    }
}

/// An allow-list entry as written in a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAllowEntry {
    /// Bare path string.
    Path(String),
    /// Structured `{ name, type, message }` entry.
    Config {
        /// Dotted path. Entries without one are dropped.
        #[serde(default)]
        name: Option<String>,
        /// Custom type.
        #[serde(default, rename = "type")]
        type_override: Option<TypeOverride>,
        /// Validation message.
        #[serde(default)]
        message: Option<String>,
    },
    /// Anything else. Always dropped.
    Malformed(serde_json::Value),
}

impl RawAllowEntry {
    /// Resolve into an [`AllowEntry`], or `None` when the entry is unusable.
    pub fn resolve(self) -> Option<AllowEntry> {
        match self {
            Self::Path(path) => Some(AllowEntry::Bare(path)),
            Self::Config {
                name: Some(path),
                type_override,
                message,
            } => {
                let field = FieldOverride {
                    type_override,
                    message,
                };
                if field.is_empty() {
                    Some(AllowEntry::Bare(path))
                } else {
                    Some(AllowEntry::Override { path, field })
                }
            }
            Self::Config {
                name: None,
                type_override,
                message,
            } => {
                tracing::warn!(
                    ?type_override,
                    ?message,
                    "skipping allow-list entry without a name"
                );
                None
            }
            Self::Malformed(value) => {
                tracing::warn!("skipping malformed allow-list entry: {value}");
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Allow list
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
struct IndexedEntry {
    entry: AllowEntry,
    raw: Vec<String>,
    normalized: Vec<String>,
}

impl IndexedEntry {
    fn new(entry: AllowEntry) -> Self {
        let raw: Vec<String> = entry.path().split('.').map(str::to_string).collect();
        let normalized = raw.iter().map(|s| normalize_key(s)).collect();
        Self {
            entry,
            raw,
            normalized,
        }
    }

    fn extends(&self, prefix: &[String]) -> bool {
        self.normalized.len() > prefix.len() && self.normalized[..prefix.len()] == *prefix
    }
}

/// An entry strictly below some path, with the segments that remain.
#[derive(Debug, Clone, Copy)]
pub struct Descendant<'a> {
    /// The full entry.
    pub entry: &'a AllowEntry,
    /// Remaining segments as written (list markers kept).
    pub remaining: &'a [String],
    /// Remaining segments with list markers stripped.
    pub normalized_remaining: &'a [String],
}

/// An ordered, resolved allow list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Vec<RawAllowEntry>")]
pub struct AllowList {
    entries: Vec<IndexedEntry>,
}

impl From<Vec<RawAllowEntry>> for AllowList {
    fn from(raw: Vec<RawAllowEntry>) -> Self {
        raw.into_iter().filter_map(RawAllowEntry::resolve).collect()
    }
}

impl FromIterator<AllowEntry> for AllowList {
    fn from_iter<T: IntoIterator<Item = AllowEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(IndexedEntry::new).collect(),
        }
    }
}

impl AllowList {
    /// An empty list, which allows nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// A list of bare paths.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        paths
            .into_iter()
            .map(|p| AllowEntry::Bare(p.into()))
            .collect()
    }

    /// Append an entry.
    pub fn push(&mut self, entry: AllowEntry) {
        self.entries.push(IndexedEntry::new(entry));
    }

    /// Builder-style [`push`](Self::push).
    pub fn with_entry(mut self, entry: AllowEntry) -> Self {
        self.push(entry);
        self
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = &AllowEntry> {
        self.entries.iter().map(|e| &e.entry)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `path` equals an entry or is a strict segment prefix of one.
    pub fn is_allowed(&self, path: &str) -> bool {
        let candidate = split_normalized(path);
        self.entries
            .iter()
            .any(|e| e.normalized == candidate || e.extends(&candidate))
    }

    /// Whether `path` is itself an entry (after normalization).
    pub fn contains_path(&self, path: &str) -> bool {
        let candidate = split_normalized(path);
        self.entries.iter().any(|e| e.normalized == candidate)
    }

    /// Entries strictly below `path`, in declaration order.
    pub fn descendants(&self, path: &str) -> Vec<Descendant<'_>> {
        let prefix = split_normalized(path);
        self.entries
            .iter()
            .filter(|e| e.extends(&prefix))
            .map(|e| Descendant {
                entry: &e.entry,
                remaining: &e.raw[prefix.len()..],
                normalized_remaining: &e.normalized[prefix.len()..],
            })
            .collect()
    }
}
