//! # Synonym Resolution
//!
//! Allow-list paths name relations by field name (`posts`, `author`), not by
//! model name (`post`, `user`). A synonym table maps each canonical model
//! name to the aliases that stand for it, so a path segment can be resolved
//! back to the model it refers to.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::registry::ModelRegistry;

/// Canonical model name to its aliases, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SynonymTable {
    entries: IndexMap<String, Vec<String>>,
}

impl SynonymTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style alias registration.
    pub fn with_aliases<I, S>(mut self, canonical: impl Into<String>, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .entry(canonical.into())
            .or_default()
            .extend(aliases.into_iter().map(Into::into));
        self
    }

    /// The first canonical name whose alias list contains `alias`.
    pub fn canonical(&self, alias: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, aliases)| aliases.iter().any(|a| a == alias))
            .map(|(canonical, _)| canonical.as_str())
    }

    /// Number of canonical names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve a name through the synonym table.
///
/// Looks up `normalized_key` when given, else `model_name`. Returns `None`
/// when no alias matches; callers then keep the name they started with.
pub fn resolve_model_name<'a>(
    model_name: &str,
    normalized_key: Option<&str>,
    synonyms: &'a SynonymTable,
) -> Option<&'a str> {
    synonyms.canonical(normalized_key.unwrap_or(model_name))
}

/// Find the model a path refers to.
///
/// Walks `segments` from the last to the first and returns the first one
/// that is a registry model, either directly or through its synonym. The
/// returned name is always a registry key.
///
/// A field name that happens to equal a model name wins over the model
/// passed down by the caller. Registries where that matters need a synonym
/// table that disambiguates.
pub fn find_actual_model_name<'r, S: AsRef<str>>(
    segments: &[S],
    registry: &'r ModelRegistry,
    synonyms: &SynonymTable,
) -> Option<&'r str> {
    segments.iter().rev().find_map(|segment| {
        let segment = segment.as_ref();
        let candidate = if registry.contains_model(segment) {
            Some(segment)
        } else {
            resolve_model_name(segment, None, synonyms).filter(|c| registry.contains_model(c))
        };
        candidate.and_then(|name| registry.models.get_key_value(name).map(|(k, _)| k.as_str()))
    })
}
