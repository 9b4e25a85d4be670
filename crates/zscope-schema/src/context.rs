//! # Synthesis Context
//!
//! The read-only inputs of one generation target, bundled so every step of
//! the synthesis recursion sees the same registry, synonym table and allow
//! list without threading them separately.

use zscope_core::{find_actual_model_name, AllowList, ModelRegistry, SynonymTable};

/// Registry, synonyms and allow list for one target.
#[derive(Debug, Clone, Copy)]
pub struct SchemaContext<'a> {
    /// Every model and enum.
    pub registry: &'a ModelRegistry,
    /// Aliases for the target.
    pub synonyms: &'a SynonymTable,
    /// Allowed paths for the target.
    pub allow: &'a AllowList,
}

impl<'a> SchemaContext<'a> {
    /// Bundle the inputs of one target.
    pub fn new(registry: &'a ModelRegistry, synonyms: &'a SynonymTable, allow: &'a AllowList) -> Self {
        Self {
            registry,
            synonyms,
            allow,
        }
    }

    /// Whether `path` is allowed for this target.
    pub fn is_allowed(&self, path: &str) -> bool {
        self.allow.is_allowed(path)
    }

    /// Resolve a type name to a registry model.
    ///
    /// The synonym table is consulted first; otherwise the name itself is
    /// used. Returns `None` when neither is a registered model.
    pub fn resolve_model(&self, name: &str) -> Option<&'a str> {
        let candidate = self
            .synonyms
            .canonical(name)
            .filter(|c| self.registry.contains_model(c))
            .unwrap_or(name);
        self.registry
            .models
            .get_key_value(candidate)
            .map(|(k, _)| k.as_str())
    }

    /// The model a path so far refers to, if any segment names one.
    pub fn model_for_path(&self, path: &str) -> Option<&'a str> {
        let segments: Vec<&str> = path.split('.').collect();
        find_actual_model_name(&segments, self.registry, self.synonyms)
    }
}

/// Append a segment to a dotted path.
pub fn join_path(base: &str, segment: &str) -> String {
    if base.is_empty() {
        segment.to_string()
    } else {
        format!("{base}.{segment}")
    }
}
