//! # Generation Manifests
//!
//! A manifest names the model registry and lists the generation targets:
//!
//! ```yaml
//! registry: registry.json          # a path, or an inline registry document
//! output_dir: generated            # optional
//! targets:
//!   - model: user
//!     output: generated/user.ts    # optional
//!     synonyms: { post: [posts] }
//!     fields:
//!       - where.id
//!       - { name: select.email, type: email, message: "bad email" }
//! ```
//!
//! Relative paths are resolved against the directory holding the manifest.
//! A target without `output` is written to `<output_dir>/<model>ZodSchema.ts`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use zscope_core::{load_document, AllowList, CoreError, ModelRegistry, SynonymTable};

/// Where the model registry comes from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RegistrySource {
    /// A YAML or JSON registry document on disk.
    Path(PathBuf),
    /// A registry written directly in the manifest.
    Inline(ModelRegistry),
}

impl RegistrySource {
    /// Load the registry, resolving a relative path against `base_dir`.
    pub fn load(&self, base_dir: &Path) -> Result<ModelRegistry, CoreError> {
        match self {
            Self::Path(path) => ModelRegistry::load(&resolve_path(path, base_dir)),
            Self::Inline(registry) => Ok(registry.clone()),
        }
    }
}

/// One model to generate a schema module for.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Target {
    /// Target model; also the prefix of the exported identifiers.
    pub model: String,
    /// Output file; defaults to `<output_dir>/<model>ZodSchema.ts`.
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Aliases used to resolve relation segments back to models.
    #[serde(default)]
    pub synonyms: SynonymTable,
    /// Allow list of paths this target's schema covers.
    #[serde(default)]
    pub fields: AllowList,
}

impl Target {
    /// The file this target is written to.
    pub fn output_path(&self, base_dir: &Path, output_dir: &Path) -> PathBuf {
        match &self.output {
            Some(path) => resolve_path(path, base_dir),
            None => output_dir.join(default_file_name(&self.model)),
        }
    }
}

/// A parsed manifest.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Manifest {
    /// Model registry shared by every target.
    pub registry: RegistrySource,
    /// Directory for targets without an explicit output.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Targets in generation order.
    #[serde(default)]
    pub targets: Vec<Target>,
}

impl Manifest {
    /// Read a manifest from a YAML or JSON file.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let manifest: Self = load_document(path)?;
        tracing::debug!(
            path = %path.display(),
            targets = manifest.targets.len(),
            "loaded manifest"
        );
        Ok(manifest)
    }

    /// The default output directory: `output_dir` if set, else `base_dir`.
    pub fn output_dir(&self, base_dir: &Path) -> PathBuf {
        self.output_dir
            .as_deref()
            .map_or_else(|| base_dir.to_path_buf(), |dir| resolve_path(dir, base_dir))
    }
}

/// `<model>ZodSchema.ts`.
pub fn default_file_name(model: &str) -> String {
    format!("{model}ZodSchema.ts")
}

/// The directory a manifest's relative paths are resolved against.
pub fn manifest_dir(manifest_path: &Path) -> PathBuf {
    match manifest_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Resolve `path` against `base_dir` unless it is absolute.
pub fn resolve_path(path: &Path, base_dir: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
