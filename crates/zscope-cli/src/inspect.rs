//! # Inspect Subcommand
//!
//! Summarizes a manifest without generating anything: the registry size and,
//! per target, its model, allow-list size and output file.
//!
//! ```bash
//! zscope inspect schemas/manifest.yaml
//! ```
//!
//! Exits 1 if any target names a model the registry does not contain.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::manifest::{manifest_dir, Manifest};

/// Arguments for `zscope inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to the generation manifest (YAML or JSON).
    pub manifest: PathBuf,
}

/// Execute `zscope inspect`.
pub fn run_inspect(args: &InspectArgs) -> Result<u8> {
    let manifest = Manifest::load(&args.manifest)
        .with_context(|| format!("failed to load manifest: {}", args.manifest.display()))?;
    let base_dir = manifest_dir(&args.manifest);
    let registry = manifest
        .registry
        .load(&base_dir)
        .context("failed to load model registry")?;
    let output_dir = manifest.output_dir(&base_dir);

    println!(
        "registry: {} models, {} enums",
        registry.models.len(),
        registry.enums.len()
    );
    println!("targets:  {}", manifest.targets.len());
    println!();

    let mut unknown = 0usize;
    for target in &manifest.targets {
        let status = if registry.contains_model(&target.model) {
            ""
        } else {
            unknown += 1;
            "  (model not in registry)"
        };
        println!(
            "  {:<20} {:>4} paths  {:>3} synonyms  -> {}{status}",
            target.model,
            target.fields.len(),
            target.synonyms.len(),
            target.output_path(&base_dir, &output_dir).display()
        );
    }

    if unknown > 0 {
        tracing::warn!(unknown, "targets reference models missing from the registry");
        return Ok(1);
    }
    Ok(0)
}
