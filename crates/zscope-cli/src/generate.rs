//! # Generate Subcommand
//!
//! Renders every selected target of a manifest and writes its module.
//!
//! ```bash
//! zscope generate schemas/manifest.yaml
//! zscope generate schemas/manifest.yaml --model user --stdout
//! zscope generate schemas/manifest.yaml --path where.id --check
//! ```
//!
//! Targets fail independently: a target whose model is missing is logged and
//! the run continues, and the exit code is 1 if any target failed. With
//! `--check` nothing is written and the exit code is 1 if any output file is
//! missing or differs from what would be generated.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use zscope_core::ModelRegistry;

use crate::manifest::{manifest_dir, Manifest, Target};

/// Arguments for `zscope generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Path to the generation manifest (YAML or JSON).
    pub manifest: PathBuf,

    /// Only generate the target for this model.
    #[arg(long)]
    pub model: Option<String>,

    /// Only generate targets whose allow list contains this path. Repeatable.
    #[arg(long = "path", value_name = "PATH")]
    pub paths: Vec<String>,

    /// Directory for targets without an explicit output (overrides the manifest).
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Verify outputs are up to date instead of writing them.
    #[arg(long, conflicts_with = "stdout")]
    pub check: bool,

    /// Print modules to stdout instead of writing files.
    #[arg(long)]
    pub stdout: bool,
}

/// How a single target ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetOutcome {
    /// Module written (or printed).
    Written,
    /// `--check`: the file matches.
    UpToDate,
    /// `--check`: the file is missing or differs.
    Stale,
    /// The module could not be generated or written.
    Failed,
}

/// Execute `zscope generate`.
pub fn run_generate(args: &GenerateArgs) -> Result<u8> {
    let manifest = Manifest::load(&args.manifest)
        .with_context(|| format!("failed to load manifest: {}", args.manifest.display()))?;
    let base_dir = manifest_dir(&args.manifest);
    let registry = manifest
        .registry
        .load(&base_dir)
        .context("failed to load model registry")?;
    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => manifest.output_dir(&base_dir),
    };

    let targets = select_targets(&manifest.targets, args.model.as_deref(), &args.paths);
    if targets.is_empty() {
        anyhow::bail!("no target in {} matches the given filters", args.manifest.display());
    }
    tracing::info!(targets = targets.len(), "generating schema modules");

    let mut outcomes = Vec::with_capacity(targets.len());
    for target in targets {
        let path = target.output_path(&base_dir, &output_dir);
        let outcome = match run_target(&registry, target, &path, args) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(model = %target.model, "{e:#}");
                TargetOutcome::Failed
            }
        };
        outcomes.push(outcome);
    }

    let count = |o: TargetOutcome| outcomes.iter().filter(|x| **x == o).count();
    let (failed, stale) = (count(TargetOutcome::Failed), count(TargetOutcome::Stale));
    if !args.stdout {
        if args.check {
            println!(
                "{} up to date, {stale} stale, {failed} failed",
                count(TargetOutcome::UpToDate)
            );
        } else {
            println!("{} written, {failed} failed", count(TargetOutcome::Written));
        }
    }

    Ok(if failed > 0 || stale > 0 { 1 } else { 0 })
}

/// Targets passing the `--model` and `--path` filters, in manifest order.
pub fn select_targets<'m>(targets: &'m [Target], model: Option<&str>, paths: &[String]) -> Vec<&'m Target> {
    targets
        .iter()
        .filter(|t| model.map_or(true, |m| t.model == m))
        .filter(|t| paths.is_empty() || paths.iter().any(|p| t.fields.contains_path(p)))
        .collect()
}

fn run_target(registry: &ModelRegistry, target: &Target, path: &Path, args: &GenerateArgs) -> Result<TargetOutcome> {
    let module = zscope_schema::generate(registry, &target.synonyms, &target.fields, &target.model)
        .with_context(|| format!("failed to generate schema for '{}'", target.model))?;

    if args.stdout {
        print!("{module}");
        return Ok(TargetOutcome::Written);
    }

    if args.check {
        let current = std::fs::read_to_string(path).ok();
        return Ok(if current.as_deref() == Some(module.as_str()) {
            tracing::info!(model = %target.model, path = %path.display(), "up to date");
            TargetOutcome::UpToDate
        } else {
            println!("stale: {}", path.display());
            TargetOutcome::Stale
        });
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory: {}", parent.display()))?;
    }
    std::fs::write(path, &module).with_context(|| format!("failed to write {}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(TargetOutcome::Written)
}
