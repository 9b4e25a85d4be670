//! # zscope-cli — Command-Line Front End
//!
//! Provides the `zscope` binary, which reads a generation manifest and writes
//! one Zod schema module per target.
//!
//! ## Subcommands
//!
//! - `zscope generate` — Render targets and write (or check) their modules.
//! - `zscope inspect` — Summarize a manifest's registry and targets.
//!
//! ```bash
//! zscope generate schemas/manifest.yaml
//! zscope generate schemas/manifest.yaml --check
//! zscope -v inspect schemas/manifest.yaml
//! ```

pub mod generate;
pub mod inspect;
pub mod manifest;

pub use manifest::{Manifest, RegistrySource, Target};
