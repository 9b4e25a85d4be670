//! # Generation Errors
//!
//! Synthesis degrades softly: unknown fields and unresolvable branches are
//! omitted, unknown types fall back to `z.any()`. Only a target whose own
//! model cannot be used is a hard failure.

use thiserror::Error;

/// Error generating the schema module for one target.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// The target model is not in the registry.
    #[error("unknown target model '{model}': not present in the model registry")]
    UnknownModel {
        /// Requested model name.
        model: String,
    },

    /// The target model name cannot be used as a TypeScript identifier.
    #[error("model name '{model}' is not a valid identifier for the generated module")]
    InvalidModelName {
        /// Requested model name.
        model: String,
    },
}
