//! # Error Types
//!
//! Errors raised while building the inputs of a generation run. The synthesis
//! engine itself degrades softly and never returns these; they only surface
//! when a registry or manifest document cannot be read.

use thiserror::Error;

/// Top-level error type for zscope inputs.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A registry or manifest document could not be read or parsed.
    #[error("document load error for '{path}': {reason}")]
    DocumentLoad {
        /// Path (or label) of the document that failed to load.
        path: String,
        /// Reason the document could not be loaded.
        reason: String,
    },

    /// A type tag is not one of the closed set of scalar types.
    #[error("unknown scalar type tag: {0}")]
    UnknownScalar(String),
}
