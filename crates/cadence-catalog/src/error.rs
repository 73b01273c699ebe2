//! Error types for the `cadence-catalog` crate.

use std::path::PathBuf;

/// Errors raised while loading or validating a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The catalog YAML did not match the expected shape.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_yml::Error),

    /// Two definitions of one kind share an id.
    #[error("duplicate {kind} id: {id}")]
    Duplicate {
        /// Definition kind (e.g. `pet`).
        kind: &'static str,
        /// Offending id.
        id: String,
    },

    /// A definition references an id that does not exist.
    #[error("{kind} {id} references unknown {target} {target_id}")]
    UnknownReference {
        /// Kind of the referencing definition.
        kind: &'static str,
        /// Id of the referencing definition.
        id: String,
        /// Kind of the missing definition.
        target: &'static str,
        /// Missing id.
        target_id: String,
    },

    /// A definition violates a structural rule.
    #[error("invalid {kind} {id}: {reason}")]
    Invalid {
        /// Definition kind.
        kind: &'static str,
        /// Offending id.
        id: String,
        /// What is wrong.
        reason: String,
    },
}
