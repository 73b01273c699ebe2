//! Error types for the `cadence` binary.
//!
//! [`CliError`] covers the startup steps that can fail before a session
//! exists. `main` attaches context with `anyhow` on top of it.

/// Startup error for the `cadence` binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: cadence_core::config::ConfigError,
    },

    /// The content catalog could not be loaded or failed validation.
    #[error("catalog error: {source}")]
    Catalog {
        /// The underlying catalog error.
        #[from]
        source: cadence_catalog::CatalogError,
    },

    /// Logging could not be initialized.
    #[error("logging setup failed: {message}")]
    Logging {
        /// Description of the failure.
        message: String,
    },
}
