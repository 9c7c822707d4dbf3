//! Error types for bundling operations.
//!
//! Core release errors are wrapped unchanged; everything else names the
//! file, path, or source involved so a failed run can be diagnosed from the
//! message alone.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for bundler operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for all bundler operations
#[derive(Error, Debug)]
pub enum BundlerError {
    /// Release comparison, windowing, alignment, or composition failed
    #[error(transparent)]
    Release(#[from] crate::release::Error),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// Package configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Filesystem errors with the operation and path involved
    #[error("Failed {action} {}: {source}", path.display())]
    Fs {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// HTTP errors talking to a release provider
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// A release provider returned unusable metadata
    #[error("Release provider error for {source_id}: {reason}")]
    Provider {
        /// Source identifier (org/repo) or snapshot key
        source_id: String,
        /// Reason for the error
        reason: String,
    },

    /// Fetching or storing one bundle file failed
    #[error("Unable to fetch {file}: {reason}")]
    Fetch {
        /// Output file name (`<n>-<asset>`)
        file: String,
        /// Reason for the error
        reason: String,
    },

    /// The fetch loop was cancelled before the bundle was published
    #[error("Cancelled before bundle {0} was complete")]
    Cancelled(String),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

/// Package configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A source is not of the form `org/repo`
    #[error("package {package}: {reason}")]
    InvalidSource { package: String, reason: String },

    /// An include/exclude glob failed to compile
    #[error("package {package}: invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        package: String,
        pattern: String,
        reason: String,
    },

    /// Two packages share a name
    #[error("duplicate package '{0}'")]
    DuplicatePackage(String),

    /// A package has an empty name
    #[error("package name must not be empty")]
    EmptyName,

    /// The requested package is not configured
    #[error("unknown package '{0}'")]
    UnknownPackage(String),
}

/// Attaches filesystem context to IO results.
pub trait ErrorExt<T> {
    fn fs_context(self, action: &'static str, path: &Path) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, action: &'static str, path: &Path) -> Result<T> {
        self.map_err(|source| BundlerError::Fs {
            action,
            path: path.to_path_buf(),
            source,
        })
    }
}
