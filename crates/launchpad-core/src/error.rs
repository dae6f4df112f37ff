//! Error kinds reported by the materialization pipeline
//!
//! Each variant maps to one failure the caller can show to the user. Errors
//! from the underlying git client are classified into these kinds by the
//! resolver and renderer and never surface directly.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias for the materialization pipeline
pub type MaterializationResult<T> = Result<T, MaterializationError>;

/// Failures of a project materialization request
#[derive(Debug, Error)]
pub enum MaterializationError {
    /// The app name derived from the formal name is not usable
    #[error("'{app_name}' is not a valid app name. Please choose a different name.")]
    InvalidAppName { app_name: String },

    /// The destination directory is already present
    #[error("A directory named '{app_name}' already exists at {}", .path.display())]
    DestinationExists { app_name: String, path: PathBuf },

    /// A network operation failed (offline, certificate errors, unreachable host)
    #[error("Unable to {operation}; is your computer offline?")]
    NetworkFailure { operation: String },

    /// The template location does not hold a template
    #[error("Unable to find a template at {template}; it is not a valid template repository")]
    InvalidTemplateRepository { template: String },

    /// The template has no branch for the requested version
    #[error("Template branch '{branch}' does not exist; this template does not support this version")]
    TemplateUnsupportedVersion { branch: String },

    /// The cached checkout cannot be used safely
    #[error("Git repository in a weird state, delete {} and try again", .path.display())]
    AmbiguousCacheState { path: PathBuf },

    /// A file the template manifest refers to is missing
    #[error("Template file not found: {}", .path.display())]
    MissingTemplateFile { path: PathBuf },

    /// The template expects a value the render context does not provide
    #[error("Template placeholder {{{{{placeholder}}}}} in {location} has no value")]
    MissingContextKey { placeholder: String, location: String },

    /// Filesystem error while reading the template or writing the project
    #[error("I/O error at {}: {source}", .path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MaterializationError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::IoFailure {
            path: path.into(),
            source,
        }
    }

    /// Stable name of the error kind, for display next to the message
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidAppName { .. } => "InvalidAppName",
            Self::DestinationExists { .. } => "DestinationExists",
            Self::NetworkFailure { .. } => "NetworkFailure",
            Self::InvalidTemplateRepository { .. } => "InvalidTemplateRepository",
            Self::TemplateUnsupportedVersion { .. } => "TemplateUnsupportedVersion",
            Self::AmbiguousCacheState { .. } => "AmbiguousCacheState",
            Self::MissingTemplateFile { .. } => "MissingTemplateFile",
            Self::MissingContextKey { .. } => "MissingContextKey",
            Self::IoFailure { .. } => "IOFailure",
        }
    }

    /// Whether the failure happened before anything was written to disk
    pub fn is_pre_write(&self) -> bool {
        matches!(
            self,
            Self::InvalidAppName { .. } | Self::DestinationExists { .. }
        )
    }

    /// A missing version branch may be retried against the development template
    pub fn is_retryable_with_dev_branch(&self) -> bool {
        matches!(self, Self::TemplateUnsupportedVersion { .. })
    }
}
