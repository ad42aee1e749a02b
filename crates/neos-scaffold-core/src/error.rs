//! Error types for the scaffolder

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving settings or emitting files.
///
/// Files that already exist are not errors: they are recorded as
/// [`FileStatus::Omitted`](crate::writer::FileStatus::Omitted) in the report.
#[derive(Error, Debug)]
pub enum ScaffoldError {
    /// A required setting is missing or unusable.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The settings file could not be read or parsed.
    #[error("Failed to load settings from {path}: {message}")]
    Settings { path: PathBuf, message: String },

    /// No candidate package key is valid, available and active.
    #[error(
        "None of the following package keys are valid, available and active:\n  \
         From command line => {cli}\n  \
         From settings => {settings}\n  \
         From the system => {site}"
    )]
    PackageResolution {
        cli: String,
        settings: String,
        site: String,
    },

    /// A template could not be loaded or rendered.
    #[error("Failed to render template '{template}': {message}")]
    TemplateRender { template: String, message: String },

    /// A translation file could not be parsed.
    #[error("Failed to parse translation file {path}: {message}")]
    TranslationParse { path: PathBuf, message: String },

    /// Filesystem failure while creating directories or writing files.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScaffoldError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error was raised before any file was touched
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::Settings { .. } | Self::PackageResolution { .. }
        )
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, ScaffoldError>;
