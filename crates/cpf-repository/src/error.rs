//! Error types for cpf-repository
//!
//! Content operations never return these: they report failure through
//! `bool`/`Option`/empty results. Errors surface only where an access is
//! being constructed or configured.

use std::path::PathBuf;

/// Result type for cpf-repository construction and configuration
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or configuring content access
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid access configuration: {message}")]
    Configuration { message: String },

    #[error("Unknown plugin: {plugin_id}")]
    UnknownPlugin { plugin_id: String },

    #[error("No access constructor registered for kind '{kind}'")]
    UnknownAccessKind { kind: String },

    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Failed to serialize config: {message}")]
    ConfigSerialize { message: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether this error means the access could not determine its root.
    pub fn is_configuration_fault(&self) -> bool {
        matches!(self, Self::Configuration { .. } | Self::UnknownPlugin { .. })
    }
}
