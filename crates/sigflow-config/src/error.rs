//! Error types for graph configuration.

use std::path::PathBuf;

use sigflow_core::GraphError;
use thiserror::Error;

/// Errors that can occur while loading or building a graph description.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// The description is structurally invalid
    #[error("validation failed: {0}")]
    Validation(#[from] crate::validation::ValidationError),

    /// The processing system rejected a block or connection
    #[error("failed to build graph: {0}")]
    Graph(#[from] GraphError),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }
}
