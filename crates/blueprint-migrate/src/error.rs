//! Error types for the migration layer.

use std::path::PathBuf;

use blueprint_core::SchemaError;

/// Errors that can occur while building or executing migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// A blueprint call was rejected.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// A table was created without any column.
    #[error("Table '{0}' declares no columns")]
    EmptyTable(String),

    /// Database error during statement execution.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error (reading configuration or definition files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("Invalid configuration in '{path}': {message}")]
    Config {
        /// Path to the configuration file.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// A migration failed.
    #[error("Migration '{migration}' failed: {source}")]
    Migration {
        /// Migration name.
        migration: String,
        /// Underlying error.
        #[source]
        source: Box<MigrateError>,
    },
}

/// Result type for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
