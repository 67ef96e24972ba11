//! Migration configuration.
//!
//! Configuration is a small JSON document:
//!
//! ```json
//! {
//!     "database_url": "mysql://root@localhost/app",
//!     "engine": "InnoDB",
//!     "charset": "utf8mb4"
//! }
//! ```
//!
//! Every key is optional. Engine and charset default to `MyIsam` and `UTF8`.

use std::path::Path;

use blueprint_core::{SchemaError, TableOptions};
use serde::Deserialize;
use tracing::debug;

use crate::error::{MigrateError, Result};

/// Settings shared by every migration run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrateConfig {
    /// Database connection string.
    pub database_url: Option<String>,
    /// Engine and charset applied to every created table.
    pub table: TableOptions,
}

/// The configuration document as written on disk.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    database_url: Option<String>,
    engine: Option<String>,
    charset: Option<String>,
}

impl MigrateConfig {
    /// Loads the configuration from `path`.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, is not valid JSON, or names an
    /// engine or charset that is not a plain identifier.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let file: ConfigFile = serde_json::from_str(&contents)?;

        let invalid = |err: SchemaError| MigrateError::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        };
        let mut table = TableOptions::default();
        if let Some(engine) = file.engine {
            table = table.with_engine(engine).map_err(invalid)?;
        }
        if let Some(charset) = file.charset {
            table = table.with_charset(charset).map_err(invalid)?;
        }

        Ok(Self {
            database_url: file.database_url,
            table,
        })
    }
}
