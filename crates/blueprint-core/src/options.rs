//! Table storage options.

use serde::Deserialize;

use crate::error::{Result, SchemaError};

/// Storage engine used when none is configured.
pub const DEFAULT_ENGINE: &str = "MyIsam";

/// Character set used when none is configured.
pub const DEFAULT_CHARSET: &str = "UTF8";

/// Engine and character set appended to every rendered statement.
///
/// Both values are spliced into the statement unquoted, so every way of
/// setting them accepts only letters, digits and underscores.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawTableOptions")]
pub struct TableOptions {
    engine: String,
    charset: String,
}

#[derive(Deserialize)]
#[serde(default)]
struct RawTableOptions {
    engine: String,
    charset: String,
}

impl Default for RawTableOptions {
    fn default() -> Self {
        Self {
            engine: DEFAULT_ENGINE.to_string(),
            charset: DEFAULT_CHARSET.to_string(),
        }
    }
}

impl TryFrom<RawTableOptions> for TableOptions {
    type Error = SchemaError;

    fn try_from(raw: RawTableOptions) -> Result<Self> {
        Self::new(raw.engine, raw.charset)
    }
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            engine: DEFAULT_ENGINE.to_string(),
            charset: DEFAULT_CHARSET.to_string(),
        }
    }
}

impl TableOptions {
    /// Creates options from an engine and a character set.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidTableOption`] if either value is not a
    /// plain identifier.
    pub fn new(engine: impl Into<String>, charset: impl Into<String>) -> Result<Self> {
        Ok(Self {
            engine: validate_option("engine", engine.into())?,
            charset: validate_option("charset", charset.into())?,
        })
    }

    /// Replaces the storage engine.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidTableOption`] if `engine` is not a plain
    /// identifier.
    pub fn with_engine(mut self, engine: impl Into<String>) -> Result<Self> {
        self.set_engine(engine)?;
        Ok(self)
    }

    /// Replaces the character set.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidTableOption`] if `charset` is not a
    /// plain identifier.
    pub fn with_charset(mut self, charset: impl Into<String>) -> Result<Self> {
        self.set_charset(charset)?;
        Ok(self)
    }

    pub(crate) fn set_engine(&mut self, engine: impl Into<String>) -> Result<()> {
        self.engine = validate_option("engine", engine.into())?;
        Ok(())
    }

    pub(crate) fn set_charset(&mut self, charset: impl Into<String>) -> Result<()> {
        self.charset = validate_option("charset", charset.into())?;
        Ok(())
    }

    /// Storage engine name.
    #[must_use]
    pub fn engine(&self) -> &str {
        &self.engine
    }

    /// Default character set.
    #[must_use]
    pub fn charset(&self) -> &str {
        &self.charset
    }
}

fn validate_option(option: &'static str, value: String) -> Result<String> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(value)
    } else {
        Err(SchemaError::InvalidTableOption { option, value })
    }
}
