//! Column types, default values and field definitions.
//!
//! A [`FieldDefinition`] is the record a registrar produces for one column.
//! Registrars accept a loose list of [`Arg`]s which is normalized into size,
//! nullability and default before the record is built.

use std::fmt;
use std::str::FromStr;

use crate::error::SchemaError;

/// Column types understood by the blueprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// INTEGER, default width 11.
    Integer,
    /// BIGINT, default width 20.
    BigInteger,
    /// Long integer, default width 20.
    LongInteger,
    /// Bounded string, up to 255 characters.
    String,
    /// Long text; `string` columns larger than 255 are promoted to it.
    Text,
    /// Fixed-size character column.
    Character,
    /// DATE.
    Date,
    /// DATETIME.
    Datetime,
    /// TIMESTAMP.
    Timestamp,
    /// ENUM over an ordered list of literals.
    Enumerate,
}

impl FieldType {
    /// Largest size accepted by `character` columns.
    pub const MAX_CHARACTER_SIZE: u64 = 4_294_967_295;

    /// Largest size a `string` column keeps before becoming `text`.
    pub const MAX_STRING_SIZE: u64 = 255;

    /// Returns true for `integer`, `bigInteger` and `longInteger`.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::Integer | Self::BigInteger | Self::LongInteger)
    }

    /// Returns true for the string/text/character family.
    #[must_use]
    pub const fn is_textual(self) -> bool {
        matches!(self, Self::String | Self::Text | Self::Character)
    }

    /// Returns true for `date`, `datetime` and `timestamp`.
    #[must_use]
    pub const fn is_temporal(self) -> bool {
        matches!(self, Self::Date | Self::Datetime | Self::Timestamp)
    }

    /// Size used when the caller does not give one.
    #[must_use]
    pub const fn default_size(self) -> Option<u64> {
        match self {
            Self::Integer => Some(11),
            Self::BigInteger | Self::LongInteger => Some(20),
            Self::String | Self::Text => Some(255),
            Self::Character => Some(1),
            Self::Date | Self::Datetime | Self::Timestamp | Self::Enumerate => None,
        }
    }

    /// Returns the type keyword emitted in the statement.
    #[must_use]
    pub const fn sql_name(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::BigInteger => "biginteger",
            Self::LongInteger => "longinteger",
            Self::String => "string",
            Self::Text => "text",
            Self::Character => "character",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::Timestamp => "timestamp",
            Self::Enumerate => "enum",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enumerate => f.write_str("enumerate"),
            other => f.write_str(other.sql_name()),
        }
    }
}

impl FromStr for FieldType {
    type Err = SchemaError;

    /// Parses a registrar name such as `bigInteger`, `big_integer` or `enum`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match key.as_str() {
            "integer" | "int" => Ok(Self::Integer),
            "biginteger" | "bigint" => Ok(Self::BigInteger),
            "longinteger" => Ok(Self::LongInteger),
            "string" | "varchar" => Ok(Self::String),
            "text" => Ok(Self::Text),
            "character" | "char" => Ok(Self::Character),
            "date" => Ok(Self::Date),
            "datetime" => Ok(Self::Datetime),
            "timestamp" | "timestamps" => Ok(Self::Timestamp),
            "enumerate" | "enum" => Ok(Self::Enumerate),
            _ => Err(SchemaError::UnknownRegistrationMethod(s.to_string())),
        }
    }
}

/// Default value attached to a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    /// Numeric default, rendered unquoted.
    Integer(i64),
    /// Text default, rendered as a quoted literal.
    Text(String),
    /// Allowed literals of an `enumerate` column, in declaration order.
    Values(Vec<String>),
}

impl DefaultValue {
    /// Returns the SQL representation of the default value.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Integer(i) => i.to_string(),
            Self::Text(s) => quote_literal(s),
            Self::Values(values) => values
                .iter()
                .map(|v| quote_literal(v))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Quotes a string literal, doubling embedded single quotes.
pub(crate) fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// One loosely-typed registrar argument.
///
/// Arguments may be passed in any order: each variant only sets its own
/// attribute, and a later argument of the same kind overrides an earlier one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// Column size (width, or character length).
    Size(u64),
    /// Whether the column accepts NULL.
    Null(bool),
    /// Default value.
    Default(DefaultValue),
}

impl Arg {
    /// Shorthand for an integer default.
    #[must_use]
    pub const fn default_int(value: i64) -> Self {
        Self::Default(DefaultValue::Integer(value))
    }

    /// Shorthand for a text default.
    #[must_use]
    pub fn default_text(value: impl Into<String>) -> Self {
        Self::Default(DefaultValue::Text(value.into()))
    }
}

impl From<bool> for Arg {
    fn from(nullable: bool) -> Self {
        Self::Null(nullable)
    }
}

impl From<&str> for Arg {
    fn from(default: &str) -> Self {
        Self::default_text(default)
    }
}

impl From<String> for Arg {
    fn from(default: String) -> Self {
        Self::default_text(default)
    }
}

impl From<DefaultValue> for Arg {
    fn from(default: DefaultValue) -> Self {
        Self::Default(default)
    }
}

/// Registrar arguments after normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Normalized {
    pub size: Option<u64>,
    pub nullable: bool,
    pub default: Option<DefaultValue>,
}

impl Normalized {
    pub(crate) fn from_args(args: &[Arg]) -> Self {
        let mut normalized = Self::default();
        for arg in args {
            match arg {
                Arg::Size(size) => normalized.size = Some(*size),
                Arg::Null(nullable) => normalized.nullable = *nullable,
                Arg::Default(default) => normalized.default = Some(default.clone()),
            }
        }
        normalized
    }
}

/// A single column declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    /// Column name, unique within its type group.
    pub name: String,
    /// Declared column type.
    pub field_type: FieldType,
    /// Width or length; `None` for types without a size.
    pub size: Option<u64>,
    /// Whether the column accepts NULL.
    pub nullable: bool,
    /// Default value, or the allowed literals of an `enumerate` column.
    pub default: Option<DefaultValue>,
    /// Whether this column is the primary key.
    pub primary: bool,
    /// Whether this column carries a UNIQUE constraint.
    pub unique: bool,
    /// Whether this column is indexed.
    pub indexed: bool,
}

impl FieldDefinition {
    /// Creates a definition with the type's default size and no constraints.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            size: field_type.default_size(),
            nullable: false,
            default: None,
            primary: false,
            unique: false,
            indexed: false,
        }
    }

    pub(crate) fn with_normalized(mut self, normalized: Normalized) -> Self {
        if normalized.size.is_some() {
            self.size = normalized.size;
        }
        self.nullable = normalized.nullable;
        self.default = normalized.default;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_registrar_names() {
        assert_eq!("integer".parse::<FieldType>(), Ok(FieldType::Integer));
        assert_eq!("bigInteger".parse::<FieldType>(), Ok(FieldType::BigInteger));
        assert_eq!("big_integer".parse::<FieldType>(), Ok(FieldType::BigInteger));
        assert_eq!("longInteger".parse::<FieldType>(), Ok(FieldType::LongInteger));
        assert_eq!("timestamps".parse::<FieldType>(), Ok(FieldType::Timestamp));
        assert_eq!("enum".parse::<FieldType>(), Ok(FieldType::Enumerate));
        assert_eq!(
            "blob".parse::<FieldType>(),
            Err(SchemaError::UnknownRegistrationMethod("blob".into()))
        );
    }

    #[test]
    fn test_type_families() {
        assert!(FieldType::BigInteger.is_integer());
        assert!(!FieldType::String.is_integer());
        assert!(FieldType::Text.is_textual());
        assert!(FieldType::Timestamp.is_temporal());
        assert!(!FieldType::Enumerate.is_temporal());
    }

    #[test]
    fn test_default_value_to_sql() {
        assert_eq!(DefaultValue::Integer(42).to_sql(), "42");
        assert_eq!(DefaultValue::Text("hello".into()).to_sql(), "'hello'");
        assert_eq!(DefaultValue::Text("it's".into()).to_sql(), "'it''s'");
        assert_eq!(
            DefaultValue::Values(vec!["draft".into(), "published".into()]).to_sql(),
            "'draft', 'published'"
        );
    }

    #[test]
    fn test_normalize_out_of_order_args() {
        let normalized = Normalized::from_args(&["guest".into(), true.into(), Arg::Size(40)]);
        assert_eq!(normalized.size, Some(40));
        assert!(normalized.nullable);
        assert_eq!(normalized.default, Some(DefaultValue::Text("guest".into())));

        // Later arguments of the same kind win
        let normalized = Normalized::from_args(&[Arg::Size(10), Arg::Size(12), false.into()]);
        assert_eq!(normalized.size, Some(12));
        assert!(!normalized.nullable);
    }

    #[test]
    fn test_definition_keeps_default_size() {
        let field = FieldDefinition::new("id", FieldType::Integer)
            .with_normalized(Normalized::from_args(&[true.into()]));
        assert_eq!(field.size, Some(11));
        assert!(field.nullable);
        assert!(!field.primary);
    }
}
