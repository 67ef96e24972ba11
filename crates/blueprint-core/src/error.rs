//! Error types for blueprint construction.

use crate::field::FieldType;

/// Errors raised while declaring columns or constraints on a blueprint.
///
/// Every variant describes invalid caller input; none of them is transient.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A declared size exceeds the maximum supported by the column type.
    #[error("Size {size} is out of range for {field_type} columns (max is {max})")]
    SizeOutOfRange {
        /// The column type that rejected the size.
        field_type: FieldType,
        /// The requested size.
        size: u64,
        /// The largest accepted size.
        max: u64,
    },

    /// A primary key has already been assigned in this blueprint.
    #[error("Primary key has already been defined on '{0}'")]
    PrimaryAlreadyDefined(String),

    /// A constraint was requested before any column was declared.
    #[error("Cannot assign {0}: no field has been defined yet")]
    NoFieldDefined(&'static str),

    /// Auto-increment was requested on a column outside the integer family.
    #[error("Cannot add auto_increment to a {0} column")]
    InvalidAutoIncrementTarget(FieldType),

    /// No registrar exists for the requested column type.
    #[error("Unknown registration method '{0}'")]
    UnknownRegistrationMethod(String),

    /// A constraint named a column that was never declared.
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    /// A constraint was requested on a column type that cannot carry it.
    #[error("Cannot assign {constraint} to {field_type} columns")]
    InvalidConstraintTarget {
        /// The rejected constraint.
        constraint: &'static str,
        /// The type of the targeted column.
        field_type: FieldType,
    },

    /// An engine or charset is not a plain identifier.
    #[error("Invalid table {option} '{value}': only letters, digits and underscores are allowed")]
    InvalidTableOption {
        /// Which option was rejected.
        option: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A default value does not fit the column type.
    #[error("Invalid default '{value}' for {field_type} column '{field}'")]
    InvalidDefault {
        /// The column name.
        field: String,
        /// The column type.
        field_type: FieldType,
        /// The rejected value.
        value: String,
    },
}

/// Result type for blueprint operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
