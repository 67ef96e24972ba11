//! # blueprint-core
//!
//! A fluent table blueprint that compiles column declarations into a single
//! `CREATE TABLE` statement.
//!
//! Columns are declared through one registrar per type. Constraint calls such
//! as `primary()`, `unique()` or `auto_increment()` apply to the column that
//! was declared last. Rendering walks the declared columns once, grouped by
//! type, and produces a statement with a `:table:` placeholder where the
//! caller substitutes the real table name.
//!
//! ```rust
//! use blueprint_core::{Arg, Blueprint};
//!
//! let mut users = Blueprint::new();
//! users
//!     .integer("id", &[])
//!     .auto_increment(None)?
//!     .primary()?
//!     .string("email", &[Arg::Size(120)])
//!     .unique()?
//!     .timestamp("created_at", &[true.into()]);
//!
//! let sql = users.to_sql().expect("columns were declared");
//! assert!(sql.starts_with("create table :table: (`id` integer(11) not null auto_increment"));
//! # Ok::<(), blueprint_core::SchemaError>(())
//! ```

pub mod blueprint;
pub mod catalog;
pub mod error;
pub mod field;
pub mod options;
pub mod render;

pub use blueprint::Blueprint;
pub use catalog::{Catalog, FieldGroup, FieldRef};
pub use error::{Result, SchemaError};
pub use field::{Arg, DefaultValue, FieldDefinition, FieldType};
pub use options::TableOptions;
pub use render::{quote_identifier, StatementRenderer, TABLE_PLACEHOLDER};
