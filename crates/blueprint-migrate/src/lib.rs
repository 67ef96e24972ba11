//! Migration layer for blueprint statements.
//!
//! `blueprint-migrate` is the caller of `blueprint-core`: it binds the table
//! name into rendered statements, sequences the statements of several
//! migrations and sends them to an executor.
//!
//! # Architecture
//!
//! - **Schema** - Collects `create table` / `drop table` statements for one
//!   migration direction
//! - **Migration** - A named, reversible set of schema changes
//! - **Definition** - Tables described as JSON and replayed onto a blueprint
//! - **Executor** - Runs statements against MySQL, or records them (dry run)
//! - **Runner** - Applies migrations in order, rolls them back in reverse
//!
//! # CLI Usage
//!
//! ```bash
//! # Print the statement for a table definition
//! blueprint-migrate render users.json
//!
//! # Create the tables
//! blueprint-migrate --database mysql://root@localhost/app apply users.json posts.json
//!
//! # Drop them again, printing instead of executing
//! blueprint-migrate rollback --dry-run users.json posts.json
//! ```

pub mod config;
pub mod definition;
pub mod error;
pub mod executor;
pub mod migration;
pub mod runner;
pub mod schema;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::MigrateConfig;
    pub use crate::definition::{ColumnSpec, DefinitionMigration, TableDefinition};
    pub use crate::error::{MigrateError, Result};
    pub use crate::executor::{DryRunExecutor, MySqlExecutor, StatementExecutor};
    pub use crate::migration::Migration;
    pub use crate::runner::{Direction, MigrationRunner};
    pub use crate::schema::{bind_table, Schema};
    pub use blueprint_core::{Arg, Blueprint, DefaultValue, SchemaError, TableOptions};
}
