//! Table-level statements produced by migrations.
//!
//! [`Schema`] collects statements in the order a migration requests them.
//! Blueprint statements carry a `:table:` placeholder, which is bound to the
//! quoted table name here.

use blueprint_core::{quote_identifier, Blueprint, TableOptions, TABLE_PLACEHOLDER};
use tracing::debug;

use crate::error::{MigrateError, Result};

/// Replaces the table placeholder of a rendered statement with `table`.
///
/// Only the first occurrence is the placeholder; later ones belong to column
/// names or literals and are left alone.
#[must_use]
pub fn bind_table(statement: &str, table: &str) -> String {
    statement.replacen(TABLE_PLACEHOLDER, &quote_identifier(table), 1)
}

/// Ordered list of statements built by one migration direction.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    options: TableOptions,
    statements: Vec<String>,
}

impl Schema {
    /// Creates an empty schema whose tables use `options`.
    #[must_use]
    pub fn new(options: TableOptions) -> Self {
        Self {
            options,
            statements: Vec::new(),
        }
    }

    /// Declares a table through `define` and queues its `CREATE TABLE`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use blueprint_core::{Arg, TableOptions};
    /// use blueprint_migrate::schema::Schema;
    ///
    /// let mut schema = Schema::new(TableOptions::default());
    /// schema.create("users", |table| {
    ///     table.integer("id", &[]).primary()?;
    ///     table.string("name", &[Arg::Size(50)]);
    ///     Ok(())
    /// })?;
    ///
    /// assert_eq!(
    ///     schema.statements()[0],
    ///     "create table `users` (`id` integer(11) not null, primary key (`id`), \
    ///      `name` string(50) not null) engine=MyIsam default charset=UTF8;"
    /// );
    /// # Ok::<(), blueprint_migrate::error::MigrateError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Propagates blueprint errors from `define`, and returns
    /// [`MigrateError::EmptyTable`] when no column was declared.
    pub fn create<F>(&mut self, table: &str, define: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Blueprint) -> blueprint_core::Result<()>,
    {
        let mut blueprint = Blueprint::with_options(self.options.clone());
        blueprint.set_table_name(table);
        define(&mut blueprint)?;
        self.create_from(&blueprint)
    }

    /// Queues the `CREATE TABLE` of an already populated blueprint.
    ///
    /// The blueprint must carry a table name.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::EmptyTable`] when the blueprint has no table
    /// name or no columns.
    pub fn create_from(&mut self, blueprint: &Blueprint) -> Result<&mut Self> {
        let table = blueprint.table_name().unwrap_or_default();
        let statement = match blueprint.to_sql() {
            Some(statement) if !table.is_empty() => statement,
            _ => return Err(MigrateError::EmptyTable(table.to_string())),
        };

        let sql = bind_table(&statement, table);
        debug!(%table, %sql, "Queued create table");
        self.statements.push(sql);
        Ok(self)
    }

    /// Queues a `DROP TABLE IF EXISTS`.
    pub fn drop(&mut self, table: &str) -> &mut Self {
        let sql = format!("drop table if exists {};", quote_identifier(table));
        debug!(%table, %sql, "Queued drop table");
        self.statements.push(sql);
        self
    }

    /// Statements in queue order.
    #[must_use]
    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    /// Consumes the schema, returning its statements.
    #[must_use]
    pub fn into_statements(self) -> Vec<String> {
        self.statements
    }
}
