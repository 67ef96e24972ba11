//! Migration trait.

use crate::error::Result;
use crate::schema::Schema;

/// A reversible set of table changes.
///
/// # Example
///
/// ```rust
/// use blueprint_core::Arg;
/// use blueprint_migrate::error::Result;
/// use blueprint_migrate::migration::Migration;
/// use blueprint_migrate::schema::Schema;
///
/// struct CreateUsers;
///
/// impl Migration for CreateUsers {
///     fn name(&self) -> &str {
///         "0001_create_users"
///     }
///
///     fn up(&self, schema: &mut Schema) -> Result<()> {
///         schema.create("users", |table| {
///             table.integer("id", &[]).auto_increment(None)?.primary()?;
///             table.string("email", &[Arg::Size(120)]).unique()?;
///             Ok(())
///         })?;
///         Ok(())
///     }
///
///     fn down(&self, schema: &mut Schema) -> Result<()> {
///         schema.drop("users");
///         Ok(())
///     }
/// }
/// ```
pub trait Migration {
    /// Migration name, used in logs and errors.
    fn name(&self) -> &str;

    /// Queues the statements that apply this migration.
    ///
    /// # Errors
    ///
    /// Returns any error raised while declaring tables.
    fn up(&self, schema: &mut Schema) -> Result<()>;

    /// Queues the statements that revert this migration.
    ///
    /// # Errors
    ///
    /// Returns any error raised while declaring tables.
    fn down(&self, schema: &mut Schema) -> Result<()>;
}
