//! Applies and rolls back migrations.

use blueprint_core::TableOptions;
use tracing::info;

use crate::error::{MigrateError, Result};
use crate::executor::StatementExecutor;
use crate::migration::Migration;
use crate::schema::Schema;

/// Direction of a migration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Apply (`up`).
    Up,
    /// Revert (`down`).
    Down,
}

/// Sequences migrations and sends their statements to an executor.
#[derive(Debug)]
pub struct MigrationRunner<E: StatementExecutor> {
    executor: E,
    options: TableOptions,
}

impl<E: StatementExecutor> MigrationRunner<E> {
    /// Creates a runner; tables are created with `options`.
    #[must_use]
    pub const fn new(executor: E, options: TableOptions) -> Self {
        Self { executor, options }
    }

    /// The underlying executor.
    #[must_use]
    pub const fn executor(&self) -> &E {
        &self.executor
    }

    /// Builds the statements of one migration without executing them.
    ///
    /// # Errors
    ///
    /// Returns the migration's error wrapped in [`MigrateError::Migration`].
    pub fn plan(&self, migration: &dyn Migration, direction: Direction) -> Result<Vec<String>> {
        let mut schema = Schema::new(self.options.clone());
        let outcome = match direction {
            Direction::Up => migration.up(&mut schema),
            Direction::Down => migration.down(&mut schema),
        };
        outcome.map_err(|e| wrap(migration, e))?;
        Ok(schema.into_statements())
    }

    /// Applies migrations in order. Returns the number of statements run.
    ///
    /// # Errors
    ///
    /// Stops at the first failing migration.
    pub async fn apply(&self, migrations: &[&dyn Migration]) -> Result<usize> {
        let mut executed = 0;
        for migration in migrations {
            info!("Applying {}", migration.name());
            executed += self.run(*migration, Direction::Up).await?;
        }
        Ok(executed)
    }

    /// Rolls migrations back in reverse order. Returns the number of
    /// statements run.
    ///
    /// # Errors
    ///
    /// Stops at the first failing migration.
    pub async fn rollback(&self, migrations: &[&dyn Migration]) -> Result<usize> {
        let mut executed = 0;
        for migration in migrations.iter().rev() {
            info!("Rolling back {}", migration.name());
            executed += self.run(*migration, Direction::Down).await?;
        }
        Ok(executed)
    }

    async fn run(&self, migration: &dyn Migration, direction: Direction) -> Result<usize> {
        let statements = self.plan(migration, direction)?;
        for sql in &statements {
            info!(%sql, "Executing");
            self.executor
                .execute(sql)
                .await
                .map_err(|e| wrap(migration, e))?;
        }
        Ok(statements.len())
    }
}

fn wrap(migration: &dyn Migration, error: MigrateError) -> MigrateError {
    MigrateError::Migration {
        migration: migration.name().to_string(),
        source: Box::new(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::DryRunExecutor;
    use blueprint_core::Arg;

    struct CreateUsers;

    impl Migration for CreateUsers {
        fn name(&self) -> &str {
            "0001_users"
        }

        fn up(&self, schema: &mut Schema) -> Result<()> {
            schema.create("users", |table| {
                table.integer("id", &[]).auto_increment(None)?.primary()?;
                table.string("email", &[Arg::Size(120)]).unique()?;
                Ok(())
            })?;
            Ok(())
        }

        fn down(&self, schema: &mut Schema) -> Result<()> {
            schema.drop("users");
            Ok(())
        }
    }

    struct CreatePosts;

    impl Migration for CreatePosts {
        fn name(&self) -> &str {
            "0002_posts"
        }

        fn up(&self, schema: &mut Schema) -> Result<()> {
            schema.create("posts", |table| {
                table.integer("id", &[]).primary()?;
                table.integer("user_id", &[]).indexed()?;
                Ok(())
            })?;
            Ok(())
        }

        fn down(&self, schema: &mut Schema) -> Result<()> {
            schema.drop("posts");
            Ok(())
        }
    }

    struct Broken;

    impl Migration for Broken {
        fn name(&self) -> &str {
            "0003_broken"
        }

        fn up(&self, schema: &mut Schema) -> Result<()> {
            schema.create("broken", |table| {
                table.primary()?;
                Ok(())
            })?;
            Ok(())
        }

        fn down(&self, _schema: &mut Schema) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_apply_in_order() {
        let runner = MigrationRunner::new(DryRunExecutor::new(), TableOptions::default());
        let count = runner.apply(&[&CreateUsers, &CreatePosts]).await.unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            runner.executor().statements(),
            vec![
                "create table `users` (`id` integer(11) not null auto_increment, primary key (`id`), \
                 `email` string(120) not null unique) engine=MyIsam default charset=UTF8;",
                "create table `posts` (`id` integer(11) not null, primary key (`id`), \
                 `user_id` integer(11) not null, index (`user_id`)) engine=MyIsam default charset=UTF8;",
            ]
        );
    }

    #[tokio::test]
    async fn test_rollback_in_reverse_order() {
        let runner = MigrationRunner::new(DryRunExecutor::new(), TableOptions::default());
        runner.rollback(&[&CreateUsers, &CreatePosts]).await.unwrap();

        assert_eq!(
            runner.executor().statements(),
            vec!["drop table if exists `posts`;", "drop table if exists `users`;"]
        );
    }

    #[tokio::test]
    async fn test_failure_names_migration_and_stops() {
        let runner = MigrationRunner::new(DryRunExecutor::new(), TableOptions::default());
        let err = runner
            .apply(&[&CreateUsers, &Broken, &CreatePosts])
            .await
            .unwrap_err();

        assert!(matches!(
            &err,
            MigrateError::Migration { migration, .. } if migration == "0003_broken"
        ));
        assert_eq!(runner.executor().statements().len(), 1);
    }

    #[test]
    fn test_plan_uses_runner_options() {
        let runner = MigrationRunner::new(
            DryRunExecutor::new(),
            TableOptions::default().with_engine("InnoDB").unwrap(),
        );
        let statements = runner.plan(&CreatePosts, Direction::Up).unwrap();
        assert!(statements[0].ends_with("engine=InnoDB default charset=UTF8;"));
    }
}
