//! Statement executors.
//!
//! The runner hands every bound statement to a [`StatementExecutor`].
//! [`MySqlExecutor`] sends it to a database; [`DryRunExecutor`] records it.

use std::sync::{Mutex, PoisonError};

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tracing::{debug, info};

use crate::error::Result;

/// Executes one SQL statement.
#[allow(async_fn_in_trait)]
pub trait StatementExecutor {
    /// Runs `sql`, reporting failure as an error.
    async fn execute(&self, sql: &str) -> Result<()>;
}

/// Executes statements against a MySQL pool.
#[derive(Debug, Clone)]
pub struct MySqlExecutor {
    pool: MySqlPool,
}

impl MySqlExecutor {
    /// Wraps an existing pool.
    #[must_use]
    pub const fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Connects to `database_url`.
    ///
    /// # Errors
    ///
    /// Returns a database error if the connection cannot be established.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        info!("Connected to database");
        Ok(Self::new(pool))
    }
}

impl StatementExecutor for MySqlExecutor {
    async fn execute(&self, sql: &str) -> Result<()> {
        let result = sqlx::query(sql).execute(&self.pool).await?;
        debug!(rows = result.rows_affected(), "Statement executed");
        Ok(())
    }
}

/// Records statements instead of executing them.
#[derive(Debug, Default)]
pub struct DryRunExecutor {
    statements: Mutex<Vec<String>>,
}

impl DryRunExecutor {
    /// Creates an executor with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Statements received so far, in order.
    #[must_use]
    pub fn statements(&self) -> Vec<String> {
        self.statements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl StatementExecutor for DryRunExecutor {
    async fn execute(&self, sql: &str) -> Result<()> {
        info!("[dry run] {sql}");
        self.statements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sql.to_string());
        Ok(())
    }
}
