//! Database and connector trait definitions

use crate::error::DbResult;
use async_trait::async_trait;

/// A single database connection
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute one SQL statement, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute multiple SQL statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Run a query returning at most one integer; `None` when it returns no rows
    async fn query_optional_i64(&self, sql: &str) -> DbResult<Option<i64>>;

    /// Check if a schema exists
    async fn schema_exists(&self, schema: &str) -> DbResult<bool>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}

/// Hands out connections for one target database.
///
/// The administrative connection works outside the target database (it is
/// used to create or drop it) and runs in autocommit mode. The target
/// connection is scoped to the target database.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open an administrative connection
    async fn admin(&self) -> DbResult<Box<dyn Database>>;

    /// Open a connection scoped to the target database.
    ///
    /// Fails with [`crate::DbError::DatabaseNotFound`] when it does not exist.
    async fn target(&self) -> DbResult<Box<dyn Database>>;

    /// Name of the target database
    fn database_name(&self) -> &str;
}
