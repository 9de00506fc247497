//! DuckDB database backend implementation
//!
//! A target database is a schema inside one DuckDB file. All connections
//! handed out for a file are clones of one root connection so they share the
//! same database instance.

use crate::error::{DbError, DbResult};
use crate::sql::quote_literal;
use crate::traits::{Connector, Database};
use async_trait::async_trait;
use duckdb::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const MEMORY_PATH: &str = ":memory:";

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self::from_connection(conn))
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self::from_connection(conn))
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == MEMORY_PATH {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Open another connection to the same database instance
    pub fn try_clone(&self) -> DbResult<Self> {
        let conn = self
            .lock()?
            .try_clone()
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self::from_connection(conn))
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute SQL synchronously
    fn execute_sync(&self, sql: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        conn.execute(sql, []).map_err(|e| match DbError::from(e) {
            DbError::ExecutionError(msg) => DbError::ExecutionError(format!("{msg}: {sql}")),
            other => other,
        })
    }

    /// Execute batch SQL synchronously
    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql).map_err(DbError::from)
    }

    /// Query a single optional integer synchronously
    fn query_optional_i64_sync(&self, sql: &str) -> DbResult<Option<i64>> {
        let conn = self.lock()?;
        match conn.query_row(sql, [], |row| row.get::<_, Option<i64>>(0)) {
            Ok(value) => Ok(value),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DbError::from(e)),
        }
    }

    /// Check if schema exists synchronously
    fn schema_exists_sync(&self, schema: &str) -> DbResult<bool> {
        let sql = format!(
            "SELECT COUNT(*) FROM information_schema.schemata \
             WHERE catalog_name = current_database() AND schema_name = {}",
            quote_literal(schema)
        );
        let count = self.query_optional_i64_sync(&sql)?.unwrap_or(0);
        Ok(count > 0)
    }
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.execute_sync(sql)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    async fn query_optional_i64(&self, sql: &str) -> DbResult<Option<i64>> {
        self.query_optional_i64_sync(sql)
    }

    async fn schema_exists(&self, schema: &str) -> DbResult<bool> {
        self.schema_exists_sync(schema)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

/// Connector for a target database stored as a schema in a DuckDB file
pub struct DuckDbConnector {
    root: DuckDbBackend,
    database: String,
}

impl DuckDbConnector {
    /// Open the DuckDB file at `path` (or `:memory:`) for target database `database`
    pub fn open(path: &str, database: impl Into<String>) -> DbResult<Self> {
        Ok(Self::with_backend(DuckDbBackend::new(path)?, database))
    }

    /// Build a connector over an already opened backend
    pub fn with_backend(root: DuckDbBackend, database: impl Into<String>) -> Self {
        Self {
            root,
            database: database.into(),
        }
    }

    /// New handle on the underlying DuckDB instance, e.g. for a version store
    pub fn backend(&self) -> DbResult<DuckDbBackend> {
        self.root.try_clone()
    }
}

#[async_trait]
impl Connector for DuckDbConnector {
    async fn admin(&self) -> DbResult<Box<dyn Database>> {
        Ok(Box::new(self.root.try_clone()?))
    }

    async fn target(&self) -> DbResult<Box<dyn Database>> {
        let conn = self.root.try_clone()?;
        if !conn.schema_exists_sync(&self.database)? {
            return Err(DbError::DatabaseNotFound(self.database.clone()));
        }
        conn.execute_batch_sync(&format!("SET schema = {}", quote_literal(&self.database)))?;
        Ok(Box::new(conn))
    }

    fn database_name(&self) -> &str {
        &self.database
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
