//! Explicit transaction handle over a [`Database`] connection

use crate::error::{DbError, DbResult};
use crate::traits::Database;

/// An open `BEGIN` on a borrowed connection.
///
/// Callers must finish it with [`commit`](Self::commit) or
/// [`rollback`](Self::rollback). Dropping an open handle only logs a warning;
/// the transaction stays open on the connection and the next `BEGIN` on it
/// fails.
pub struct Transaction<'a> {
    db: &'a dyn Database,
    finished: bool,
}

impl<'a> Transaction<'a> {
    /// Start a transaction on `db`
    pub async fn begin(db: &'a dyn Database) -> DbResult<Transaction<'a>> {
        db.execute_batch("BEGIN TRANSACTION")
            .await
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;
        Ok(Self {
            db,
            finished: false,
        })
    }

    /// Execute one statement inside the transaction
    pub async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.db.execute(sql).await
    }

    /// Execute multiple statements inside the transaction
    pub async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.db.execute_batch(sql).await
    }

    /// Commit, rolling back if the commit itself fails
    pub async fn commit(mut self) -> DbResult<()> {
        self.finished = true;
        if let Err(commit_err) = self.db.execute_batch("COMMIT").await {
            let _ = self.db.execute_batch("ROLLBACK").await;
            return Err(DbError::TransactionError(format!(
                "COMMIT failed: {commit_err}"
            )));
        }
        Ok(())
    }

    /// Discard everything done inside the transaction
    pub async fn rollback(mut self) -> DbResult<()> {
        self.finished = true;
        self.db
            .execute_batch("ROLLBACK")
            .await
            .map_err(|e| DbError::TransactionError(format!("ROLLBACK failed: {e}")))
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            log::warn!("Transaction dropped without COMMIT or ROLLBACK");
        }
    }
}

#[cfg(test)]
#[path = "transaction_test.rs"]
mod tests;
