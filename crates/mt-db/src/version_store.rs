//! Persisted tracking of the applied schema version.
//!
//! Versions live in `version_meta.current_version`, one row per target
//! database. The table is created the first time a target that exists is
//! observed without it.

use crate::duckdb::DuckDbBackend;
use crate::error::{DbError, DbResult};
use crate::sql::quote_literal;
use crate::traits::Database;
use crate::transaction::Transaction;
use async_trait::async_trait;
use mt_core::Version;

/// Schema holding the tracking table
pub const META_SCHEMA: &str = "version_meta";

const META_DDL: &str = "CREATE SCHEMA IF NOT EXISTS version_meta;
CREATE TABLE IF NOT EXISTS version_meta.current_version (
    target     VARCHAR NOT NULL,
    version    BIGINT NOT NULL,
    updated_at TIMESTAMP NOT NULL DEFAULT now()
);";

/// Read and write the tracked version of one target database
#[async_trait]
pub trait VersionStore: Send + Sync {
    /// Current tracked version, or `None` when the target database does not exist.
    ///
    /// Creates the tracking structure when the database exists without it.
    async fn read_current_version(&self) -> DbResult<Option<Version>>;

    /// Overwrite the tracked version, inside `tx` when one is given.
    ///
    /// When tracking cannot be reached the update is logged and skipped rather
    /// than failing the caller.
    async fn write_version(&self, version: Version, tx: Option<&Transaction<'_>>) -> DbResult<()>;
}

/// [`VersionStore`] backed by the DuckDB file holding the target schema
pub struct DuckDbVersionStore {
    db: DuckDbBackend,
    target: String,
}

impl DuckDbVersionStore {
    /// Track versions for `target` using connection `db`
    pub fn new(db: DuckDbBackend, target: impl Into<String>) -> Self {
        Self {
            db,
            target: target.into(),
        }
    }

    async fn run(&self, tx: Option<&Transaction<'_>>, sql: &str) -> DbResult<usize> {
        match tx {
            Some(tx) => tx.execute(sql).await,
            None => self.db.execute(sql).await,
        }
    }

    async fn run_batch(&self, tx: Option<&Transaction<'_>>, sql: &str) -> DbResult<()> {
        match tx {
            Some(tx) => tx.execute_batch(sql).await,
            None => self.db.execute_batch(sql).await,
        }
    }

    /// Make sure the target exists and the tracking table is present
    async fn ensure_storage(&self, tx: Option<&Transaction<'_>>) -> DbResult<()> {
        if !self.db.schema_exists(&self.target).await? {
            return Err(DbError::TrackingUnavailable(format!(
                "database '{}' does not exist",
                self.target
            )));
        }
        if !self.db.schema_exists(META_SCHEMA).await? {
            log::info!("Meta storage schema not found: {META_SCHEMA}, initializing");
        }
        self.run_batch(tx, META_DDL).await
    }

    async fn upsert(&self, version: Version, tx: Option<&Transaction<'_>>) -> DbResult<()> {
        let target = quote_literal(&self.target);
        let updated = self
            .run(
                tx,
                &format!(
                    "UPDATE version_meta.current_version \
                     SET version = {version}, updated_at = now() WHERE target = {target}"
                ),
            )
            .await?;
        if updated == 0 {
            self.run(
                tx,
                &format!(
                    "INSERT INTO version_meta.current_version (target, version) \
                     VALUES ({target}, {version})"
                ),
            )
            .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl VersionStore for DuckDbVersionStore {
    async fn read_current_version(&self) -> DbResult<Option<Version>> {
        match self.ensure_storage(None).await {
            Err(DbError::TrackingUnavailable(reason)) => {
                log::info!("Version tracking not initialized: {reason}");
                return Ok(None);
            }
            result => result?,
        }

        let sql = format!(
            "SELECT version FROM version_meta.current_version WHERE target = {}",
            quote_literal(&self.target)
        );
        match self.db.query_optional_i64(&sql).await? {
            Some(raw) => {
                let version = Version::try_from(raw).map_err(|_| {
                    DbError::Internal(format!(
                        "tracked version {raw} for '{}' is out of range",
                        self.target
                    ))
                })?;
                Ok(Some(version))
            }
            None => {
                // The database exists, so its init migration has run
                self.upsert(0, None).await?;
                Ok(Some(0))
            }
        }
    }

    async fn write_version(&self, version: Version, tx: Option<&Transaction<'_>>) -> DbResult<()> {
        match self.ensure_storage(tx).await {
            Err(DbError::TrackingUnavailable(reason)) => {
                log::warn!("Skipping tracking of version {version}: {reason}");
                return Ok(());
            }
            result => result?,
        }

        self.upsert(version, tx).await?;
        log::info!("Meta version for '{}' updated to: {version}", self.target);
        Ok(())
    }
}

#[cfg(test)]
#[path = "version_store_test.rs"]
mod tests;
