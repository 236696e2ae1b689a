//! SQLite implementation of the RecordStore trait.
//!
//! The persistent backend. It uses rusqlite with bundled SQLite, wrapped in
//! async via tokio::spawn_blocking. A commit runs inside one SQLite
//! transaction, so a failed precondition rolls the whole batch back.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use rusqlite::{params, Connection, OptionalExtension};

use credledger_core::OrgId;

use crate::access::PartitionAccess;
use crate::error::{Result, StoreError};
use crate::migration::{self, now_millis};
use crate::traits::{check_distinct_keys, Partition, RecordStore, Versioned, Write};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
    access: PartitionAccess,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>, access: PartitionAccess) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            access,
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory(access: PartitionAccess) -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            access,
        })
    }

    /// The partition membership this store enforces.
    pub fn access(&self) -> &PartitionAccess {
        &self.access
    }

    /// Run `f` against the connection on the blocking pool.
    async fn blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
            f(&mut *conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

fn read_version(conn: &Connection, partition: &str, key: &str) -> Result<Option<u64>> {
    let version: Option<i64> = conn
        .query_row(
            "SELECT version FROM records WHERE partition = ?1 AND key = ?2",
            params![partition, key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(version.map(|v| v as u64))
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn get(
        &self,
        org: &OrgId,
        partition: &Partition,
        key: &str,
    ) -> Result<Option<Versioned>> {
        self.access.check(org, partition)?;

        let partition = partition.storage_name();
        let key = key.to_string();

        self.blocking(move |conn| {
            let row: Option<(Vec<u8>, i64)> = conn
                .query_row(
                    "SELECT value, version FROM records WHERE partition = ?1 AND key = ?2",
                    params![partition, key],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;

            Ok(row.map(|(value, version)| Versioned {
                value: Bytes::from(value),
                version: version as u64,
            }))
        })
        .await
    }

    async fn commit(&self, org: &OrgId, writes: Vec<Write>) -> Result<()> {
        check_distinct_keys(&writes)?;
        for write in &writes {
            self.access.check(org, &write.partition)?;
        }

        self.blocking(move |conn| {
            let tx = conn.transaction()?;
            let now = now_millis();

            for write in &writes {
                let partition = write.partition.storage_name();
                let current = read_version(&tx, &partition, &write.key)?;

                if !write.expected.holds(current) {
                    // Dropping the transaction rolls back earlier rows
                    return Err(StoreError::Conflict {
                        partition: write.partition.clone(),
                        key: write.key.clone(),
                    });
                }

                let next = current.map_or(1, |v| v + 1);
                tx.execute(
                    "INSERT INTO records (partition, key, value, version, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT(partition, key) DO UPDATE SET
                        value = excluded.value,
                        version = excluded.version,
                        updated_at = excluded.updated_at",
                    params![partition, write.key, write.value.as_ref(), next as i64, now],
                )?;
            }

            tx.commit()?;
            tracing::debug!(writes = writes.len(), "sqlite batch committed");
            Ok(())
        })
        .await
    }
}
