//! Error types for the store module.

use credledger_core::OrgId;
use thiserror::Error;

use crate::traits::Partition;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The organization is not a member of the partition.
    #[error("organization {org} may not access partition {partition}")]
    AccessDenied { org: OrgId, partition: Partition },

    /// The partition is not configured in this store.
    #[error("unknown partition: {0}")]
    UnknownPartition(String),

    /// A write's precondition no longer holds; nothing was applied.
    #[error("write conflict on {partition}/{key}")]
    Conflict { partition: Partition, key: String },

    /// Invalid data in storage or in a write batch.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// A lock guarding the backend was poisoned.
    #[error("store lock poisoned: {0}")]
    LockPoisoned(String),

    /// A blocking task could not be joined.
    #[error("blocking task failed: {0}")]
    Task(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
