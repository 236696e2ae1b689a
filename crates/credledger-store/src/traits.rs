//! RecordStore trait: the abstract interface to partitioned key-value state.
//!
//! The engine only ever sees this trait. Ordering, replication and
//! commit durability belong to whatever sits behind it.

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use credledger_core::OrgId;

use crate::error::{Result, StoreError};

/// A storage tier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Partition {
    /// Visible to every organization.
    Shared,
    /// Visible only to the partition's configured members.
    Private(String),
}

impl Partition {
    /// A named private partition.
    pub fn private(name: impl Into<String>) -> Self {
        Partition::Private(name.into())
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, Partition::Shared)
    }

    /// Stable name used as a storage column.
    pub fn storage_name(&self) -> String {
        match self {
            Partition::Shared => "shared".to_string(),
            Partition::Private(name) => format!("private:{}", name),
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Partition::Shared => f.write_str("shared"),
            Partition::Private(name) => f.write_str(name),
        }
    }
}

/// A stored value with its version.
///
/// Versions start at 1 and increase by one on every write to the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned {
    pub value: Bytes,
    pub version: u64,
}

/// What a write expects to find under its key at commit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// No expectation (blind write).
    Any,
    /// The key must not exist.
    Absent,
    /// The key must still be at this version.
    Version(u64),
}

impl Precondition {
    /// Check against the version currently stored (if any).
    pub fn holds(&self, current: Option<u64>) -> bool {
        match (self, current) {
            (Precondition::Any, _) => true,
            (Precondition::Absent, None) => true,
            (Precondition::Absent, Some(_)) => false,
            (Precondition::Version(expected), Some(actual)) => *expected == actual,
            (Precondition::Version(_), None) => false,
        }
    }
}

/// One write in a commit batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Write {
    pub partition: Partition,
    pub key: String,
    pub value: Bytes,
    pub expected: Precondition,
}

impl Write {
    /// Create a key that must not exist yet.
    pub fn insert(partition: Partition, key: impl Into<String>, value: impl Into<Bytes>) -> Self {
        Self {
            partition,
            key: key.into(),
            value: value.into(),
            expected: Precondition::Absent,
        }
    }

    /// Replace a value read at `version`.
    pub fn update(
        partition: Partition,
        key: impl Into<String>,
        value: impl Into<Bytes>,
        version: u64,
    ) -> Self {
        Self {
            partition,
            key: key.into(),
            value: value.into(),
            expected: Precondition::Version(version),
        }
    }

    /// Write regardless of what is there.
    pub fn upsert(partition: Partition, key: impl Into<String>, value: impl Into<Bytes>) -> Self {
        Self {
            partition,
            key: key.into(),
            value: value.into(),
            expected: Precondition::Any,
        }
    }
}

/// The RecordStore trait: async interface to partitioned state.
///
/// # Design Notes
///
/// - **Access control**: every call names the calling organization. Backends
///   refuse partitions the organization is not a member of with
///   [`StoreError::AccessDenied`].
/// - **Atomic commits**: a batch either applies completely or not at all.
/// - **Per-key serializability**: a write whose [`Precondition`] no longer
///   holds fails the whole batch with [`StoreError::Conflict`], so two
///   racing read-modify-write invocations cannot both commit.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Read a key on behalf of `org`.
    async fn get(&self, org: &OrgId, partition: &Partition, key: &str)
        -> Result<Option<Versioned>>;

    /// Apply a batch of writes on behalf of `org`, atomically.
    async fn commit(&self, org: &OrgId, writes: Vec<Write>) -> Result<()>;
}

/// Extension trait for common store patterns.
pub trait StoreExt: RecordStore {
    /// Read a key, treating a partition the caller cannot see as empty.
    fn get_visible(
        &self,
        org: &OrgId,
        partition: &Partition,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<Versioned>>> + Send;

    /// Whether a key is visible to `org`.
    fn contains(
        &self,
        org: &OrgId,
        partition: &Partition,
        key: &str,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;

    /// Blind single-key write.
    fn put(
        &self,
        org: &OrgId,
        partition: Partition,
        key: &str,
        value: Bytes,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

impl<S: RecordStore + ?Sized> StoreExt for S {
    async fn get_visible(
        &self,
        org: &OrgId,
        partition: &Partition,
        key: &str,
    ) -> Result<Option<Versioned>> {
        match self.get(org, partition, key).await {
            Err(StoreError::AccessDenied { .. }) => {
                tracing::debug!(%org, %partition, key, "partition not visible, treating key as absent");
                Ok(None)
            }
            other => other,
        }
    }

    async fn contains(&self, org: &OrgId, partition: &Partition, key: &str) -> Result<bool> {
        Ok(self.get_visible(org, partition, key).await?.is_some())
    }

    async fn put(&self, org: &OrgId, partition: Partition, key: &str, value: Bytes) -> Result<()> {
        self.commit(org, vec![Write::upsert(partition, key, value)])
            .await
    }
}

/// Reject batches that write the same key twice.
pub(crate) fn check_distinct_keys(writes: &[Write]) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for write in writes {
        if !seen.insert((&write.partition, write.key.as_str())) {
            return Err(StoreError::InvalidData(format!(
                "batch writes {}/{} more than once",
                write.partition, write.key
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_holds() {
        assert!(Precondition::Any.holds(None));
        assert!(Precondition::Any.holds(Some(4)));
        assert!(Precondition::Absent.holds(None));
        assert!(!Precondition::Absent.holds(Some(1)));
        assert!(Precondition::Version(2).holds(Some(2)));
        assert!(!Precondition::Version(2).holds(Some(3)));
        assert!(!Precondition::Version(2).holds(None));
    }

    #[test]
    fn test_partition_storage_names() {
        assert_eq!(Partition::Shared.storage_name(), "shared");
        assert_eq!(Partition::private("credPDC").storage_name(), "private:credPDC");
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let writes = vec![
            Write::upsert(Partition::Shared, "k", Bytes::from_static(b"1")),
            Write::upsert(Partition::Shared, "k", Bytes::from_static(b"2")),
        ];
        assert!(check_distinct_keys(&writes).is_err());
    }
}
