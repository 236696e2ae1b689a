//! In-memory implementation of the RecordStore trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use credledger_core::OrgId;

use crate::access::PartitionAccess;
use crate::error::{Result, StoreError};
use crate::traits::{check_distinct_keys, Partition, RecordStore, Versioned, Write};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock; a
/// commit holds the write lock for the whole batch.
pub struct MemoryStore {
    access: PartitionAccess,
    entries: RwLock<HashMap<(Partition, String), Versioned>>,
}

impl MemoryStore {
    /// Create a new empty store with the given partition membership.
    pub fn new(access: PartitionAccess) -> Self {
        Self {
            access,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// The partition membership this store enforces.
    pub fn access(&self) -> &PartitionAccess {
        &self.access
    }

    /// Number of stored keys across all partitions.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(PartitionAccess::default())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get(
        &self,
        org: &OrgId,
        partition: &Partition,
        key: &str,
    ) -> Result<Option<Versioned>> {
        self.access.check(org, partition)?;

        let entries = self
            .entries
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(entries.get(&(partition.clone(), key.to_string())).cloned())
    }

    async fn commit(&self, org: &OrgId, writes: Vec<Write>) -> Result<()> {
        check_distinct_keys(&writes)?;
        for write in &writes {
            self.access.check(org, &write.partition)?;
        }

        let mut entries = self
            .entries
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;

        // Validate every precondition before touching anything
        for write in &writes {
            let current = entries
                .get(&(write.partition.clone(), write.key.clone()))
                .map(|v| v.version);
            if !write.expected.holds(current) {
                return Err(StoreError::Conflict {
                    partition: write.partition.clone(),
                    key: write.key.clone(),
                });
            }
        }

        for write in writes {
            let slot = (write.partition, write.key);
            let version = entries.get(&slot).map_or(1, |v| v.version + 1);
            entries.insert(
                slot,
                Versioned {
                    value: write.value,
                    version,
                },
            );
        }

        Ok(())
    }
}
