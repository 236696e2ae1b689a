//! Partition membership.
//!
//! Mirrors the runtime's collection policy: each private partition has a
//! member set, and only members may read or write it. The shared tier is
//! open to every organization.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use credledger_core::OrgId;

use crate::error::{Result, StoreError};
use crate::traits::Partition;

/// Member sets of the configured private partitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionAccess {
    members: BTreeMap<String, BTreeSet<OrgId>>,
}

impl PartitionAccess {
    /// No private partitions at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a partition with the given members.
    pub fn with_partition(
        mut self,
        name: impl Into<String>,
        members: impl IntoIterator<Item = OrgId>,
    ) -> Self {
        self.members
            .entry(name.into())
            .or_default()
            .extend(members);
        self
    }

    /// Add one member to a partition, creating the partition if needed.
    pub fn grant(&mut self, name: impl Into<String>, org: OrgId) {
        self.members.entry(name.into()).or_default().insert(org);
    }

    pub fn has_partition(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    /// Members of a partition, if configured.
    pub fn members(&self, name: &str) -> Option<&BTreeSet<OrgId>> {
        self.members.get(name)
    }

    /// Names of all configured private partitions.
    pub fn partitions(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    /// Check that `org` may touch `partition`.
    pub fn check(&self, org: &OrgId, partition: &Partition) -> Result<()> {
        match partition {
            Partition::Shared => Ok(()),
            Partition::Private(name) => {
                let members = self
                    .members
                    .get(name)
                    .ok_or_else(|| StoreError::UnknownPartition(name.clone()))?;
                if members.contains(org) {
                    Ok(())
                } else {
                    Err(StoreError::AccessDenied {
                        org: org.clone(),
                        partition: partition.clone(),
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn access() -> PartitionAccess {
        PartitionAccess::new().with_partition("credPDC", [OrgId::new("Org1MSP")])
    }

    #[test]
    fn test_shared_is_open() {
        assert!(access().check(&OrgId::new("Anyone"), &Partition::Shared).is_ok());
    }

    #[test]
    fn test_member_allowed() {
        let partition = Partition::private("credPDC");
        assert!(access().check(&OrgId::new("Org1MSP"), &partition).is_ok());
    }

    #[test]
    fn test_non_member_denied() {
        let partition = Partition::private("credPDC");
        assert!(matches!(
            access().check(&OrgId::new("Org2MSP"), &partition),
            Err(StoreError::AccessDenied { .. })
        ));
    }

    #[test]
    fn test_unknown_partition() {
        let partition = Partition::private("nope");
        assert!(matches!(
            access().check(&OrgId::new("Org1MSP"), &partition),
            Err(StoreError::UnknownPartition(_))
        ));
    }

    #[test]
    fn test_grant_adds_member() {
        let mut access = access();
        access.grant("credPDC", OrgId::new("Org2MSP"));
        assert_eq!(access.members("credPDC").map(|m| m.len()), Some(2));
    }
}
