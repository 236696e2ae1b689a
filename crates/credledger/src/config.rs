//! Engine configuration.
//!
//! One engine, two storage topologies:
//!
//! - [`Topology::PublicIndex`]: a summary per credential in the shared tier,
//!   the personal fields in one private partition that both the issuer and
//!   the verifier belong to. Verification is gated by the summary's
//!   disclosure set.
//! - [`Topology::TwoPartition`]: each organization owns a private partition.
//!   The verifier keeps its own replica, written by `store_for_verifier`.

use serde::{Deserialize, Serialize};

use credledger_core::OrgId;
use credledger_perms::AccessPolicy;
use credledger_store::{Partition, PartitionAccess};

use crate::error::{EngineError, Result};

/// Where credentials live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Topology {
    /// Shared summary plus one private partition.
    PublicIndex { private_partition: String },

    /// One private partition per organization.
    TwoPartition {
        issuer_partition: String,
        verifier_partition: String,
        /// Also publish a summary to the shared tier.
        #[serde(default)]
        publish_summary: bool,
    },
}

impl Topology {
    pub fn name(&self) -> &'static str {
        match self {
            Topology::PublicIndex { .. } => "public-index",
            Topology::TwoPartition { .. } => "two-partition",
        }
    }
}

/// Configuration for the Engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// The only organization that may issue and revoke.
    pub issuer_org: OrgId,
    /// The organization that verifies disclosed credentials.
    pub verifier_org: OrgId,
    /// Certificate attribute carrying the caller's role.
    pub role_attribute: String,
    /// Role value that may share a credential.
    pub subject_role: String,
    /// Storage topology.
    pub topology: Topology,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            issuer_org: OrgId::new("Org1MSP"),
            verifier_org: OrgId::new("Org2MSP"),
            role_attribute: "role".to_string(),
            subject_role: "student".to_string(),
            topology: Topology::PublicIndex {
                private_partition: "credPDC".to_string(),
            },
        }
    }
}

impl EngineConfig {
    /// Defaults with the two-partition topology.
    pub fn two_partition() -> Self {
        Self {
            topology: Topology::TwoPartition {
                issuer_partition: "Org1PDC".to_string(),
                verifier_partition: "Org2PDC".to_string(),
                publish_summary: false,
            },
            ..Self::default()
        }
    }

    /// Load and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.issuer_org.is_empty() || self.verifier_org.is_empty() {
            return Err(EngineError::Config("organization ids must not be empty".into()));
        }
        if self.issuer_org == self.verifier_org {
            return Err(EngineError::Config(
                "issuer and verifier must be different organizations".into(),
            ));
        }
        if self.role_attribute.trim().is_empty() || self.subject_role.trim().is_empty() {
            return Err(EngineError::Config("subject role must be configured".into()));
        }
        match &self.topology {
            Topology::PublicIndex { private_partition } if private_partition.trim().is_empty() => {
                Err(EngineError::Config("private partition name is empty".into()))
            }
            Topology::TwoPartition {
                issuer_partition,
                verifier_partition,
                ..
            } => {
                if issuer_partition.trim().is_empty() || verifier_partition.trim().is_empty() {
                    return Err(EngineError::Config("partition names must not be empty".into()));
                }
                if issuer_partition == verifier_partition {
                    return Err(EngineError::Config(
                        "issuer and verifier partitions must differ".into(),
                    ));
                }
                Ok(())
            }
            Topology::PublicIndex { .. } => Ok(()),
        }
    }

    /// The authorization policy these settings describe.
    pub fn policy(&self) -> AccessPolicy {
        AccessPolicy {
            issuer_org: self.issuer_org.clone(),
            verifier_org: self.verifier_org.clone(),
            role_attribute: self.role_attribute.clone(),
            subject_role: self.subject_role.clone(),
        }
    }

    /// Partition where the issuer keeps credentials.
    pub fn issuer_partition(&self) -> Partition {
        match &self.topology {
            Topology::PublicIndex { private_partition } => Partition::private(private_partition),
            Topology::TwoPartition {
                issuer_partition, ..
            } => Partition::private(issuer_partition),
        }
    }

    /// Partition membership a store must enforce for this topology.
    ///
    /// Public-index: the private partition is readable by both issuer and
    /// verifier; disclosure is enforced by the engine. Two-partition: each
    /// partition belongs to its organization alone.
    pub fn partition_access(&self) -> PartitionAccess {
        match &self.topology {
            Topology::PublicIndex { private_partition } => PartitionAccess::new().with_partition(
                private_partition.clone(),
                [self.issuer_org.clone(), self.verifier_org.clone()],
            ),
            Topology::TwoPartition {
                issuer_partition,
                verifier_partition,
                ..
            } => PartitionAccess::new()
                .with_partition(issuer_partition.clone(), [self.issuer_org.clone()])
                .with_partition(verifier_partition.clone(), [self.verifier_org.clone()]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
        assert!(EngineConfig::two_partition().validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = EngineConfig::from_json(
            r#"{
                "verifier_org": "EmployerMSP",
                "topology": {
                    "kind": "two_partition",
                    "issuer_partition": "UniPDC",
                    "verifier_partition": "EmployerPDC",
                    "publish_summary": true
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.issuer_org, OrgId::new("Org1MSP"));
        assert_eq!(config.verifier_org, OrgId::new("EmployerMSP"));
        assert_eq!(config.topology.name(), "two-partition");
    }

    #[test]
    fn test_same_org_rejected() {
        let config = EngineConfig {
            verifier_org: OrgId::new("Org1MSP"),
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_same_partition_rejected() {
        let config = EngineConfig {
            topology: Topology::TwoPartition {
                issuer_partition: "pdc".into(),
                verifier_partition: "pdc".into(),
                publish_summary: false,
            },
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_json_rejected() {
        assert!(matches!(
            EngineConfig::from_json("{\"topology\": 5}"),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn test_partition_access_per_topology() {
        let public = EngineConfig::default().partition_access();
        assert_eq!(public.members("credPDC").map(|m| m.len()), Some(2));

        let split = EngineConfig::two_partition().partition_access();
        let verifier = OrgId::new("Org2MSP");
        assert!(split
            .check(&verifier, &Partition::private("Org1PDC"))
            .is_err());
        assert!(split
            .check(&verifier, &Partition::private("Org2PDC"))
            .is_ok());
    }
}
