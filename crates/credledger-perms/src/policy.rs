//! Per-operation authorization.
//!
//! Each ledger operation is gated by exactly one [`Requirement`]. Most are
//! fixed (only the issuer may issue or revoke); verification depends on the
//! record's disclosure set, which the engine passes in after loading it.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use credledger_core::OrgId;

use crate::caller::Caller;
use crate::error::{PermsError, Result};

/// The operations the ledger exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Issue,
    Share,
    StoreForVerifier,
    Verify,
    Revoke,
    Read,
    Exists,
    History,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operation::Issue => "issue",
            Operation::Share => "share",
            Operation::StoreForVerifier => "store for verifier",
            Operation::Verify => "verify",
            Operation::Revoke => "revoke",
            Operation::Read => "read",
            Operation::Exists => "check existence",
            Operation::History => "read history",
        };
        f.write_str(s)
    }
}

/// What a caller must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement<'a> {
    /// Caller's org is the designated issuer.
    IssuerOrg,
    /// Caller's org is the designated verifier.
    VerifierOrg,
    /// Caller carries the subject role attribute, whatever its org.
    SubjectRole,
    /// Caller's org is in the credential's disclosure set.
    DisclosedTo(&'a BTreeSet<OrgId>),
    /// Caller's org owns the partition being read.
    OwnerOf(&'a OrgId),
}

/// The organizations and role that the rules refer to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
    pub issuer_org: OrgId,
    pub verifier_org: OrgId,
    /// Certificate attribute carrying the caller's role.
    pub role_attribute: String,
    /// Role value that identifies the credential subject.
    pub subject_role: String,
}

impl AccessPolicy {
    /// Fixed caller requirement of an operation, if it has one.
    ///
    /// `Verify` and `Read` depend on topology and loaded state. `Exists` and
    /// `History` are open to every caller.
    pub fn fixed_requirement(operation: Operation) -> Option<Requirement<'static>> {
        match operation {
            Operation::Issue | Operation::Revoke => Some(Requirement::IssuerOrg),
            Operation::Share => Some(Requirement::SubjectRole),
            Operation::StoreForVerifier => Some(Requirement::VerifierOrg),
            Operation::Verify | Operation::Read | Operation::Exists | Operation::History => None,
        }
    }

    /// Check a fixed requirement. Operations without one pass.
    pub fn authorize(&self, operation: Operation, caller: &Caller) -> Result<()> {
        match Self::fixed_requirement(operation) {
            Some(requirement) => self.check(operation, caller, requirement),
            None => Ok(()),
        }
    }

    /// Check one requirement.
    pub fn check(
        &self,
        operation: Operation,
        caller: &Caller,
        requirement: Requirement<'_>,
    ) -> Result<()> {
        let denied = |reason: String| PermsError::PermissionDenied {
            org: caller.org.clone(),
            operation,
            reason,
        };

        match requirement {
            Requirement::IssuerOrg if caller.org == self.issuer_org => Ok(()),
            Requirement::IssuerOrg => Err(denied(format!("only {} may", self.issuer_org))),

            Requirement::VerifierOrg if caller.org == self.verifier_org => Ok(()),
            Requirement::VerifierOrg => Err(denied(format!("only {} may", self.verifier_org))),

            Requirement::SubjectRole
                if caller.has_attribute(&self.role_attribute, &self.subject_role) =>
            {
                Ok(())
            }
            Requirement::SubjectRole => Err(PermsError::MissingRole {
                operation,
                attribute: self.role_attribute.clone(),
                expected: self.subject_role.clone(),
            }),

            Requirement::DisclosedTo(set) if set.contains(&caller.org) => Ok(()),
            Requirement::DisclosedTo(_) => {
                Err(denied("credential was not disclosed to this organization".into()))
            }

            Requirement::OwnerOf(owner) if caller.org == *owner => Ok(()),
            Requirement::OwnerOf(owner) => Err(denied(format!("partition belongs to {}", owner))),
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            issuer_org: OrgId::new("Org1MSP"),
            verifier_org: OrgId::new("Org2MSP"),
            role_attribute: "role".to_string(),
            subject_role: "student".to_string(),
        }
    }
}
