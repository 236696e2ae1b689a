//! Credential lifecycle status.
//!
//! ```text
//! Issued ──share──▶ Shared ──share──▶ Shared
//!   │                 │
//!   └────revoke───────┴──────▶ Revoked (terminal)
//! ```
//!
//! Status only moves forward. The set of organizations a credential was
//! disclosed to only grows; revocation flips the status and leaves the set
//! alone as an audit trail.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::TransitionError;
use crate::types::OrgId;

/// The lifecycle state of a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CredentialStatus {
    /// Created by the issuer, not yet disclosed to anyone.
    Issued,
    /// Disclosed to at least one organization.
    Shared,
    /// Withdrawn by the issuer (terminal).
    Revoked,
}

impl CredentialStatus {
    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Revoked)
    }

    /// Whether the credential has ever been disclosed.
    ///
    /// A revoked credential may or may not have been; callers must check the
    /// disclosure set for that.
    pub fn is_shared(&self) -> bool {
        matches!(self, Self::Shared)
    }

    /// Whether moving from `self` to `next` is a legal forward step.
    pub fn can_transition_to(&self, next: CredentialStatus) -> bool {
        matches!(
            (self, next),
            (Self::Issued, Self::Shared)
                | (Self::Shared, Self::Shared)
                | (Self::Issued, Self::Revoked)
                | (Self::Shared, Self::Revoked)
        )
    }

    /// Validate a transition and return the new status.
    pub fn transition(self, next: CredentialStatus) -> Result<CredentialStatus, TransitionError> {
        if self.is_terminal() {
            return Err(TransitionError::Terminal(self));
        }
        if !self.can_transition_to(next) {
            return Err(TransitionError::Invalid {
                from: self,
                to: next,
            });
        }
        Ok(next)
    }
}

impl fmt::Display for CredentialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Issued => "Issued",
            Self::Shared => "Shared",
            Self::Revoked => "Revoked",
        };
        f.write_str(s)
    }
}

/// Add `org` to a disclosure set, advancing the status on first disclosure.
///
/// Returns `true` if the organization was newly added. Re-disclosing to an
/// organization already in the set changes nothing.
pub fn apply_disclosure(
    status: &mut CredentialStatus,
    disclosed_to: &mut BTreeSet<OrgId>,
    org: &OrgId,
) -> Result<bool, TransitionError> {
    if status.is_terminal() {
        return Err(TransitionError::Terminal(*status));
    }
    if disclosed_to.contains(org) {
        return Ok(false);
    }
    *status = status.transition(CredentialStatus::Shared)?;
    disclosed_to.insert(org.clone());
    Ok(true)
}

/// Revoke, keeping the disclosure set as it is.
pub fn apply_revocation(status: &mut CredentialStatus) -> Result<(), TransitionError> {
    *status = status.transition(CredentialStatus::Revoked)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        assert!(CredentialStatus::Issued.can_transition_to(CredentialStatus::Shared));
        assert!(CredentialStatus::Issued.can_transition_to(CredentialStatus::Revoked));
        assert!(CredentialStatus::Shared.can_transition_to(CredentialStatus::Shared));
        assert!(CredentialStatus::Shared.can_transition_to(CredentialStatus::Revoked));
    }

    #[test]
    fn test_no_backward_transitions() {
        assert!(!CredentialStatus::Shared.can_transition_to(CredentialStatus::Issued));
        assert!(!CredentialStatus::Revoked.can_transition_to(CredentialStatus::Shared));
        assert!(!CredentialStatus::Revoked.can_transition_to(CredentialStatus::Issued));
    }

    #[test]
    fn test_revoked_is_terminal() {
        let err = CredentialStatus::Revoked
            .transition(CredentialStatus::Revoked)
            .unwrap_err();
        assert_eq!(err, TransitionError::Terminal(CredentialStatus::Revoked));
    }

    #[test]
    fn test_disclosure_is_idempotent() {
        let mut status = CredentialStatus::Issued;
        let mut set = BTreeSet::new();
        let org = OrgId::new("Org2MSP");

        assert!(apply_disclosure(&mut status, &mut set, &org).unwrap());
        assert!(!apply_disclosure(&mut status, &mut set, &org).unwrap());

        assert_eq!(status, CredentialStatus::Shared);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_revocation_keeps_disclosures() {
        let mut status = CredentialStatus::Issued;
        let mut set = BTreeSet::new();
        let org = OrgId::new("Org2MSP");

        apply_disclosure(&mut status, &mut set, &org).unwrap();
        apply_revocation(&mut status).unwrap();

        assert_eq!(status, CredentialStatus::Revoked);
        assert!(set.contains(&org));
        assert!(apply_disclosure(&mut status, &mut set, &OrgId::new("Org3MSP")).is_err());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(CredentialStatus::Shared.to_string(), "Shared");
    }

    fn rank(status: CredentialStatus) -> u8 {
        match status {
            CredentialStatus::Issued => 0,
            CredentialStatus::Shared => 1,
            CredentialStatus::Revoked => 2,
        }
    }

    proptest::proptest! {
        // None revokes, Some(n) discloses to org n
        #[test]
        fn test_status_and_set_only_grow(ops in proptest::collection::vec(proptest::option::of(0u8..4), 0..16)) {
            let mut status = CredentialStatus::Issued;
            let mut set = BTreeSet::new();

            for op in ops {
                let before_rank = rank(status);
                let before_set = set.clone();
                let result = match op {
                    Some(n) => apply_disclosure(&mut status, &mut set, &OrgId::new(format!("Org{n}MSP"))).map(|_| ()),
                    None => apply_revocation(&mut status),
                };

                proptest::prop_assert!(rank(status) >= before_rank);
                proptest::prop_assert!(set.is_superset(&before_set));
                if result.is_err() {
                    proptest::prop_assert_eq!(status, CredentialStatus::Revoked);
                    proptest::prop_assert_eq!(&set, &before_set);
                }
            }
        }
    }
}
