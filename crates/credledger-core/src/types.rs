//! Strong type definitions for the Credential Ledger.
//!
//! Identifiers are newtypes over `String` so a credential id can never be
//! passed where an organization id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique key of a credential, immutable once issued.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialId(String);

impl CredentialId {
    /// Create a new credential id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is empty (never valid for a stored credential).
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CredentialId({})", self.0)
    }
}

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CredentialId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CredentialId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identifier of an organization (a trust domain such as `Org1MSP`).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrgId(String);

impl OrgId {
    /// Create a new organization id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is empty.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OrgId({})", self.0)
    }
}

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrgId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for OrgId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_id_display() {
        let id = CredentialId::new("cred-001");
        assert_eq!(format!("{}", id), "cred-001");
        assert_eq!(format!("{:?}", id), "CredentialId(cred-001)");
    }

    #[test]
    fn test_blank_ids_are_empty() {
        assert!(CredentialId::new("").is_empty());
        assert!(CredentialId::new("   ").is_empty());
        assert!(!OrgId::new("Org1MSP").is_empty());
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let org = OrgId::new("Org2MSP");
        assert_eq!(serde_json::to_string(&org).unwrap(), "\"Org2MSP\"");
    }
}
