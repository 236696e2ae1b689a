//! Integrity digest over a credential payload.
//!
//! BLAKE3 over a domain tag followed by the payload's JSON encoding. Field
//! order is fixed by the struct definition, so the encoding is stable.

use std::fmt;

use crate::codec::encode;
use crate::record::CredentialPayload;

const DIGEST_DOMAIN: &[u8] = b"credledger-payload-v0:";

/// A 32-byte BLAKE3 digest of a [`CredentialPayload`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PayloadDigest(pub [u8; 32]);

impl PayloadDigest {
    /// Digest a payload.
    pub fn of_payload(payload: &CredentialPayload) -> Self {
        // A plain struct of strings always serializes.
        let bytes = encode(payload).unwrap_or_default();
        let mut hasher = blake3::Hasher::new();
        hasher.update(DIGEST_DOMAIN);
        hasher.update(&bytes);
        Self(*hasher.finalize().as_bytes())
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| hex::FromHexError::InvalidStringLength)?;
        Ok(Self(arr))
    }

    /// Compare against a hex digest, ignoring case.
    pub fn matches_hex(&self, s: &str) -> bool {
        Self::from_hex(&s.to_ascii_lowercase()).is_ok_and(|other| other == *self)
    }
}

impl fmt::Debug for PayloadDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PayloadDigest({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for PayloadDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CredentialId;

    fn payload(score: &str) -> CredentialPayload {
        CredentialPayload {
            id: CredentialId::new("cred-001"),
            subject_name: "Asha Patel".into(),
            issuer_org: "UniA".into(),
            program: "B.Tech".into(),
            score: score.into(),
            issue_date: "2025-10-01".into(),
        }
    }

    #[test]
    fn test_digest_deterministic() {
        assert_eq!(
            PayloadDigest::of_payload(&payload("8.8")),
            PayloadDigest::of_payload(&payload("8.8"))
        );
    }

    #[test]
    fn test_digest_changes_with_payload() {
        assert_ne!(
            PayloadDigest::of_payload(&payload("8.8")),
            PayloadDigest::of_payload(&payload("8.9"))
        );
    }

    #[test]
    fn test_matches_hex_ignores_case() {
        let digest = PayloadDigest::of_payload(&payload("8.8"));
        assert!(digest.matches_hex(&digest.to_hex().to_uppercase()));
        assert!(!digest.matches_hex("hash123"));
    }
}
