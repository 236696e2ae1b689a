//! Credential records and their projections.
//!
//! A [`CredentialRecord`] is the full credential. It splits into a
//! [`CredentialSummary`] (status metadata, safe for the shared tier) and a
//! [`CredentialPayload`] (the personal fields, private partitions only).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::digest::PayloadDigest;
use crate::error::{CoreError, TransitionError};
use crate::status::{apply_disclosure, apply_revocation, CredentialStatus};
use crate::types::{CredentialId, OrgId};

/// Everything needed to issue a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRequest {
    pub id: CredentialId,
    /// Opaque holder identifier (roll number, hash, ...).
    pub subject_id: String,
    pub subject_name: String,
    /// Descriptive name of the issuing institution.
    pub issuer_org: String,
    pub program: String,
    pub score: String,
    pub issue_date: String,
    pub integrity_digest: String,
}

/// The full credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    pub id: CredentialId,
    pub subject_id: String,
    pub subject_name: String,
    pub issuer_org: String,
    pub program: String,
    pub score: String,
    pub issue_date: String,
    pub integrity_digest: String,
    pub status: CredentialStatus,
    #[serde(default)]
    pub disclosed_to: BTreeSet<OrgId>,
}

/// Shared-tier projection. Never carries the personal fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSummary {
    pub id: CredentialId,
    pub subject_id: String,
    pub issuer_org: String,
    pub status: CredentialStatus,
    pub integrity_digest: String,
    pub issue_date: String,
    #[serde(default)]
    pub disclosed_to: BTreeSet<OrgId>,
}

/// Private-partition projection: the fields the digest covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialPayload {
    pub id: CredentialId,
    pub subject_name: String,
    pub issuer_org: String,
    pub program: String,
    pub score: String,
    pub issue_date: String,
}

impl CredentialRecord {
    /// A freshly issued record: status `Issued`, disclosed to nobody.
    pub fn issue(request: IssueRequest) -> Self {
        Self {
            id: request.id,
            subject_id: request.subject_id,
            subject_name: request.subject_name,
            issuer_org: request.issuer_org,
            program: request.program,
            score: request.score,
            issue_date: request.issue_date,
            integrity_digest: request.integrity_digest,
            status: CredentialStatus::Issued,
            disclosed_to: BTreeSet::new(),
        }
    }

    /// Reassemble a record from its two projections.
    pub fn from_parts(
        summary: CredentialSummary,
        payload: CredentialPayload,
    ) -> Result<Self, CoreError> {
        if summary.id != payload.id {
            return Err(CoreError::PartsMismatch {
                summary: summary.id,
                payload: payload.id,
            });
        }
        Ok(Self {
            id: summary.id,
            subject_id: summary.subject_id,
            subject_name: payload.subject_name,
            issuer_org: payload.issuer_org,
            program: payload.program,
            score: payload.score,
            issue_date: payload.issue_date,
            integrity_digest: summary.integrity_digest,
            status: summary.status,
            disclosed_to: summary.disclosed_to,
        })
    }

    /// Disclose to `org`. Returns `true` if the org was newly added.
    pub fn disclose(&mut self, org: &OrgId) -> Result<bool, TransitionError> {
        apply_disclosure(&mut self.status, &mut self.disclosed_to, org)
    }

    /// Move to `Revoked`.
    pub fn revoke(&mut self) -> Result<(), TransitionError> {
        apply_revocation(&mut self.status)
    }

    pub fn is_disclosed_to(&self, org: &OrgId) -> bool {
        self.disclosed_to.contains(org)
    }

    pub fn summary(&self) -> CredentialSummary {
        CredentialSummary {
            id: self.id.clone(),
            subject_id: self.subject_id.clone(),
            issuer_org: self.issuer_org.clone(),
            status: self.status,
            integrity_digest: self.integrity_digest.clone(),
            issue_date: self.issue_date.clone(),
            disclosed_to: self.disclosed_to.clone(),
        }
    }

    pub fn payload(&self) -> CredentialPayload {
        CredentialPayload {
            id: self.id.clone(),
            subject_name: self.subject_name.clone(),
            issuer_org: self.issuer_org.clone(),
            program: self.program.clone(),
            score: self.score.clone(),
            issue_date: self.issue_date.clone(),
        }
    }

    /// Whether `integrity_digest` is the BLAKE3 digest of this record's payload.
    ///
    /// The ledger stores the digest as an opaque value; this is for parties
    /// that agreed to use [`PayloadDigest`] when issuing.
    pub fn digest_matches(&self) -> bool {
        PayloadDigest::of_payload(&self.payload()).matches_hex(&self.integrity_digest)
    }
}

impl CredentialSummary {
    /// Disclose to `org`. Returns `true` if the org was newly added.
    pub fn disclose(&mut self, org: &OrgId) -> Result<bool, TransitionError> {
        apply_disclosure(&mut self.status, &mut self.disclosed_to, org)
    }

    /// Move to `Revoked`.
    pub fn revoke(&mut self) -> Result<(), TransitionError> {
        apply_revocation(&mut self.status)
    }

    pub fn is_disclosed_to(&self, org: &OrgId) -> bool {
        self.disclosed_to.contains(org)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> IssueRequest {
        IssueRequest {
            id: CredentialId::new("CRED3001"),
            subject_id: "S-301".into(),
            subject_name: "Asha Patel".into(),
            issuer_org: "UniA".into(),
            program: "B.Tech".into(),
            score: "8.8".into(),
            issue_date: "2025-10-01".into(),
            integrity_digest: "hash123".into(),
        }
    }

    #[test]
    fn test_issue_starts_undisclosed() {
        let record = CredentialRecord::issue(request());
        assert_eq!(record.status, CredentialStatus::Issued);
        assert!(record.disclosed_to.is_empty());
    }

    #[test]
    fn test_split_and_reassemble() {
        let mut record = CredentialRecord::issue(request());
        record.disclose(&OrgId::new("Org2MSP")).unwrap();

        let rebuilt = CredentialRecord::from_parts(record.summary(), record.payload()).unwrap();
        assert_eq!(rebuilt, record);
    }

    #[test]
    fn test_reassemble_rejects_foreign_payload() {
        let record = CredentialRecord::issue(request());
        let mut other = request();
        other.id = CredentialId::new("CRED9999");
        let foreign = CredentialRecord::issue(other).payload();

        assert!(matches!(
            CredentialRecord::from_parts(record.summary(), foreign),
            Err(CoreError::PartsMismatch { .. })
        ));
    }

    #[test]
    fn test_summary_json_has_no_personal_fields() {
        let record = CredentialRecord::issue(request());
        let json = serde_json::to_value(record.summary()).unwrap();
        let obj = json.as_object().unwrap();

        assert!(!obj.contains_key("subjectName"));
        assert!(!obj.contains_key("program"));
        assert!(!obj.contains_key("score"));
        assert_eq!(obj["integrityDigest"], "hash123");
    }

    #[test]
    fn test_digest_matches() {
        let mut req = request();
        let payload = CredentialRecord::issue(req.clone()).payload();
        req.integrity_digest = PayloadDigest::of_payload(&payload).to_hex();

        let record = CredentialRecord::issue(req);
        assert!(record.digest_matches());

        let mut tampered = record.clone();
        tampered.score = "9.9".into();
        assert!(!tampered.digest_matches());
    }
}
