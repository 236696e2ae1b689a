//! Boundary validation for caller-supplied input.
//!
//! Everything here runs before the engine touches storage, so malformed
//! input never reaches the state machine.

use serde::Deserialize;
use std::collections::BTreeSet;

use crate::error::ValidationError;
use crate::record::{CredentialRecord, IssueRequest};
use crate::status::CredentialStatus;
use crate::types::{CredentialId, OrgId};

/// Check the required fields of an issuance request.
pub fn validate_issue_request(request: &IssueRequest) -> Result<(), ValidationError> {
    if request.id.is_empty() {
        return Err(ValidationError::EmptyField("id"));
    }
    if request.subject_id.trim().is_empty() {
        return Err(ValidationError::EmptyField("subjectId"));
    }
    Ok(())
}

/// Check a disclosure target.
pub fn validate_target_org(org: &OrgId) -> Result<(), ValidationError> {
    if org.is_empty() {
        return Err(ValidationError::EmptyField("targetOrg"));
    }
    Ok(())
}

/// Wire shape of a record handed to the verifier.
///
/// Unknown fields are rejected. `status` and `disclosedTo` may be omitted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct SuppliedRecord {
    id: CredentialId,
    subject_id: String,
    subject_name: String,
    issuer_org: String,
    program: String,
    score: String,
    issue_date: String,
    integrity_digest: String,
    #[serde(default)]
    status: Option<CredentialStatus>,
    #[serde(default)]
    disclosed_to: BTreeSet<OrgId>,
}

/// Strictly decode a JSON credential record supplied by a caller.
pub fn parse_supplied_record(json: &str) -> Result<CredentialRecord, ValidationError> {
    let supplied: SuppliedRecord =
        serde_json::from_str(json).map_err(|e| ValidationError::Malformed(e.to_string()))?;

    if supplied.id.is_empty() {
        return Err(ValidationError::EmptyField("id"));
    }

    Ok(CredentialRecord {
        id: supplied.id,
        subject_id: supplied.subject_id,
        subject_name: supplied.subject_name,
        issuer_org: supplied.issuer_org,
        program: supplied.program,
        score: supplied.score,
        issue_date: supplied.issue_date,
        integrity_digest: supplied.integrity_digest,
        status: supplied.status.unwrap_or(CredentialStatus::Issued),
        disclosed_to: supplied.disclosed_to,
    })
}
