//! Proptest generators for property-based testing.

use proptest::prelude::*;

use credledger_core::{CredentialId, IssueRequest, OrgId};

use crate::fixtures::{OUTSIDER, UNIVERSITY, VERIFIER};

/// Generate a credential id.
pub fn credential_id() -> impl Strategy<Value = CredentialId> {
    "CRED[0-9]{1,6}".prop_map(CredentialId::new)
}

/// Generate one of the fixture organizations.
pub fn known_org() -> impl Strategy<Value = OrgId> {
    prop_oneof![
        Just(OrgId::new(UNIVERSITY)),
        Just(OrgId::new(VERIFIER)),
        Just(OrgId::new(OUTSIDER)),
    ]
}

/// Generate an arbitrary organization id.
pub fn org_id() -> impl Strategy<Value = OrgId> {
    prop_oneof![known_org(), "Org[0-9]{1,2}MSP".prop_map(OrgId::new)]
}

/// Generate free text for a descriptive field.
pub fn text() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 .-]{1,24}".prop_map(String::from)
}

/// Parameters for a valid issuance request.
#[derive(Debug, Clone)]
pub struct IssueParams {
    pub id: CredentialId,
    pub subject_id: String,
    pub subject_name: String,
    pub program: String,
    pub score: String,
}

impl Arbitrary for IssueParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            credential_id(),
            "S-[0-9]{1,5}",
            text(),
            text(),
            "[0-9]\\.[0-9]",
        )
            .prop_map(|(id, subject_id, subject_name, program, score)| IssueParams {
                id,
                subject_id,
                subject_name,
                program,
                score,
            })
            .boxed()
    }
}

/// Build the issuance request for `params`.
pub fn request_from_params(params: &IssueParams) -> IssueRequest {
    IssueRequest {
        id: params.id.clone(),
        subject_id: params.subject_id.clone(),
        subject_name: params.subject_name.clone(),
        issuer_org: "UniA".into(),
        program: params.program.clone(),
        score: params.score.clone(),
        issue_date: "2025-10-01".into(),
        integrity_digest: "hash123".into(),
    }
}

/// One step in a generated credential history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleStep {
    /// The subject shares with an organization.
    Share(OrgId),
    /// The issuer revokes.
    Revoke,
    /// The issuer tries to issue the same id again.
    Reissue,
    /// An organization tries to verify.
    Verify(OrgId),
}

/// Generate a lifecycle step.
pub fn lifecycle_step() -> impl Strategy<Value = LifecycleStep> {
    prop_oneof![
        4 => known_org().prop_map(LifecycleStep::Share),
        1 => Just(LifecycleStep::Revoke),
        1 => Just(LifecycleStep::Reissue),
        3 => known_org().prop_map(LifecycleStep::Verify),
    ]
}

/// Generate a history of up to `max_len` steps.
pub fn lifecycle(max_len: usize) -> impl Strategy<Value = Vec<LifecycleStep>> {
    prop::collection::vec(lifecycle_step(), 0..=max_len)
}
