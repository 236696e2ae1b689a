//! Per-credential audit history.
//!
//! Every committed transition appends one [`HistoryEntry`]. Entries are
//! never rewritten; sequence numbers start at 1 and have no gaps.

use serde::{Deserialize, Serialize};

use crate::status::CredentialStatus;
use crate::types::OrgId;

/// What happened to the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum HistoryAction {
    Issued,
    Shared { target: OrgId },
    Revoked,
    StoredForVerifier,
}

/// One transition in a credential's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub seq: u64,
    #[serde(flatten)]
    pub action: HistoryAction,
    /// Organization of the caller that made the transition.
    pub actor: OrgId,
    /// Status right after the transition.
    pub status: CredentialStatus,
}
