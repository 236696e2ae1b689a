//! # Credential Ledger Core
//!
//! Pure primitives for the Credential Ledger: credential records, their
//! lifecycle status, and the codec used to persist them.
//!
//! This crate contains no I/O, no storage, no identity lookups. It is pure
//! computation over credential data.
//!
//! ## Key Types
//!
//! - [`CredentialRecord`] - The full credential, held in a private partition
//! - [`CredentialSummary`] - Status metadata safe for the shared tier
//! - [`CredentialPayload`] - The personal fields covered by the digest
//! - [`CredentialStatus`] - `Issued`, `Shared` or `Revoked`
//! - [`HistoryEntry`] - One committed transition in a credential's audit log
//!
//! ## Encoding
//!
//! Records are field-tagged JSON. See [`codec`] module.

pub mod codec;
pub mod digest;
pub mod error;
pub mod history;
pub mod record;
pub mod status;
pub mod types;
pub mod validation;

pub use codec::{
    decode, encode, history_key, RecordKind, HISTORY_LEN_PREFIX, HISTORY_PREFIX, PRIVATE_PREFIX,
    SUMMARY_PREFIX,
};
pub use digest::PayloadDigest;
pub use error::{CoreError, TransitionError, ValidationError};
pub use history::{HistoryAction, HistoryEntry};
pub use record::{CredentialPayload, CredentialRecord, CredentialSummary, IssueRequest};
pub use status::CredentialStatus;
pub use types::{CredentialId, OrgId};
pub use validation::{parse_supplied_record, validate_issue_request, validate_target_org};
