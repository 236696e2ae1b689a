//! Error types for the Credential Ledger Core.

use thiserror::Error;

use crate::status::CredentialStatus;
use crate::types::CredentialId;

/// Core errors raised while encoding, decoding or assembling records.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),

    #[error("summary {summary} does not belong to payload {payload}")]
    PartsMismatch {
        summary: CredentialId,
        payload: CredentialId,
    },
}

/// Validation errors for caller-supplied input, raised before any state is read.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("required field `{0}` is empty")]
    EmptyField(&'static str),

    #[error("malformed record: {0}")]
    Malformed(String),
}

/// A lifecycle transition the current status does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The credential is revoked; nothing may change any more.
    #[error("credential is in terminal state {0}")]
    Terminal(CredentialStatus),

    #[error("invalid status transition: {from} -> {to}")]
    Invalid {
        from: CredentialStatus,
        to: CredentialStatus,
    },
}
