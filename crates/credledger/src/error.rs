//! Error types for the Engine.

use credledger_core::{CoreError, CredentialId, TransitionError, ValidationError};
use credledger_perms::{Operation, PermsError};
use credledger_store::StoreError;
use thiserror::Error;

/// Coarse classification of an [`EngineError`], stable for callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Duplicate issuance.
    AlreadyExists,
    /// Unknown id, or a partition the caller cannot see.
    NotFound,
    /// Caller org or role fails the operation's policy.
    Unauthorized,
    /// Operation not legal for the credential's current status.
    InvalidState,
    /// Undecodable or incomplete input.
    MalformedInput,
    /// Operation not offered by the configured topology.
    Unsupported,
    /// Backend failure, lost concurrency race, or corrupt stored data.
    Storage,
}

/// Errors that can occur during Engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A credential with this id already exists.
    #[error("credential already exists: {0}")]
    AlreadyExists(CredentialId),

    /// Credential not found (or not visible to the caller).
    #[error("credential not found: {0}")]
    NotFound(CredentialId),

    /// Authorization failed.
    #[error("not authorized: {0}")]
    Unauthorized(#[from] PermsError),

    /// The lifecycle forbids the transition.
    #[error("credential {id}: {source}")]
    Transition {
        id: CredentialId,
        #[source]
        source: TransitionError,
    },

    /// Verification attempted before the credential was shared.
    #[error("credential {0} has not been shared")]
    NotShared(CredentialId),

    /// Caller-supplied input failed validation.
    #[error("malformed input: {0}")]
    Malformed(#[from] ValidationError),

    /// Operation not available in this topology.
    #[error("{operation} is not available in the {topology} topology")]
    Unsupported {
        operation: Operation,
        topology: &'static str,
    },

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Stored bytes could not be decoded or encoded.
    #[error("codec error: {0}")]
    Codec(#[from] CoreError),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl EngineError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            EngineError::NotFound(_) => ErrorKind::NotFound,
            EngineError::Unauthorized(_) => ErrorKind::Unauthorized,
            EngineError::Transition { .. } | EngineError::NotShared(_) => ErrorKind::InvalidState,
            EngineError::Malformed(_) | EngineError::Config(_) => ErrorKind::MalformedInput,
            EngineError::Unsupported { .. } => ErrorKind::Unsupported,
            EngineError::Store(_) | EngineError::Codec(_) => ErrorKind::Storage,
        }
    }
}

/// Result type for Engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use credledger_core::CredentialStatus;

    #[test]
    fn test_kinds() {
        let id = CredentialId::new("c");
        assert_eq!(EngineError::AlreadyExists(id.clone()).kind(), ErrorKind::AlreadyExists);
        assert_eq!(EngineError::NotShared(id.clone()).kind(), ErrorKind::InvalidState);
        assert_eq!(
            EngineError::Transition {
                id,
                source: TransitionError::Terminal(CredentialStatus::Revoked),
            }
            .kind(),
            ErrorKind::InvalidState
        );
        assert_eq!(
            EngineError::from(ValidationError::EmptyField("id")).kind(),
            ErrorKind::MalformedInput
        );
        assert_eq!(
            EngineError::from(PermsError::IdentityUnavailable("x".into())).kind(),
            ErrorKind::Unauthorized
        );
    }
}
