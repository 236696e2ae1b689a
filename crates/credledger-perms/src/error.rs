//! Error types for the permissions module.

use credledger_core::OrgId;
use thiserror::Error;

use crate::policy::Operation;

/// Errors that can occur during identity resolution and authorization.
#[derive(Debug, Error)]
pub enum PermsError {
    /// The caller's organization may not perform the operation.
    #[error("{org} may not {operation}: {reason}")]
    PermissionDenied {
        org: OrgId,
        operation: Operation,
        reason: String,
    },

    /// The caller lacks a required role attribute.
    #[error("{operation} requires {attribute}={expected}")]
    MissingRole {
        operation: Operation,
        attribute: String,
        expected: String,
    },

    /// The identity oracle could not identify the caller.
    #[error("identity resolution failed: {0}")]
    IdentityUnavailable(String),
}

/// Result type for permission operations.
pub type Result<T> = std::result::Result<T, PermsError>;
