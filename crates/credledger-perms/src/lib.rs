//! # Credential Ledger Permissions
//!
//! Caller identity and the per-operation access-control policy.
//!
//! ## Overview
//!
//! Every invocation starts by asking an [`IdentityResolver`] who the caller
//! is. The resulting [`Caller`] (organization plus certificate attributes)
//! is then checked against the [`AccessPolicy`]:
//!
//! - **Issue / Revoke**: caller's org must be the designated issuer
//! - **Share**: caller must carry the subject role attribute, any org
//! - **StoreForVerifier**: caller's org must be the designated verifier
//! - **Verify**: caller's org must be in the record's disclosure set, or be
//!   the verifier when each org keeps its own replica
//! - **Read**: caller's org must own the partition
//!
//! ## Usage
//!
//! ```rust
//! use credledger_perms::{AccessPolicy, Caller, Operation};
//!
//! let policy = AccessPolicy::default();
//! let student = Caller::new("Org1MSP").with_attribute("role", "student");
//! assert!(policy.authorize(Operation::Share, &student).is_ok());
//! assert!(policy.authorize(Operation::Issue, &student).is_ok());
//! assert!(policy.authorize(Operation::Issue, &Caller::new("Org2MSP")).is_err());
//! ```

pub mod caller;
pub mod error;
pub mod policy;

pub use caller::{Caller, IdentityResolver, StaticIdentity};
pub use error::{PermsError, Result};
pub use policy::{AccessPolicy, Operation, Requirement};
