//! # Credential Ledger
//!
//! A lifecycle engine for academic credentials issued by one organization
//! (a university) and verified by another (an employer, a registrar).
//!
//! ## Overview
//!
//! A credential moves through a small, forward-only lifecycle:
//!
//! - **Issue**: the issuer creates it, disclosed to nobody
//! - **Share**: the credential subject discloses it to an organization
//! - **Verify**: a disclosed-to organization reads the full record
//! - **Revoke**: the issuer withdraws it; the disclosure set is kept
//!
//! Each committed transition also appends a [`HistoryEntry`] to a public,
//! append-only log that anyone can read with
//! [`CredentialEngine::history`].
//!
//! Records live in a partitioned store: a shared tier every organization
//! can read, and private partitions readable only by their members. See
//! [`Topology`] for the two supported layouts.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use credledger::{CredentialEngine, EngineConfig};
//! use credledger::core::{CredentialId, IssueRequest, OrgId};
//! use credledger::perms::{Caller, StaticIdentity};
//! use credledger::store::SqliteStore;
//!
//! async fn example() {
//!     let config = EngineConfig::default();
//!     let store = SqliteStore::open("ledger.db", config.partition_access()).unwrap();
//!     let identity = StaticIdentity::new(Caller::new("Org1MSP"));
//!     let engine = CredentialEngine::new(store, identity.clone(), config).unwrap();
//!
//!     engine
//!         .issue(IssueRequest {
//!             id: CredentialId::new("CRED3001"),
//!             subject_id: "S-301".into(),
//!             subject_name: "Asha Patel".into(),
//!             issuer_org: "UniA".into(),
//!             program: "B.Tech".into(),
//!             score: "8.8".into(),
//!             issue_date: "2025-10-01".into(),
//!             integrity_digest: "hash123".into(),
//!         })
//!         .await
//!         .unwrap();
//!
//!     // The student shares it with the verifier
//!     identity.set(Caller::new("Org1MSP").with_attribute("role", "student"));
//!     let id = CredentialId::new("CRED3001");
//!     engine.share(&id, &OrgId::new("Org2MSP")).await.unwrap();
//!
//!     // The verifier reads it
//!     identity.set(Caller::new("Org2MSP"));
//!     let record = engine.verify(&id).await.unwrap();
//!     assert_eq!(record.program, "B.Tech");
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `credledger::core` - Records, status and codec
//! - `credledger::store` - Storage abstraction, SQLite and in-memory stores
//! - `credledger::perms` - Caller identity and access policy

pub mod config;
pub mod engine;
pub mod error;

// Re-export component crates
pub use credledger_core as core;
pub use credledger_perms as perms;
pub use credledger_store as store;

// Re-export main types for convenience
pub use config::{EngineConfig, Topology};
pub use engine::CredentialEngine;
pub use error::{EngineError, ErrorKind, Result};

// Re-export commonly used core types
pub use credledger_core::{
    CredentialId, CredentialRecord, CredentialStatus, CredentialSummary, HistoryAction,
    HistoryEntry, IssueRequest, OrgId,
};
