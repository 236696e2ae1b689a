//! # Credential Ledger Store
//!
//! Storage abstraction for the Credential Ledger. Provides a trait-based
//! interface to partitioned key-value state with SQLite and in-memory
//! implementations.
//!
//! ## Overview
//!
//! The store module abstracts record storage behind the [`RecordStore`]
//! trait, allowing the engine to be storage-agnostic. State lives in two
//! tiers: the [`Partition::Shared`] tier visible to every organization, and
//! named [`Partition::Private`] partitions visible only to their members as
//! configured by [`PartitionAccess`].
//!
//! ## Key Types
//!
//! - [`RecordStore`] - The async trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`Write`] / [`Precondition`] - Atomic, version-checked commit batches
//!
//! ## Usage
//!
//! ```rust,no_run
//! use credledger_core::OrgId;
//! use credledger_store::{Partition, PartitionAccess, RecordStore, SqliteStore, Write};
//!
//! async fn example() {
//!     let access = PartitionAccess::new()
//!         .with_partition("credPDC", [OrgId::new("Org1MSP"), OrgId::new("Org2MSP")]);
//!     let store = SqliteStore::open("ledger.db", access).unwrap();
//!
//!     let org = OrgId::new("Org1MSP");
//!     let write = Write::insert(Partition::private("credPDC"), "credpriv:c1", b"{}".to_vec());
//!     store.commit(&org, vec![write]).await.unwrap();
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **ACL enforcement**: non-members get `AccessDenied` on private partitions
//! - **Atomic batches**: a commit applies every write or none
//! - **Optimistic concurrency**: stale preconditions fail with `Conflict`

pub mod access;
pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use access::PartitionAccess;
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{Partition, Precondition, RecordStore, StoreExt, Versioned, Write};
