//! # Credential Ledger Testkit
//!
//! Testing utilities for the Credential Ledger.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: An engine over a memory store with a swappable caller
//! - **Generators**: Proptest strategies for requests and lifecycle histories
//!
//! ## Test Fixtures
//!
//! ```rust
//! use credledger_testkit::fixtures::{sample_request, TestFixture};
//!
//! async fn scenario() {
//!     let fixture = TestFixture::public_index();
//!     fixture.as_university().issue(sample_request("CRED3001")).await.unwrap();
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use credledger_testkit::generators::{request_from_params, IssueParams};
//!
//! proptest! {
//!     #[test]
//!     fn issued_requests_validate(params: IssueParams) {
//!         let request = request_from_params(&params);
//!         prop_assert!(credledger_core::validate_issue_request(&request).is_ok());
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{sample_request, TestFixture, TestEngine};
pub use generators::{lifecycle, request_from_params, IssueParams, LifecycleStep};
