//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use credledger::{CredentialEngine, EngineConfig};
use credledger_core::{CredentialId, CredentialRecord, IssueRequest, OrgId, PayloadDigest};
use credledger_perms::{Caller, StaticIdentity};
use credledger_store::MemoryStore;

/// The issuing organization in the default configuration.
pub const UNIVERSITY: &str = "Org1MSP";
/// The verifying organization in the default configuration.
pub const VERIFIER: &str = "Org2MSP";
/// An organization nothing is ever disclosed to.
pub const OUTSIDER: &str = "Org3MSP";

pub fn university() -> Caller {
    Caller::new(UNIVERSITY)
}

/// A credential subject enrolled through the university's organization.
pub fn student() -> Caller {
    Caller::new(UNIVERSITY).with_attribute("role", "student")
}

pub fn verifier() -> Caller {
    Caller::new(VERIFIER)
}

pub fn outsider() -> Caller {
    Caller::new(OUTSIDER)
}

/// The engine type every fixture builds.
pub type TestEngine = CredentialEngine<MemoryStore, StaticIdentity>;

/// A test fixture: one engine over a memory store, plus a handle to swap
/// the caller between invocations.
pub struct TestFixture {
    pub identity: StaticIdentity,
    pub store: Arc<MemoryStore>,
    pub engine: TestEngine,
}

impl TestFixture {
    /// Create a fixture for `config`. The first caller is the university.
    pub fn new(config: EngineConfig) -> Self {
        let identity = StaticIdentity::new(university());
        let store = Arc::new(MemoryStore::new(config.partition_access()));
        let engine = CredentialEngine::with_shared_store(store.clone(), identity.clone(), config)
            .expect("fixture config is valid");
        Self {
            identity,
            store,
            engine,
        }
    }

    /// Shared summary plus one private partition.
    pub fn public_index() -> Self {
        Self::new(EngineConfig::default())
    }

    /// One private partition per organization.
    pub fn two_partition() -> Self {
        Self::new(EngineConfig::two_partition())
    }

    /// Act as `caller` from now on.
    pub fn act_as(&self, caller: Caller) -> &TestEngine {
        self.identity.set(caller);
        &self.engine
    }

    pub fn as_university(&self) -> &TestEngine {
        self.act_as(university())
    }

    pub fn as_student(&self) -> &TestEngine {
        self.act_as(student())
    }

    pub fn as_verifier(&self) -> &TestEngine {
        self.act_as(verifier())
    }

    pub fn as_outsider(&self) -> &TestEngine {
        self.act_as(outsider())
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::public_index()
    }
}

/// A complete issuance request with an opaque digest.
pub fn sample_request(id: &str) -> IssueRequest {
    IssueRequest {
        id: CredentialId::new(id),
        subject_id: "S-301".into(),
        subject_name: "Asha Patel".into(),
        issuer_org: "UniA".into(),
        program: "B.Tech".into(),
        score: "8.8".into(),
        issue_date: "2025-10-01".into(),
        integrity_digest: "hash123".into(),
    }
}

/// Like [`sample_request`], with a real BLAKE3 digest of the payload.
pub fn digested_request(id: &str) -> IssueRequest {
    let mut request = sample_request(id);
    let payload = CredentialRecord::issue(request.clone()).payload();
    request.integrity_digest = PayloadDigest::of_payload(&payload).to_hex();
    request
}

/// The JSON a verifier receives out of band for `request`.
pub fn supplied_record_json(request: &IssueRequest) -> String {
    let record = CredentialRecord::issue(request.clone());
    serde_json::to_string(&record).expect("records always serialize")
}

pub fn org(name: &str) -> OrgId {
    OrgId::new(name)
}
