//! The Engine: the credential lifecycle over a partitioned store.
//!
//! Every operation resolves the caller afresh, checks the access policy,
//! loads what it needs, and writes its changes back in one atomic batch
//! guarded by the versions it read. A racing invocation that commits first
//! makes the batch fail instead of being silently overwritten.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use credledger_core::{
    encode, history_key, parse_supplied_record, validate_issue_request, validate_target_org,
    CredentialId, CredentialPayload, CredentialRecord, CredentialStatus, CredentialSummary,
    HistoryAction, HistoryEntry, IssueRequest, OrgId, RecordKind, TransitionError,
};
use credledger_perms::{
    AccessPolicy, Caller, IdentityResolver, Operation, PermsError, Requirement,
};
use credledger_store::{Partition, RecordStore, StoreError, StoreExt, Write};

use crate::config::{EngineConfig, Topology};
use crate::error::{EngineError, Result};

/// A decoded value and the version it was read at.
struct Loaded<T> {
    value: T,
    version: u64,
}

/// The main Engine struct.
///
/// Provides the credential lifecycle:
/// - Issuing credentials (issuer only)
/// - Sharing them with other organizations (credential subject)
/// - Storing a verifier-side replica (two-partition topology)
/// - Verifying, revoking, reading and existence checks
/// - An append-only history of every committed transition
pub struct CredentialEngine<S: RecordStore, R: IdentityResolver> {
    /// The storage backend.
    store: Arc<S>,
    /// Who is calling.
    identity: R,
    /// Configuration.
    config: EngineConfig,
    /// Authorization rules derived from the configuration.
    policy: AccessPolicy,
}

impl<S: RecordStore, R: IdentityResolver> CredentialEngine<S, R> {
    /// Create a new engine instance.
    pub fn new(store: S, identity: R, config: EngineConfig) -> Result<Self> {
        Self::with_shared_store(Arc::new(store), identity, config)
    }

    /// Create an engine over a store that other handles also use.
    pub fn with_shared_store(store: Arc<S>, identity: R, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let policy = config.policy();
        debug!(topology = config.topology.name(), "engine configured");
        Ok(Self {
            store,
            identity,
            config,
            policy,
        })
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Issuer Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Issue a new credential with status `Issued` and an empty disclosure set.
    ///
    /// Fails with [`EngineError::AlreadyExists`] if the id is taken, leaving
    /// the existing credential untouched.
    pub async fn issue(&self, request: IssueRequest) -> Result<()> {
        let caller = self.caller(Operation::Issue).await?;
        self.authorize(Operation::Issue, &caller)?;
        validate_issue_request(&request)?;

        let record = CredentialRecord::issue(request);
        let id = record.id.clone();
        let summary_key = RecordKind::Summary.key(&id);
        let private_key = RecordKind::Private.key(&id);
        let partition = self.config.issuer_partition();

        // Absent preconditions double as the uniqueness check
        let mut writes = match &self.config.topology {
            Topology::PublicIndex { .. } => vec![
                Write::insert(Partition::Shared, summary_key.clone(), encode(&record.summary())?),
                Write::insert(partition, private_key.clone(), encode(&record.payload())?),
            ],
            Topology::TwoPartition {
                publish_summary, ..
            } => {
                let mut writes = vec![Write::insert(partition, private_key.clone(), encode(&record)?)];
                if *publish_summary {
                    writes.push(Write::insert(
                        Partition::Shared,
                        summary_key.clone(),
                        encode(&record.summary())?,
                    ));
                }
                writes
            }
        };
        writes.extend(
            self.history_writes(&caller.org, &id, HistoryAction::Issued, record.status)
                .await?,
        );

        match self.store.commit(&caller.org, writes).await {
            Ok(()) => {
                info!(credential_id = %id, org = %caller.org, "credential issued");
                Ok(())
            }
            Err(StoreError::Conflict { key, .. }) if key == summary_key || key == private_key => {
                warn!(credential_id = %id, org = %caller.org, "credential already exists");
                Err(EngineError::AlreadyExists(id))
            }
            Err(e) => {
                warn!(org = %caller.org, error = %e, "commit failed");
                Err(e.into())
            }
        }
    }

    /// Revoke a credential. The disclosure set is kept as it is.
    ///
    /// Only the issuer-side records change; a verifier replica keeps the
    /// status it was stored with until the verifier stores the revoked copy.
    pub async fn revoke(&self, id: &CredentialId) -> Result<()> {
        let caller = self.caller(Operation::Revoke).await?;
        self.authorize(Operation::Revoke, &caller)?;

        let summary_key = RecordKind::Summary.key(id);
        let mut writes = match &self.config.topology {
            Topology::PublicIndex { .. } => {
                let Loaded {
                    value: mut summary,
                    version,
                } = self
                    .load::<CredentialSummary>(&caller.org, &Partition::Shared, &summary_key)
                    .await?
                    .ok_or_else(|| EngineError::NotFound(id.clone()))?;

                transition(id, summary.revoke())?;
                vec![Write::update(
                    Partition::Shared,
                    summary_key,
                    encode(&summary)?,
                    version,
                )]
            }
            Topology::TwoPartition {
                publish_summary, ..
            } => {
                let partition = self.config.issuer_partition();
                let private_key = RecordKind::Private.key(id);
                let Loaded {
                    value: mut record,
                    version,
                } = self
                    .load::<CredentialRecord>(&caller.org, &partition, &private_key)
                    .await?
                    .ok_or_else(|| EngineError::NotFound(id.clone()))?;

                transition(id, record.revoke())?;
                self.issuer_side_writes(&record, partition, private_key, version, *publish_summary)?
            }
        };
        writes.extend(
            self.history_writes(&caller.org, id, HistoryAction::Revoked, CredentialStatus::Revoked)
                .await?,
        );

        self.commit(&caller.org, writes).await?;
        info!(credential_id = %id, org = %caller.org, "credential revoked");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Subject Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Disclose a credential to `target`.
    ///
    /// The first disclosure moves the credential to `Shared`. Sharing again
    /// with an organization already disclosed to is a no-op.
    pub async fn share(&self, id: &CredentialId, target: &OrgId) -> Result<()> {
        let caller = self.caller(Operation::Share).await?;
        self.authorize(Operation::Share, &caller)?;
        validate_target_org(target)?;

        let summary_key = RecordKind::Summary.key(id);
        let (mut writes, status) = match &self.config.topology {
            Topology::PublicIndex { .. } => {
                let Loaded {
                    value: mut summary,
                    version,
                } = self
                    .load::<CredentialSummary>(&caller.org, &Partition::Shared, &summary_key)
                    .await?
                    .ok_or_else(|| EngineError::NotFound(id.clone()))?;

                if !transition(id, summary.disclose(target))? {
                    debug!(credential_id = %id, target_org = %target, "already disclosed");
                    return Ok(());
                }
                let write = Write::update(
                    Partition::Shared,
                    summary_key,
                    encode(&summary)?,
                    version,
                );
                (vec![write], summary.status)
            }
            Topology::TwoPartition {
                publish_summary, ..
            } => {
                let partition = self.config.issuer_partition();
                let private_key = RecordKind::Private.key(id);
                let Loaded {
                    value: mut record,
                    version,
                } = self
                    .load::<CredentialRecord>(&caller.org, &partition, &private_key)
                    .await?
                    .ok_or_else(|| EngineError::NotFound(id.clone()))?;

                if !transition(id, record.disclose(target))? {
                    debug!(credential_id = %id, target_org = %target, "already disclosed");
                    return Ok(());
                }
                let writes =
                    self.issuer_side_writes(&record, partition, private_key, version, *publish_summary)?;
                (writes, record.status)
            }
        };
        let action = HistoryAction::Shared {
            target: target.clone(),
        };
        writes.extend(self.history_writes(&caller.org, id, action, status).await?);

        self.commit(&caller.org, writes).await?;
        info!(credential_id = %id, org = %caller.org, target_org = %target, "credential shared");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Verifier Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Store a copy of a credential in the verifier's partition.
    ///
    /// `record_json` is a full credential record. Unknown fields are
    /// rejected; `status` and `disclosedTo` may be omitted. The stored
    /// replica is always disclosed to the verifier and keeps any
    /// organizations an earlier replica was disclosed to.
    ///
    /// A revoked copy is how a revocation reaches the verifier: it is
    /// accepted as-is if it was already disclosed to the verifier, and it
    /// replaces a live replica. A live copy never replaces a revoked one.
    pub async fn store_for_verifier(&self, record_json: &str) -> Result<()> {
        let caller = self.caller(Operation::StoreForVerifier).await?;
        let Topology::TwoPartition {
            verifier_partition, ..
        } = &self.config.topology
        else {
            return Err(EngineError::Unsupported {
                operation: Operation::StoreForVerifier,
                topology: self.config.topology.name(),
            });
        };
        self.authorize(Operation::StoreForVerifier, &caller)?;

        let mut record = parse_supplied_record(record_json)?;
        let id = record.id.clone();
        let verifier = &self.config.verifier_org;
        let partition = Partition::private(verifier_partition);
        let key = RecordKind::Private.key(&id);

        let existing = self
            .load::<CredentialRecord>(&caller.org, &partition, &key)
            .await?;

        if record.status.is_terminal() {
            // Revoking cannot add the disclosure this copy is missing
            if !record.is_disclosed_to(verifier) {
                return Err(transition_refused(
                    &id,
                    TransitionError::Terminal(record.status),
                ));
            }
        } else {
            if let Some(existing) = &existing {
                if existing.value.status.is_terminal() {
                    return Err(transition_refused(
                        &id,
                        TransitionError::Terminal(existing.value.status),
                    ));
                }
            }
            transition(&id, record.disclose(verifier))?;
            // A copy may name the verifier while still reading Issued
            if record.status == CredentialStatus::Issued {
                record.status = transition(&id, record.status.transition(CredentialStatus::Shared))?;
            }
        }

        if let Some(existing) = &existing {
            record
                .disclosed_to
                .extend(existing.value.disclosed_to.iter().cloned());
            if existing.value == record {
                debug!(credential_id = %id, "replica unchanged");
                return Ok(());
            }
        }

        let value = encode(&record)?;
        let mut writes = vec![match existing {
            Some(existing) => Write::update(partition, key, value, existing.version),
            None => Write::insert(partition, key, value),
        }];
        writes.extend(
            self.history_writes(&caller.org, &id, HistoryAction::StoredForVerifier, record.status)
                .await?,
        );
        self.commit(&caller.org, writes).await?;

        info!(credential_id = %id, org = %caller.org, status = %record.status, "credential stored for verifier");
        Ok(())
    }

    /// Return the full credential to a verifier it was disclosed to.
    ///
    /// A revoked credential still verifies for organizations it was
    /// disclosed to before revocation; its status reads `Revoked`.
    pub async fn verify(&self, id: &CredentialId) -> Result<CredentialRecord> {
        let caller = self.caller(Operation::Verify).await?;

        let record = match &self.config.topology {
            Topology::PublicIndex { .. } => {
                let summary = self
                    .load::<CredentialSummary>(
                        &caller.org,
                        &Partition::Shared,
                        &RecordKind::Summary.key(id),
                    )
                    .await?
                    .ok_or_else(|| EngineError::NotFound(id.clone()))?
                    .value;

                self.check(
                    Operation::Verify,
                    &caller,
                    Requirement::DisclosedTo(&summary.disclosed_to),
                )?;
                // Disclosure always moves the status on, so this only
                // catches inconsistent stored data
                if summary.status == CredentialStatus::Issued {
                    return Err(EngineError::NotShared(id.clone()));
                }

                let payload = self
                    .load::<CredentialPayload>(
                        &caller.org,
                        &self.config.issuer_partition(),
                        &RecordKind::Private.key(id),
                    )
                    .await?
                    .ok_or_else(|| EngineError::NotFound(id.clone()))?
                    .value;

                CredentialRecord::from_parts(summary, payload)?
            }
            Topology::TwoPartition {
                verifier_partition, ..
            } => {
                self.check(Operation::Verify, &caller, Requirement::VerifierOrg)?;
                self.load::<CredentialRecord>(
                    &caller.org,
                    &Partition::private(verifier_partition),
                    &RecordKind::Private.key(id),
                )
                .await?
                .ok_or_else(|| EngineError::NotFound(id.clone()))?
                .value
            }
        };

        info!(credential_id = %id, org = %caller.org, status = %record.status, "credential verified");
        Ok(record)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Read the full credential from the caller's own partition.
    pub async fn read(&self, id: &CredentialId) -> Result<CredentialRecord> {
        let caller = self.caller(Operation::Read).await?;
        let (owner, partition) = self.owned_partition(&caller.org);
        self.check(Operation::Read, &caller, Requirement::OwnerOf(owner))?;

        let private_key = RecordKind::Private.key(id);
        let record = match &self.config.topology {
            Topology::PublicIndex { .. } => {
                let payload = self
                    .load::<CredentialPayload>(&caller.org, &partition, &private_key)
                    .await?
                    .ok_or_else(|| EngineError::NotFound(id.clone()))?
                    .value;
                let summary = self
                    .load::<CredentialSummary>(
                        &caller.org,
                        &Partition::Shared,
                        &RecordKind::Summary.key(id),
                    )
                    .await?
                    .ok_or_else(|| EngineError::NotFound(id.clone()))?
                    .value;
                CredentialRecord::from_parts(summary, payload)?
            }
            Topology::TwoPartition { .. } => {
                self.load::<CredentialRecord>(&caller.org, &partition, &private_key)
                    .await?
                    .ok_or_else(|| EngineError::NotFound(id.clone()))?
                    .value
            }
        };

        debug!(credential_id = %id, org = %caller.org, %partition, "credential read");
        Ok(record)
    }

    /// Whether a credential with this id is visible to the caller.
    ///
    /// Never fails for lack of access: an invisible credential does not exist.
    pub async fn exists(&self, id: &CredentialId) -> Result<bool> {
        let caller = self.caller(Operation::Exists).await?;
        let summary_key = RecordKind::Summary.key(id);

        let found = match &self.config.topology {
            Topology::PublicIndex { .. } => {
                self.store
                    .contains(&caller.org, &Partition::Shared, &summary_key)
                    .await?
            }
            Topology::TwoPartition {
                publish_summary, ..
            } => match self.owned_partition(&caller.org) {
                (owner, partition) if *owner == caller.org => {
                    self.store
                        .contains(&caller.org, &partition, &RecordKind::Private.key(id))
                        .await?
                }
                _ if *publish_summary => {
                    self.store
                        .contains(&caller.org, &Partition::Shared, &summary_key)
                        .await?
                }
                _ => false,
            },
        };

        debug!(credential_id = %id, org = %caller.org, found, "existence checked");
        Ok(found)
    }

    /// Every committed transition of a credential, oldest first.
    ///
    /// The history lives in the shared tier and carries no personal fields,
    /// so any caller may read it. Rejected and no-op operations leave no
    /// entry.
    pub async fn history(&self, id: &CredentialId) -> Result<Vec<HistoryEntry>> {
        let caller = self.caller(Operation::History).await?;
        self.authorize(Operation::History, &caller)?;

        let len = self
            .load::<u64>(&caller.org, &Partition::Shared, &RecordKind::HistoryLen.key(id))
            .await?
            .ok_or_else(|| EngineError::NotFound(id.clone()))?
            .value;

        // Entries are written in the same batch as the counter
        let mut entries = Vec::new();
        for seq in 1..=len {
            let entry = self
                .load::<HistoryEntry>(&caller.org, &Partition::Shared, &history_key(id, seq))
                .await?
                .ok_or_else(|| {
                    StoreError::InvalidData(format!("history of {} is missing entry {}", id, seq))
                })?
                .value;
            entries.push(entry);
        }

        debug!(credential_id = %id, org = %caller.org, entries = entries.len(), "history read");
        Ok(entries)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal
    // ─────────────────────────────────────────────────────────────────────────

    async fn caller(&self, operation: Operation) -> Result<Caller> {
        match self.identity.resolve_caller().await {
            Ok(caller) => {
                debug!(org = %caller.org, %operation, "caller resolved");
                Ok(caller)
            }
            Err(e) => {
                warn!(%operation, error = %e, "caller identity unavailable");
                Err(e.into())
            }
        }
    }

    fn authorize(&self, operation: Operation, caller: &Caller) -> Result<()> {
        self.policy
            .authorize(operation, caller)
            .map_err(|e| self.denied(caller, e))
    }

    fn check(&self, operation: Operation, caller: &Caller, requirement: Requirement<'_>) -> Result<()> {
        self.policy
            .check(operation, caller, requirement)
            .map_err(|e| self.denied(caller, e))
    }

    fn denied(&self, caller: &Caller, error: PermsError) -> EngineError {
        warn!(org = %caller.org, error = %error, "permission denied");
        EngineError::Unauthorized(error)
    }

    /// The partition `org` would read its own credentials from, and the
    /// organization that owns it.
    ///
    /// Organizations without a partition of their own are pointed at the
    /// issuer's, which they do not own.
    fn owned_partition(&self, org: &OrgId) -> (&OrgId, Partition) {
        match &self.config.topology {
            Topology::PublicIndex { private_partition } => {
                (&self.config.issuer_org, Partition::private(private_partition))
            }
            Topology::TwoPartition {
                verifier_partition, ..
            } if *org == self.config.verifier_org => {
                (&self.config.verifier_org, Partition::private(verifier_partition))
            }
            Topology::TwoPartition { .. } => {
                (&self.config.issuer_org, self.config.issuer_partition())
            }
        }
    }

    /// Writes appending one entry to a credential's history.
    ///
    /// The length counter is written back at the version it was read, so
    /// two transitions racing on one credential cannot take the same
    /// sequence number.
    async fn history_writes(
        &self,
        org: &OrgId,
        id: &CredentialId,
        action: HistoryAction,
        status: CredentialStatus,
    ) -> Result<Vec<Write>> {
        let len_key = RecordKind::HistoryLen.key(id);
        let (seq, counter) = match self.load::<u64>(org, &Partition::Shared, &len_key).await? {
            Some(Loaded { value, version }) => {
                let seq = value + 1;
                (seq, Write::update(Partition::Shared, len_key, encode(&seq)?, version))
            }
            None => (1, Write::insert(Partition::Shared, len_key, encode(&1u64)?)),
        };

        let entry = HistoryEntry {
            seq,
            action,
            actor: org.clone(),
            status,
        };
        Ok(vec![
            counter,
            Write::insert(Partition::Shared, history_key(id, seq), encode(&entry)?),
        ])
    }

    /// Writes for an updated issuer-side record in the two-partition layout.
    ///
    /// The published summary is only ever written alongside the record, so
    /// the record's version check serializes both.
    fn issuer_side_writes(
        &self,
        record: &CredentialRecord,
        partition: Partition,
        private_key: String,
        version: u64,
        publish_summary: bool,
    ) -> Result<Vec<Write>> {
        let mut writes = vec![Write::update(partition, private_key, encode(record)?, version)];
        if publish_summary {
            writes.push(Write::upsert(
                Partition::Shared,
                RecordKind::Summary.key(&record.id),
                encode(&record.summary())?,
            ));
        }
        Ok(writes)
    }

    async fn load<T: DeserializeOwned>(
        &self,
        org: &OrgId,
        partition: &Partition,
        key: &str,
    ) -> Result<Option<Loaded<T>>> {
        match self.store.get_visible(org, partition, key).await? {
            Some(stored) => Ok(Some(Loaded {
                value: credledger_core::decode(&stored.value)?,
                version: stored.version,
            })),
            None => Ok(None),
        }
    }

    async fn commit(&self, org: &OrgId, writes: Vec<Write>) -> Result<()> {
        self.store.commit(org, writes).await.map_err(|e| {
            warn!(%org, error = %e, "commit failed");
            EngineError::from(e)
        })
    }
}

fn transition<T>(id: &CredentialId, result: std::result::Result<T, TransitionError>) -> Result<T> {
    result.map_err(|source| transition_refused(id, source))
}

fn transition_refused(id: &CredentialId, source: TransitionError) -> EngineError {
    warn!(credential_id = %id, error = %source, "transition refused");
    EngineError::Transition {
        id: id.clone(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use credledger_perms::StaticIdentity;
    use credledger_store::MemoryStore;

    fn request(id: &str) -> IssueRequest {
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

    fn university() -> Caller {
        Caller::new("Org1MSP")
    }

    fn student() -> Caller {
        Caller::new("Org1MSP").with_attribute("role", "student")
    }

    fn verifier() -> Caller {
        Caller::new("Org2MSP")
    }

    fn engine(config: EngineConfig) -> (CredentialEngine<MemoryStore, StaticIdentity>, StaticIdentity) {
        let identity = StaticIdentity::new(university());
        let store = MemoryStore::new(config.partition_access());
        let engine = CredentialEngine::new(store, identity.clone(), config).unwrap();
        (engine, identity)
    }

    #[tokio::test]
    async fn test_issue_writes_summary_and_payload() {
        let (engine, _) = engine(EngineConfig::default());
        engine.issue(request("CRED3001")).await.unwrap();

        // Summary, history counter and first entry in the shared tier, the
        // payload in the private partition
        assert_eq!(engine.store().len(), 4);

        let id = CredentialId::new("CRED3001");
        let org = OrgId::new("Org2MSP");
        for key in [
            RecordKind::Summary.key(&id),
            RecordKind::HistoryLen.key(&id),
            history_key(&id, 1),
        ] {
            assert!(engine.store().contains(&org, &Partition::Shared, &key).await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_two_partition_issue_without_summary() {
        let (engine, _) = engine(EngineConfig::two_partition());
        engine.issue(request("CRED3001")).await.unwrap();

        // Private record plus the history counter and entry
        assert_eq!(engine.store().len(), 3);
        let summary_key = RecordKind::Summary.key(&CredentialId::new("CRED3001"));
        assert!(!engine
            .store()
            .contains(&OrgId::new("Org1MSP"), &Partition::Shared, &summary_key)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_issue() {
        let (engine, _) = engine(EngineConfig::default());
        engine.issue(request("CRED3001")).await.unwrap();

        let err = engine.issue(request("CRED3001")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    }

    #[tokio::test]
    async fn test_noop_share_writes_nothing() {
        let (engine, identity) = engine(EngineConfig::default());
        engine.issue(request("CRED3001")).await.unwrap();

        identity.set(student());
        let id = CredentialId::new("CRED3001");
        let target = OrgId::new("Org2MSP");
        engine.share(&id, &target).await.unwrap();

        let summary_key = RecordKind::Summary.key(&id);
        let before = engine
            .store()
            .get(&OrgId::new("Org1MSP"), &Partition::Shared, &summary_key)
            .await
            .unwrap()
            .unwrap();

        engine.share(&id, &target).await.unwrap();
        let after = engine
            .store()
            .get(&OrgId::new("Org1MSP"), &Partition::Shared, &summary_key)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(before.version, after.version);
    }

    #[tokio::test]
    async fn test_read_requires_home_partition() {
        let (engine, identity) = engine(EngineConfig::default());
        engine.issue(request("CRED3001")).await.unwrap();

        identity.set(verifier());
        let err = engine.read(&CredentialId::new("CRED3001")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert!(matches!(
            err,
            EngineError::Unauthorized(PermsError::PermissionDenied {
                operation: Operation::Read,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_two_partition_read_checks_ownership() {
        let (engine, identity) = engine(EngineConfig::two_partition());
        engine.issue(request("CRED3001")).await.unwrap();

        // The verifier owns its partition, even when it is empty
        identity.set(verifier());
        let err = engine.read(&CredentialId::new("CRED3001")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        identity.set(Caller::new("Org3MSP"));
        let err = engine.read(&CredentialId::new("CRED3001")).await.unwrap_err();
        match err {
            EngineError::Unauthorized(PermsError::PermissionDenied { reason, .. }) => {
                assert!(reason.contains("Org1MSP"), "reason: {reason}");
            }
            other => panic!("expected PermissionDenied, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_noop_share_leaves_history_alone() {
        let (engine, identity) = engine(EngineConfig::two_partition());
        engine.issue(request("CRED3001")).await.unwrap();

        identity.set(student());
        let id = CredentialId::new("CRED3001");
        engine.share(&id, &OrgId::new("Org2MSP")).await.unwrap();
        engine.share(&id, &OrgId::new("Org2MSP")).await.unwrap();

        let history = engine.history(&id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].seq, 2);
        assert_eq!(history[1].status, CredentialStatus::Shared);
    }

    #[tokio::test]
    async fn test_missing_identity_is_unauthorized() {
        let (engine, identity) = engine(EngineConfig::default());
        identity.clear();

        let err = engine.issue(request("CRED3001")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig {
            verifier_org: OrgId::new("Org1MSP"),
            ..EngineConfig::default()
        };
        let store = MemoryStore::new(config.partition_access());
        let result = CredentialEngine::new(store, StaticIdentity::new(university()), config);
        assert!(matches!(result, Err(EngineError::Config(_))));
    }
}
