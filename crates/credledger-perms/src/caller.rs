//! Caller identity.
//!
//! The host runtime knows who submitted a transaction; the engine learns it
//! through an [`IdentityResolver`], asked afresh on every operation.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use credledger_core::OrgId;

use crate::error::{PermsError, Result};

/// The identity behind one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    /// The caller's organization.
    pub org: OrgId,

    /// Certificate attributes (e.g. `role=student`).
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl Caller {
    /// A caller with no attributes.
    pub fn new(org: impl Into<OrgId>) -> Self {
        Self {
            org: org.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Look up an attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Whether the caller carries `name=value`.
    pub fn has_attribute(&self, name: &str, value: &str) -> bool {
        self.attribute(name) == Some(value)
    }
}

/// The identity oracle.
///
/// Implementations must not cache: membership may change between calls.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve the identity of the current caller.
    async fn resolve_caller(&self) -> Result<Caller>;
}

#[async_trait]
impl<R: IdentityResolver + ?Sized> IdentityResolver for Arc<R> {
    async fn resolve_caller(&self) -> Result<Caller> {
        (**self).resolve_caller().await
    }
}

/// A resolver whose answer can be swapped between invocations.
///
/// Clones share the same slot, so a test (or a host adapter) can hold one
/// handle while the engine holds another.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    current: Arc<RwLock<Option<Caller>>>,
}

impl StaticIdentity {
    /// Start out resolving to `caller`.
    pub fn new(caller: Caller) -> Self {
        Self {
            current: Arc::new(RwLock::new(Some(caller))),
        }
    }

    /// Resolve to `caller` from now on.
    pub fn set(&self, caller: Caller) {
        if let Ok(mut slot) = self.current.write() {
            *slot = Some(caller);
        }
    }

    /// Resolve to nobody; every lookup fails.
    pub fn clear(&self) {
        if let Ok(mut slot) = self.current.write() {
            *slot = None;
        }
    }
}

#[async_trait]
impl IdentityResolver for StaticIdentity {
    async fn resolve_caller(&self) -> Result<Caller> {
        let slot = self
            .current
            .read()
            .map_err(|e| PermsError::IdentityUnavailable(e.to_string()))?;
        slot.clone()
            .ok_or_else(|| PermsError::IdentityUnavailable("no caller identity set".into()))
    }
}
