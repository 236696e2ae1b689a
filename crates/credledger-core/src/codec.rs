//! Record encoding and key namespacing.
//!
//! Records are stored as field-tagged JSON so issuer and verifier components
//! can evolve independently. Keys are `<prefix><id>`, with one prefix per
//! record kind, so summaries and private payloads never collide inside a
//! partition.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::CredentialId;

/// Key prefix of a [`CredentialSummary`](crate::CredentialSummary).
pub const SUMMARY_PREFIX: &str = "cred:";

/// Key prefix of a private record (payload or full record).
pub const PRIVATE_PREFIX: &str = "credpriv:";

/// Key prefix of a history entry, `credhist:<id>:<seq>`.
pub const HISTORY_PREFIX: &str = "credhist:";

/// Key prefix of a history length counter.
pub const HISTORY_LEN_PREFIX: &str = "credhistlen:";

/// The kind of record stored under a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Status summary, lives in the shared tier.
    Summary,
    /// Personal fields, lives in a private partition.
    Private,
    /// Number of history entries, lives in the shared tier.
    HistoryLen,
}

impl RecordKind {
    pub const fn prefix(&self) -> &'static str {
        match self {
            RecordKind::Summary => SUMMARY_PREFIX,
            RecordKind::Private => PRIVATE_PREFIX,
            RecordKind::HistoryLen => HISTORY_LEN_PREFIX,
        }
    }

    /// The storage key for `id` under this kind.
    pub fn key(&self, id: &CredentialId) -> String {
        format!("{}{}", self.prefix(), id.as_str())
    }
}

/// The storage key of history entry `seq` of `id`.
///
/// The sequence number is always the last `:`-separated segment, so ids
/// containing `:` cannot collide.
pub fn history_key(id: &CredentialId, seq: u64) -> String {
    format!("{}{}:{}", HISTORY_PREFIX, id.as_str(), seq)
}

/// Encode a record to bytes.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CoreError> {
    serde_json::to_vec(value).map_err(|e| CoreError::EncodingError(e.to_string()))
}

/// Decode a record from bytes.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CoreError> {
    serde_json::from_slice(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))
}
