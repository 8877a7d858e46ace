use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use backoffice_core::{EntryId, ExpectedVersion};
use backoffice_events::{Event, EventEnvelope};
use std::sync::Arc;

/// A ledger entry ready to be appended (no sequence number yet).
///
/// Built from a typed domain event with [`UncommittedEntry::from_typed`],
/// which serializes the payload and captures the event metadata needed to
/// read it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UncommittedEntry {
    pub entry_id: EntryId,
    pub stream_id: String,
    pub stream_type: String,

    pub event_type: String,
    pub event_version: u32,
    pub occurred_at: DateTime<Utc>,

    pub payload: JsonValue,
}

/// A persisted ledger entry.
///
/// Sequence numbers are assigned by the store on append: per stream, starting
/// at 1, without gaps, never reassigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub entry_id: EntryId,
    pub stream_id: String,
    pub stream_type: String,

    /// Monotonically increasing position in the stream.
    pub sequence_number: u64,

    pub event_type: String,
    pub event_version: u32,
    pub occurred_at: DateTime<Utc>,

    pub payload: JsonValue,
}

impl StoredEntry {
    /// Envelope handed to ledger consumers.
    pub fn to_envelope(&self) -> EventEnvelope<JsonValue> {
        EventEnvelope::new(
            self.entry_id,
            self.stream_id.clone(),
            self.stream_type.clone(),
            self.sequence_number,
            self.payload.clone(),
        )
    }
}

/// Ledger store operation error.
///
/// Infrastructure failures only; business rule violations surface as
/// `DomainError` before anything reaches the store.
#[derive(Debug, Error)]
pub enum LedgerStoreError {
    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    #[error("stream type mismatch: {0}")]
    StreamTypeMismatch(String),

    #[error("invalid append: {0}")]
    InvalidAppend(String),
}

/// Append-only ledger store.
///
/// `append` takes a batch for a single stream, checks `expected_version`
/// against the current stream version and assigns sequence numbers starting
/// at `current_version + 1`. The batch is stored entirely or not at all.
///
/// `load_stream` returns the stream in sequence order, or an empty vector for
/// a stream that was never written.
pub trait LedgerStore: Send + Sync {
    fn append(
        &self,
        entries: Vec<UncommittedEntry>,
        expected_version: ExpectedVersion,
    ) -> Result<Vec<StoredEntry>, LedgerStoreError>;

    fn load_stream(&self, stream_id: &str) -> Result<Vec<StoredEntry>, LedgerStoreError>;
}

impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    fn append(
        &self,
        entries: Vec<UncommittedEntry>,
        expected_version: ExpectedVersion,
    ) -> Result<Vec<StoredEntry>, LedgerStoreError> {
        (**self).append(entries, expected_version)
    }

    fn load_stream(&self, stream_id: &str) -> Result<Vec<StoredEntry>, LedgerStoreError> {
        (**self).load_stream(stream_id)
    }
}

impl UncommittedEntry {
    /// Wrap a typed domain event for appending to `stream_id`.
    pub fn from_typed<E>(
        stream_id: impl Into<String>,
        stream_type: impl Into<String>,
        entry_id: EntryId,
        event: &E,
    ) -> Result<Self, LedgerStoreError>
    where
        E: Event + Serialize,
    {
        let payload = serde_json::to_value(event).map_err(|e| {
            LedgerStoreError::InvalidAppend(format!("payload serialization failed: {e}"))
        })?;

        Ok(Self {
            entry_id,
            stream_id: stream_id.into(),
            stream_type: stream_type.into(),
            event_type: event.event_type().to_string(),
            event_version: event.version(),
            occurred_at: event.occurred_at(),
            payload,
        })
    }
}
