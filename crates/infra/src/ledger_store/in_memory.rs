use std::collections::HashMap;
use std::sync::RwLock;

use backoffice_core::ExpectedVersion;

use super::r#trait::{LedgerStore, LedgerStoreError, StoredEntry, UncommittedEntry};

/// In-memory append-only ledger store.
///
/// Intended for tests and the local CLI.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    streams: RwLock<HashMap<String, Vec<StoredEntry>>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn current_version(stream: &[StoredEntry]) -> u64 {
        stream.last().map(|e| e.sequence_number).unwrap_or(0)
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn append(
        &self,
        entries: Vec<UncommittedEntry>,
        expected_version: ExpectedVersion,
    ) -> Result<Vec<StoredEntry>, LedgerStoreError> {
        if entries.is_empty() {
            return Ok(vec![]);
        }

        let stream_id = entries[0].stream_id.clone();
        let stream_type = entries[0].stream_type.clone();

        for (idx, e) in entries.iter().enumerate() {
            if e.stream_id != stream_id {
                return Err(LedgerStoreError::InvalidAppend(format!(
                    "batch contains multiple stream_ids (index {idx})"
                )));
            }
            if e.stream_type != stream_type {
                return Err(LedgerStoreError::StreamTypeMismatch(format!(
                    "batch contains multiple stream_types (index {idx})"
                )));
            }
        }

        let mut streams = self
            .streams
            .write()
            .map_err(|_| LedgerStoreError::InvalidAppend("lock poisoned".to_string()))?;

        let stream = streams.entry(stream_id).or_default();
        let current = Self::current_version(stream);

        if !expected_version.matches(current) {
            return Err(LedgerStoreError::Concurrency(format!(
                "expected {expected_version:?}, found {current}"
            )));
        }

        if let Some(existing) = stream.first() {
            if existing.stream_type != stream_type {
                return Err(LedgerStoreError::StreamTypeMismatch(format!(
                    "stream type is '{}', attempted append with '{}'",
                    existing.stream_type, stream_type
                )));
            }
        }

        let mut committed = Vec::with_capacity(entries.len());
        for (offset, e) in entries.into_iter().enumerate() {
            committed.push(StoredEntry {
                entry_id: e.entry_id,
                stream_id: e.stream_id,
                stream_type: e.stream_type,
                sequence_number: current + offset as u64 + 1,
                event_type: e.event_type,
                event_version: e.event_version,
                occurred_at: e.occurred_at,
                payload: e.payload,
            });
        }
        stream.extend(committed.iter().cloned());

        Ok(committed)
    }

    fn load_stream(&self, stream_id: &str) -> Result<Vec<StoredEntry>, LedgerStoreError> {
        let streams = self
            .streams
            .read()
            .map_err(|_| LedgerStoreError::InvalidAppend("lock poisoned".to_string()))?;

        Ok(streams.get(stream_id).cloned().unwrap_or_default())
    }
}
