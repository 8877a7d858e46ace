//! Command execution pipeline for ledger-backed aggregates.
//!
//! ```text
//! Command
//!   ↓
//! 1. Load the stream from the ledger store
//!   ↓
//! 2. Rehydrate the aggregate (apply recorded entries in order)
//!   ↓
//! 3. Handle the command (pure decision, produces events)
//!   ↓
//! 4. Append the events (optimistic concurrency on the loaded version)
//! ```
//!
//! A decision with no events appends nothing. No IO happens here beyond the
//! injected store.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use backoffice_core::{Aggregate, DomainError, EntryId, ExpectedVersion};

use crate::ledger_store::{LedgerStore, LedgerStoreError, StoredEntry, UncommittedEntry};

#[derive(Debug, Error)]
pub enum DispatchError {
    /// Optimistic concurrency failure (stale stream version).
    #[error("concurrency conflict: {0}")]
    Concurrency(String),
    /// Domain validation failure.
    #[error("validation failed: {0}")]
    Validation(String),
    /// Domain invariant failure.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// Recorded payloads could not be read back as the aggregate's event type.
    #[error("failed to deserialize ledger entry: {0}")]
    Deserialize(String),
    #[error(transparent)]
    Store(LedgerStoreError),
}

impl From<LedgerStoreError> for DispatchError {
    fn from(value: LedgerStoreError) -> Self {
        match value {
            LedgerStoreError::Concurrency(msg) => DispatchError::Concurrency(msg),
            other => DispatchError::Store(other),
        }
    }
}

impl From<DomainError> for DispatchError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => DispatchError::Validation(msg),
            DomainError::InvariantViolation(msg) => DispatchError::InvariantViolation(msg),
            DomainError::Conflict(msg) => DispatchError::Concurrency(msg),
            DomainError::NotFound(msg) => DispatchError::NotFound(msg),
            DomainError::InvalidId(msg) => DispatchError::Validation(msg),
        }
    }
}

/// Runs stock commands against the ledger store.
#[derive(Debug)]
pub struct AdjustmentDispatcher<S> {
    store: S,
}

impl<S> AdjustmentDispatcher<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: LedgerStore> AdjustmentDispatcher<S> {
    /// Dispatch a command through load, rehydrate, handle and append.
    ///
    /// Returns the committed entries; empty when the aggregate decided there
    /// was nothing to record. A concurrent append to the same stream between
    /// load and append fails with [`DispatchError::Concurrency`].
    pub fn dispatch<A>(
        &self,
        stream_id: impl Into<String>,
        stream_type: impl Into<String>,
        command: A::Command,
        make_aggregate: impl FnOnce() -> A,
    ) -> Result<Vec<StoredEntry>, DispatchError>
    where
        A: Aggregate<Error = DomainError>,
        A::Event: backoffice_events::Event + Serialize + DeserializeOwned,
    {
        let stream_id = stream_id.into();

        let history = self.store.load_stream(&stream_id)?;
        validate_loaded_stream(&stream_id, &history)?;
        let expected = ExpectedVersion::Exact(stream_version(&history));

        let mut aggregate = make_aggregate();
        apply_history::<A>(&mut aggregate, &history)?;

        let decided = aggregate.handle(&command)?;
        if decided.is_empty() {
            return Ok(vec![]);
        }

        let stream_type = stream_type.into();
        let uncommitted = decided
            .iter()
            .map(|ev| {
                UncommittedEntry::from_typed(
                    stream_id.clone(),
                    stream_type.clone(),
                    EntryId::new(),
                    ev,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.store.append(uncommitted, expected)?)
    }

    /// Rebuild the current state of a stream without handling anything.
    pub fn load<A>(&self, stream_id: &str, make_aggregate: impl FnOnce() -> A) -> Result<A, DispatchError>
    where
        A: Aggregate,
        A::Event: DeserializeOwned,
    {
        let history = self.store.load_stream(stream_id)?;
        validate_loaded_stream(stream_id, &history)?;
        let mut aggregate = make_aggregate();
        apply_history::<A>(&mut aggregate, &history)?;
        Ok(aggregate)
    }
}

fn stream_version(stream: &[StoredEntry]) -> u64 {
    stream.last().map(|e| e.sequence_number).unwrap_or(0)
}

fn validate_loaded_stream(stream_id: &str, stream: &[StoredEntry]) -> Result<(), DispatchError> {
    let mut last = 0u64;
    for (idx, e) in stream.iter().enumerate() {
        if e.stream_id != stream_id {
            return Err(DispatchError::Store(LedgerStoreError::InvalidAppend(format!(
                "loaded stream contains wrong stream_id at index {idx}"
            ))));
        }
        if e.sequence_number <= last {
            return Err(DispatchError::Store(LedgerStoreError::InvalidAppend(format!(
                "non-monotonic sequence_number in loaded stream (last={last}, found={})",
                e.sequence_number
            ))));
        }
        last = e.sequence_number;
    }
    Ok(())
}

fn apply_history<A>(aggregate: &mut A, history: &[StoredEntry]) -> Result<(), DispatchError>
where
    A: Aggregate,
    A::Event: DeserializeOwned,
{
    for stored in history {
        let ev: A::Event = serde_json::from_value(stored.payload.clone())
            .map_err(|e| DispatchError::Deserialize(e.to_string()))?;
        aggregate.apply(&ev);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_core::{AggregateRoot, LocationId, VariantId};
    use backoffice_inventory::{
        AdjustStock, AdjustmentReason, OpenStockLevel, StockLevel, StockLevelCommand, StockLevelId,
    };
    use chrono::Utc;

    use crate::ledger_store::InMemoryLedgerStore;

    const STREAM_TYPE: &str = "inventory.stock_level";

    fn level_id() -> StockLevelId {
        StockLevelId::new(VariantId::new(5), LocationId::new(1))
    }

    fn open(quantity: i64) -> StockLevelCommand {
        StockLevelCommand::Open(OpenStockLevel {
            stock_level_id: level_id(),
            quantity,
            occurred_at: Utc::now(),
        })
    }

    fn adjust(delta: i64) -> StockLevelCommand {
        StockLevelCommand::Adjust(AdjustStock {
            stock_level_id: level_id(),
            reason: AdjustmentReason::CycleCount,
            change_value: delta,
            reference_document_id: None,
            occurred_at: Utc::now(),
        })
    }

    fn dispatch(
        dispatcher: &AdjustmentDispatcher<InMemoryLedgerStore>,
        command: StockLevelCommand,
    ) -> Result<Vec<StoredEntry>, DispatchError> {
        dispatcher.dispatch(level_id().to_string(), STREAM_TYPE, command, || {
            StockLevel::empty(level_id())
        })
    }

    #[test]
    fn adjustments_fold_into_current_level() {
        let dispatcher = AdjustmentDispatcher::new(InMemoryLedgerStore::new());
        dispatch(&dispatcher, open(10)).unwrap();
        let committed = dispatch(&dispatcher, adjust(-4)).unwrap();
        assert_eq!(committed.len(), 1);
        assert_eq!(committed[0].sequence_number, 2);
        assert_eq!(committed[0].event_type, "inventory.stock_level.adjusted");

        let level = dispatcher
            .load(&level_id().to_string(), || StockLevel::empty(level_id()))
            .unwrap();
        assert_eq!(level.available(), 6);
        assert_eq!(level.version(), 2);
    }

    #[test]
    fn zero_delta_appends_nothing() {
        let dispatcher = AdjustmentDispatcher::new(InMemoryLedgerStore::new());
        dispatch(&dispatcher, open(10)).unwrap();
        assert!(dispatch(&dispatcher, adjust(0)).unwrap().is_empty());
        assert_eq!(
            dispatcher.store().load_stream(&level_id().to_string()).unwrap().len(),
            1
        );
    }

    #[test]
    fn domain_errors_are_mapped() {
        let dispatcher = AdjustmentDispatcher::new(InMemoryLedgerStore::new());
        match dispatch(&dispatcher, adjust(1)).unwrap_err() {
            DispatchError::NotFound(_) => {}
            other => panic!("Expected NotFound, got {other:?}"),
        }

        dispatch(&dispatcher, open(2)).unwrap();
        match dispatch(&dispatcher, adjust(-3)).unwrap_err() {
            DispatchError::InvariantViolation(_) => {}
            other => panic!("Expected InvariantViolation, got {other:?}"),
        }
        match dispatch(&dispatcher, open(2)).unwrap_err() {
            DispatchError::Concurrency(_) => {}
            other => panic!("Expected Concurrency for second open, got {other:?}"),
        }
    }
}
