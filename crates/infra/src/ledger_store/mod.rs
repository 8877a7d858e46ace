//! Append-only store for inventory ledger streams.
//!
//! One stream per stock level (variant at a location). Records are never
//! modified or deleted; the current quantity is the fold of its stream.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryLedgerStore;
pub use r#trait::{LedgerStore, LedgerStoreError, StoredEntry, UncommittedEntry};
