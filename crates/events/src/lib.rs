//! Ledger events: immutable records of accepted changes.

pub mod envelope;
pub mod event;

pub use envelope::EventEnvelope;
pub use event::Event;
