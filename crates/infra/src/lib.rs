//! Infrastructure layer: ledger storage, backend ports, config.

pub mod adjustment_service;
pub mod catalog;
pub mod config;
pub mod dispatcher;
pub mod ledger;
pub mod ledger_store;
pub mod matrix;

#[cfg(test)]
mod integration_tests;

pub use adjustment_service::{AdjustmentService, Notification, NotificationLevel};
pub use catalog::{CatalogError, InMemoryProductCatalog, ProductCatalog};
pub use config::{BackofficeConfig, ConfigError};
pub use dispatcher::{AdjustmentDispatcher, DispatchError};
pub use ledger::{InMemoryAdjustmentLedger, InventoryAdjustmentLedger, LedgerError};
pub use ledger_store::{InMemoryLedgerStore, LedgerStore, LedgerStoreError};
