//! Inventory domain module.
//!
//! This crate contains the per-location stock rules for catalog variants,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage):
//!
//! - [`InventoryAllocationTable`]: the starting stock per location, copied onto
//!   every variant while a product is being created.
//! - [`AdjustmentDraft`]: the signed-delta editor used once a variant exists.
//! - [`StockLevel`]: the ledger-backed aggregate for one variant at one location.

pub mod adjustment;
pub mod allocation;
pub mod quantity;
pub mod stock_level;

pub use adjustment::{AdjustmentDraft, AdjustmentReason, AdjustmentRequest};
pub use allocation::InventoryAllocationTable;
pub use quantity::{AllocationTarget, InventoryQuantity};
pub use stock_level::{
    AdjustStock, OpenStockLevel, StockAdjusted, StockLevel, StockLevelCommand, StockLevelEvent,
    StockLevelId, StockLevelOpened,
};
