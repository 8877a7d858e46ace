//! Inventory adjustment ledger port and its in-memory implementation.

use chrono::Utc;
use thiserror::Error;

use backoffice_core::{LocationId, VariantId};
use backoffice_events::EventEnvelope;
use backoffice_inventory::{
    AdjustStock, AdjustmentRequest, OpenStockLevel, StockLevel, StockLevelCommand, StockLevelEvent,
    StockLevelId,
};
use backoffice_products::PersistedProduct;

use crate::dispatcher::{AdjustmentDispatcher, DispatchError};
use crate::ledger_store::LedgerStore;

/// Stream type of every stock level stream.
pub const STOCK_LEVEL_STREAM: &str = "inventory.stock_level";

#[derive(Debug, Error)]
pub enum LedgerError {
    /// The ledger refused the adjustment (unknown stock level, negative result).
    #[error("adjustment rejected: {0}")]
    Rejected(String),
    /// The ledger could not be reached or failed internally.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}

impl From<DispatchError> for LedgerError {
    fn from(value: DispatchError) -> Self {
        match value {
            DispatchError::Validation(msg)
            | DispatchError::InvariantViolation(msg)
            | DispatchError::NotFound(msg) => LedgerError::Rejected(msg),
            other => LedgerError::Unavailable(other.to_string()),
        }
    }
}

/// Records stock adjustments for persisted variants.
///
/// One request, one immutable record. No retries.
#[async_trait::async_trait]
pub trait InventoryAdjustmentLedger: Send + Sync {
    async fn record(&self, request: &AdjustmentRequest) -> Result<(), LedgerError>;
}

/// Ledger backed by a [`LedgerStore`], one stream per stock level.
#[derive(Debug)]
pub struct InMemoryAdjustmentLedger<S> {
    dispatcher: AdjustmentDispatcher<S>,
}

impl<S: LedgerStore> InMemoryAdjustmentLedger<S> {
    pub fn new(store: S) -> Self {
        Self {
            dispatcher: AdjustmentDispatcher::new(store),
        }
    }

    /// Open the stock level of a freshly persisted variant at one location.
    pub fn open(
        &self,
        variant_id: VariantId,
        location_id: LocationId,
        quantity: i64,
    ) -> Result<(), LedgerError> {
        let id = StockLevelId::new(variant_id, location_id);
        let command = StockLevelCommand::Open(OpenStockLevel {
            stock_level_id: id,
            quantity,
            occurred_at: Utc::now(),
        });
        self.dispatcher
            .dispatch(id.to_string(), STOCK_LEVEL_STREAM, command, || StockLevel::empty(id))?;
        Ok(())
    }

    /// Open every (variant, location) row of a persisted product with its
    /// creation-time quantity.
    pub fn open_product(&self, product: &PersistedProduct) -> Result<(), LedgerError> {
        for variant in &product.variants {
            let Some(variant_id) = variant.id else {
                return Err(LedgerError::Rejected(format!(
                    "variant '{}' of product {} has no id",
                    variant.title, product.id
                )));
            };
            for quantity in &variant.inventory_quantities {
                self.open(variant_id, quantity.location_id, quantity.available)?;
            }
        }
        Ok(())
    }

    /// Current state of one stock level, folded from its stream.
    pub fn level(&self, variant_id: VariantId, location_id: LocationId) -> Result<StockLevel, LedgerError> {
        let id = StockLevelId::new(variant_id, location_id);
        Ok(self.dispatcher.load(&id.to_string(), || StockLevel::empty(id))?)
    }

    /// Every record of one stock level, oldest first.
    pub fn entries(
        &self,
        variant_id: VariantId,
        location_id: LocationId,
    ) -> Result<Vec<EventEnvelope<StockLevelEvent>>, LedgerError> {
        let id = StockLevelId::new(variant_id, location_id);
        let stream = self
            .dispatcher
            .store()
            .load_stream(&id.to_string())
            .map_err(|e| LedgerError::Unavailable(e.to_string()))?;

        stream
            .iter()
            .map(|stored| {
                stored.to_envelope().try_map(|payload| {
                    serde_json::from_value(payload).map_err(|e| {
                        LedgerError::Unavailable(format!(
                            "unreadable entry {} in {id}: {e}",
                            stored.sequence_number
                        ))
                    })
                })
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl<S: LedgerStore> InventoryAdjustmentLedger for InMemoryAdjustmentLedger<S> {
    async fn record(&self, request: &AdjustmentRequest) -> Result<(), LedgerError> {
        let command = AdjustStock::from_request(request, Utc::now());
        let id = command.stock_level_id;

        let committed = self.dispatcher.dispatch(
            id.to_string(),
            STOCK_LEVEL_STREAM,
            StockLevelCommand::Adjust(command),
            || StockLevel::empty(id),
        )?;

        if let Some(entry) = committed.last() {
            tracing::info!(
                stock_level = %id,
                reason = %request.reason,
                change_value = request.change_value,
                sequence_number = entry.sequence_number,
                "stock adjustment recorded"
            );
        }
        Ok(())
    }
}
