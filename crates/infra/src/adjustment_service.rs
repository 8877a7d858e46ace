//! Per-variant stock adjustments in edit mode.
//!
//! The variant row is updated locally first, then the ledger is called. A
//! ledger failure is reported to the operator and the local row keeps the
//! new value until the product is fetched again.

use serde::{Deserialize, Serialize};

use backoffice_core::{DocumentId, LocationId};
use backoffice_inventory::{AdjustmentDraft, AdjustmentReason, AllocationTarget, InventoryQuantity};
use backoffice_products::Variant;

use crate::ledger::InventoryAdjustmentLedger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// Operator-facing outcome of an adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

pub struct AdjustmentService<L> {
    ledger: L,
}

impl<L: InventoryAdjustmentLedger> AdjustmentService<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Apply `draft` to `variant` at `location_id` and record it.
    ///
    /// A zero delta changes nothing and never reaches the ledger.
    pub async fn adjust(
        &self,
        variant: &mut Variant,
        location_id: LocationId,
        draft: AdjustmentDraft,
        reason: AdjustmentReason,
        reference_document_id: Option<DocumentId>,
    ) -> Notification {
        let Some(variant_id) = variant.id else {
            return Notification::error(format!(
                "variant '{}' must be saved before its stock can be adjusted",
                variant.title
            ));
        };

        let request = match draft.into_request(variant_id, location_id, reason, reference_document_id) {
            Ok(Some(request)) => request,
            Ok(None) => return Notification::info("no change"),
            Err(e) => return Notification::error(e.to_string()),
        };

        let total = draft.total();
        match variant.quantity_at_mut(location_id) {
            Some(row) => {
                row.available = total;
                row.on_hand = total;
            }
            None => variant
                .inventory_quantities
                .push(InventoryQuantity::uniform(location_id, total)),
        }

        match self.ledger.record(&request).await {
            Ok(()) => Notification::success(format!(
                "{} at location {location_id}: {:+} ({reason}), now {total}",
                variant.title, request.change_value
            )),
            Err(e) => {
                tracing::warn!(
                    variant_id = %variant_id,
                    location_id = %location_id,
                    change_value = request.change_value,
                    error = %e,
                    "stock adjustment failed; local quantity left as edited"
                );
                Notification::error(format!("could not adjust stock: {e}"))
            }
        }
    }
}
