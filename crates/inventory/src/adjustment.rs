//! Signed-delta stock adjustments for variants that already exist.

use serde::{Deserialize, Serialize};

use backoffice_core::{DocumentId, DomainError, DomainResult, LocationId, VariantId};

/// Why stock changed. Every ledger record carries one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentReason {
    Correction,
    CycleCount,
    Received,
    ReturnRestock,
    Damaged,
    TheftOrLoss,
    Promotion,
    Other,
}

impl AdjustmentReason {
    pub fn as_str(self) -> &'static str {
        match self {
            AdjustmentReason::Correction => "correction",
            AdjustmentReason::CycleCount => "cycle_count",
            AdjustmentReason::Received => "received",
            AdjustmentReason::ReturnRestock => "return_restock",
            AdjustmentReason::Damaged => "damaged",
            AdjustmentReason::TheftOrLoss => "theft_or_loss",
            AdjustmentReason::Promotion => "promotion",
            AdjustmentReason::Other => "other",
        }
    }
}

impl core::fmt::Display for AdjustmentReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for AdjustmentReason {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "correction" => Ok(AdjustmentReason::Correction),
            "cycle_count" => Ok(AdjustmentReason::CycleCount),
            "received" => Ok(AdjustmentReason::Received),
            "return_restock" => Ok(AdjustmentReason::ReturnRestock),
            "damaged" => Ok(AdjustmentReason::Damaged),
            "theft_or_loss" => Ok(AdjustmentReason::TheftOrLoss),
            "promotion" => Ok(AdjustmentReason::Promotion),
            "other" => Ok(AdjustmentReason::Other),
            other => Err(DomainError::validation(format!(
                "unknown adjustment reason '{other}'"
            ))),
        }
    }
}

/// Payload accepted by the inventory adjustment ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentRequest {
    pub location_id: LocationId,
    pub variant_id: VariantId,
    pub reason: AdjustmentReason,
    /// Signed change; never zero.
    pub change_value: i64,
    pub reference_document_id: Option<DocumentId>,
}

/// Editor state for one (variant, location) adjustment.
///
/// The operator may type either the delta or the resulting total; the other
/// field is recomputed from the row's last known `available` (the baseline).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjustmentDraft {
    baseline: i64,
    delta: i64,
}

impl AdjustmentDraft {
    pub fn new(baseline: i64) -> Self {
        Self { baseline, delta: 0 }
    }

    pub fn baseline(&self) -> i64 {
        self.baseline
    }

    pub fn delta(&self) -> i64 {
        self.delta
    }

    /// Resulting quantity, saturated at the `i64` bounds.
    pub fn total(&self) -> i64 {
        self.baseline.saturating_add(self.delta)
    }

    pub fn set_delta(&mut self, delta: i64) {
        self.delta = delta;
    }

    /// Set the resulting quantity; the delta follows from the baseline.
    pub fn set_total(&mut self, total: i64) -> DomainResult<()> {
        self.delta = total.checked_sub(self.baseline).ok_or_else(|| {
            DomainError::validation(format!(
                "total {total} is out of range for baseline {}",
                self.baseline
            ))
        })?;
        Ok(())
    }

    pub fn is_noop(&self) -> bool {
        self.delta == 0
    }

    /// Build the ledger request for this draft.
    ///
    /// A zero delta yields `Ok(None)`: nothing changed, nothing is recorded.
    pub fn into_request(
        self,
        variant_id: VariantId,
        location_id: LocationId,
        reason: AdjustmentReason,
        reference_document_id: Option<DocumentId>,
    ) -> DomainResult<Option<AdjustmentRequest>> {
        if self.is_noop() {
            return Ok(None);
        }
        let total = self.baseline.checked_add(self.delta).ok_or_else(|| {
            DomainError::validation(format!(
                "adjustment of {} at location {location_id} is out of range",
                self.delta
            ))
        })?;
        if total < 0 {
            return Err(DomainError::validation(format!(
                "adjustment would leave {total} units at location {location_id}"
            )));
        }

        Ok(Some(AdjustmentRequest {
            location_id,
            variant_id,
            reason,
            change_value: self.delta,
            reference_document_id,
        }))
    }
}
