use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use backoffice_core::{
    Aggregate, AggregateRoot, DocumentId, DomainError, LocationId, VariantId,
};
use backoffice_events::Event;

use crate::adjustment::{AdjustmentReason, AdjustmentRequest};

/// Stock level identifier: one persisted variant at one location.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StockLevelId {
    pub variant_id: VariantId,
    pub location_id: LocationId,
}

impl StockLevelId {
    pub fn new(variant_id: VariantId, location_id: LocationId) -> Self {
        Self {
            variant_id,
            location_id,
        }
    }
}

impl core::fmt::Display for StockLevelId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}@{}", self.variant_id, self.location_id)
    }
}

/// Aggregate root: StockLevel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockLevel {
    id: StockLevelId,
    available: i64,
    on_hand: i64,
    version: u64,
    opened: bool,
}

impl StockLevel {
    /// Create an empty, not-yet-opened aggregate instance for rehydration.
    pub fn empty(id: StockLevelId) -> Self {
        Self {
            id,
            available: 0,
            on_hand: 0,
            version: 0,
            opened: false,
        }
    }

    pub fn available(&self) -> i64 {
        self.available
    }

    pub fn on_hand(&self) -> i64 {
        self.on_hand
    }

    pub fn is_opened(&self) -> bool {
        self.opened
    }
}

impl AggregateRoot for StockLevel {
    type Id = StockLevelId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: OpenStockLevel (initial quantity when the variant is persisted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenStockLevel {
    pub stock_level_id: StockLevelId,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AdjustStock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustStock {
    pub stock_level_id: StockLevelId,
    pub reason: AdjustmentReason,
    pub change_value: i64,
    pub reference_document_id: Option<DocumentId>,
    pub occurred_at: DateTime<Utc>,
}

impl AdjustStock {
    pub fn from_request(request: &AdjustmentRequest, occurred_at: DateTime<Utc>) -> Self {
        Self {
            stock_level_id: StockLevelId::new(request.variant_id, request.location_id),
            reason: request.reason,
            change_value: request.change_value,
            reference_document_id: request.reference_document_id,
            occurred_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockLevelCommand {
    Open(OpenStockLevel),
    Adjust(AdjustStock),
}

/// Event: StockLevelOpened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevelOpened {
    pub stock_level_id: StockLevelId,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StockAdjusted (one immutable ledger record).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjusted {
    pub variant_id: VariantId,
    pub location_id: LocationId,
    pub reason: AdjustmentReason,
    pub change_value: i64,
    pub reference_document_id: Option<DocumentId>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockLevelEvent {
    StockLevelOpened(StockLevelOpened),
    StockAdjusted(StockAdjusted),
}

impl Event for StockLevelEvent {
    fn event_type(&self) -> &'static str {
        match self {
            StockLevelEvent::StockLevelOpened(_) => "inventory.stock_level.opened",
            StockLevelEvent::StockAdjusted(_) => "inventory.stock_level.adjusted",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            StockLevelEvent::StockLevelOpened(e) => e.occurred_at,
            StockLevelEvent::StockAdjusted(e) => e.occurred_at,
        }
    }
}

impl Aggregate for StockLevel {
    type Command = StockLevelCommand;
    type Event = StockLevelEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            StockLevelEvent::StockLevelOpened(e) => {
                self.id = e.stock_level_id;
                self.available = e.quantity;
                self.on_hand = e.quantity;
                self.opened = true;
            }
            StockLevelEvent::StockAdjusted(e) => {
                self.available = self.available.saturating_add(e.change_value);
                self.on_hand = self.on_hand.saturating_add(e.change_value);
            }
        }

        // +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            StockLevelCommand::Open(cmd) => self.handle_open(cmd),
            StockLevelCommand::Adjust(cmd) => self.handle_adjust(cmd),
        }
    }
}

impl StockLevel {
    fn ensure_stock_level_id(&self, id: StockLevelId) -> Result<(), DomainError> {
        if self.id != id {
            return Err(DomainError::invariant("stock_level_id mismatch"));
        }
        Ok(())
    }

    fn handle_open(&self, cmd: &OpenStockLevel) -> Result<Vec<StockLevelEvent>, DomainError> {
        if self.opened {
            return Err(DomainError::conflict(format!(
                "stock level {} already opened",
                self.id
            )));
        }
        if cmd.quantity < 0 {
            return Err(DomainError::validation("opening quantity cannot be negative"));
        }
        Ok(vec![StockLevelEvent::StockLevelOpened(StockLevelOpened {
            stock_level_id: cmd.stock_level_id,
            quantity: cmd.quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_adjust(&self, cmd: &AdjustStock) -> Result<Vec<StockLevelEvent>, DomainError> {
        if !self.opened {
            return Err(DomainError::not_found(format!("stock level {}", cmd.stock_level_id)));
        }
        self.ensure_stock_level_id(cmd.stock_level_id)?;

        // Nothing changed, nothing to record.
        if cmd.change_value == 0 {
            return Ok(vec![]);
        }

        let (Some(new_available), Some(_)) = (
            self.available.checked_add(cmd.change_value),
            self.on_hand.checked_add(cmd.change_value),
        ) else {
            return Err(DomainError::validation(format!(
                "adjustment of {} to stock level {} is out of range",
                cmd.change_value, self.id
            )));
        };
        if new_available < 0 {
            return Err(DomainError::invariant("stock cannot go negative"));
        }

        Ok(vec![StockLevelEvent::StockAdjusted(StockAdjusted {
            variant_id: cmd.stock_level_id.variant_id,
            location_id: cmd.stock_level_id.location_id,
            reason: cmd.reason,
            change_value: cmd.change_value,
            reference_document_id: cmd.reference_document_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_id() -> StockLevelId {
        StockLevelId::new(VariantId::new(11), LocationId::new(1))
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn opened(quantity: i64) -> StockLevel {
        let mut level = StockLevel::empty(test_id());
        let events = level
            .handle(&StockLevelCommand::Open(OpenStockLevel {
                stock_level_id: test_id(),
                quantity,
                occurred_at: test_time(),
            }))
            .unwrap();
        for e in &events {
            level.apply(e);
        }
        level
    }

    fn adjust(delta: i64) -> StockLevelCommand {
        StockLevelCommand::Adjust(AdjustStock {
            stock_level_id: test_id(),
            reason: AdjustmentReason::Correction,
            change_value: delta,
            reference_document_id: None,
            occurred_at: test_time(),
        })
    }

    #[test]
    fn open_sets_available_and_on_hand() {
        let level = opened(20);
        assert!(level.is_opened());
        assert_eq!(level.available(), 20);
        assert_eq!(level.on_hand(), 20);
        assert_eq!(level.version(), 1);
    }

    #[test]
    fn open_twice_is_a_conflict() {
        let level = opened(20);
        let err = level
            .handle(&StockLevelCommand::Open(OpenStockLevel {
                stock_level_id: test_id(),
                quantity: 1,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        match err {
            DomainError::Conflict(_) => {}
            _ => panic!("Expected Conflict error for second open"),
        }
    }

    #[test]
    fn adjust_emits_stock_adjusted_with_reason() {
        let level = opened(20);
        let events = level.handle(&adjust(-5)).unwrap();
        assert_eq!(events.len(), 1);

        match &events[0] {
            StockLevelEvent::StockAdjusted(e) => {
                assert_eq!(e.change_value, -5);
                assert_eq!(e.reason, AdjustmentReason::Correction);
                assert_eq!(e.variant_id, VariantId::new(11));
                assert_eq!(e.location_id, LocationId::new(1));
            }
            _ => panic!("Expected StockAdjusted event"),
        }
        assert_eq!(events[0].event_type(), "inventory.stock_level.adjusted");
    }

    #[test]
    fn zero_delta_records_nothing() {
        let level = opened(20);
        let events = level.handle(&adjust(0)).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn adjust_before_open_is_not_found() {
        let level = StockLevel::empty(test_id());
        let err = level.handle(&adjust(5)).unwrap_err();
        match err {
            DomainError::NotFound(_) => {}
            _ => panic!("Expected NotFound error for unopened stock level"),
        }
    }

    #[test]
    fn adjust_cannot_go_negative() {
        let level = opened(3);
        let err = level.handle(&adjust(-4)).unwrap_err();
        match err {
            DomainError::InvariantViolation(_) => {}
            _ => panic!("Expected InvariantViolation for negative stock"),
        }
    }

    #[test]
    fn adjust_beyond_i64_range_is_a_validation_error() {
        let mut level = opened(i64::MAX - 1);
        let err = level.handle(&adjust(2)).unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("out of range")),
            _ => panic!("Expected Validation error for overflowing adjustment"),
        }

        for e in level.handle(&adjust(1)).unwrap() {
            level.apply(&e);
        }
        assert_eq!(level.available(), i64::MAX);
    }

    #[test]
    fn adjust_rejects_foreign_stream() {
        let level = opened(3);
        let cmd = StockLevelCommand::Adjust(AdjustStock {
            stock_level_id: StockLevelId::new(VariantId::new(12), LocationId::new(1)),
            reason: AdjustmentReason::Received,
            change_value: 1,
            reference_document_id: None,
            occurred_at: test_time(),
        });
        match level.handle(&cmd).unwrap_err() {
            DomainError::InvariantViolation(_) => {}
            _ => panic!("Expected InvariantViolation for mismatched id"),
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: the level equals the opening quantity plus every accepted delta.
        #[test]
        fn level_is_opening_plus_accepted_deltas(
            opening in 0i64..500,
            deltas in prop::collection::vec(-50i64..50, 0..30)
        ) {
            let mut level = opened(opening);
            let mut expected = opening;
            let mut recorded = 0u64;

            for delta in deltas {
                match level.handle(&adjust(delta)) {
                    Ok(events) => {
                        if delta == 0 {
                            prop_assert!(events.is_empty());
                        }
                        for e in &events {
                            level.apply(e);
                            recorded += 1;
                        }
                        expected += delta;
                    }
                    Err(_) => prop_assert!(expected + delta < 0),
                }
            }

            prop_assert_eq!(level.available(), expected);
            prop_assert_eq!(level.on_hand(), expected);
            prop_assert!(level.available() >= 0);
            prop_assert_eq!(level.version(), 1 + recorded);
        }
    }
}
