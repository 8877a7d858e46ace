//! Starting stock per location for variants that do not exist yet.
//!
//! While a product is being created every variant starts from the same
//! per-location quantities. The table is the template; each variant receives
//! its own copy whenever the template changes (copy-on-create, never a shared
//! reference), so later per-variant edits cannot leak into siblings.

use serde::{Deserialize, Serialize};

use backoffice_core::{DomainError, DomainResult, LocationId};

use crate::quantity::{AllocationTarget, InventoryQuantity};

/// One row per active location, in activation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryAllocationTable {
    rows: Vec<InventoryQuantity>,
}

impl InventoryAllocationTable {
    /// Zeroed rows for the given active locations. Duplicate ids are ignored.
    pub fn for_locations(locations: impl IntoIterator<Item = LocationId>) -> Self {
        let mut rows: Vec<InventoryQuantity> = Vec::new();
        for location_id in locations {
            if !rows.iter().any(|r| r.location_id == location_id) {
                rows.push(InventoryQuantity::zero(location_id));
            }
        }
        Self { rows }
    }

    pub fn rows(&self) -> &[InventoryQuantity] {
        &self.rows
    }

    pub fn locations(&self) -> impl Iterator<Item = LocationId> + '_ {
        self.rows.iter().map(|r| r.location_id)
    }

    pub fn quantity(&self, location_id: LocationId) -> Option<i64> {
        self.rows
            .iter()
            .find(|r| r.location_id == location_id)
            .map(|r| r.available)
    }

    /// Owned copy of the current rows, as handed to a newly created variant.
    pub fn snapshot(&self) -> Vec<InventoryQuantity> {
        self.rows.clone()
    }

    /// Set the starting quantity for one location and copy the whole table
    /// onto every target.
    ///
    /// `available` and `on_hand` move together; there is no way to make them
    /// diverge before the product is persisted.
    pub fn set_location_quantity<T: AllocationTarget>(
        &mut self,
        location_id: LocationId,
        quantity: i64,
        targets: &mut [T],
    ) -> DomainResult<()> {
        if quantity < 0 {
            return Err(DomainError::validation(format!(
                "quantity for location {location_id} cannot be negative"
            )));
        }

        if !self.rows.iter().any(|r| r.location_id == location_id) {
            return Err(DomainError::not_found(format!("location {location_id}")));
        }
        // The per-variant total must stay representable.
        self.rows
            .iter()
            .filter(|r| r.location_id != location_id)
            .try_fold(quantity, |acc, r| acc.checked_add(r.available))
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "quantity {quantity} for location {location_id} is out of range"
                ))
            })?;

        if let Some(row) = self.rows.iter_mut().find(|r| r.location_id == location_id) {
            *row = InventoryQuantity::uniform(location_id, quantity);
        }

        self.propagate(targets);
        tracing::debug!(
            location_id = %location_id,
            quantity,
            variants = targets.len(),
            "allocation propagated"
        );
        Ok(())
    }

    /// Align the table with the set of active locations.
    ///
    /// Newly active locations get a zero row, deactivated ones are removed,
    /// quantities of locations that stay active are kept. The result is copied
    /// onto every target.
    pub fn sync_locations<T: AllocationTarget>(
        &mut self,
        active: &[LocationId],
        targets: &mut [T],
    ) {
        let mut rows: Vec<InventoryQuantity> = Vec::with_capacity(active.len());
        for &location_id in active {
            if rows.iter().any(|r| r.location_id == location_id) {
                continue;
            }
            let row = self
                .rows
                .iter()
                .find(|r| r.location_id == location_id)
                .copied()
                .unwrap_or_else(|| InventoryQuantity::zero(location_id));
            rows.push(row);
        }

        let removed = self
            .rows
            .iter()
            .filter(|r| !active.contains(&r.location_id))
            .count();
        let added = rows
            .iter()
            .filter(|r| !self.rows.iter().any(|o| o.location_id == r.location_id))
            .count();

        self.rows = rows;
        self.propagate(targets);
        tracing::debug!(added, removed, "allocation locations synchronized");
    }

    /// Copy the current rows onto every target (one owned `Vec` each).
    pub fn propagate<T: AllocationTarget>(&self, targets: &mut [T]) {
        for target in targets.iter_mut() {
            target.set_inventory_quantities(self.snapshot());
        }
    }

    /// Sum of the per-location starting stock, saturated at `i64::MAX`.
    pub fn total_per_variant(&self) -> i64 {
        self.rows
            .iter()
            .fold(0i64, |acc, r| acc.saturating_add(r.available))
    }

    /// Stock available across all variants.
    ///
    /// Every variant starts with the full table, so this is the per-variant
    /// total multiplied by the number of variants, not a share of it.
    /// Saturates at `i64::MAX`.
    pub fn total_available(&self, variant_count: usize) -> i64 {
        let count = i64::try_from(variant_count).unwrap_or(i64::MAX);
        self.total_per_variant().saturating_mul(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn loc(raw: u64) -> LocationId {
        LocationId::new(raw)
    }

    fn three_targets() -> Vec<Vec<InventoryQuantity>> {
        vec![Vec::new(), Vec::new(), Vec::new()]
    }

    #[test]
    fn for_locations_creates_zero_rows_in_order() {
        let table = InventoryAllocationTable::for_locations([loc(2), loc(1), loc(2)]);
        assert_eq!(
            table.rows(),
            &[InventoryQuantity::zero(loc(2)), InventoryQuantity::zero(loc(1))]
        );
    }

    #[test]
    fn setting_a_location_propagates_to_every_variant() {
        let mut table = InventoryAllocationTable::for_locations([loc(1), loc(2)]);
        let mut variants = three_targets();

        table.set_location_quantity(loc(1), 50, &mut variants).unwrap();

        for quantities in &variants {
            assert_eq!(quantities.len(), 2);
            assert_eq!(
                quantities[0],
                InventoryQuantity {
                    location_id: loc(1),
                    available: 50,
                    on_hand: 50,
                }
            );
            assert_eq!(quantities[1], InventoryQuantity::zero(loc(2)));
        }
    }

    #[test]
    fn propagated_copies_are_independent() {
        let mut table = InventoryAllocationTable::for_locations([loc(1)]);
        let mut variants = three_targets();
        table.set_location_quantity(loc(1), 10, &mut variants).unwrap();

        variants[0].quantity_at_mut(loc(1)).unwrap().available = 3;

        assert_eq!(variants[1][0].available, 10);
        assert_eq!(table.quantity(loc(1)), Some(10));
    }

    #[test]
    fn unknown_location_is_not_found() {
        let mut table = InventoryAllocationTable::for_locations([loc(1)]);
        let mut variants = three_targets();
        let err = table
            .set_location_quantity(loc(9), 5, &mut variants)
            .unwrap_err();
        match err {
            DomainError::NotFound(_) => {}
            _ => panic!("Expected NotFound error for unknown location"),
        }
        assert!(variants.iter().all(|v| v.is_empty()));
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let mut table = InventoryAllocationTable::for_locations([loc(1)]);
        let mut variants = three_targets();
        let err = table
            .set_location_quantity(loc(1), -1, &mut variants)
            .unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for negative quantity"),
        }
    }

    #[test]
    fn total_available_multiplies_by_variant_count() {
        let mut table = InventoryAllocationTable::for_locations([loc(1), loc(2)]);
        let mut variants = three_targets();
        table.set_location_quantity(loc(1), 50, &mut variants).unwrap();
        table.set_location_quantity(loc(2), 5, &mut variants).unwrap();

        assert_eq!(table.total_per_variant(), 55);
        assert_eq!(table.total_available(variants.len()), 165);
        assert_eq!(table.total_available(0), 0);
    }

    #[test]
    fn extreme_quantities_do_not_overflow() {
        let mut table = InventoryAllocationTable::for_locations([loc(1), loc(2)]);
        let mut variants = three_targets();
        table.set_location_quantity(loc(1), i64::MAX, &mut variants).unwrap();

        let err = table
            .set_location_quantity(loc(2), 1, &mut variants)
            .unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("out of range")),
            _ => panic!("Expected Validation error for overflowing total"),
        }
        assert_eq!(table.quantity(loc(2)), Some(0));
        assert_eq!(variants[0][1], InventoryQuantity::zero(loc(2)));

        assert_eq!(table.total_per_variant(), i64::MAX);
        assert_eq!(table.total_available(3), i64::MAX);
        assert_eq!(table.total_available(usize::MAX), i64::MAX);
    }

    #[test]
    fn sync_locations_keeps_quantities_and_drops_inactive_rows() {
        let mut table = InventoryAllocationTable::for_locations([loc(1), loc(2)]);
        let mut variants = three_targets();
        table.set_location_quantity(loc(1), 50, &mut variants).unwrap();
        table.set_location_quantity(loc(2), 7, &mut variants).unwrap();

        table.sync_locations(&[loc(1), loc(3)], &mut variants);

        assert_eq!(
            table.rows(),
            &[InventoryQuantity::uniform(loc(1), 50), InventoryQuantity::zero(loc(3))]
        );
        for quantities in &variants {
            assert_eq!(quantities.as_slice(), table.rows());
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: after any sequence of edits every variant holds exactly the table.
        #[test]
        fn variants_always_mirror_the_table(
            edits in prop::collection::vec((1u64..4, 0i64..1_000), 1..20),
            variant_count in 0usize..6
        ) {
            let mut table = InventoryAllocationTable::for_locations([loc(1), loc(2), loc(3)]);
            let mut variants: Vec<Vec<InventoryQuantity>> = vec![Vec::new(); variant_count];

            for (location, quantity) in edits {
                table.set_location_quantity(loc(location), quantity, &mut variants).unwrap();
            }

            for quantities in &variants {
                prop_assert_eq!(quantities.as_slice(), table.rows());
                for row in quantities {
                    prop_assert_eq!(row.available, row.on_hand);
                }
            }
            prop_assert_eq!(
                table.total_available(variant_count),
                table.total_per_variant() * variant_count as i64
            );
        }
    }
}
