use serde::{Deserialize, Serialize};

use backoffice_core::{LocationId, ValueObject};

/// Stock of one variant at one location.
///
/// `on_hand` is kept equal to `available` while quantities are edited in bulk
/// before a product exists; afterwards the backend tracks it independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryQuantity {
    pub location_id: LocationId,
    pub available: i64,
    pub on_hand: i64,
}

impl InventoryQuantity {
    /// Quantity where available and on-hand stock are the same number.
    pub fn uniform(location_id: LocationId, quantity: i64) -> Self {
        Self {
            location_id,
            available: quantity,
            on_hand: quantity,
        }
    }

    pub fn zero(location_id: LocationId) -> Self {
        Self::uniform(location_id, 0)
    }
}

impl ValueObject for InventoryQuantity {}

/// Anything that owns its own per-location quantities.
///
/// Allocation snapshots are written through this trait so the inventory crate
/// does not need to know what a catalog variant looks like.
pub trait AllocationTarget {
    /// Current per-location quantities of this target.
    fn inventory_quantities(&self) -> &[InventoryQuantity];

    /// Replace the per-location quantities with an owned copy.
    fn set_inventory_quantities(&mut self, quantities: Vec<InventoryQuantity>);

    /// Mutable access to the row for `location_id`, if the target has one.
    fn quantity_at_mut(&mut self, location_id: LocationId) -> Option<&mut InventoryQuantity>;
}

impl AllocationTarget for Vec<InventoryQuantity> {
    fn inventory_quantities(&self) -> &[InventoryQuantity] {
        self
    }

    fn set_inventory_quantities(&mut self, quantities: Vec<InventoryQuantity>) {
        *self = quantities;
    }

    fn quantity_at_mut(&mut self, location_id: LocationId) -> Option<&mut InventoryQuantity> {
        self.iter_mut().find(|q| q.location_id == location_id)
    }
}

impl<T: AllocationTarget + ?Sized> AllocationTarget for &mut T {
    fn inventory_quantities(&self) -> &[InventoryQuantity] {
        (**self).inventory_quantities()
    }

    fn set_inventory_quantities(&mut self, quantities: Vec<InventoryQuantity>) {
        (**self).set_inventory_quantities(quantities)
    }

    fn quantity_at_mut(&mut self, location_id: LocationId) -> Option<&mut InventoryQuantity> {
        (**self).quantity_at_mut(location_id)
    }
}
