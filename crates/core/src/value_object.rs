//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity** - they are defined entirely by their
//! attribute values. Two per-location quantities with the same location and
//! the same numbers are the same quantity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" a
/// value object, build a new one.
///
/// ## Value Object vs Entity
///
/// - **Value Object**: `InventoryQuantity { location_id: 1, available: 50, on_hand: 50 }`
/// - **Entity**: a variant row, which keeps its identity while its price,
///   SKU or even title changes
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct InventoryQuantity {
///     location_id: LocationId,
///     available: i64,
///     on_hand: i64,
/// }
///
/// impl ValueObject for InventoryQuantity {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
