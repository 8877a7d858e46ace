//! Merging freshly generated combinations with the variants already on screen.
//!
//! A previous row is reused when it stands for the same combination: first by
//! value-key signature (so renaming "Red" to "Crimson" keeps the row and its
//! edits), then by exact title (rows loaded from the backend carry no
//! signature). Each previous row is claimed at most once.

use std::collections::HashMap;

use backoffice_inventory::InventoryAllocationTable;

use crate::attribute::AttributeSet;
use crate::combination::{Combination, generate};
use crate::key::{KeyAllocator, RowKey, ValueKey};
use crate::variant::{Variant, VariantTemplate};

/// Outcome of a reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// One row per combination, in combination order.
    pub variants: Vec<Variant>,
    /// Rows carried over from the previous list.
    pub reused: usize,
    /// Rows synthesized from the template.
    pub created: usize,
    /// Previous rows whose combination no longer exists.
    pub dropped: Vec<Variant>,
}

/// Rebuild the variant list for `combinations`.
///
/// Reused rows keep every operator edit (SKU, price, image, stock, position...)
/// and only get their title and options refreshed. Unmatched combinations become
/// new rows built from `template`, with `position = index + 1` and their own
/// copy of the allocation table. Previous rows that match nothing are removed
/// from the list and reported in [`Reconciliation::dropped`].
pub fn reconcile(
    previous: Vec<Variant>,
    combinations: &[Combination],
    template: &VariantTemplate,
    allocation: &InventoryAllocationTable,
    keys: &mut KeyAllocator,
) -> Reconciliation {
    let mut slots: Vec<Option<Variant>> = previous.into_iter().map(Some).collect();

    let mut by_signature: HashMap<&[ValueKey], usize> = HashMap::new();
    for (idx, variant) in slots.iter().enumerate() {
        if let Some(signature) = variant.as_ref().and_then(|v| v.signature.as_deref()) {
            by_signature.entry(signature).or_insert(idx);
        }
    }

    // Pass 1: signature matches, so a title fallback can never steal a row
    // that belongs to a later combination.
    let mut claimed: Vec<Option<usize>> = combinations
        .iter()
        .map(|c| by_signature.get(c.signature.as_slice()).copied())
        .collect();
    drop(by_signature);

    let mut taken = vec![false; slots.len()];
    for idx in claimed.iter().flatten() {
        taken[*idx] = true;
    }

    // Pass 2: exact title matches among the rows nobody claimed.
    for (combination, claim) in combinations.iter().zip(claimed.iter_mut()) {
        if claim.is_some() {
            continue;
        }
        let found = slots.iter().enumerate().position(|(idx, slot)| {
            !taken[idx]
                && slot
                    .as_ref()
                    .is_some_and(|v| v.title == combination.title)
        });
        if let Some(idx) = found {
            taken[idx] = true;
            *claim = Some(idx);
        }
    }

    let mut variants = Vec::with_capacity(combinations.len());
    let mut reused = 0;
    let mut created = 0;
    for (idx, (combination, claim)) in combinations.iter().zip(claimed).enumerate() {
        let variant = match claim.and_then(|slot| slots[slot].take()) {
            Some(mut variant) => {
                variant.rebind(combination);
                reused += 1;
                variant
            }
            None => {
                created += 1;
                Variant::from_template(
                    keys.next(),
                    combination,
                    template,
                    idx as u32 + 1,
                    allocation.snapshot(),
                )
            }
        };
        variants.push(variant);
    }

    let dropped: Vec<Variant> = slots.into_iter().flatten().collect();
    if !dropped.is_empty() {
        tracing::info!(
            dropped = dropped.len(),
            titles = ?dropped.iter().map(|v| v.title.as_str()).collect::<Vec<_>>(),
            "variants removed by attribute edit"
        );
    }
    tracing::debug!(
        combinations = combinations.len(),
        reused,
        created,
        dropped = dropped.len(),
        "variants reconciled"
    );

    Reconciliation {
        variants,
        reused,
        created,
        dropped,
    }
}

/// Combinations of `attributes` that no current row stands for.
///
/// Read-only: the current list is neither reordered nor modified.
pub fn missing(attributes: &AttributeSet, current: &[Variant]) -> Vec<Combination> {
    generate(attributes)
        .into_iter()
        .filter(|c| !current.iter().any(|v| v.matches(c)))
        .collect()
}

/// Append a row for every missing combination, leaving existing rows
/// untouched. New rows continue the position sequence after the current
/// list. Returns the keys of the appended rows.
pub fn add_missing(
    current: &mut Vec<Variant>,
    attributes: &AttributeSet,
    template: &VariantTemplate,
    allocation: &InventoryAllocationTable,
    keys: &mut KeyAllocator,
) -> Vec<RowKey> {
    let missing = missing(attributes, current);
    let start = current.len() as u32;

    let mut added = Vec::with_capacity(missing.len());
    for (offset, combination) in missing.iter().enumerate() {
        let key: RowKey = keys.next();
        current.push(Variant::from_template(
            key,
            combination,
            template,
            start + offset as u32 + 1,
            allocation.snapshot(),
        ));
        added.push(key);
    }

    tracing::debug!(added = added.len(), total = current.len(), "missing variants added");
    added
}
