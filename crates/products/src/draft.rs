//! Product editor session.
//!
//! Holds everything the operator edits before pressing "save": the attribute
//! set, the derived variant table and the starting stock per location. All
//! operations are synchronous and deterministic; submission to the backend is
//! the caller's business.

use backoffice_core::{DomainError, DomainResult, LocationId, ProductId};
use backoffice_inventory::InventoryAllocationTable;

use crate::attribute::{AttributeSet, MAX_ATTRIBUTES};
use crate::combination::{Combination, generate};
use crate::key::{KeyAllocator, RowKey};
use crate::reconcile::{Reconciliation, add_missing, missing, reconcile};
use crate::submission::{PersistedProduct, ProductSubmission, ensure_non_empty_variants};
use crate::variant::{Attachment, Variant, VariantTemplate};

#[derive(Debug, Clone)]
pub struct ProductDraft {
    product_id: Option<ProductId>,
    attributes: AttributeSet,
    variants: Vec<Variant>,
    allocation: InventoryAllocationTable,
    rows: KeyAllocator,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self::new(MAX_ATTRIBUTES, Vec::<LocationId>::new())
    }
}

impl ProductDraft {
    /// Empty session for a new product stocked at `locations`.
    pub fn new(max_attributes: usize, locations: impl IntoIterator<Item = LocationId>) -> Self {
        Self {
            product_id: None,
            attributes: AttributeSet::new(max_attributes),
            variants: Vec::new(),
            allocation: InventoryAllocationTable::for_locations(locations),
            rows: KeyAllocator::new(),
        }
    }

    /// Session editing an existing product.
    ///
    /// Loaded rows carry no value signature, so the first regeneration matches
    /// them by title; from then on they are tracked by key.
    pub fn from_persisted(
        product: &PersistedProduct,
        max_attributes: usize,
        locations: impl IntoIterator<Item = LocationId>,
    ) -> DomainResult<Self> {
        let attributes = AttributeSet::from_payload(&product.attributes, max_attributes)?;
        let mut rows = KeyAllocator::new();

        let mut variants = product.variants.clone();
        variants.sort_by_key(|v| v.position);
        for variant in &mut variants {
            variant.key = rows.next();
            variant.signature = None;
        }

        tracing::debug!(
            product_id = %product.id,
            variants = variants.len(),
            "persisted product loaded into draft"
        );

        Ok(Self {
            product_id: Some(product.id),
            attributes,
            variants,
            allocation: InventoryAllocationTable::for_locations(locations),
            rows,
        })
    }

    pub fn product_id(&self) -> Option<ProductId> {
        self.product_id
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    /// Edit attributes. Call [`ProductDraft::regenerate`] afterwards to
    /// refresh the variant table.
    pub fn attributes_mut(&mut self) -> &mut AttributeSet {
        &mut self.attributes
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn allocation(&self) -> &InventoryAllocationTable {
        &self.allocation
    }

    pub fn variant(&self, key: RowKey) -> Option<&Variant> {
        self.variants.iter().find(|v| v.key == key)
    }

    /// Per-field edits (price, SKU, ...) after generation.
    pub fn variant_mut(&mut self, key: RowKey) -> DomainResult<&mut Variant> {
        self.variants
            .iter_mut()
            .find(|v| v.key == key)
            .ok_or_else(|| DomainError::not_found(format!("variant row {key}")))
    }

    pub fn set_variant_image(&mut self, key: RowKey, image: Option<Attachment>) -> DomainResult<()> {
        self.variant_mut(key)?.image = image;
        Ok(())
    }

    /// Current combinations of the attribute set.
    pub fn combinations(&self) -> Vec<Combination> {
        generate(&self.attributes)
    }

    /// Recompute the variant table from the attributes.
    ///
    /// `template` is read now; rows created later by another regeneration
    /// use whatever template is passed then.
    pub fn regenerate(&mut self, template: &VariantTemplate) -> Reconciliation {
        let combinations = generate(&self.attributes);
        let previous = std::mem::take(&mut self.variants);
        let outcome = reconcile(
            previous,
            &combinations,
            template,
            &self.allocation,
            &mut self.rows,
        );
        self.variants = outcome.variants.clone();
        outcome
    }

    /// Combinations not represented in the table (the "add N missing
    /// variants" affordance).
    pub fn missing_variants(&self) -> Vec<Combination> {
        missing(&self.attributes, &self.variants)
    }

    /// Append rows for the missing combinations, keeping existing rows as
    /// they are.
    pub fn add_missing_variants(&mut self, template: &VariantTemplate) -> Vec<RowKey> {
        add_missing(
            &mut self.variants,
            &self.attributes,
            template,
            &self.allocation,
            &mut self.rows,
        )
    }

    /// Set the starting stock at one location for every variant that is not
    /// persisted yet.
    ///
    /// Persisted variants change stock through ledger adjustments only.
    pub fn set_location_quantity(&mut self, location_id: LocationId, quantity: i64) -> DomainResult<()> {
        let mut pending: Vec<&mut Variant> =
            self.variants.iter_mut().filter(|v| v.id.is_none()).collect();
        self.allocation
            .set_location_quantity(location_id, quantity, &mut pending)
    }

    /// Follow a change of active locations.
    pub fn sync_locations(&mut self, active: &[LocationId]) {
        let mut pending: Vec<&mut Variant> =
            self.variants.iter_mut().filter(|v| v.id.is_none()).collect();
        self.allocation.sync_locations(active, &mut pending);
    }

    /// Stock available across all variants at creation time.
    pub fn total_available(&self) -> i64 {
        self.allocation.total_available(self.variants.len())
    }

    /// Payload for the create/update request, with the default variant
    /// substituted when the table is empty or no attribute has values left.
    pub fn submission(&self, template: &VariantTemplate) -> ProductSubmission {
        let attributes = self.attributes.to_payload();
        if attributes.is_empty() || self.variants.is_empty() {
            return ensure_non_empty_variants(
                Vec::new(),
                Vec::new(),
                template,
                &self.allocation,
            );
        }
        ensure_non_empty_variants(attributes, self.variants.clone(), template, &self.allocation)
    }
}
