//! What gets sent to the catalog backend, and what comes back.

use serde::{Deserialize, Serialize};

use backoffice_core::ProductId;
use backoffice_inventory::InventoryAllocationTable;

use crate::attribute::AttributePayload;
use crate::combination::Combination;
use crate::key::RowKey;
use crate::variant::{Variant, VariantTemplate};

/// Title of the single variant of a product without options.
pub const DEFAULT_TITLE: &str = "Default Title";

/// Name of the attribute backing [`DEFAULT_TITLE`].
pub const DEFAULT_ATTRIBUTE_NAME: &str = "Title";

/// Attributes and variants of a product create/update request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSubmission {
    pub attributes: Vec<AttributePayload>,
    pub variants: Vec<Variant>,
}

/// A product as returned by the backend: variant ids are assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedProduct {
    pub id: ProductId,
    pub attributes: Vec<AttributePayload>,
    pub variants: Vec<Variant>,
}

/// Guarantee that a submitted product has at least one attribute and one
/// variant.
///
/// With an empty variant list the attributes are replaced by a single
/// `Title: [Default Title]` attribute and the variants by one `Default Title`
/// row built from the template and the allocation table. A non-empty list is
/// passed through unchanged. Only called at submission time; while editing, an
/// empty list stays empty.
pub fn ensure_non_empty_variants(
    attributes: Vec<AttributePayload>,
    variants: Vec<Variant>,
    template: &VariantTemplate,
    allocation: &InventoryAllocationTable,
) -> ProductSubmission {
    if !variants.is_empty() {
        return ProductSubmission {
            attributes,
            variants,
        };
    }

    tracing::debug!("no variants generated, submitting default variant");

    let combination = Combination {
        title: DEFAULT_TITLE.to_string(),
        option1: Some(DEFAULT_TITLE.to_string()),
        option2: None,
        option3: None,
        signature: Vec::new(),
    };
    // The default row never lives in an editor table, so it has no real key.
    let mut variant = Variant::from_template(
        RowKey::default(),
        &combination,
        template,
        1,
        allocation.snapshot(),
    );
    variant.signature = None;

    ProductSubmission {
        attributes: vec![AttributePayload {
            name: DEFAULT_ATTRIBUTE_NAME.to_string(),
            values: vec![DEFAULT_TITLE.to_string()],
            position: 0,
        }],
        variants: vec![variant],
    }
}

impl PersistedProduct {
    /// Whether this product only has the synthesized default variant.
    pub fn has_only_default_variant(&self) -> bool {
        self.variants.len() == 1 && self.variants[0].title == DEFAULT_TITLE
    }
}
