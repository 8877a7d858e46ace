//! Products domain module: the variant matrix.
//!
//! This crate derives a product's variants from its attributes and keeps the
//! variant table consistent while the operator edits, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).
//!
//! ```text
//! AttributeSet ──generate──▶ [Combination] ──reconcile──▶ [Variant] ──▶ ProductSubmission
//!                                              ▲
//!                        previous [Variant] ───┘   (+ allocation snapshot for new rows)
//! ```

pub mod attribute;
pub mod combination;
pub mod draft;
pub mod key;
pub mod reconcile;
pub mod submission;
pub mod variant;

pub use attribute::{Attribute, AttributePayload, AttributeSet, MAX_ATTRIBUTES, OptionValue};
pub use combination::{Combination, TITLE_SEPARATOR, generate, generate_from};
pub use draft::ProductDraft;
pub use key::{AttributeKey, KeyAllocator, RowKey, ValueKey};
pub use reconcile::{Reconciliation, add_missing, missing, reconcile};
pub use submission::{
    DEFAULT_ATTRIBUTE_NAME, DEFAULT_TITLE, PersistedProduct, ProductSubmission,
    ensure_non_empty_variants,
};
pub use variant::{Attachment, FieldSource, Variant, VariantTemplate, WeightUnit};
