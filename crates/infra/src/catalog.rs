//! Product catalog port: where submissions go and persisted products come from.

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

use backoffice_core::{ProductId, VariantId};
use backoffice_products::{PersistedProduct, ProductSubmission};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid product: {0}")]
    Invalid(String),
    #[error("product {0} not found")]
    NotFound(ProductId),
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Create/update/fetch for products and their variants.
#[async_trait::async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Persist a new product; every variant gets a fresh id.
    async fn create(&self, submission: ProductSubmission) -> Result<PersistedProduct, CatalogError>;

    /// Replace the attributes and variants of an existing product.
    ///
    /// Variants carrying an id keep it; variants without one are new.
    /// Persisted variants missing from the submission are removed.
    async fn update(
        &self,
        id: ProductId,
        submission: ProductSubmission,
    ) -> Result<PersistedProduct, CatalogError>;

    async fn fetch(&self, id: ProductId) -> Result<PersistedProduct, CatalogError>;
}

#[derive(Debug, Default)]
struct CatalogState {
    products: HashMap<ProductId, PersistedProduct>,
    last_product_id: u64,
    last_variant_id: u64,
}

impl CatalogState {
    fn next_product_id(&mut self) -> ProductId {
        self.last_product_id += 1;
        ProductId::new(self.last_product_id)
    }

    fn next_variant_id(&mut self) -> VariantId {
        self.last_variant_id += 1;
        VariantId::new(self.last_variant_id)
    }
}

/// In-memory catalog assigning sequential ids.
#[derive(Debug, Default)]
pub struct InMemoryProductCatalog {
    state: RwLock<CatalogState>,
}

impl InMemoryProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

fn validate(submission: &ProductSubmission) -> Result<(), CatalogError> {
    if submission.variants.is_empty() {
        return Err(CatalogError::Invalid(
            "a product needs at least one variant".to_string(),
        ));
    }
    if submission.attributes.is_empty() {
        return Err(CatalogError::Invalid(
            "a product needs at least one attribute".to_string(),
        ));
    }
    Ok(())
}

fn poisoned<T>(_: T) -> CatalogError {
    CatalogError::Unavailable("lock poisoned".to_string())
}

#[async_trait::async_trait]
impl ProductCatalog for InMemoryProductCatalog {
    async fn create(&self, submission: ProductSubmission) -> Result<PersistedProduct, CatalogError> {
        validate(&submission)?;
        let mut state = self.state.write().map_err(poisoned)?;

        let id = state.next_product_id();
        let mut variants = submission.variants;
        for variant in &mut variants {
            variant.id = Some(state.next_variant_id());
        }

        let product = PersistedProduct {
            id,
            attributes: submission.attributes,
            variants,
        };
        state.products.insert(id, product.clone());

        tracing::info!(product_id = %id, variants = product.variants.len(), "product created");
        Ok(product)
    }

    async fn update(
        &self,
        id: ProductId,
        submission: ProductSubmission,
    ) -> Result<PersistedProduct, CatalogError> {
        validate(&submission)?;
        let mut state = self.state.write().map_err(poisoned)?;

        let existing = state.products.get(&id).ok_or(CatalogError::NotFound(id))?;
        let known: Vec<VariantId> = existing.variants.iter().filter_map(|v| v.id).collect();

        let mut variants = submission.variants;
        for variant in &mut variants {
            match variant.id {
                Some(variant_id) if !known.contains(&variant_id) => {
                    return Err(CatalogError::Invalid(format!(
                        "variant {variant_id} does not belong to product {id}"
                    )));
                }
                Some(_) => {}
                None => variant.id = Some(state.next_variant_id()),
            }
        }

        let product = PersistedProduct {
            id,
            attributes: submission.attributes,
            variants,
        };
        state.products.insert(id, product.clone());

        tracing::info!(product_id = %id, variants = product.variants.len(), "product updated");
        Ok(product)
    }

    async fn fetch(&self, id: ProductId) -> Result<PersistedProduct, CatalogError> {
        let state = self.state.read().map_err(poisoned)?;
        state.products.get(&id).cloned().ok_or(CatalogError::NotFound(id))
    }
}
