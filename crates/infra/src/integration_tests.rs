//! End-to-end flows: editor session → catalog → ledger adjustments.
//!
//! Verifies:
//! - generated variants keep their ids across value renames once persisted
//! - per-variant adjustments reach the ledger and fold into the stock level
//! - a product without options is persisted with its default variant

use std::sync::Arc;

use backoffice_core::{DocumentId, LocationId};
use backoffice_inventory::{AdjustmentDraft, AdjustmentReason, StockLevelEvent};
use backoffice_products::{ProductDraft, ProductSubmission, VariantTemplate};

use crate::adjustment_service::{AdjustmentService, NotificationLevel};
use crate::catalog::{InMemoryProductCatalog, ProductCatalog};
use crate::ledger::InMemoryAdjustmentLedger;
use crate::ledger_store::{InMemoryLedgerStore, LedgerStore};

fn loc(raw: u64) -> LocationId {
    LocationId::new(raw)
}

fn template() -> VariantTemplate {
    VariantTemplate {
        sku: Some("TEE".to_string()),
        price: Some(2500),
        ..VariantTemplate::default()
    }
}

fn color_size_draft() -> ProductDraft {
    let mut draft = ProductDraft::new(3, [loc(1), loc(2)]);
    let color = draft.attributes_mut().add_attribute("Color").unwrap();
    draft.attributes_mut().add_value(color, "Red").unwrap();
    draft.attributes_mut().add_value(color, "Blue").unwrap();
    let size = draft.attributes_mut().add_attribute("Size").unwrap();
    draft.attributes_mut().add_value(size, "S").unwrap();
    draft.attributes_mut().add_value(size, "M").unwrap();

    draft.set_location_quantity(loc(1), 10).unwrap();
    draft.set_location_quantity(loc(2), 3).unwrap();
    draft.regenerate(&template());
    draft
}

fn setup() -> (
    InMemoryProductCatalog,
    Arc<InMemoryLedgerStore>,
    AdjustmentService<InMemoryAdjustmentLedger<Arc<InMemoryLedgerStore>>>,
) {
    let store = Arc::new(InMemoryLedgerStore::new());
    let ledger = InMemoryAdjustmentLedger::new(store.clone());
    (InMemoryProductCatalog::new(), store, AdjustmentService::new(ledger))
}

#[tokio::test]
async fn created_product_opens_stock_for_every_variant_and_location() {
    let (catalog, store, service) = setup();
    let draft = color_size_draft();

    let product = catalog.create(draft.submission(&template())).await.unwrap();
    service.ledger().open_product(&product).unwrap();

    assert_eq!(product.variants.len(), 4);
    for variant in &product.variants {
        let variant_id = variant.id.unwrap();
        assert_eq!(service.ledger().level(variant_id, loc(1)).unwrap().available(), 10);
        assert_eq!(service.ledger().level(variant_id, loc(2)).unwrap().available(), 3);
    }

    let first = product.variants[0].id.unwrap();
    let stream = store
        .load_stream(&format!("{first}@{}", loc(1)))
        .unwrap();
    assert_eq!(stream.len(), 1);
    assert_eq!(stream[0].event_type, "inventory.stock_level.opened");
}

#[tokio::test]
async fn renamed_value_keeps_persisted_variant_and_its_edits() {
    let (catalog, _store, _service) = setup();
    let product = catalog
        .create(color_size_draft().submission(&template()))
        .await
        .unwrap();

    let mut draft = ProductDraft::from_persisted(&product, 3, [loc(1), loc(2)]).unwrap();
    // First regeneration binds loaded rows by title.
    let outcome = draft.regenerate(&template());
    assert_eq!(outcome.reused, 4);
    assert_eq!(outcome.created, 0);

    let red_s = draft.variants()[0].key;
    draft.variant_mut(red_s).unwrap().price = Some(1999);
    let red_s_id = draft.variants()[0].id;

    let color = draft.attributes().attributes()[0].key;
    let red = draft.attributes().attributes()[0].values[0].key;
    draft.attributes_mut().rename_value(color, red, "Crimson").unwrap();
    let outcome = draft.regenerate(&template());

    assert!(outcome.dropped.is_empty());
    let renamed = draft.variant(red_s).unwrap();
    assert_eq!(renamed.title, "Crimson / S");
    assert_eq!(renamed.id, red_s_id);
    assert_eq!(renamed.price, Some(1999));

    let updated = catalog
        .update(product.id, draft.submission(&template()))
        .await
        .unwrap();
    assert_eq!(updated.variants.len(), 4);
    assert_eq!(updated.variants[0].id, red_s_id);
    assert_eq!(updated.attributes[0].values, vec!["Crimson", "Blue"]);
}

#[tokio::test]
async fn adjustment_in_edit_mode_reaches_the_ledger() {
    let (catalog, store, service) = setup();
    let product = catalog
        .create(color_size_draft().submission(&template()))
        .await
        .unwrap();
    service.ledger().open_product(&product).unwrap();

    let mut draft = ProductDraft::from_persisted(&product, 3, [loc(1), loc(2)]).unwrap();
    let key = draft.variants()[1].key;
    let variant = draft.variant_mut(key).unwrap();
    let variant_id = variant.id.unwrap();

    let mut adjustment = AdjustmentDraft::new(variant.available_at(loc(1)).unwrap());
    adjustment.set_total(7).unwrap();
    assert_eq!(adjustment.delta(), -3);

    let notification = service
        .adjust(
            variant,
            loc(1),
            adjustment,
            AdjustmentReason::CycleCount,
            Some(DocumentId::new(900)),
        )
        .await;
    assert_eq!(notification.level, NotificationLevel::Success);
    assert_eq!(draft.variant(key).unwrap().available_at(loc(1)), Some(7));

    let level = service.ledger().level(variant_id, loc(1)).unwrap();
    assert_eq!(level.available(), 7);
    let entries = service.ledger().entries(variant_id, loc(1)).unwrap();
    assert_eq!(entries.len(), 2);
    match entries[1].payload() {
        StockLevelEvent::StockAdjusted(e) => {
            assert_eq!(e.change_value, -3);
            assert_eq!(e.reason, AdjustmentReason::CycleCount);
            assert_eq!(e.reference_document_id, Some(DocumentId::new(900)));
        }
        other => panic!("Expected StockAdjusted, got {other:?}"),
    }

    // Bulk allocation no longer touches persisted rows.
    draft.set_location_quantity(loc(1), 50).unwrap();
    assert_eq!(draft.variant(key).unwrap().available_at(loc(1)), Some(7));
    assert_eq!(store.load_stream(&format!("{variant_id}@{}", loc(1))).unwrap().len(), 2);
}

#[tokio::test]
async fn product_without_options_is_saved_with_default_variant() {
    let (catalog, _store, service) = setup();
    let mut draft = ProductDraft::new(3, [loc(1)]);
    draft.set_location_quantity(loc(1), 12).unwrap();
    draft.regenerate(&template());
    assert!(draft.variants().is_empty());

    let submission: ProductSubmission = draft.submission(&template());
    let product = catalog.create(submission).await.unwrap();
    assert!(product.has_only_default_variant());
    assert_eq!(product.attributes[0].name, "Title");
    assert_eq!(product.variants[0].sku.as_deref(), Some("TEE"));

    service.ledger().open_product(&product).unwrap();
    let mut default_variant = product.variants[0].clone();
    let mut adjustment = AdjustmentDraft::new(12);
    adjustment.set_delta(0);
    let notification = service
        .adjust(
            &mut default_variant,
            loc(1),
            adjustment,
            AdjustmentReason::Correction,
            None,
        )
        .await;
    assert_eq!(notification.level, NotificationLevel::Info);
    assert_eq!(
        service
            .ledger()
            .entries(product.variants[0].id.unwrap(), loc(1))
            .unwrap()
            .len(),
        1
    );
}
