//! One-shot variant matrix generation from a JSON document.
//!
//! ```json
//! {
//!   "attributes": [{ "name": "Color", "values": ["Red", "Blue"] }],
//!   "fields": { "sku": "TEE", "price": 1999 },
//!   "locations": [{ "location_id": 1, "quantity": 5 }]
//! }
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value as JsonValue;

use backoffice_core::{DomainResult, LocationId};
use backoffice_products::{ProductDraft, ProductSubmission, VariantTemplate};

use crate::config::BackofficeConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct MatrixInput {
    #[serde(default)]
    pub attributes: Vec<AttributeInput>,
    /// Product form fields; strings, numbers and booleans are accepted.
    #[serde(default)]
    pub fields: BTreeMap<String, JsonValue>,
    /// Bulk quantities. When empty, the configured locations start at zero.
    #[serde(default)]
    pub locations: Vec<LocationInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttributeInput {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LocationInput {
    pub location_id: LocationId,
    pub quantity: i64,
}

impl MatrixInput {
    fn form_fields(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .filter_map(|(key, value)| {
                let text = match value {
                    JsonValue::Null => return None,
                    JsonValue::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Some((key.clone(), text))
            })
            .collect()
    }
}

/// Generate the submission payload for `input`.
pub fn generate_submission(
    input: &MatrixInput,
    config: &BackofficeConfig,
) -> DomainResult<ProductSubmission> {
    let locations: Vec<LocationId> = if input.locations.is_empty() {
        config.locations.clone()
    } else {
        input.locations.iter().map(|l| l.location_id).collect()
    };

    let mut draft = ProductDraft::new(config.max_attributes, locations);
    for attribute in &input.attributes {
        let key = draft.attributes_mut().add_attribute(&attribute.name)?;
        for value in &attribute.values {
            draft.attributes_mut().add_value(key, value)?;
        }
    }
    for location in &input.locations {
        draft.set_location_quantity(location.location_id, location.quantity)?;
    }

    let template = VariantTemplate::read_from(&input.form_fields())?;
    let outcome = draft.regenerate(&template);
    tracing::debug!(
        created = outcome.created,
        reused = outcome.reused,
        combinations = draft.variants().len(),
        "variant matrix generated"
    );

    Ok(draft.submission(&template))
}
