//! Variant rows and the product-level defaults new rows are created from.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use backoffice_core::{AttachmentId, DomainError, DomainResult, Entity, LocationId, VariantId};
use backoffice_inventory::{AllocationTarget, InventoryQuantity};

use crate::combination::Combination;
use crate::key::{RowKey, ValueKey};

/// Opaque reference to an uploaded image, chosen by the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: AttachmentId,
    pub url: String,
    pub filename: String,
}

/// Unit for a variant's shipping weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    G,
    Kg,
    Lb,
    Oz,
}

impl core::str::FromStr for WeightUnit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "g" => Ok(WeightUnit::G),
            "kg" => Ok(WeightUnit::Kg),
            "lb" => Ok(WeightUnit::Lb),
            "oz" => Ok(WeightUnit::Oz),
            other => Err(DomainError::validation(format!("unknown weight unit '{other}'"))),
        }
    }
}

/// A sellable variant of a product.
///
/// `key` addresses the row in the editor and stays stable across
/// regenerations; `id` only exists once the backend has persisted the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    #[serde(skip)]
    pub key: RowKey,
    #[serde(skip)]
    pub signature: Option<Vec<ValueKey>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<VariantId>,
    pub title: String,
    pub option1: Option<String>,
    pub option2: Option<String>,
    pub option3: Option<String>,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    /// Prices are in the smallest currency unit (e.g. cents).
    pub price: Option<u64>,
    pub compare_at_price: Option<u64>,
    pub cost_price: Option<u64>,
    pub tracked: bool,
    pub lot_management: bool,
    pub requires_shipping: bool,
    pub position: u32,
    pub weight: Option<f64>,
    pub weight_unit: Option<WeightUnit>,
    pub unit: Option<String>,
    pub image: Option<Attachment>,
    pub inventory_quantities: Vec<InventoryQuantity>,
}

impl Variant {
    /// New row for `combination`, filled from the product-level defaults.
    pub fn from_template(
        key: RowKey,
        combination: &Combination,
        template: &VariantTemplate,
        position: u32,
        inventory_quantities: Vec<InventoryQuantity>,
    ) -> Self {
        Self {
            key,
            signature: Some(combination.signature.clone()),
            id: None,
            title: combination.title.clone(),
            option1: combination.option1.clone(),
            option2: combination.option2.clone(),
            option3: combination.option3.clone(),
            sku: template.sku.clone(),
            barcode: template.barcode.clone(),
            price: template.price,
            compare_at_price: template.compare_at_price,
            cost_price: template.cost_price,
            tracked: template.tracked,
            lot_management: template.lot_management,
            requires_shipping: template.requires_shipping,
            position,
            weight: template.weight,
            weight_unit: template.weight_unit,
            unit: template.unit.clone(),
            image: None,
            inventory_quantities,
        }
    }

    /// Point this row at a (possibly renamed) combination, keeping every
    /// operator edit.
    pub fn rebind(&mut self, combination: &Combination) {
        self.title = combination.title.clone();
        self.option1 = combination.option1.clone();
        self.option2 = combination.option2.clone();
        self.option3 = combination.option3.clone();
        self.signature = Some(combination.signature.clone());
    }

    /// Whether this row stands for `combination`.
    pub fn matches(&self, combination: &Combination) -> bool {
        match &self.signature {
            Some(signature) if *signature == combination.signature => true,
            _ => self.title == combination.title,
        }
    }

    pub fn available_at(&self, location_id: LocationId) -> Option<i64> {
        self.inventory_quantities
            .iter()
            .find(|q| q.location_id == location_id)
            .map(|q| q.available)
    }
}

impl Entity for Variant {
    type Id = RowKey;

    fn id(&self) -> &Self::Id {
        &self.key
    }
}

impl AllocationTarget for Variant {
    fn inventory_quantities(&self) -> &[InventoryQuantity] {
        &self.inventory_quantities
    }

    fn set_inventory_quantities(&mut self, quantities: Vec<InventoryQuantity>) {
        self.inventory_quantities = quantities;
    }

    fn quantity_at_mut(&mut self, location_id: LocationId) -> Option<&mut InventoryQuantity> {
        self.inventory_quantities
            .iter_mut()
            .find(|q| q.location_id == location_id)
    }
}

/// Read access to the product form's raw field values.
pub trait FieldSource {
    fn field(&self, key: &str) -> Option<&str>;
}

impl FieldSource for HashMap<String, String> {
    fn field(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl FieldSource for BTreeMap<String, String> {
    fn field(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

/// Product-level defaults copied into every newly generated variant.
///
/// Captured once when variants are generated; later form edits do not
/// reach variants that already exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantTemplate {
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub price: Option<u64>,
    pub compare_at_price: Option<u64>,
    pub cost_price: Option<u64>,
    pub tracked: bool,
    pub lot_management: bool,
    pub requires_shipping: bool,
    pub weight: Option<f64>,
    pub weight_unit: Option<WeightUnit>,
    pub unit: Option<String>,
}

impl Default for VariantTemplate {
    fn default() -> Self {
        Self {
            sku: None,
            barcode: None,
            price: None,
            compare_at_price: None,
            cost_price: None,
            tracked: true,
            lot_management: false,
            requires_shipping: true,
            weight: None,
            weight_unit: None,
            unit: None,
        }
    }
}

impl VariantTemplate {
    /// Read the defaults from the product form.
    ///
    /// Blank fields are treated as unset. Malformed values fail with a
    /// validation error naming the field.
    pub fn read_from(source: &impl FieldSource) -> DomainResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            sku: text(source, "sku"),
            barcode: text(source, "barcode"),
            price: parse_field(source, "price")?,
            compare_at_price: parse_field(source, "compare_at_price")?,
            cost_price: parse_field(source, "cost_price")?,
            tracked: flag(source, "tracked")?.unwrap_or(defaults.tracked),
            lot_management: flag(source, "lot_management")?.unwrap_or(defaults.lot_management),
            requires_shipping: flag(source, "requires_shipping")?
                .unwrap_or(defaults.requires_shipping),
            weight: parse_field(source, "weight")?,
            weight_unit: parse_field(source, "weight_unit")?,
            unit: text(source, "unit"),
        })
    }
}

fn text(source: &impl FieldSource, key: &str) -> Option<String> {
    source
        .field(key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_field<T>(source: &impl FieldSource, key: &str) -> DomainResult<Option<T>>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    match text(source, key) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| DomainError::validation(format!("{key}: {e}"))),
    }
}

fn flag(source: &impl FieldSource, key: &str) -> DomainResult<Option<bool>> {
    match text(source, key).as_deref() {
        None => Ok(None),
        Some("true" | "1" | "on" | "yes") => Ok(Some(true)),
        Some("false" | "0" | "off" | "no") => Ok(Some(false)),
        Some(other) => Err(DomainError::validation(format!(
            "{key}: expected a boolean, got '{other}'"
        ))),
    }
}
