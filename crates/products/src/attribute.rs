//! Product attributes ("Color": Red, Blue) and their editing rules.

use serde::{Deserialize, Serialize};

use backoffice_core::{DomainError, DomainResult};

use crate::key::{AttributeKey, KeyAllocator, ValueKey};

/// Default cap on attributes per product (one per variant option slot).
pub const MAX_ATTRIBUTES: usize = 3;

/// One value of an attribute. The key stays stable when the label is renamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionValue {
    pub key: ValueKey,
    pub label: String,
}

/// A named attribute with an ordered list of unique values.
///
/// Value order is significant: it drives combination order, which in turn
/// drives default variant positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: AttributeKey,
    pub name: String,
    pub values: Vec<OptionValue>,
    pub position: u32,
}

impl Attribute {
    /// Whether this attribute takes part in variant generation.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && !self.values.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.iter().map(|v| v.label.as_str())
    }

    fn value_mut(&mut self, value: ValueKey) -> DomainResult<&mut OptionValue> {
        let name = self.name.clone();
        self.values
            .iter_mut()
            .find(|v| v.key == value)
            .ok_or_else(|| DomainError::not_found(format!("value {value} of attribute '{name}'")))
    }

    fn has_label(&self, label: &str) -> bool {
        self.values.iter().any(|v| v.label == label)
    }
}

/// Persisted shape of an attribute: `{name, values, position}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributePayload {
    pub name: String,
    pub values: Vec<String>,
    pub position: u32,
}

/// Ordered attribute list being edited for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSet {
    attributes: Vec<Attribute>,
    max_attributes: usize,
    keys: KeyAllocator,
}

impl Default for AttributeSet {
    fn default() -> Self {
        Self::new(MAX_ATTRIBUTES)
    }
}

impl AttributeSet {
    pub fn new(max_attributes: usize) -> Self {
        Self {
            attributes: Vec::new(),
            max_attributes,
            keys: KeyAllocator::new(),
        }
    }

    /// Rebuild an editable set from persisted attributes (fresh keys).
    ///
    /// Duplicate values inside one attribute are dropped, as they would have
    /// been at input time.
    pub fn from_payload(payload: &[AttributePayload], max_attributes: usize) -> DomainResult<Self> {
        let mut sorted: Vec<&AttributePayload> = payload.iter().collect();
        sorted.sort_by_key(|a| a.position);

        let mut set = Self::new(max_attributes);
        for attribute in sorted {
            let key = set.add_attribute(&attribute.name)?;
            for label in &attribute.values {
                set.add_value(key, label)?;
            }
        }
        Ok(set)
    }

    /// All attributes, ordered by position.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Attributes that take part in generation, ordered by position.
    pub fn valid_attributes(&self) -> impl Iterator<Item = &Attribute> + '_ {
        self.attributes.iter().filter(|a| a.is_valid())
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn max_attributes(&self) -> usize {
        self.max_attributes
    }

    pub fn get(&self, key: AttributeKey) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.key == key)
    }

    fn get_mut(&mut self, key: AttributeKey) -> DomainResult<&mut Attribute> {
        self.attributes
            .iter_mut()
            .find(|a| a.key == key)
            .ok_or_else(|| DomainError::not_found(format!("attribute {key}")))
    }

    /// Append a new attribute with no values.
    ///
    /// The name may still be empty; such an attribute is simply ignored by the
    /// generator until it is named and given values.
    pub fn add_attribute(&mut self, name: &str) -> DomainResult<AttributeKey> {
        if self.attributes.len() >= self.max_attributes {
            return Err(DomainError::validation(format!(
                "a product can have at most {} attributes",
                self.max_attributes
            )));
        }
        let key: AttributeKey = self.keys.next();
        self.attributes.push(Attribute {
            key,
            name: name.trim().to_string(),
            values: Vec::new(),
            position: self.attributes.len() as u32,
        });
        Ok(key)
    }

    pub fn rename_attribute(&mut self, key: AttributeKey, name: &str) -> DomainResult<()> {
        self.get_mut(key)?.name = name.trim().to_string();
        Ok(())
    }

    pub fn remove_attribute(&mut self, key: AttributeKey) -> DomainResult<Attribute> {
        let idx = self
            .attributes
            .iter()
            .position(|a| a.key == key)
            .ok_or_else(|| DomainError::not_found(format!("attribute {key}")))?;
        let removed = self.attributes.remove(idx);
        self.renumber();
        Ok(removed)
    }

    /// Move an attribute to `new_index` (clamped to the end of the list).
    pub fn move_attribute(&mut self, key: AttributeKey, new_index: usize) -> DomainResult<()> {
        let idx = self
            .attributes
            .iter()
            .position(|a| a.key == key)
            .ok_or_else(|| DomainError::not_found(format!("attribute {key}")))?;
        let attribute = self.attributes.remove(idx);
        let new_index = new_index.min(self.attributes.len());
        self.attributes.insert(new_index, attribute);
        self.renumber();
        Ok(())
    }

    /// Append a value to an attribute.
    ///
    /// Blank labels and labels already present in this attribute are not
    /// added; `Ok(None)` reports the no-op.
    pub fn add_value(&mut self, key: AttributeKey, label: &str) -> DomainResult<Option<ValueKey>> {
        let label = label.trim();
        let attribute = self.get_mut(key)?;
        if label.is_empty() || attribute.has_label(label) {
            return Ok(None);
        }
        let value_key: ValueKey = self.keys.next();
        self.get_mut(key)?.values.push(OptionValue {
            key: value_key,
            label: label.to_string(),
        });
        Ok(Some(value_key))
    }

    /// Rename a value in place. The value keeps its key, so variants derived
    /// from it keep their identity.
    pub fn rename_value(&mut self, key: AttributeKey, value: ValueKey, label: &str) -> DomainResult<()> {
        let label = label.trim();
        if label.is_empty() {
            return Err(DomainError::validation("value label cannot be empty"));
        }
        let attribute = self.get_mut(key)?;
        if attribute.values.iter().any(|v| v.key != value && v.label == label) {
            return Err(DomainError::validation(format!(
                "attribute '{}' already has a value '{label}'",
                attribute.name
            )));
        }
        attribute.value_mut(value)?.label = label.to_string();
        Ok(())
    }

    pub fn remove_value(&mut self, key: AttributeKey, value: ValueKey) -> DomainResult<OptionValue> {
        let attribute = self.get_mut(key)?;
        let idx = attribute
            .values
            .iter()
            .position(|v| v.key == value)
            .ok_or_else(|| DomainError::not_found(format!("value {value}")))?;
        Ok(attribute.values.remove(idx))
    }

    /// Persisted shape of the valid attributes.
    pub fn to_payload(&self) -> Vec<AttributePayload> {
        self.valid_attributes()
            .enumerate()
            .map(|(idx, a)| AttributePayload {
                name: a.name.clone(),
                values: a.labels().map(str::to_string).collect(),
                position: idx as u32,
            })
            .collect()
    }

    fn renumber(&mut self) {
        for (idx, attribute) in self.attributes.iter_mut().enumerate() {
            attribute.position = idx as u32;
        }
    }
}
