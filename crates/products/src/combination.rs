//! Variant combination generator.
//!
//! Produces the cartesian product of the valid attributes' values. The result
//! is a pure function of its input: same attributes, same combinations, same
//! order. Callers diff successive outputs, so that matters.

use serde::{Deserialize, Serialize};

use crate::attribute::{Attribute, AttributeSet, OptionValue};
use crate::key::ValueKey;

/// Separator between option values in a variant title.
pub const TITLE_SEPARATOR: &str = " / ";

/// One derived combination of attribute values.
///
/// `option1..3` map positionally to the first three valid attributes; unused
/// slots are `None`. `signature` lists the value keys the combination was
/// built from, one per valid attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combination {
    pub title: String,
    pub option1: Option<String>,
    pub option2: Option<String>,
    pub option3: Option<String>,
    #[serde(skip)]
    pub signature: Vec<ValueKey>,
}

impl Combination {
    fn from_picked(picked: &[&OptionValue]) -> Self {
        let label = |idx: usize| picked.get(idx).map(|v| v.label.clone());
        Self {
            title: picked
                .iter()
                .map(|v| v.label.as_str())
                .collect::<Vec<_>>()
                .join(TITLE_SEPARATOR),
            option1: label(0),
            option2: label(1),
            option3: label(2),
            signature: picked.iter().map(|v| v.key).collect(),
        }
    }
}

/// Generate every combination of the set's valid attributes.
pub fn generate(attributes: &AttributeSet) -> Vec<Combination> {
    generate_from(attributes.attributes())
}

/// Generate every combination of the valid attributes in `attributes`, in the
/// order given.
///
/// Enumeration matches nested loops with the first attribute outermost and the
/// last attribute innermost. With no valid attribute the result is empty.
pub fn generate_from(attributes: &[Attribute]) -> Vec<Combination> {
    let valid: Vec<&Attribute> = attributes.iter().filter(|a| a.is_valid()).collect();
    if valid.is_empty() {
        return Vec::new();
    }

    let capacity = valid.iter().map(|a| a.values.len()).product();
    let mut out = Vec::with_capacity(capacity);
    let mut picked = Vec::with_capacity(valid.len());
    walk(&valid, &mut picked, &mut out);
    out
}

fn walk<'a>(
    remaining: &[&'a Attribute],
    picked: &mut Vec<&'a OptionValue>,
    out: &mut Vec<Combination>,
) {
    match remaining.split_first() {
        None => out.push(Combination::from_picked(picked)),
        Some((head, rest)) => {
            for value in &head.values {
                picked.push(value);
                walk(rest, picked, out);
                picked.pop();
            }
        }
    }
}
