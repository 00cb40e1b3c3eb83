use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// A remotely supplied definition of one input control.
///
/// An empty `options` list means numeric free entry; a non-empty list means
/// the user picks one of the enumerated choices.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    #[serde(rename = "field")]
    pub name: String,
    #[serde(rename = "value", default)]
    pub options: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Numeric,
    Choice,
}

impl FieldDescriptor {
    pub fn kind(&self) -> FieldKind {
        if self.options.is_empty() {
            FieldKind::Numeric
        } else {
            FieldKind::Choice
        }
    }
}

/// Raw user input keyed by field name. Keys always mirror the current
/// descriptor sequence; values start out empty.
pub type FormValues = BTreeMap<String, String>;

pub fn initial_form_values(fields: &[FieldDescriptor]) -> FormValues {
    fields.iter().map(|field| (field.name.clone(), String::new())).collect()
}

/// Builds the `values` payload for the price calculation call.
///
/// Coercion rule: an empty or missing entry is submitted as numeric `0`;
/// anything else is submitted as the raw string, uninterpreted. The remote
/// service is trusted to parse it.
pub fn coerce_submission(fields: &[FieldDescriptor], values: &FormValues) -> Map<String, Value> {
    let mut payload = Map::new();
    for field in fields {
        let raw = values.get(&field.name).map(String::as_str).unwrap_or("");
        let value = if raw.is_empty() { json!(0) } else { json!(raw) };
        payload.insert(field.name.clone(), value);
    }
    payload
}
