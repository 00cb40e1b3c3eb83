use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The one key every calculation response must carry.
pub const NET_TOTAL_KEY: &str = "Net Total";

/// Keys the service includes for its own bookkeeping; never shown to the
/// user. `Net Total` is also excluded from the generic listing because it is
/// rendered as the headline.
const SUPPRESSED_KEYS: [&str; 4] = ["Fields", "values", "ID", "row_number"];

/// A remotely computed pricing result: an open record keyed by field name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quotation(pub Map<String, Value>);

impl Quotation {
    pub fn net_total(&self) -> Option<f64> {
        self.0.get(NET_TOTAL_KEY).and_then(Value::as_f64)
    }

    /// Headline amount, rupee-prefixed with two decimals.
    pub fn formatted_net_total(&self) -> Option<String> {
        self.net_total().map(|total| format!("\u{20b9}{total:.2}"))
    }

    /// Remaining key/value pairs for generic display, with internal keys
    /// suppressed and falsy values rendered as "0".
    pub fn detail_lines(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .filter(|(key, _)| {
                key.as_str() != NET_TOTAL_KEY && !SUPPRESSED_KEYS.contains(&key.as_str())
            })
            .map(|(key, value)| (key.clone(), display_value(value)))
            .collect()
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "0".to_string(),
        Value::Bool(false) => "0".to_string(),
        Value::Bool(true) => "true".to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) if text.is_empty() => "0".to_string(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
