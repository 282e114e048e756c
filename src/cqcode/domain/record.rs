//! Structured (pre-decoded) tag records.
//!
//! Some transports deliver a message as an array of `{type, data}` objects
//! instead of a flat string. A [`TagRecord`] is one element of that array.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::TagParameters;

/// One structured tag, as delivered by an array-format transport.
///
/// ```json
/// { "type": "image", "data": { "url": "http://x/y.png", "sub_type": 0 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRecord {
    /// Tag kind; records without a `type` are text.
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    /// Kind-specific payload.
    #[serde(default)]
    pub data: Map<String, Value>,
}

fn default_kind() -> String {
    "text".to_owned()
}

impl TagRecord {
    /// Creates a record from a kind and payload.
    #[must_use]
    pub fn new(kind: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            kind: kind.into(),
            data,
        }
    }

    /// Creates a text record.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        let mut data = Map::new();
        data.insert("text".to_owned(), Value::String(text.into()));
        Self::new("text", data)
    }

    /// Returns `true` when this record is a forward bundle.
    #[must_use]
    pub fn is_forward(&self) -> bool {
        self.kind == "forward"
    }

    /// Flattens the payload into string parameters.
    ///
    /// Text records keep only their `text` field. Other kinds keep every
    /// field; strings pass through unchanged and any other JSON value is
    /// rendered in its compact JSON form.
    #[must_use]
    pub fn parameters(&self) -> TagParameters {
        if self.kind == "text" {
            let text = self
                .data
                .get("text")
                .map(value_to_parameter)
                .unwrap_or_default();
            return std::iter::once(("text", text)).collect();
        }

        self.data
            .iter()
            .map(|(key, value)| (key.clone(), value_to_parameter(value)))
            .collect()
    }
}

fn value_to_parameter(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
