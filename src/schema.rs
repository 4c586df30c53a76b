use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::value::classify;

/// Error raised while parsing a schema document from JSON text.
#[derive(Debug, thiserror::Error)]
pub enum SchemaParseError {
    #[error("Schema parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Schema document must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// A structural-constraint document.
///
/// Every keyword is carried as a raw [`Value`] rather than a typed field:
/// a malformed keyword (say, a string `maximum`) must still parse so the
/// engine can report it as an `InvalidSchema` issue on the node it
/// governs instead of failing the whole document up front.
///
/// Fields not named here (`title`, `description`, `default`, UI hints,
/// vendor annotations, ...) collect into `extra` and round-trip
/// byte-for-byte; the engine never inspects them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    // numeric bounds (5.1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<Value>,

    // string bounds (5.2) — carried, not yet evaluated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Value>,

    // array bounds (5.3) — carried, not yet evaluated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_items: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<Value>,

    // object shape (5.4)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_properties: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Value>,

    // universal (5.5)
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enumeration: Option<Value>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub value_type: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definitions: Option<Value>,

    // format (7.3) — carried, not yet evaluated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<Value>,

    /// Opaque pass-through metadata. Preserved, never interpreted.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Schema {
    /// Parse a schema document from JSON text.
    pub fn parse(text: &str) -> Result<Self, SchemaParseError> {
        let json: Value = serde_json::from_str(text)?;
        match &json {
            Value::Object(_) => Ok(serde_json::from_value(json)?),
            other => Err(SchemaParseError::NotAnObject(classify(other).as_str())),
        }
    }

    /// Interpret a JSON value as a sub-schema.
    ///
    /// Returns `None` when the value is not an object; callers surface
    /// that as an `InvalidSchema` issue rather than an error.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(_) => serde_json::from_value(value.clone()).ok(),
            _ => None,
        }
    }

    /// The unconstrained schema: accepts any value.
    pub fn any() -> Self {
        Self::default()
    }

    /// True when the declared `type` is a single scalar type name.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self.value_type.as_ref().and_then(Value::as_str),
            Some("null" | "boolean" | "integer" | "number" | "string")
        )
    }
}
