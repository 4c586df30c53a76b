use serde::Serialize;
use serde_json::Value;

/// The kind of a JSON value, as one closed, exhaustive classification.
///
/// Integers are a refinement of numbers: a numeric value with zero
/// fractional remainder classifies as `Integer`, and an `Integer` also
/// satisfies a `"number"` type constraint (see [`ValueKind::satisfies`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

/// Classify a value into exactly one [`ValueKind`].
pub fn classify(value: &Value) -> ValueKind {
    match value {
        Value::Null => ValueKind::Null,
        Value::Bool(_) => ValueKind::Boolean,
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                ValueKind::Integer
            } else if n.as_f64().map(|f| f.fract() == 0.0).unwrap_or(false) {
                ValueKind::Integer
            } else {
                ValueKind::Number
            }
        }
        Value::String(_) => ValueKind::String,
        Value::Array(_) => ValueKind::Array,
        Value::Object(_) => ValueKind::Object,
    }
}

impl ValueKind {
    /// The canonical type name used by the `type` keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }

    /// Does this kind satisfy the given `type` keyword name?
    ///
    /// `Integer` satisfies both `"integer"` and `"number"`; everything
    /// else matches its own name only. Unknown names match nothing.
    pub fn satisfies(&self, name: &str) -> bool {
        match self {
            ValueKind::Integer => name == "integer" || name == "number",
            other => name == other.as_str(),
        }
    }
}
