use serde::Serialize;
use serde_json::Value;

/// The closed set of violation and error kinds a check can produce.
///
/// Three disjoint classes, never conflated:
/// - `InvalidSchema` — the constraint document itself is malformed;
/// - `Unimplemented` — the keyword is recognized but not evaluated;
/// - everything else — the value fails a well-formed constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Unimplemented,
    InvalidSchema,
    InvalidInstanceType,
    InvalidMultiple,
    TooLarge,
    TooSmall,
    TooManyProperties,
    MissingProperty,
    PropertyMismatch,
    EnumMismatch,
    CardinalityError,
    InvalidType,
}

/// One violation of one keyword check at one node.
///
/// `clause` is the constraint-clause code (e.g. `"5.1.2"` for `maximum`),
/// grouping issues by the rule that fired; it doubles as a test oracle.
/// `expectation` completes the sentence "the value must ...".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub clause: &'static str,
    pub expectation: String,
    pub value: Value,
}

impl Issue {
    pub fn new(
        kind: IssueKind,
        clause: &'static str,
        expectation: impl Into<String>,
        value: Value,
    ) -> Self {
        Self {
            kind,
            clause,
            expectation: expectation.into(),
            value,
        }
    }
}
