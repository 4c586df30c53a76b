//! The recursive validation engine.
//!
//! One [`validate`] call evaluates every applicable keyword check for a
//! single (schema, value) pair, recurses into object properties and
//! `oneOf` alternatives through the same sink, then reports its own node
//! exactly once. Checks never short-circuit one another and never fail:
//! malformed schemas become `InvalidSchema` issues and the walk always
//! completes (clause codes follow the constraint document's numbering).

use serde_json::{Map, Value};

use crate::issue::{Issue, IssueKind};
use crate::path::{child, encode, PathStep};
use crate::report::{Diagnostics, MapSink, ReportSink, ResultMap, SchemaDetails, TracingDiagnostics};
use crate::resolve;
use crate::schema::Schema;
use crate::value::classify;

/// One-shot validation into a path-keyed result map, warning about
/// duplicate ids through the default `tracing` diagnostics.
pub fn validate_all(schema: &Schema, value: &Value, required: bool) -> ResultMap {
    validate_all_with(schema, value, required, &TracingDiagnostics)
}

/// One-shot validation with caller-supplied diagnostics.
pub fn validate_all_with(
    schema: &Schema,
    value: &Value,
    required: bool,
    diagnostics: &dyn Diagnostics,
) -> ResultMap {
    let mut sink = MapSink::new(diagnostics);
    validate(schema, value, required, &mut sink, &[], &[]);
    sink.into_map()
}

/// Validate `value` against `schema`, reporting every visited node through
/// `sink` in postorder (children before parents).
///
/// `path` locates the value in the value tree, `schema_path` locates the
/// governing schema node in the schema document; they diverge at `oneOf`,
/// `patternProperties`, and `additionalProperties` branches. `required`
/// records whether the immediate parent's `required` list named this
/// value; it cascades one level only.
pub fn validate(
    schema: &Schema,
    value: &Value,
    required: bool,
    sink: &mut dyn ReportSink,
    path: &[PathStep],
    schema_path: &[PathStep],
) {
    let mut issues: Vec<Issue> = Vec::new();
    let mut one_of_match: Option<usize> = None;

    // 5.1 (numbers)
    if let Some(n) = value.as_f64() {
        if let Some(multiple_of) = &schema.multiple_of {
            issues.extend(check_multiple_of(n, multiple_of));
        }
        if let Some(maximum) = &schema.maximum {
            issues.extend(check_maximum(n, schema.exclusive_maximum.as_ref(), maximum));
        }
        if let Some(minimum) = &schema.minimum {
            issues.extend(check_minimum(n, schema.exclusive_minimum.as_ref(), minimum));
        }
    }

    // 5.2 (strings): maxLength, minLength, pattern — carried, not checked
    // 5.3 (arrays): items, additionalItems, maxItems, minItems,
    //               uniqueItems — carried, not checked

    // 5.4 (objects)
    if let Value::Object(obj) = value {
        // 5.4.1 maxProperties
        issues.extend(check_max_properties(obj, schema.max_properties.as_ref()));
        // 5.4.2 minProperties
        issues.extend(check_min_properties(obj, schema.min_properties.as_ref()));
        // 5.4.3 required — runs first so the resolved name list can
        // cascade into the children visited next
        let (required_issues, required_names) = check_required(obj, schema.required.as_ref());
        issues.extend(required_issues);
        // 5.4.4 properties, patternProperties, additionalProperties
        issues.extend(resolve::check_properties(
            obj,
            schema,
            &required_names,
            sink,
            path,
            schema_path,
        ));
        // 5.4.5 dependencies
        if let Some(dependencies) = &schema.dependencies {
            issues.extend(check_dependencies(obj, dependencies, path, schema_path));
        }
    }

    // 5.5 (universal)
    // 5.5.1 enum
    if let Some(enumeration) = &schema.enumeration {
        issues.extend(check_enum(value, enumeration));
    }
    // 5.5.2 type
    if let Some(value_type) = &schema.value_type {
        issues.extend(check_type(value, value_type));
    }
    // 5.5.3 allOf
    if schema.all_of.is_some() {
        issues.push(unimplemented("5.5.3"));
    }
    // 5.5.4 anyOf
    if schema.any_of.is_some() {
        issues.push(unimplemented("5.5.4"));
    }
    // 5.5.5 oneOf
    if let Some(one_of) = &schema.one_of {
        let (one_of_issues, matched) =
            resolve::check_one_of(one_of, value, sink, path, schema_path);
        one_of_match = matched;
        issues.extend(one_of_issues);
    }
    // 5.5.6 not
    if schema.not.is_some() {
        issues.push(unimplemented("5.5.6"));
    }
    // 7.3.x format
    if schema.format.is_some() {
        issues.push(unimplemented("7.3.x"));
    }

    let id = encode(path);
    let details = SchemaDetails::new(schema, schema_path, one_of_match, required);
    sink.report(id, path, details, value, issues);
}

// ---------------------------------------------------------------------------
// Keyword checks. Each is total: it returns an issue list, never fails.
// ---------------------------------------------------------------------------

fn check_multiple_of(n: f64, multiple_of: &Value) -> Vec<Issue> {
    let m = match multiple_of.as_f64() {
        Some(m) => m,
        None => {
            return vec![Issue::new(
                IssueKind::InvalidSchema,
                "5.1.1.1",
                format!(
                    "be a number, but got {}",
                    classify(multiple_of).as_str()
                ),
                multiple_of.clone(),
            )]
        }
    };
    if m == 0.0 {
        return vec![Issue::new(
            IssueKind::InvalidSchema,
            "5.1.1.1",
            "multipleOf cannot be zero",
            multiple_of.clone(),
        )];
    }
    if n % m != 0.0 {
        return vec![Issue::new(
            IssueKind::InvalidMultiple,
            "5.1.1.2",
            format!("be a multiple of {m}"),
            Value::from(n),
        )];
    }
    Vec::new()
}

fn check_maximum(n: f64, exclusive: Option<&Value>, maximum: &Value) -> Vec<Issue> {
    let strict = match exclusive {
        None => false,
        Some(flag) => match flag.as_bool() {
            Some(b) => b,
            None => {
                return vec![Issue::new(
                    IssueKind::InvalidSchema,
                    "5.1.2",
                    "exclusiveMaximum must be a boolean",
                    flag.clone(),
                )]
            }
        },
    };
    let m = match maximum.as_f64() {
        Some(m) => m,
        None => {
            return vec![Issue::new(
                IssueKind::InvalidSchema,
                "5.1.2",
                "maximum must be a number",
                maximum.clone(),
            )]
        }
    };
    let violated = if strict { n >= m } else { n > m };
    if violated {
        let expectation = if strict {
            format!("be less than {m}")
        } else {
            format!("be less than or equal to {m}")
        };
        return vec![Issue::new(
            IssueKind::TooLarge,
            "5.1.2",
            expectation,
            Value::from(n),
        )];
    }
    Vec::new()
}

fn check_minimum(n: f64, exclusive: Option<&Value>, minimum: &Value) -> Vec<Issue> {
    let strict = match exclusive {
        None => false,
        Some(flag) => match flag.as_bool() {
            Some(b) => b,
            None => {
                return vec![Issue::new(
                    IssueKind::InvalidSchema,
                    "5.1.3",
                    "exclusiveMinimum must be a boolean",
                    flag.clone(),
                )]
            }
        },
    };
    let m = match minimum.as_f64() {
        Some(m) => m,
        None => {
            return vec![Issue::new(
                IssueKind::InvalidSchema,
                "5.1.3",
                "minimum must be a number",
                minimum.clone(),
            )]
        }
    };
    let violated = if strict { n <= m } else { n < m };
    if violated {
        let expectation = if strict {
            format!("be greater than {m}")
        } else {
            format!("be greater than or equal to {m}")
        };
        return vec![Issue::new(
            IssueKind::TooSmall,
            "5.1.3",
            expectation,
            Value::from(n),
        )];
    }
    Vec::new()
}

/// Read a property-count bound: a non-negative integer, or `None` with an
/// `InvalidSchema` issue pushed by the caller.
fn count_bound(bound: &Value) -> Option<u64> {
    bound.as_u64().or_else(|| {
        bound
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0)
            .map(|f| f as u64)
    })
}

fn keys_value(obj: &Map<String, Value>) -> Value {
    Value::Array(obj.keys().map(|k| Value::String(k.clone())).collect())
}

fn check_max_properties(obj: &Map<String, Value>, bound: Option<&Value>) -> Vec<Issue> {
    let bound = match bound {
        Some(b) => b,
        None => return Vec::new(),
    };
    let max = match count_bound(bound) {
        Some(max) => max,
        None => {
            return vec![Issue::new(
                IssueKind::InvalidSchema,
                "5.4.1",
                "be a non-negative integer",
                bound.clone(),
            )]
        }
    };
    if obj.len() as u64 > max {
        return vec![Issue::new(
            IssueKind::TooManyProperties,
            "5.4.1",
            format!("contain at most {max} properties"),
            keys_value(obj),
        )];
    }
    Vec::new()
}

fn check_min_properties(obj: &Map<String, Value>, bound: Option<&Value>) -> Vec<Issue> {
    let bound = match bound {
        Some(b) => b,
        None => return Vec::new(),
    };
    let min = match count_bound(bound) {
        Some(min) => min,
        None => {
            return vec![Issue::new(
                IssueKind::InvalidSchema,
                "5.4.2",
                "be a non-negative integer",
                bound.clone(),
            )]
        }
    };
    if (obj.len() as u64) < min {
        return vec![Issue::new(
            IssueKind::TooManyProperties,
            "5.4.2",
            format!("contain at least {min} properties"),
            keys_value(obj),
        )];
    }
    Vec::new()
}

/// Check `required` and, alongside any issues, return the resolved name
/// list for required-cascading into children (clause 5.4.3).
fn check_required(
    obj: &Map<String, Value>,
    required: Option<&Value>,
) -> (Vec<Issue>, Vec<String>) {
    let required = match required {
        Some(r) => r,
        None => return (Vec::new(), Vec::new()),
    };
    let invalid = |expectation: &str| {
        (
            vec![Issue::new(
                IssueKind::InvalidSchema,
                "5.4.3",
                expectation,
                required.clone(),
            )],
            Vec::new(),
        )
    };

    let entries = match required {
        Value::Array(entries) => entries,
        _ => return invalid("value must be an array"),
    };
    if entries.is_empty() {
        return invalid("value cannot be empty");
    }
    let mut seen: Vec<&Value> = Vec::with_capacity(entries.len());
    for entry in entries {
        if seen.contains(&entry) {
            return invalid("contents must be unique");
        }
        seen.push(entry);
    }
    let mut names = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry.as_str() {
            Some(name) => names.push(name.to_string()),
            None => return invalid("must contain only strings"),
        }
    }

    let mut issues = Vec::new();
    for name in &names {
        if !obj.contains_key(name) {
            issues.push(Issue::new(
                IssueKind::MissingProperty,
                "5.4.3",
                format!("contain property '{name}'"),
                Value::String(name.clone()),
            ));
        }
    }
    (issues, names)
}

/// Check `dependencies` (clause 5.4.5). A schema-form entry for key `k`
/// validates the value of `k` (when present) in isolation and merges that
/// node's own issues verbatim; a string-form entry names another property
/// that must also be present.
fn check_dependencies(
    obj: &Map<String, Value>,
    dependencies: &Value,
    path: &[PathStep],
    schema_path: &[PathStep],
) -> Vec<Issue> {
    let entries = match dependencies {
        Value::Object(entries) => entries,
        other => {
            return vec![Issue::new(
                IssueKind::InvalidSchema,
                "5.4.5",
                "dependencies must be an object",
                other.clone(),
            )]
        }
    };

    let mut issues = Vec::new();
    for (key, dependency) in entries {
        match dependency {
            Value::Object(_) => {
                let sub_schema = match Schema::from_value(dependency) {
                    Some(s) => s,
                    None => continue,
                };
                let dependent = match obj.get(key) {
                    Some(v) => v,
                    None => continue,
                };
                let key_path = child(path, key.as_str());
                let key_id = encode(&key_path);
                let mut spath = schema_path.to_vec();
                spath.push("dependencies".into());
                spath.push(key.as_str().into());

                let mut trial = MapSink::silent();
                validate(&sub_schema, dependent, false, &mut trial, &key_path, &spath);
                if let Some(node) = trial.node(&key_id) {
                    issues.extend(node.issues.iter().cloned());
                }
            }
            Value::String(other_key) => {
                if !obj.contains_key(other_key) {
                    issues.push(Issue::new(
                        IssueKind::MissingProperty,
                        "5.4.5",
                        format!("have a property named {other_key}"),
                        Value::Object(obj.clone()),
                    ));
                }
            }
            other => issues.push(Issue::new(
                IssueKind::InvalidSchema,
                "5.4.5",
                "dependencies entries must be an object or a string",
                other.clone(),
            )),
        }
    }
    issues
}

/// Structural equality against the listed values, order-independent
/// (clause 5.5.1).
fn check_enum(value: &Value, enumeration: &Value) -> Vec<Issue> {
    let entries = match enumeration {
        Value::Array(entries) => entries,
        other => {
            return vec![Issue::new(
                IssueKind::InvalidSchema,
                "5.5.1",
                "enum must be an array",
                other.clone(),
            )]
        }
    };
    if entries.iter().any(|entry| entry == value) {
        return Vec::new();
    }
    let listed: Vec<String> = entries.iter().map(|e| e.to_string()).collect();
    vec![Issue::new(
        IssueKind::EnumMismatch,
        "5.5.1",
        format!("be one of {}", listed.join(", ")),
        value.clone(),
    )]
}

fn check_type(value: &Value, value_type: &Value) -> Vec<Issue> {
    let invalid_schema = || {
        vec![Issue::new(
            IssueKind::InvalidSchema,
            "5.5.2",
            "type must be a string or an array of strings",
            value_type.clone(),
        )]
    };
    let names: Vec<&str> = match value_type {
        Value::String(name) => vec![name.as_str()],
        Value::Array(entries) => {
            let mut names = Vec::with_capacity(entries.len());
            for entry in entries {
                match entry.as_str() {
                    Some(name) => names.push(name),
                    None => return invalid_schema(),
                }
            }
            names
        }
        _ => return invalid_schema(),
    };

    let kind = classify(value);
    if names.iter().any(|name| kind.satisfies(name)) {
        return Vec::new();
    }
    let expectation = match names.as_slice() {
        [single] => format!("be of type {single}"),
        many => format!("be one of {}", many.join(", ")),
    };
    vec![Issue::new(
        IssueKind::InvalidType,
        "5.5.2",
        expectation,
        value.clone(),
    )]
}

fn unimplemented(clause: &'static str) -> Issue {
    Issue::new(IssueKind::Unimplemented, clause, "be implemented", Value::Null)
}
