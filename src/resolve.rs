//! Schema resolution: deciding which sub-schema governs each object
//! property, and which `oneOf` alternative governs a value.
//!
//! Both decisions use the same two-pass shape: a discardable scoring pass
//! into an isolated sink, then an authoritative reporting pass through the
//! caller's sink. Merging the two passes loses descendants' issues, so
//! they stay separate.

use regex::Regex;
use serde_json::{Map, Value};

use crate::issue::{Issue, IssueKind};
use crate::path::{child, PathStep};
use crate::report::{MapSink, ReportSink};
use crate::schema::Schema;
use crate::validate::validate;

/// One sub-schema that could govern a property, tagged with the schema-path
/// steps that locate it under the parent schema.
struct Candidate {
    schema: Schema,
    steps: Vec<PathStep>,
}

/// How `additionalProperties` treats keys no other candidate claimed.
enum Fallback {
    /// `true`: validate against the unconstrained schema.
    Allow,
    /// `false` or absent: the key is a mismatch on the parent.
    Deny,
    /// A schema: sole candidate for otherwise-unclaimed keys.
    Schema(Schema),
}

/// Resolve and validate every property of `obj` (clause 5.4.4).
///
/// For each key: an exact `properties` match, then every matching
/// `patternProperties` entry, then the `additionalProperties` schema if
/// nothing matched. A single candidate is validated directly; several are
/// scored in isolation first and the best (fewest issues over its whole
/// subtree, ties to scan order) is re-validated through `sink`. Keys with
/// no candidate produce one `PropertyMismatch` each on the parent.
///
/// Children are tagged required when `required_names` lists their key.
pub(crate) fn check_properties(
    obj: &Map<String, Value>,
    schema: &Schema,
    required_names: &[String],
    sink: &mut dyn ReportSink,
    path: &[PathStep],
    schema_path: &[PathStep],
) -> Vec<Issue> {
    let fallback = match &schema.additional_properties {
        None | Some(Value::Bool(false)) => Fallback::Deny,
        Some(Value::Bool(true)) => Fallback::Allow,
        Some(v @ Value::Object(_)) => match Schema::from_value(v) {
            Some(s) => Fallback::Schema(s),
            None => Fallback::Deny,
        },
        Some(other) => {
            return vec![Issue::new(
                IssueKind::InvalidSchema,
                "5.4.4",
                "additionalProperties must be a boolean or schema",
                other.clone(),
            )]
        }
    };

    let properties = match collect_schema_map(
        schema.properties.as_ref(),
        "properties must be an object",
        "each value in properties must be a schema",
    ) {
        Ok(map) => map,
        Err(issues) => return issues,
    };

    let patterns = match collect_patterns(schema.pattern_properties.as_ref()) {
        Ok(patterns) => patterns,
        Err(issues) => return issues,
    };

    let mut issues = Vec::new();

    for (key, child_value) in obj {
        let required = required_names.iter().any(|r| r == key);
        let mut candidates = Vec::new();

        if let Some(prop_schema) = properties.get(key).and_then(Schema::from_value) {
            candidates.push(Candidate {
                schema: prop_schema,
                steps: vec!["properties".into(), key.as_str().into()],
            });
        }

        for (pattern, regex, pattern_schema) in &patterns {
            if regex.is_match(key) {
                candidates.push(Candidate {
                    schema: pattern_schema.clone(),
                    steps: vec!["patternProperties".into(), pattern.as_str().into()],
                });
            }
        }

        if candidates.is_empty() {
            if let Fallback::Schema(additional) = &fallback {
                candidates.push(Candidate {
                    schema: additional.clone(),
                    steps: vec!["additionalProperties".into()],
                });
            }
        }

        let child_path = child(path, key.as_str());

        match candidates.len() {
            0 => match &fallback {
                // No governing schema but anything goes: still visit the
                // key so it shows up in the result map.
                Fallback::Allow => {
                    let spath = child(schema_path, "additionalProperties");
                    validate(
                        &Schema::any(),
                        child_value,
                        required,
                        sink,
                        &child_path,
                        &spath,
                    );
                }
                _ => issues.push(Issue::new(
                    IssueKind::PropertyMismatch,
                    "5.4.4",
                    format!("not contain property {key}"),
                    Value::String(key.clone()),
                )),
            },
            // Fast path: nothing to disambiguate, skip the trial pass.
            1 => {
                let candidate = &candidates[0];
                let spath = extend(schema_path, &candidate.steps);
                validate(
                    &candidate.schema,
                    child_value,
                    required,
                    sink,
                    &child_path,
                    &spath,
                );
            }
            _ => {
                let mut best: Option<(usize, &Candidate)> = None;
                for candidate in &candidates {
                    let spath = extend(schema_path, &candidate.steps);
                    let count = trial_issue_count(
                        &candidate.schema,
                        child_value,
                        required,
                        &child_path,
                        &spath,
                    );
                    // Strict comparison keeps the earliest candidate on a
                    // tie: properties before patternProperties matches.
                    if best.map(|(n, _)| count < n).unwrap_or(true) {
                        best = Some((count, candidate));
                    }
                    if count == 0 {
                        break;
                    }
                }
                if let Some((_, winner)) = best {
                    let spath = extend(schema_path, &winner.steps);
                    validate(
                        &winner.schema,
                        child_value,
                        required,
                        sink,
                        &child_path,
                        &spath,
                    );
                }
            }
        }
    }

    issues
}

/// Disambiguate a `oneOf` keyword (clause 5.5.5).
///
/// Each alternative is scored in isolation; exactly one must accept the
/// value outright. The match is then re-validated through `sink` so its
/// subtree is reported, and its index is returned for the detail snapshot.
pub(crate) fn check_one_of(
    one_of: &Value,
    value: &Value,
    sink: &mut dyn ReportSink,
    path: &[PathStep],
    schema_path: &[PathStep],
) -> (Vec<Issue>, Option<usize>) {
    let entries = match one_of {
        Value::Array(entries) => entries,
        other => {
            return (
                vec![Issue::new(
                    IssueKind::InvalidSchema,
                    "5.5.5",
                    "oneOf must be an array",
                    other.clone(),
                )],
                None,
            )
        }
    };

    let mut alternatives = Vec::with_capacity(entries.len());
    for entry in entries {
        match Schema::from_value(entry) {
            Some(schema) => alternatives.push(schema),
            None => {
                return (
                    vec![Issue::new(
                        IssueKind::InvalidSchema,
                        "5.5.5",
                        "each oneOf entry must be a schema",
                        entry.clone(),
                    )],
                    None,
                )
            }
        }
    }

    let mut matched: Option<usize> = None;
    for (index, alternative) in alternatives.iter().enumerate() {
        let spath = extend(schema_path, &["oneOf".into(), index.into()]);
        if trial_issue_count(alternative, value, false, path, &spath) == 0 {
            if matched.is_some() {
                return (
                    vec![Issue::new(
                        IssueKind::CardinalityError,
                        "5.5.5",
                        "matched multiple options",
                        value.clone(),
                    )],
                    None,
                );
            }
            matched = Some(index);
        }
    }

    match matched {
        Some(index) => {
            let spath = extend(schema_path, &["oneOf".into(), index.into()]);
            validate(&alternatives[index], value, false, sink, path, &spath);
            (Vec::new(), Some(index))
        }
        None => (
            vec![Issue::new(
                IssueKind::CardinalityError,
                "5.5.5",
                "matched no options",
                value.clone(),
            )],
            None,
        ),
    }
}

/// Run a full validation of `(schema, value)` into an isolated sink and
/// return the total issue count across the subtree. Nothing else crosses
/// back to the caller.
pub(crate) fn trial_issue_count(
    schema: &Schema,
    value: &Value,
    required: bool,
    path: &[PathStep],
    schema_path: &[PathStep],
) -> usize {
    let mut trial = MapSink::silent();
    validate(schema, value, required, &mut trial, path, schema_path);
    trial.issue_count()
}

fn extend(base: &[PathStep], steps: &[PathStep]) -> Vec<PathStep> {
    let mut out = base.to_vec();
    out.extend_from_slice(steps);
    out
}

/// Interpret a keyword whose value must be a map of sub-schemas
/// (`properties`, `patternProperties` values).
fn collect_schema_map(
    keyword: Option<&Value>,
    not_object: &str,
    not_schema: &str,
) -> Result<Map<String, Value>, Vec<Issue>> {
    let map = match keyword {
        None => return Ok(Map::new()),
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(vec![Issue::new(
                IssueKind::InvalidSchema,
                "5.4.4",
                not_object,
                other.clone(),
            )])
        }
    };

    let mut issues = Vec::new();
    for value in map.values() {
        if !value.is_object() {
            issues.push(Issue::new(
                IssueKind::InvalidSchema,
                "5.4.4",
                not_schema,
                value.clone(),
            ));
        }
    }
    if issues.is_empty() {
        Ok(map.clone())
    } else {
        Err(issues)
    }
}

/// Compile `patternProperties` into (pattern, regex, schema) triples,
/// in the map's (lexicographic, deterministic) key order.
fn collect_patterns(
    keyword: Option<&Value>,
) -> Result<Vec<(String, Regex, Schema)>, Vec<Issue>> {
    let map = match collect_schema_map(
        keyword,
        "patternProperties must be an object",
        "each value in patternProperties must be a schema",
    ) {
        Ok(map) => map,
        Err(issues) => return Err(issues),
    };

    let mut patterns = Vec::with_capacity(map.len());
    let mut issues = Vec::new();
    for (pattern, sub) in &map {
        match Regex::new(pattern) {
            Ok(regex) => {
                if let Some(schema) = Schema::from_value(sub) {
                    patterns.push((pattern.clone(), regex, schema));
                }
            }
            Err(_) => issues.push(Issue::new(
                IssueKind::InvalidSchema,
                "5.4.4",
                "patternProperties key must be a regular expression",
                Value::String(pattern.clone()),
            )),
        }
    }
    if issues.is_empty() {
        Ok(patterns)
    } else {
        Err(issues)
    }
}
