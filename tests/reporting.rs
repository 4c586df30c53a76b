//! Path encoding, malformed-schema handling, unimplemented keywords,
//! sink behavior, and idempotence.

mod samples;

use std::cell::RefCell;

use samples::{assert_clauses, assert_no_issues};
use schema_report::{
    encode, validate, validate_all, validate_all_with, Diagnostics, Issue, IssueKind,
    NullDiagnostics, PathStep, ReportSink, Schema, SchemaDetails,
};
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Path codec
// ---------------------------------------------------------------------------

#[test]
fn canonical_ids() {
    assert_eq!(encode(&[]), "");
    assert_eq!(encode(&["a".into(), "b".into()]), "/a/b");
    assert_eq!(encode(&["a".into(), 0.into(), "b".into()]), "/a/0/b");
}

// ---------------------------------------------------------------------------
// Schema-authoring errors never abort the walk
// ---------------------------------------------------------------------------

#[test]
fn malformed_multiple_of() {
    let zero = samples::schema(json!({ "multipleOf": 0 }));
    let map = validate_all(&zero, &json!(10), false);
    assert_clauses(&map, "", &["5.1.1.1"]);
    assert_eq!(map[""].issues[0].kind, IssueKind::InvalidSchema);

    let stringly = samples::schema(json!({ "multipleOf": "2" }));
    let map = validate_all(&stringly, &json!(10), false);
    assert_clauses(&map, "", &["5.1.1.1"]);
}

#[test]
fn malformed_bounds() {
    let bad_max = samples::schema(json!({ "maximum": "high" }));
    let map = validate_all(&bad_max, &json!(10), false);
    assert_clauses(&map, "", &["5.1.2"]);
    assert_eq!(map[""].issues[0].kind, IssueKind::InvalidSchema);

    let bad_flag = samples::schema(json!({ "minimum": 0, "exclusiveMinimum": "yes" }));
    let map = validate_all(&bad_flag, &json!(10), false);
    assert_clauses(&map, "", &["5.1.3"]);
    assert_eq!(map[""].issues[0].kind, IssueKind::InvalidSchema);
}

#[test]
fn malformed_required() {
    for required in [json!("firstName"), json!([]), json!(["a", "a"]), json!(["a", 1])] {
        let doc = samples::schema(json!({ "required": required }));
        let map = validate_all(&doc, &json!({}), false);
        assert_clauses(&map, "", &["5.4.3"]);
        assert_eq!(map[""].issues[0].kind, IssueKind::InvalidSchema);
    }
}

#[test]
fn malformed_property_count_bounds() {
    let negative = samples::schema(json!({ "maxProperties": -1 }));
    let map = validate_all(&negative, &json!({}), false);
    assert_clauses(&map, "", &["5.4.1"]);
    assert_eq!(map[""].issues[0].kind, IssueKind::InvalidSchema);

    let fractional = samples::schema(json!({ "minProperties": 1.5 }));
    let map = validate_all(&fractional, &json!({}), false);
    assert_clauses(&map, "", &["5.4.2"]);
}

#[test]
fn malformed_pattern_properties_key() {
    let unclosed = samples::schema(json!({
        "patternProperties": { "(": { "type": "string" } },
    }));
    let map = validate_all(&unclosed, &json!({ "a": 1 }), false);
    assert_clauses(&map, "", &["5.4.4"]);
    assert_eq!(map[""].issues[0].kind, IssueKind::InvalidSchema);
}

#[test]
fn malformed_additional_properties() {
    let numeric = samples::schema(json!({ "additionalProperties": 3 }));
    let map = validate_all(&numeric, &json!({ "a": 1 }), false);
    assert_clauses(&map, "", &["5.4.4"]);
    assert_eq!(map[""].issues[0].kind, IssueKind::InvalidSchema);
}

#[test]
fn malformed_type() {
    let numeric = samples::schema(json!({ "type": 5 }));
    let map = validate_all(&numeric, &json!("x"), false);
    assert_clauses(&map, "", &["5.5.2"]);
    assert_eq!(map[""].issues[0].kind, IssueKind::InvalidSchema);

    let mixed_list = samples::schema(json!({ "type": ["string", 5] }));
    let map = validate_all(&mixed_list, &json!("x"), false);
    assert_clauses(&map, "", &["5.5.2"]);
    assert_eq!(map[""].issues[0].kind, IssueKind::InvalidSchema);
}

#[test]
fn malformed_one_of_entries() {
    let not_an_array = samples::schema(json!({ "oneOf": 5 }));
    let map = validate_all(&not_an_array, &json!(1), false);
    assert_clauses(&map, "", &["5.5.5"]);
    assert_eq!(map[""].issues[0].kind, IssueKind::InvalidSchema);
    assert_eq!(map[""].details.one_of, None);

    let non_schema_entry = samples::schema(json!({ "oneOf": [5] }));
    let map = validate_all(&non_schema_entry, &json!(1), false);
    assert_clauses(&map, "", &["5.5.5"]);
    assert_eq!(map[""].issues[0].kind, IssueKind::InvalidSchema);
}

#[test]
fn malformed_properties_values() {
    let non_schema_value = samples::schema(json!({ "properties": { "a": 5 } }));
    let map = validate_all(&non_schema_value, &json!({ "a": 1 }), false);
    assert_clauses(&map, "", &["5.4.4"]);
    assert_eq!(map[""].issues[0].kind, IssueKind::InvalidSchema);
    // Resolution aborts, so the key is never visited.
    assert!(!map.contains_key("/a"));
}

#[test]
fn malformed_dependencies() {
    let numeric_entry = samples::schema(json!({ "dependencies": { "a": 5 } }));
    let map = validate_all(&numeric_entry, &json!({}), false);
    assert_clauses(&map, "", &["5.4.5"]);
    assert_eq!(map[""].issues[0].kind, IssueKind::InvalidSchema);

    let not_an_object = samples::schema(json!({ "dependencies": 5 }));
    let map = validate_all(&not_an_object, &json!({}), false);
    assert_clauses(&map, "", &["5.4.5"]);
    assert_eq!(map[""].issues[0].kind, IssueKind::InvalidSchema);
}

#[test]
fn schema_parse_rejects_non_objects() {
    assert!(Schema::parse("[1, 2]").is_err());
    assert!(Schema::parse("{ \"type\": \"string\" }").is_ok());
}

#[test]
fn primitive_schemas_declare_a_single_scalar_type() {
    assert!(samples::name().is_primitive());
    assert!(samples::age().is_primitive());
    assert!(!samples::person().is_primitive());
    assert!(!samples::schema(json!({ "type": ["string", "integer"] })).is_primitive());
    assert!(!samples::schema(json!({})).is_primitive());
}

// ---------------------------------------------------------------------------
// Unimplemented keyword families stay visible
// ---------------------------------------------------------------------------

#[test]
fn unimplemented_keywords_each_surface_one_issue() {
    for (doc, clause) in [
        (json!({ "allOf": [{}] }), "5.5.3"),
        (json!({ "anyOf": [{}] }), "5.5.4"),
        (json!({ "not": {} }), "5.5.6"),
        (json!({ "format": "date-time" }), "7.3.x"),
    ] {
        let map = validate_all(&samples::schema(doc), &json!("x"), false);
        assert_clauses(&map, "", &[clause]);
        assert_eq!(map[""].issues[0].kind, IssueKind::Unimplemented);
    }

    let all_four = samples::schema(json!({
        "allOf": [{}],
        "anyOf": [{}],
        "not": {},
        "format": "email",
    }));
    let map = validate_all(&all_four, &json!("x"), false);
    assert_eq!(map[""].issues.len(), 4);
}

// ---------------------------------------------------------------------------
// Sinks and diagnostics
// ---------------------------------------------------------------------------

#[derive(Default)]
struct RecordingDiagnostics {
    duplicates: RefCell<Vec<String>>,
}

impl Diagnostics for RecordingDiagnostics {
    fn duplicate_node(&self, id: &str) {
        self.duplicates.borrow_mut().push(id.to_string());
    }
}

#[test]
fn one_of_revisits_are_diagnosed_not_fatal() {
    // The matched alternative is re-validated at the parent's own path,
    // so the final parent report overwrites the alternative's node.
    let diagnostics = RecordingDiagnostics::default();
    let map = validate_all_with(
        &samples::keyed_one_of(),
        &json!({ "key": "key2" }),
        false,
        &diagnostics,
    );

    assert!(diagnostics.duplicates.borrow().contains(&String::new()));
    assert_no_issues(&map, "");
    assert_eq!(map[""].details.one_of, Some(1));
}

#[test]
fn null_diagnostics_swallow_duplicate_warnings() {
    // Same revisit as above; the walk and its results are unaffected.
    let map = validate_all_with(
        &samples::keyed_one_of(),
        &json!({ "key": "key2" }),
        false,
        &NullDiagnostics,
    );
    assert_no_issues(&map, "");
    assert_eq!(map[""].details.one_of, Some(1));
}

#[test]
fn default_diagnostics_route_through_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("schema_report=warn")
        .try_init();

    // Same walk as above through the default diagnostics; must not panic.
    let map = validate_all(&samples::keyed_one_of(), &json!({ "key": "key1" }), false);
    assert_eq!(map[""].details.one_of, Some(0));
}

/// A sink that records report order instead of building a map.
#[derive(Default)]
struct OrderSink {
    ids: Vec<String>,
}

impl ReportSink for OrderSink {
    fn report(
        &mut self,
        id: String,
        _path: &[PathStep],
        _details: SchemaDetails,
        _value: &Value,
        _issues: Vec<Issue>,
    ) {
        self.ids.push(id);
    }
}

#[test]
fn emission_is_postorder() {
    let mut sink = OrderSink::default();
    validate(
        &samples::person(),
        &samples::person_value(),
        false,
        &mut sink,
        &[],
        &[],
    );

    assert_eq!(sink.ids, ["/age", "/firstName", "/lastName", ""]);
}

#[test]
fn nested_emission_reports_descendants_first() {
    let mut sink = OrderSink::default();
    validate(
        &samples::mortgage(),
        &samples::mortgage_value(),
        false,
        &mut sink,
        &[],
        &[],
    );

    assert_eq!(sink.ids.last().map(String::as_str), Some(""));
    let signer = sink.ids.iter().position(|id| id == "/signer").unwrap();
    let signer_age = sink.ids.iter().position(|id| id == "/signer/age").unwrap();
    assert!(signer_age < signer);
}

// ---------------------------------------------------------------------------
// Idempotence
// ---------------------------------------------------------------------------

#[test]
fn validation_is_repeatable_and_does_not_mutate_the_schema() {
    let doc = samples::mortgage();
    let before = doc.clone();
    let value = samples::mortgage_value();

    let first = validate_all(&doc, &value, false);
    let second = validate_all(&doc, &value, false);

    assert_eq!(first, second);
    assert_eq!(doc, before);
    assert_eq!(
        serde_json::to_value(&doc).unwrap(),
        serde_json::to_value(&before).unwrap()
    );
}
