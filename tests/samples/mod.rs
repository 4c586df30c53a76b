//! Shared schema fixtures and assertion helpers.
#![allow(dead_code)]

use schema_report::{ResultMap, Schema};
use serde_json::{json, Value};

pub fn schema(value: Value) -> Schema {
    serde_json::from_value(value).expect("fixture schema must deserialize")
}

/// Assert the node at `id` exists and carries no issues.
pub fn assert_no_issues(map: &ResultMap, id: &str) {
    let node = map
        .get(id)
        .unwrap_or_else(|| panic!("no result node at {id:?}; keys: {:?}", map.keys()));
    assert!(
        node.issues.is_empty(),
        "unexpected issues at {id:?}: {:?}",
        node.issues
    );
}

/// Assert the node at `id` carries exactly these clause codes, in order.
pub fn assert_clauses(map: &ResultMap, id: &str, clauses: &[&str]) {
    let node = map
        .get(id)
        .unwrap_or_else(|| panic!("no result node at {id:?}; keys: {:?}", map.keys()));
    let got: Vec<&str> = node.issues.iter().map(|i| i.clause).collect();
    assert_eq!(got, clauses, "issues at {id:?}: {:?}", node.issues);
}

pub fn name() -> Schema {
    schema(json!({ "type": "string" }))
}

pub fn age() -> Schema {
    schema(json!({
        "description": "Age in years",
        "hints": { "units": "years" },
        "type": "integer",
        "minimum": 0,
        "maximum": 150,
    }))
}

pub fn age_exclusive() -> Schema {
    schema(json!({
        "description": "Age in years",
        "hints": { "units": "years" },
        "type": "integer",
        "minimum": 0,
        "exclusiveMinimum": true,
        "maximum": 150,
        "exclusiveMaximum": true,
    }))
}

pub fn person_value() -> Value {
    json!({
        "firstName": "Michael",
        "lastName": "Tiller",
        "age": 40,
    })
}

pub fn person_json() -> Value {
    json!({
        "title": "Example Schema",
        "type": "object",
        "properties": {
            "firstName": { "type": "string", "title": "First Name" },
            "lastName": { "type": "string", "title": "Last Name" },
            "age": {
                "description": "Age in years",
                "hints": { "units": "years" },
                "type": "integer",
                "minimum": 0,
                "maximum": 150,
            },
        },
        "required": ["firstName", "lastName"],
    })
}

pub fn person() -> Schema {
    schema(person_json())
}

/// Like [`person`], but admits arbitrary extra keys.
pub fn person_open() -> Schema {
    let mut doc = person_json();
    doc["additionalProperties"] = json!(true);
    schema(doc)
}

/// Like [`person`], but extra keys must be strings.
pub fn person_strings_only() -> Schema {
    let mut doc = person_json();
    doc["additionalProperties"] = json!({ "type": "string" });
    schema(doc)
}

pub fn mortgage_json() -> Value {
    let mut signer = person_json();
    signer["title"] = json!("Signer");
    json!({
        "type": "object",
        "title": "Mortgage Application",
        "properties": {
            "signer": signer,
            "co-signer": person_json(),
        },
    })
}

pub fn mortgage() -> Schema {
    schema(mortgage_json())
}

pub fn mortgage_value() -> Value {
    json!({
        "signer": {
            "firstName": "Barack",
            "lastName": "Obama",
            "age": 52,
        },
        "co-signer": {
            "firstName": "Michelle",
            "lastName": "Obama",
            "age": 50,
        },
    })
}

pub fn choice() -> Schema {
    schema(json!({ "enum": [1, "hi", true] }))
}

/// Two `oneOf` alternatives distinguished only by an enum-constrained
/// dependency on the `key` property.
pub fn keyed_one_of() -> Schema {
    schema(json!({
        "default": { "key": "key1" },
        "title": "One Of",
        "additionalProperties": true,
        "oneOf": [
            {
                "type": "object",
                "title": "Key 1",
                "properties": {
                    "key": { "type": "string", "enum": ["key1", "key2"] },
                },
                "dependencies": {
                    "key": { "enum": ["key1"] },
                },
            },
            {
                "type": "object",
                "title": "Key 2",
                "properties": {
                    "key": { "type": "string", "enum": ["key1", "key2"] },
                },
                "dependencies": {
                    "key": { "enum": ["key2"] },
                },
            },
        ],
    }))
}
