use jsonschema::validator_for;
use serde_json::{json, Value};

use elter_validate::config::Coercion;
use elter_validate::error::{SchemaRole, ValidateError};
use elter_validate::records::Record;
use elter_validate::runner;
use elter_validate::schema::{build_registry, SHARED_SCHEMA_URI, TOPIC_SCHEMA_URI};

fn record(line: usize, fields: &[(&str, &str)]) -> Record {
    Record {
        line,
        fields: fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

fn shared() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$defs": {
            "code": { "type": "string", "pattern": "^[A-Z]{2}-[0-9]{2}$" }
        }
    })
}

#[test]
fn registry_binds_both_synthetic_uris() {
    let registry = build_registry(json!({"type": "object"}), shared()).unwrap();

    assert_eq!(registry.uris(), vec![SHARED_SCHEMA_URI, TOPIC_SCHEMA_URI]);
    assert_eq!(registry.lookup(SHARED_SCHEMA_URI), Some(&shared()));
    assert_eq!(registry.topic(), &json!({"type": "object"}));
}

#[test]
fn lookup_ignores_fragment_and_matches_last_segment() {
    let registry = build_registry(json!(true), shared()).unwrap();

    assert_eq!(
        registry.lookup("https://example.com/schema_shared#/$defs/code"),
        Some(&shared())
    );
    assert_eq!(registry.lookup("json-schema:///schema_shared"), Some(&shared()));
    assert!(registry.lookup("https://example.com/elsewhere").is_none());
    assert!(registry
        .lookup("https://unrelated.example.net/any/path/schema_shared")
        .is_none());
}

#[test]
fn documents_are_also_registered_under_their_id() {
    let mut shared = shared();
    shared["$id"] = json!("https://schemas.example.org/elter/shared.json");

    let registry = build_registry(json!({"type": "object"}), shared.clone()).unwrap();

    assert_eq!(
        registry.lookup("https://schemas.example.org/elter/shared.json"),
        Some(&shared)
    );
}

#[test]
fn topic_refs_resolve_into_shared_schema() {
    let topic = json!({
        "type": "object",
        "properties": {
            "CODE": { "$ref": "https://example.com/schema_shared#/$defs/code" }
        }
    });
    let registry = build_registry(topic, shared()).unwrap();
    let validator = registry.validator();

    let ok = runner::record_violations(&record(1, &[("CODE", "AT-01")]), validator, Coercion::None);
    assert!(ok.is_empty());

    let bad = runner::record_violations(&record(2, &[("CODE", "at01")]), validator, Coercion::None);
    assert_eq!(bad.len(), 1);
    assert_eq!(bad[0].line, 2);
    assert_eq!(bad[0].path, "CODE");
    assert!(bad[0].message.contains("at01"), "message: {}", bad[0].message);
}

#[test]
fn relative_ref_by_synthetic_name_resolves() {
    let topic = json!({
        "type": "object",
        "properties": {
            "CODE": { "$ref": "schema_shared#/$defs/code" }
        }
    });
    let registry = build_registry(topic, shared()).unwrap();
    let validator = registry.validator();

    let bad = runner::record_violations(&record(1, &[("CODE", "nope")]), validator, Coercion::None);
    assert_eq!(bad.len(), 1);
    assert_eq!(bad[0].path, "CODE");
}

#[test]
fn registry_without_cross_refs_matches_topic_alone() {
    let topic = json!({
        "type": "object",
        "required": ["A", "B"],
        "properties": {
            "A": { "type": "string", "maxLength": 3 },
            "B": { "enum": ["x", "y"] }
        }
    });
    let registry = build_registry(topic.clone(), shared()).unwrap();
    let linked = registry.validator();
    let alone = validator_for(&topic).unwrap();

    let rows = [
        record(1, &[("A", "abc"), ("B", "x")]),
        record(2, &[("A", "abcd"), ("B", "z")]),
        record(3, &[("A", "ab")]),
    ];

    for row in &rows {
        let instance = row.to_instance(Coercion::None);
        let expected: Vec<String> = alone.iter_errors(&instance).map(|e| e.to_string()).collect();
        let actual: Vec<String> = runner::record_violations(row, linked, Coercion::None)
            .into_iter()
            .map(|v| v.message)
            .collect();
        assert_eq!(actual, expected, "line {}", row.line);
    }
}

#[test]
fn non_schema_topic_is_rejected_as_topic() {
    let err = build_registry(json!([1, 2, 3]), shared()).unwrap_err();
    assert!(
        matches!(err, ValidateError::SchemaInvalid { schema: SchemaRole::Topic, .. }),
        "got {err:?}"
    );
}

#[test]
fn structurally_invalid_shared_is_rejected_as_shared() {
    let broken = json!({ "type": 42 });
    let err = build_registry(json!({"type": "object"}), broken).unwrap_err();
    assert!(
        matches!(err, ValidateError::SchemaInvalid { schema: SchemaRole::Shared, .. }),
        "got {err:?}"
    );
}

#[test]
fn unresolvable_ref_fails_compilation() {
    let topic = json!({
        "properties": {
            "X": { "$ref": "https://example.com/not_registered#/$defs/x" }
        }
    });
    let err = build_registry(topic, shared()).unwrap_err();
    assert!(
        matches!(err, ValidateError::SchemaInvalid { schema: SchemaRole::Topic, .. }),
        "got {err:?}"
    );
    assert_eq!(err.code().as_str(), "schema_invalid");
}

#[test]
fn ref_to_foreign_host_with_matching_name_is_unresolvable() {
    let topic = json!({
        "type": "object",
        "properties": {
            "CODE": { "$ref": "https://unrelated.example.net/any/path/schema_shared#/$defs/code" }
        }
    });
    let err = build_registry(topic, shared()).unwrap_err();
    assert!(
        matches!(err, ValidateError::SchemaInvalid { schema: SchemaRole::Topic, .. }),
        "got {err:?}"
    );
}

#[test]
fn relative_ref_against_topic_id_resolves_by_name() {
    let topic = json!({
        "$id": "https://schemas.example.org/elter/station.json",
        "type": "object",
        "properties": {
            "CODE": { "$ref": "schema_shared#/$defs/code" }
        }
    });
    let registry = build_registry(topic, shared()).unwrap();

    let bad = runner::record_violations(&record(1, &[("CODE", "nope")]), registry.validator(), Coercion::None);
    assert_eq!(bad.len(), 1);
    assert_eq!(bad[0].path, "CODE");
}

#[test]
fn validate_collects_rows_in_order_without_stopping() {
    let topic = json!({
        "type": "object",
        "properties": {
            "CODE": { "$ref": "https://example.com/schema_shared#/$defs/code" }
        }
    });
    let registry = build_registry(topic, shared()).unwrap();
    let rows = vec![
        Ok(record(1, &[("CODE", "bad")])),
        Ok(record(2, &[("CODE", "AT-01")])),
        Ok(record(3, &[("CODE", "worse")])),
    ];

    let results = runner::validate(rows, &registry, Coercion::None).unwrap();

    let lines: Vec<usize> = results.violations().iter().map(|v| v.line).collect();
    assert_eq!(lines, [1, 3]);
}

#[test]
fn validate_stops_at_an_unreadable_record() {
    let registry = build_registry(json!({"type": "object"}), shared()).unwrap();
    let rows = vec![
        Ok(record(1, &[("CODE", "x")])),
        Err(ValidateError::InputUnreadable {
            input: "data.csv".into(),
            reason: "data row 2: invalid UTF-8".into(),
        }),
    ];

    let err = runner::validate(rows, &registry, Coercion::None).unwrap_err();
    assert!(matches!(err, ValidateError::InputUnreadable { .. }), "got {err:?}");
}
