//! Dialect selection and error-aggregation behavior over full documents.

mod common;

use common::{SCHEMA_REFERENCE, list_dialect_document, map_dialect_document};
use entity_catalog::{
    CatalogConfig, Dialect, DialectValidator, PropertyType, ValidationError,
};
use serde_json::json;

fn validator() -> DialectValidator {
    DialectValidator::new(CatalogConfig::default())
}

#[test]
fn map_dialect_documents_normalize_with_insertion_order() {
    let mut document = map_dialect_document("Cat");
    document["properties"] = json!({
        "zeta": {"type": "float"},
        "alpha": {"type": "string"}
    });

    let (entity, dialect) = validator().validate(&document).unwrap();
    assert_eq!(dialect, Dialect::PropertyMap);
    let names: Vec<&str> = entity.properties().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["zeta", "alpha"]);
}

#[test]
fn list_dialect_documents_normalize_with_list_order() {
    let (entity, dialect) = validator()
        .validate(&list_dialect_document("Signal"))
        .unwrap();
    assert_eq!(dialect, Dialect::PropertyList);

    let names: Vec<&str> = entity.properties().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["values", "label"]);
    assert_eq!(entity.properties()[0].data_type, PropertyType::Double);
    // List-dialect `dims` lands in the canonical `shape` metadata.
    assert_eq!(
        entity.properties()[0].shape.as_deref(),
        Some(&["n".to_string()][..])
    );
}

#[test]
fn document_matching_neither_dialect_reports_both_failure_sets() {
    // List-shaped containers whose members are broken: the map dialect
    // rejects the container shapes, the list dialect rejects the members.
    let document = json!({
        "uri": "http://x/meta/0.3/Broken",
        "meta": SCHEMA_REFERENCE,
        "dimensions": [{"description": "nameless"}],
        "properties": [{"name": "p", "type": "quaternion"}]
    });

    match validator().validate(&document) {
        Err(ValidationError::DialectsRejected { map, list }) => {
            assert!(!map.is_empty(), "map dialect failures expected");
            assert!(!list.is_empty(), "list dialect failures expected");

            let map_messages: Vec<String> = map.iter().map(ToString::to_string).collect();
            assert!(
                map_messages.iter().any(|m| m.contains("dimensions")),
                "map failures name the container: {map_messages:?}"
            );

            let list_messages: Vec<String> = list.iter().map(ToString::to_string).collect();
            assert!(
                list_messages.iter().any(|m| m.contains("quaternion")),
                "list failures name the bad type: {list_messages:?}"
            );
            assert!(
                list_messages.iter().any(|m| m.contains("name")),
                "list failures name the missing field: {list_messages:?}"
            );
        }
        other => panic!("expected DialectsRejected, got: {other:?}"),
    }
}

#[test]
fn tie_break_is_deterministic_across_repeated_calls() {
    // Valid under the map dialect; the list dialect is never consulted, so
    // repeated validation always lands on the same tag.
    let document = map_dialect_document("Cat");
    let validator = validator();
    for _ in 0..10 {
        let (_, dialect) = validator.validate(&document).unwrap();
        assert_eq!(dialect, Dialect::PropertyMap);
    }
}

#[test]
fn duplicate_property_names_never_reach_normalization() {
    let mut document = list_dialect_document("Cat");
    document["properties"] = json!([
        {"name": "twin", "type": "string", "description": "First."},
        {"name": "twin", "type": "integer", "description": "Second."}
    ]);

    assert!(matches!(
        validator().validate(&document),
        Err(ValidationError::DialectsRejected { .. })
    ));
}

#[test]
fn schema_reference_mismatch_is_not_a_shape_error() {
    let mut document = map_dialect_document("Cat");
    document["meta"] = json!("http://onto-ns.com/meta/0.2/EntitySchema");

    match validator().validate(&document) {
        Err(ValidationError::SchemaReference(error)) => {
            let message = error.to_string();
            assert!(message.contains("0.2"));
            assert!(message.contains(SCHEMA_REFERENCE));
        }
        other => panic!("expected SchemaReference, got: {other:?}"),
    }
}

#[test]
fn configured_schema_reference_is_honored() {
    let config =
        CatalogConfig::new().with_schema_reference("http://example.org/meta/1.0/EntitySchema");
    let validator = DialectValidator::new(config);

    let mut document = map_dialect_document("Cat");
    document["meta"] = json!("http://example.org/meta/1.0/EntitySchema");
    assert!(validator.validate(&document).is_ok());

    // The default reference is now the unsupported one.
    let default_meta = map_dialect_document("Cat");
    assert!(matches!(
        validator.validate(&default_meta),
        Err(ValidationError::SchemaReference(_))
    ));
}

#[test]
fn identity_errors_short_circuit_before_dialect_checks() {
    // Properties are broken too, but the identity failure wins.
    let document = json!({
        "version": "0.3",
        "name": "Cat",
        "meta": SCHEMA_REFERENCE,
        "properties": "not-a-container"
    });
    assert!(matches!(
        validator().validate(&document),
        Err(ValidationError::Identity(_))
    ));
}
