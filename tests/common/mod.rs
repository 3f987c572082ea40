//! Shared fixtures for integration tests.

use serde_json::{Value, json};

pub const SCHEMA_REFERENCE: &str = "http://onto-ns.com/meta/0.3/EntitySchema";

/// A valid property-map dialect document for the given entity name.
pub fn map_dialect_document(name: &str) -> Value {
    json!({
        "namespace": "http://x/meta",
        "version": "0.3",
        "name": name,
        "meta": SCHEMA_REFERENCE,
        "dimensions": {},
        "properties": {"name": {"type": "string"}}
    })
}

/// A valid property-list dialect document for the given entity name.
pub fn list_dialect_document(name: &str) -> Value {
    json!({
        "namespace": "http://x/meta",
        "version": "0.3",
        "name": name,
        "meta": SCHEMA_REFERENCE,
        "dimensions": [
            {"name": "n", "description": "Primary axis."}
        ],
        "properties": [
            {"name": "values", "type": "double", "dims": ["n"], "description": "Stored values."},
            {"name": "label", "type": "string", "description": "Display label."}
        ]
    })
}
