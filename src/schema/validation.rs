//! Dialect validation for raw entity documents.
//!
//! A submitted document is checked against the property-map dialect first and
//! the property-list dialect second. Each attempt is a full structural and
//! type validation that runs to completion and collects every failure.
//! When neither dialect matches, the caller sees both failure sets side by
//! side.
//!
//! Identity and schema-reference checks are dialect-independent and run
//! before any dialect attempt; their failures short-circuit validation.

use crate::config::CatalogConfig;
use crate::entity::CanonicalEntity;
use crate::error::{DialectError, SchemaReferenceError, ValidationError, ValidationResult};
use crate::identity::EntityIdentity;
use crate::schema::types::{Dialect, PropertyType};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Validates raw documents against the two accepted dialects.
///
/// Construction takes the catalog configuration explicitly; the validator
/// holds no ambient state and every call is a pure function of its input.
#[derive(Debug, Clone)]
pub struct DialectValidator {
    config: CatalogConfig,
}

impl DialectValidator {
    /// Create a validator for the given configuration.
    pub fn new(config: CatalogConfig) -> Self {
        Self { config }
    }

    /// The configuration this validator was built with.
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Validate a raw document, returning its canonical form and the dialect
    /// it matched.
    ///
    /// The property-map dialect is attempted first; a document valid under
    /// both dialects therefore always resolves to [`Dialect::PropertyMap`].
    pub fn validate(&self, document: &Value) -> ValidationResult<(CanonicalEntity, Dialect)> {
        let Some(object) = document.as_object() else {
            return Err(ValidationError::NotAnObject {
                actual: json_type_name(document),
            });
        };

        let identity = EntityIdentity::resolve(document)?;
        self.check_schema_reference(object)?;

        let map_errors = match validate_property_map(object) {
            Ok(()) => {
                return Ok((
                    CanonicalEntity::normalize(object, Dialect::PropertyMap, identity),
                    Dialect::PropertyMap,
                ));
            }
            Err(errors) => errors,
        };

        let list_errors = match validate_property_list(object) {
            Ok(()) => {
                return Ok((
                    CanonicalEntity::normalize(object, Dialect::PropertyList, identity),
                    Dialect::PropertyList,
                ));
            }
            Err(errors) => errors,
        };

        Err(ValidationError::DialectsRejected {
            map: map_errors,
            list: list_errors,
        })
    }

    fn check_schema_reference(&self, object: &Map<String, Value>) -> Result<(), SchemaReferenceError> {
        let expected = self.config.schema_reference();
        match object.get("meta") {
            None => Err(SchemaReferenceError::Missing {
                expected: expected.to_string(),
            }),
            Some(Value::String(got)) if got == expected => Ok(()),
            Some(Value::String(got)) => Err(SchemaReferenceError::Unsupported {
                got: got.clone(),
                expected: expected.to_string(),
            }),
            Some(other) => Err(SchemaReferenceError::Unsupported {
                got: other.to_string(),
                expected: expected.to_string(),
            }),
        }
    }
}

impl Default for DialectValidator {
    fn default() -> Self {
        Self::new(CatalogConfig::default())
    }
}

/// Validate a document against the property-map dialect.
///
/// `dimensions` is a mapping of dimension name to description string;
/// `properties` is a mapping of property name to property definition.
/// Runs to completion and returns every failure found.
pub fn validate_property_map(object: &Map<String, Value>) -> Result<(), Vec<DialectError>> {
    let mut errors = Vec::new();

    check_optional_string(object, "description", &mut errors);

    match object.get("dimensions") {
        None => {}
        Some(Value::Object(dimensions)) => {
            for (name, description) in dimensions {
                if !description.is_string() {
                    errors.push(DialectError::InvalidDimensionField {
                        dimension: name.clone(),
                        field: "description",
                        expected: "a string",
                        actual: json_type_name(description),
                    });
                }
            }
        }
        Some(other) => errors.push(DialectError::InvalidFieldType {
            field: "dimensions",
            expected: "a mapping of dimension name to description",
            actual: json_type_name(other),
        }),
    }

    match object.get("properties") {
        None => errors.push(DialectError::MissingField {
            field: "properties",
        }),
        Some(Value::Object(properties)) => {
            for (name, definition) in properties {
                check_property_definition(name, definition, "shape", &mut errors);
            }
        }
        Some(other) => errors.push(DialectError::InvalidFieldType {
            field: "properties",
            expected: "a mapping of property name to definition",
            actual: json_type_name(other),
        }),
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Validate a document against the property-list dialect.
///
/// `dimensions` is an ordered list of `{name, description}` objects;
/// `properties` is an ordered list of property definitions each carrying its
/// own `name`. Runs to completion and returns every failure found.
pub fn validate_property_list(object: &Map<String, Value>) -> Result<(), Vec<DialectError>> {
    let mut errors = Vec::new();

    check_optional_string(object, "description", &mut errors);

    match object.get("dimensions") {
        None => {}
        Some(Value::Array(dimensions)) => {
            let mut seen = HashSet::new();
            for (index, dimension) in dimensions.iter().enumerate() {
                let label = member_label(dimension, index);
                let Some(entry) = dimension.as_object() else {
                    errors.push(DialectError::InvalidDimensionField {
                        dimension: label,
                        field: "definition",
                        expected: "an object",
                        actual: json_type_name(dimension),
                    });
                    continue;
                };
                match entry.get("name") {
                    Some(Value::String(name)) => {
                        if !seen.insert(name.clone()) {
                            errors.push(DialectError::DuplicateDimension { name: name.clone() });
                        }
                    }
                    Some(other) => errors.push(DialectError::InvalidDimensionField {
                        dimension: label.clone(),
                        field: "name",
                        expected: "a string",
                        actual: json_type_name(other),
                    }),
                    None => errors.push(DialectError::MissingDimensionField {
                        dimension: label.clone(),
                        field: "name",
                    }),
                }
                match entry.get("description") {
                    Some(value) if !value.is_string() => {
                        errors.push(DialectError::InvalidDimensionField {
                            dimension: label,
                            field: "description",
                            expected: "a string",
                            actual: json_type_name(value),
                        });
                    }
                    Some(_) => {}
                    None => errors.push(DialectError::MissingDimensionField {
                        dimension: label,
                        field: "description",
                    }),
                }
            }
        }
        Some(other) => errors.push(DialectError::InvalidFieldType {
            field: "dimensions",
            expected: "an array of dimension objects",
            actual: json_type_name(other),
        }),
    }

    match object.get("properties") {
        None => errors.push(DialectError::MissingField {
            field: "properties",
        }),
        Some(Value::Array(properties)) => {
            let mut seen = HashSet::new();
            for (index, property) in properties.iter().enumerate() {
                let label = member_label(property, index);
                let Some(definition) = property.as_object() else {
                    errors.push(DialectError::InvalidPropertyField {
                        property: label,
                        field: "definition",
                        expected: "an object",
                        actual: json_type_name(property),
                    });
                    continue;
                };
                match definition.get("name") {
                    Some(Value::String(name)) => {
                        if !seen.insert(name.clone()) {
                            errors.push(DialectError::DuplicateProperty { name: name.clone() });
                        }
                    }
                    Some(other) => errors.push(DialectError::InvalidPropertyField {
                        property: label.clone(),
                        field: "name",
                        expected: "a string",
                        actual: json_type_name(other),
                    }),
                    None => errors.push(DialectError::MissingPropertyField {
                        property: label.clone(),
                        field: "name",
                    }),
                }
                check_property_definition(&label, property, "dims", &mut errors);
            }
        }
        Some(other) => errors.push(DialectError::InvalidFieldType {
            field: "properties",
            expected: "an array of property objects",
            actual: json_type_name(other),
        }),
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Checks shared across both dialects' property definitions: `type` against
/// the fixed primitive set, the optional string fields, the shape metadata
/// (`shape` or `dims` depending on dialect), and the `$ref` target.
fn check_property_definition(
    label: &str,
    definition: &Value,
    shape_field: &'static str,
    errors: &mut Vec<DialectError>,
) {
    let Some(definition) = definition.as_object() else {
        errors.push(DialectError::InvalidPropertyField {
            property: label.to_string(),
            field: "definition",
            expected: "an object",
            actual: json_type_name(definition),
        });
        return;
    };

    match definition.get("type") {
        Some(Value::String(value)) => {
            if PropertyType::parse(value).is_none() {
                errors.push(DialectError::UnknownPropertyType {
                    property: label.to_string(),
                    value: value.clone(),
                });
            }
        }
        Some(other) => errors.push(DialectError::InvalidPropertyField {
            property: label.to_string(),
            field: "type",
            expected: "a string",
            actual: json_type_name(other),
        }),
        None => errors.push(DialectError::MissingPropertyField {
            property: label.to_string(),
            field: "type",
        }),
    }

    for field in ["description", "unit"] {
        if let Some(value) = definition.get(field) {
            if !value.is_string() {
                errors.push(DialectError::InvalidPropertyField {
                    property: label.to_string(),
                    field,
                    expected: "a string",
                    actual: json_type_name(value),
                });
            }
        }
    }

    if let Some(shape) = definition.get(shape_field) {
        let valid = shape
            .as_array()
            .is_some_and(|entries| entries.iter().all(Value::is_string));
        if !valid {
            errors.push(DialectError::InvalidPropertyField {
                property: label.to_string(),
                field: shape_field,
                expected: "an array of dimension expressions",
                actual: json_type_name(shape),
            });
        }
    }

    // `$ref` is the serialized spelling; `ref` is accepted as an alias.
    if let Some(target) = definition.get("$ref").or_else(|| definition.get("ref")) {
        match target.as_str() {
            Some(target) if EntityIdentity::from_uri(target).is_ok() => {}
            Some(target) => errors.push(DialectError::InvalidReferenceTarget {
                property: label.to_string(),
                target: target.to_string(),
            }),
            None => errors.push(DialectError::InvalidPropertyField {
                property: label.to_string(),
                field: "$ref",
                expected: "a URI string",
                actual: json_type_name(target),
            }),
        }
    }
}

fn check_optional_string(
    object: &Map<String, Value>,
    field: &'static str,
    errors: &mut Vec<DialectError>,
) {
    if let Some(value) = object.get(field) {
        if !value.is_string() {
            errors.push(DialectError::InvalidFieldType {
                field,
                expected: "a string",
                actual: json_type_name(value),
            });
        }
    }
}

/// Label a list member by its `name` when it has one, by position otherwise.
fn member_label(member: &Value, index: usize) -> String {
    member
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("#{index}"))
}

/// The JSON type of a value, for error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() => "integer",
        Value::Number(_) => "decimal",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
