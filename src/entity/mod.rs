//! Canonical in-memory entity representation.
//!
//! Whatever dialect a document arrived in, it is normalized into one
//! [`CanonicalEntity`] used by storage and by responses: identity, optional
//! description, and ordered dimension and property records. Map-dialect
//! mappings keep their insertion order; list-dialect lists keep their list
//! order. The canonical form always spells shape metadata `shape` and
//! reference targets `$ref`.

use crate::identity::EntityIdentity;
use crate::schema::types::{Dialect, PropertyType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A named, sized axis of an entity's data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A named, typed field of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: PropertyType,
    /// Target entity for `ref`-typed properties
    #[serde(rename = "$ref", alias = "ref", skip_serializing_if = "Option::is_none")]
    pub ref_target: Option<String>,
    /// Dimension expressions for multi-dimensional properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// The normalized representation of a validated entity.
///
/// Created by [`CanonicalEntity::normalize`] after dialect validation has
/// succeeded; immutable thereafter. Property and dimension names are unique
/// within an entity (case-sensitive); validation guarantees it, and the
/// normalizer re-asserts it defensively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEntity {
    #[serde(flatten)]
    identity: EntityIdentity,
    meta: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    description: String,
    #[serde(default)]
    dimensions: Vec<DimensionRecord>,
    properties: Vec<PropertyRecord>,
}

impl CanonicalEntity {
    /// Convert a validated document into its canonical form.
    ///
    /// Pure and total over its input: `object` must already have passed
    /// dialect validation for `dialect`, which guarantees every field read
    /// here has the expected shape.
    pub fn normalize(
        object: &Map<String, Value>,
        dialect: Dialect,
        identity: EntityIdentity,
    ) -> Self {
        let meta = text_field(object, "meta");
        let description = text_field(object, "description");

        let (dimensions, properties) = match dialect {
            Dialect::PropertyMap => (
                map_dimensions(object.get("dimensions")),
                map_properties(object.get("properties")),
            ),
            Dialect::PropertyList => (
                list_dimensions(object.get("dimensions")),
                list_properties(object.get("properties")),
            ),
        };

        debug_assert!(
            unique_names(dimensions.iter().map(|d| d.name.as_str())),
            "dimension names must be unique after validation"
        );
        debug_assert!(
            unique_names(properties.iter().map(|p| p.name.as_str())),
            "property names must be unique after validation"
        );

        Self {
            identity,
            meta,
            description,
            dimensions,
            properties,
        }
    }

    /// The canonical identity of this entity.
    pub fn identity(&self) -> &EntityIdentity {
        &self.identity
    }

    /// The schema reference this entity was validated against.
    pub fn meta(&self) -> &str {
        &self.meta
    }

    /// Human-readable description of the entity.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Ordered dimension records.
    pub fn dimensions(&self) -> &[DimensionRecord] {
        &self.dimensions
    }

    /// Ordered property records.
    pub fn properties(&self) -> &[PropertyRecord] {
        &self.properties
    }
}

fn text_field(object: &Map<String, Value>, field: &str) -> String {
    object
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn map_dimensions(dimensions: Option<&Value>) -> Vec<DimensionRecord> {
    dimensions
        .and_then(Value::as_object)
        .map(|entries| {
            entries
                .iter()
                .map(|(name, description)| DimensionRecord {
                    name: name.clone(),
                    description: description.as_str().unwrap_or_default().to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn map_properties(properties: Option<&Value>) -> Vec<PropertyRecord> {
    properties
        .and_then(Value::as_object)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|(name, definition)| {
                    definition
                        .as_object()
                        .map(|definition| property_record(name, definition, "shape"))
                })
                .collect()
        })
        .unwrap_or_default()
}

fn list_dimensions(dimensions: Option<&Value>) -> Vec<DimensionRecord> {
    dimensions
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_object)
                .map(|entry| DimensionRecord {
                    name: text_field(entry, "name"),
                    description: text_field(entry, "description"),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn list_properties(properties: Option<&Value>) -> Vec<PropertyRecord> {
    properties
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_object)
                .map(|definition| {
                    let name = text_field(definition, "name");
                    property_record(&name, definition, "dims")
                })
                .collect()
        })
        .unwrap_or_default()
}

fn property_record(
    name: &str,
    definition: &Map<String, Value>,
    shape_field: &str,
) -> PropertyRecord {
    let data_type = definition
        .get("type")
        .and_then(Value::as_str)
        .and_then(PropertyType::parse)
        .unwrap_or_default();

    let ref_target = definition
        .get("$ref")
        .or_else(|| definition.get("ref"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let shape = definition.get(shape_field).and_then(Value::as_array).map(|entries| {
        entries
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    });

    let unit = definition
        .get("unit")
        .and_then(Value::as_str)
        .map(str::to_string);

    PropertyRecord {
        name: name.to_string(),
        data_type,
        ref_target,
        shape,
        unit,
        description: text_field(definition, "description"),
    }
}

fn unique_names<'a>(names: impl Iterator<Item = &'a str>) -> bool {
    let mut seen = std::collections::HashSet::new();
    names.into_iter().all(|name| seen.insert(name))
}
