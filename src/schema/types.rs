//! Dialect and property-type vocabulary for entity documents.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two accepted wire shapes for an entity document.
///
/// Both express the same concept with structurally incompatible containers;
/// a document is validated against each in turn and tagged with whichever
/// shape it matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dialect {
    /// `dimensions` and `properties` are name-keyed mappings
    PropertyMap,
    /// `dimensions` and `properties` are ordered lists of named objects
    PropertyList,
}

impl Dialect {
    /// The dialect's stable wire name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PropertyMap => "property-map",
            Self::PropertyList => "property-list",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed primitive set a property's `type` must name.
///
/// Array-ness is not a type of its own; it is expressed through a
/// property's shape metadata, which lists the dimension expressions the
/// property spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    #[serde(alias = "bool")]
    Boolean,
    #[serde(alias = "int")]
    Integer,
    Float,
    Double,
    #[serde(alias = "str")]
    String,
    Blob,
    /// Reference to another entity; used together with a `$ref` target
    Ref,
}

impl PropertyType {
    /// Parse a wire type name, including its accepted aliases.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "boolean" | "bool" => Some(Self::Boolean),
            "integer" | "int" => Some(Self::Integer),
            "float" => Some(Self::Float),
            "double" => Some(Self::Double),
            "string" | "str" => Some(Self::String),
            "blob" => Some(Self::Blob),
            "ref" => Some(Self::Ref),
            _ => None,
        }
    }

    /// The canonical wire name of this type.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Double => "double",
            Self::String => "string",
            Self::Blob => "blob",
            Self::Ref => "ref",
        }
    }

    /// Comma-joined list of supported type names, for error messages.
    pub const fn supported_names() -> &'static str {
        "boolean, integer, float, double, string, blob, ref"
    }
}

impl Default for PropertyType {
    fn default() -> Self {
        Self::String
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
