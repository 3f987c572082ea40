//! Catalog configuration.
//!
//! Configuration is an explicit immutable value constructed at startup and
//! handed to the validator and service, never ambient global state.

/// The entity-schema specification every accepted document must reference.
pub const DEFAULT_SCHEMA_REFERENCE: &str = "http://onto-ns.com/meta/0.3/EntitySchema";

/// Immutable configuration for the catalog core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    schema_reference: String,
}

impl CatalogConfig {
    /// Create a configuration with the default supported schema reference.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the supported schema reference.
    pub fn with_schema_reference(mut self, schema_reference: impl Into<String>) -> Self {
        self.schema_reference = schema_reference.into();
        self
    }

    /// The single `meta` value accepted by the dialect validator.
    pub fn schema_reference(&self) -> &str {
        &self.schema_reference
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            schema_reference: DEFAULT_SCHEMA_REFERENCE.to_string(),
        }
    }
}
