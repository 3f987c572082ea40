//! Dialect vocabulary and validation for entity documents.
//!
//! Two structurally incompatible wire shapes express the same entity
//! concept; [`DialectValidator`] decides which one a document matches and
//! hands back its canonical form.

pub mod types;
pub mod validation;

pub use types::{Dialect, PropertyType};
pub use validation::{DialectValidator, validate_property_list, validate_property_map};
