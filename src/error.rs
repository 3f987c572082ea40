//! Error types for entity catalog operations.
//!
//! Every failure produced by identity resolution, dialect validation, or the
//! write path is expressed through the taxonomy in this module and re-mapped
//! into a stable [`ErrorResponse`] at the transport boundary. Raw library
//! errors never cross that boundary.

use crate::identity::EntityIdentity;
use crate::storage::StorageError;
use serde::Serialize;
use serde_json::{Value, json};

/// Errors from deriving or cross-checking an entity's canonical identity.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IdentityError {
    /// Neither a `uri` nor a namespace/version/name triple was given
    #[error("no identity given: either `uri` or all of `namespace`, `version`, and `name` must be set")]
    Missing,

    /// The namespace/version/name triple is only partially populated
    #[error("incomplete identity: `namespace`, `version`, and `name` must either all be set or all be unset (missing: {})", .missing.join(", "))]
    PartialTriple { missing: Vec<&'static str> },

    /// Both identity forms are present but do not agree
    #[error("`uri` is not consistent with `namespace`, `version`, and `name`: got '{uri}', expected '{expected}'")]
    Inconsistent { uri: String, expected: String },

    /// The URI is not a well-formed http, https, or file URI
    #[error("malformed entity URI '{uri}': expected a well-formed http, https, or file URI")]
    MalformedUri { uri: String },

    /// The version segment cannot be parsed for a version bump
    #[error("cannot parse version from '{version}': expected MAJOR, MAJOR.MINOR, or MAJOR.MINOR.PATCH with numeric segments")]
    UnparsableVersion { version: String },
}

impl IdentityError {
    /// Stable machine-checkable kind string for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Missing => "identity-missing",
            Self::PartialTriple { .. } => "identity-partial-triple",
            Self::Inconsistent { .. } => "identity-inconsistent",
            Self::MalformedUri { .. } => "identity-malformed-uri",
            Self::UnparsableVersion { .. } => "identity-unparsable-version",
        }
    }
}

/// The `meta` field does not name the supported entity-schema specification.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaReferenceError {
    /// The `meta` field is absent
    #[error("missing `meta` schema reference; this catalog requires '{expected}'")]
    Missing { expected: String },

    /// The `meta` field is present but names an unsupported specification
    #[error("unsupported `meta` schema reference '{got}'; this catalog requires '{expected}'")]
    Unsupported { got: String, expected: String },
}

/// A single structural or type failure from one dialect's validation pass.
///
/// Each dialect attempt runs to completion and collects every failure, so a
/// caller sees the full set of reasons a document missed that shape.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DialectError {
    /// Required top-level field is missing
    #[error("required field `{field}` is missing")]
    MissingField { field: &'static str },

    /// Top-level field has the wrong JSON type for this dialect
    #[error("field `{field}` must be {expected}, got {actual}")]
    InvalidFieldType {
        field: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    /// Property definition is missing a required field
    #[error("property '{property}' is missing required field `{field}`")]
    MissingPropertyField {
        property: String,
        field: &'static str,
    },

    /// Property definition field has the wrong JSON type
    #[error("property '{property}' field `{field}` must be {expected}, got {actual}")]
    InvalidPropertyField {
        property: String,
        field: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    /// Property `type` is not one of the supported primitives
    #[error("property '{property}' has unsupported type '{value}' (supported: {})", crate::schema::PropertyType::supported_names())]
    UnknownPropertyType { property: String, value: String },

    /// Property `$ref` target is not a well-formed URI
    #[error("property '{property}' has malformed reference target '{target}'")]
    InvalidReferenceTarget { property: String, target: String },

    /// Dimension entry is missing a required field
    #[error("dimension '{dimension}' is missing required field `{field}`")]
    MissingDimensionField {
        dimension: String,
        field: &'static str,
    },

    /// Dimension entry field has the wrong JSON type
    #[error("dimension '{dimension}' field `{field}` must be {expected}, got {actual}")]
    InvalidDimensionField {
        dimension: String,
        field: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    /// Two properties share the same (case-sensitive) name
    #[error("duplicate property name '{name}'")]
    DuplicateProperty { name: String },

    /// Two dimensions share the same (case-sensitive) name
    #[error("duplicate dimension name '{name}'")]
    DuplicateDimension { name: String },
}

/// Validation failure for a single submitted document.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The document is not a JSON object at all
    #[error("entity document must be a JSON object, got {actual}")]
    NotAnObject { actual: &'static str },

    /// Identity derivation failed; identity is dialect-independent, so this
    /// short-circuits both dialect attempts
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// The schema reference is missing or unsupported
    #[error(transparent)]
    SchemaReference(#[from] SchemaReferenceError),

    /// The document fully validates under neither dialect; both failure sets
    /// are carried so the caller sees why each shape rejected it
    #[error("entity is valid under neither dialect; property-map: [{}]; property-list: [{}]", join_errors(.map), join_errors(.list))]
    DialectsRejected {
        map: Vec<DialectError>,
        list: Vec<DialectError>,
    },
}

impl ValidationError {
    /// Stable machine-checkable kind string for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotAnObject { .. } => "not-an-object",
            Self::Identity(err) => err.kind(),
            Self::SchemaReference(_) => "unsupported-schema-reference",
            Self::DialectsRejected { .. } => "dialects-rejected",
        }
    }
}

/// Result alias for per-document validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// One document's validation failure within a submitted batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFailure {
    /// Zero-based position of the document in the submitted batch
    pub index: usize,
    /// Why the document was rejected
    pub error: ValidationError,
}

/// Aggregated validation failures for a batch.
///
/// Validation runs over every submitted document before any store call is
/// made; a batch containing any invalid item never reaches storage.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{} of the submitted documents failed validation", .failures.len())]
pub struct BatchValidationError {
    pub failures: Vec<ItemFailure>,
}

/// A create was attempted for identities the catalog already holds.
///
/// Carries every colliding identity, not just the first; no entity from the
/// batch is created when this is raised.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("entity identities already exist in the catalog: {}", join_uris(.identities))]
pub struct ConflictError {
    pub identities: Vec<EntityIdentity>,
}

/// Top-level error for catalog service operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// One or more submitted documents failed validation
    #[error("validation failed: {0}")]
    Validation(#[from] BatchValidationError),

    /// One or more submitted identities already exist
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// The document store failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Lookup miss for a single identity
    #[error("no entity found with identity '{identity}'")]
    NotFound { identity: String },

    /// A delete was requested without any identities
    #[error("no entity identities provided")]
    NoIdentities,
}

impl ServiceError {
    /// Create a not-found error for the given identity URI.
    pub fn not_found(identity: impl Into<String>) -> Self {
        Self::NotFound {
            identity: identity.into(),
        }
    }

    /// Stable external kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(batch) => {
                // A batch rejected purely over its schema reference gets the
                // distinct kind so callers are steered by one message.
                if !batch.failures.is_empty()
                    && batch
                        .failures
                        .iter()
                        .all(|f| matches!(f.error, ValidationError::SchemaReference(_)))
                {
                    ErrorKind::UnsupportedSchemaReference
                } else {
                    ErrorKind::ValidationFailed
                }
            }
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Storage(err) if err.is_transient() => ErrorKind::StoreUnavailable,
            Self::Storage(_) => ErrorKind::StoreRejected,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::NoIdentities => ErrorKind::NoIdentities,
        }
    }

    /// HTTP status the transport layer should answer with.
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }
}

/// Result alias for catalog service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Stable, machine-checkable kinds exposed at the transport boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    ValidationFailed,
    UnsupportedSchemaReference,
    Conflict,
    NotFound,
    NoIdentities,
    StoreUnavailable,
    StoreRejected,
}

impl ErrorKind {
    /// The kind as its stable wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationFailed => "validation-failed",
            Self::UnsupportedSchemaReference => "unsupported-schema-reference",
            Self::Conflict => "conflict",
            Self::NotFound => "not-found",
            Self::NoIdentities => "no-identities",
            Self::StoreUnavailable => "store-unavailable",
            Self::StoreRejected => "store-rejected",
        }
    }

    /// HTTP status equivalent for this kind.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ValidationFailed | Self::UnsupportedSchemaReference => 422,
            Self::Conflict => 409,
            Self::NotFound => 404,
            Self::NoIdentities => 400,
            Self::StoreUnavailable => 503,
            Self::StoreRejected => 502,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform error payload handed to the transport layer.
///
/// Always carries a kind, a human-readable message, and, for validation and
/// conflict failures, the specific offending documents or identities.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl From<&ServiceError> for ErrorResponse {
    fn from(error: &ServiceError) -> Self {
        let details = match error {
            ServiceError::Validation(batch) => Some(Value::Array(
                batch
                    .failures
                    .iter()
                    .map(|failure| {
                        let mut detail = json!({
                            "index": failure.index,
                            "kind": failure.error.kind(),
                            "message": failure.error.to_string(),
                        });
                        if let ValidationError::DialectsRejected { map, list } = &failure.error {
                            detail["property-map"] = Value::Array(
                                map.iter().map(|e| Value::String(e.to_string())).collect(),
                            );
                            detail["property-list"] = Value::Array(
                                list.iter().map(|e| Value::String(e.to_string())).collect(),
                            );
                        }
                        detail
                    })
                    .collect(),
            )),
            ServiceError::Conflict(conflict) => Some(Value::Array(
                conflict
                    .identities
                    .iter()
                    .map(|identity| Value::String(identity.uri().to_string()))
                    .collect(),
            )),
            _ => None,
        };

        Self {
            kind: error.kind(),
            message: error.to_string(),
            details,
        }
    }
}

fn join_errors(errors: &[DialectError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn join_uris(identities: &[EntityIdentity]) -> String {
    identities
        .iter()
        .map(|identity| identity.uri().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_error_kinds_are_stable() {
        assert_eq!(IdentityError::Missing.kind(), "identity-missing");
        assert_eq!(
            IdentityError::PartialTriple {
                missing: vec!["namespace"]
            }
            .kind(),
            "identity-partial-triple"
        );
    }

    #[test]
    fn partial_triple_message_names_missing_fields() {
        let error = IdentityError::PartialTriple {
            missing: vec!["namespace", "version"],
        };
        assert!(error.to_string().contains("namespace, version"));
    }

    #[test]
    fn status_codes_follow_transport_contract() {
        assert_eq!(ErrorKind::ValidationFailed.status_code(), 422);
        assert_eq!(ErrorKind::UnsupportedSchemaReference.status_code(), 422);
        assert_eq!(ErrorKind::Conflict.status_code(), 409);
        assert_eq!(ErrorKind::StoreUnavailable.status_code(), 503);
        assert_eq!(ErrorKind::NotFound.status_code(), 404);
    }

    #[test]
    fn schema_reference_only_batch_gets_distinct_kind() {
        let error = ServiceError::Validation(BatchValidationError {
            failures: vec![ItemFailure {
                index: 0,
                error: ValidationError::SchemaReference(SchemaReferenceError::Unsupported {
                    got: "http://example.com/meta/1.0/Other".to_string(),
                    expected: "http://onto-ns.com/meta/0.3/EntitySchema".to_string(),
                }),
            }],
        });
        assert_eq!(error.kind(), ErrorKind::UnsupportedSchemaReference);
        assert_eq!(error.status_code(), 422);
    }

    #[test]
    fn dialect_rejection_response_carries_both_failure_sets() {
        let error = ServiceError::Validation(BatchValidationError {
            failures: vec![ItemFailure {
                index: 0,
                error: ValidationError::DialectsRejected {
                    map: vec![DialectError::MissingField {
                        field: "properties",
                    }],
                    list: vec![DialectError::InvalidFieldType {
                        field: "properties",
                        expected: "an array",
                        actual: "object",
                    }],
                },
            }],
        });

        let response = ErrorResponse::from(&error);
        assert_eq!(response.kind, ErrorKind::ValidationFailed);
        let details = response.details.expect("validation details");
        assert!(details[0]["property-map"].is_array());
        assert!(details[0]["property-list"].is_array());
    }
}
