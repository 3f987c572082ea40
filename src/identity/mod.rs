//! Entity identity resolution and cross-checking.
//!
//! An entity is canonically named by a URI of the form
//! `{namespace}/{version}/{name}`; documents may carry the full URI, the
//! namespace/version/name triple, or both. This module derives one
//! [`EntityIdentity`] from whichever form is present and rejects documents
//! where the two forms disagree.

use crate::error::IdentityError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

/// Pattern segmenting an entity URI into its namespace, version, and name.
///
/// The namespace match is greedy: the version is always the last
/// `digits[.digits[.digits]]` path segment followed by a final name
/// segment, which makes segmentation deterministic for any given URI.
static IDENTITY_URI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<namespace>(?:https?|file)://.+)/(?P<version>\d+(?:\.\d+){0,2})/(?P<name>[^/#?]+)$")
        .expect("identity URI pattern compiles")
});

const SUPPORTED_SCHEMES: [&str; 3] = ["http", "https", "file"];

const TRIPLE_FIELDS: [&str; 3] = ["namespace", "version", "name"];

/// The canonical identity of an entity.
///
/// Always carries the full URI; carries the namespace/version/name triple
/// whenever it was supplied or could be derived from the URI. The triple is
/// never partially populated.
///
/// Equality and hashing are by canonical URI; the triple is derived detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "IdentityParts")]
pub struct EntityIdentity {
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    uri: String,
}

/// Raw identity fields as they appear on the wire, prior to cross-checking.
#[derive(Debug, Clone, Default, Deserialize)]
struct IdentityParts {
    namespace: Option<String>,
    version: Option<String>,
    name: Option<String>,
    uri: Option<String>,
}

impl EntityIdentity {
    /// Derive an identity from a raw entity document.
    ///
    /// Policy:
    /// - none of `uri`, `namespace`, `version`, `name` present → [`IdentityError::Missing`]
    /// - triple partially present → [`IdentityError::PartialTriple`]
    /// - both forms present but `{namespace}/{version}/{name}` does not
    ///   reconstruct `uri` exactly → [`IdentityError::Inconsistent`]
    /// - triple only → the URI is synthesized
    /// - `uri` only → accepted as-is; the triple is filled in when the URI
    ///   matches the deterministic segmentation, left unset otherwise
    pub fn resolve(document: &Value) -> Result<Self, IdentityError> {
        let parts = IdentityParts {
            namespace: string_field(document, "namespace"),
            version: string_field(document, "version"),
            name: string_field(document, "name"),
            uri: string_field(document, "uri"),
        };
        Self::from_parts(parts)
    }

    /// Build an identity from a namespace/version/name triple, synthesizing
    /// the URI.
    pub fn from_triple(
        namespace: impl Into<String>,
        version: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, IdentityError> {
        let namespace = namespace.into();
        let version = version.into();
        let name = name.into();
        let uri = join_uri(&namespace, &version, &name);
        if !is_well_formed_uri(&uri) {
            return Err(IdentityError::MalformedUri { uri });
        }
        Ok(Self {
            namespace: Some(trim_namespace(&namespace)),
            version: Some(version),
            name: Some(name),
            uri,
        })
    }

    /// Build an identity from a URI alone.
    ///
    /// The triple is derived when the URI matches the deterministic
    /// `{namespace}/{version}/{name}` segmentation; any other well-formed
    /// http/https/file URI is accepted with the triple left unset.
    pub fn from_uri(uri: impl Into<String>) -> Result<Self, IdentityError> {
        let uri = uri.into();
        if !is_well_formed_uri(&uri) {
            return Err(IdentityError::MalformedUri { uri });
        }

        let (namespace, version, name) = match IDENTITY_URI_PATTERN.captures(&uri) {
            Some(captures) => (
                captures.name("namespace").map(|m| m.as_str().to_string()),
                captures.name("version").map(|m| m.as_str().to_string()),
                captures.name("name").map(|m| m.as_str().to_string()),
            ),
            None => (None, None, None),
        };
        Ok(Self {
            namespace,
            version,
            name,
            uri,
        })
    }

    fn from_parts(parts: IdentityParts) -> Result<Self, IdentityError> {
        let IdentityParts {
            namespace,
            version,
            name,
            uri,
        } = parts;

        let triple = [&namespace, &version, &name];
        let present = triple.iter().filter(|field| field.is_some()).count();

        if present == 0 && uri.is_none() {
            return Err(IdentityError::Missing);
        }

        if present > 0 && present < TRIPLE_FIELDS.len() {
            let missing = TRIPLE_FIELDS
                .iter()
                .zip(triple)
                .filter(|(_, value)| value.is_none())
                .map(|(field, _)| *field)
                .collect();
            return Err(IdentityError::PartialTriple { missing });
        }

        match (uri, namespace, version, name) {
            // URI alone: permissive acceptance, triple derived when possible.
            (Some(uri), None, None, None) => Self::from_uri(uri),

            // Triple alone: synthesize the URI.
            (None, Some(namespace), Some(version), Some(name)) => {
                Self::from_triple(namespace, version, name)
            }

            // Both forms: the triple must reconstruct the URI exactly.
            (Some(uri), Some(namespace), Some(version), Some(name)) => {
                if !is_well_formed_uri(&uri) {
                    return Err(IdentityError::MalformedUri { uri });
                }
                let expected = join_uri(&namespace, &version, &name);
                if uri != expected {
                    return Err(IdentityError::Inconsistent { uri, expected });
                }
                Ok(Self {
                    namespace: Some(trim_namespace(&namespace)),
                    version: Some(version),
                    name: Some(name),
                    uri,
                })
            }

            // Partial triples were rejected above.
            _ => Err(IdentityError::Missing),
        }
    }

    /// The canonical URI naming this entity.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The namespace component, when known.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The version component, when known.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// The name component, when known.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Consume the identity, returning the owned URI string.
    pub fn into_uri(self) -> String {
        self.uri
    }

    /// Compute the next version string for this entity.
    ///
    /// `1` bumps to `1.1`, `1.1` to `1.1.1`, and `1.1.1` to `1.1.2`.
    pub fn next_version(&self) -> Result<String, IdentityError> {
        let current = self
            .version
            .as_deref()
            .ok_or_else(|| IdentityError::UnparsableVersion {
                version: self.uri.clone(),
            })?;
        bump_version(current)
    }
}

impl PartialEq for EntityIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri
    }
}

impl Eq for EntityIdentity {}

impl std::hash::Hash for EntityIdentity {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.uri.hash(state);
    }
}

impl fmt::Display for EntityIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl TryFrom<IdentityParts> for EntityIdentity {
    type Error = IdentityError;

    fn try_from(parts: IdentityParts) -> Result<Self, IdentityError> {
        Self::from_parts(parts)
    }
}

impl TryFrom<&str> for EntityIdentity {
    type Error = IdentityError;

    fn try_from(uri: &str) -> Result<Self, IdentityError> {
        Self::from_uri(uri)
    }
}

fn string_field(document: &Value, field: &str) -> Option<String> {
    document
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn trim_namespace(namespace: &str) -> String {
    namespace.trim_end_matches('/').to_string()
}

fn join_uri(namespace: &str, version: &str, name: &str) -> String {
    format!("{}/{}/{}", namespace.trim_end_matches('/'), version, name)
}

/// A URI is well-formed here when it carries a supported scheme and a
/// non-empty remainder free of whitespace. No authority or path-shape
/// constraint beyond that is imposed.
fn is_well_formed_uri(uri: &str) -> bool {
    SUPPORTED_SCHEMES.iter().any(|scheme| {
        uri.strip_prefix(scheme)
            .and_then(|rest| rest.strip_prefix("://"))
            .is_some_and(|rest| !rest.is_empty() && !rest.contains(char::is_whitespace))
    })
}

fn bump_version(version: &str) -> Result<String, IdentityError> {
    let segments: Vec<&str> = version.split('.').collect();

    if segments.iter().any(|s| s.is_empty() || !s.chars().all(|c| c.is_ascii_digit())) {
        return Err(IdentityError::UnparsableVersion {
            version: version.to_string(),
        });
    }

    match segments.as_slice() {
        [major] => Ok(format!("{major}.1")),
        [major, minor] => Ok(format!("{major}.{minor}.1")),
        [major, minor, patch] => {
            let patch: u64 = patch
                .parse()
                .map_err(|_| IdentityError::UnparsableVersion {
                    version: version.to_string(),
                })?;
            Ok(format!("{major}.{minor}.{}", patch + 1))
        }
        _ => Err(IdentityError::UnparsableVersion {
            version: version.to_string(),
        }),
    }
}
