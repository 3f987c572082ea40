//! Role vocabulary and the authorization seam.
//!
//! Authorization is an external collaborator: an identity provider answers
//! "does this caller hold role X" and the transport layer consults it before
//! any write operation reaches the core. The core itself is role-agnostic:
//! nothing in validation or the write path inspects roles.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::future::Future;

/// Roles the transport layer gates catalog operations on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full administrative access to the catalog
    #[serde(rename = "entities")]
    EntitiesAdmin,
    #[serde(rename = "entities:read")]
    EntitiesRead,
    #[serde(rename = "entities:write")]
    EntitiesWrite,
    #[serde(rename = "entities:edit")]
    EntitiesEdit,
    #[serde(rename = "entities:delete")]
    EntitiesDelete,
}

impl Role {
    /// The role's stable wire name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EntitiesAdmin => "entities",
            Self::EntitiesRead => "entities:read",
            Self::EntitiesWrite => "entities:write",
            Self::EntitiesEdit => "entities:edit",
            Self::EntitiesDelete => "entities:delete",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability seam to the external authorization provider.
///
/// Implementations answer per-request role checks; how the answer is
/// produced (OAuth2 token introspection, group membership, a static set)
/// is the implementation's business.
pub trait RoleProvider: Send + Sync {
    /// Whether the current caller holds the given role.
    fn has_role(&self, role: Role) -> impl Future<Output = bool> + Send;
}

/// Role provider backed by a fixed role set.
///
/// Useful for tests and single-user tooling where the role set is known up
/// front.
#[derive(Debug, Clone, Default)]
pub struct StaticRoleProvider {
    roles: HashSet<Role>,
}

impl StaticRoleProvider {
    /// Create a provider granting exactly the given roles.
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            roles: roles.into_iter().collect(),
        }
    }

    /// Create a provider granting every role.
    pub fn all() -> Self {
        Self::new([
            Role::EntitiesAdmin,
            Role::EntitiesRead,
            Role::EntitiesWrite,
            Role::EntitiesEdit,
            Role::EntitiesDelete,
        ])
    }
}

impl RoleProvider for StaticRoleProvider {
    async fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_are_stable() {
        assert_eq!(Role::EntitiesRead.as_str(), "entities:read");
        assert_eq!(Role::EntitiesAdmin.as_str(), "entities");
    }

    #[test]
    fn roles_serialize_to_wire_names() {
        let json = serde_json::to_string(&Role::EntitiesWrite).unwrap();
        assert_eq!(json, "\"entities:write\"");
    }

    #[tokio::test]
    async fn static_provider_answers_membership() {
        let provider = StaticRoleProvider::new([Role::EntitiesRead]);
        assert!(provider.has_role(Role::EntitiesRead).await);
        assert!(!provider.has_role(Role::EntitiesWrite).await);

        let admin = StaticRoleProvider::all();
        assert!(admin.has_role(Role::EntitiesDelete).await);
    }
}
