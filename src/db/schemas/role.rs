//! Role document schema.
//!
//! A role is a named aggregate of permissions stored as an integer bitmask.
//! Role names are unique; exactly one role carries the `default` flag and is
//! assigned to identities that do not match the administrator allowlist.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::auth::Permission;
use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for roles.
pub const ROLE_COLLECTION: &str = "roles";

/// Role document stored in MongoDB.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct RoleDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub metadata: Metadata,

    /// Unique role name ("User", "Admin").
    pub name: String,

    /// Whether new identities fall back to this role.
    #[serde(default)]
    pub default: bool,

    /// Permission bitmask.
    #[serde(default)]
    pub permissions: u32,
}

impl RoleDoc {
    pub fn new(name: &str, default: bool, permissions: Permission) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            name: name.to_string(),
            default,
            permissions: permissions.bits(),
        }
    }

    /// The role's permission set.
    pub fn permission_set(&self) -> Permission {
        Permission::from_bits_truncate(self.permissions)
    }

    /// True iff every bit of `p` is set in the mask.
    pub fn has(&self, p: Permission) -> bool {
        self.permission_set().contains(p)
    }

    /// OR the given permissions into the mask.
    pub fn grant(&mut self, p: Permission) {
        self.permissions = (self.permission_set() | p).bits();
    }

    /// Clear the given permissions from the mask.
    ///
    /// Clears via AND-complement, so revoking a permission the role does not
    /// hold is a no-op rather than corrupting the mask.
    pub fn revoke(&mut self, p: Permission) {
        self.permissions = (self.permission_set() - p).bits();
    }
}

impl IntoIndexes for RoleDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (
                doc! { "name": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("name_unique".to_string())
                        .build(),
                ),
            ),
            (
                doc! { "default": 1 },
                Some(IndexOptions::builder().name("default_index".to_string()).build()),
            ),
        ]
    }
}

impl MutMetadata for RoleDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_checks_exact_combination() {
        let role = RoleDoc::new("User", true, Permission::USER_SET);
        assert!(role.has(Permission::FOLLOW));
        assert!(role.has(Permission::COMMENT | Permission::WRITE_RECIPES));
        assert!(!role.has(Permission::ADMIN));
        assert!(!role.has(Permission::FOLLOW | Permission::ADMIN));
    }

    #[test]
    fn grant_then_revoke_restores_mask() {
        let mut role = RoleDoc::new("User", true, Permission::USER_SET);
        let original = role.permissions;

        role.grant(Permission::MOD_COMMENT);
        assert!(role.has(Permission::MOD_COMMENT));
        role.revoke(Permission::MOD_COMMENT);
        assert_eq!(role.permissions, original);
    }

    #[test]
    fn revoking_an_absent_permission_is_a_noop() {
        let mut role = RoleDoc::new("User", true, Permission::USER_SET);
        let original = role.permissions;

        role.revoke(Permission::ADMIN);
        assert_eq!(role.permissions, original);
    }

    #[test]
    fn granting_twice_is_idempotent() {
        let mut role = RoleDoc::new("User", true, Permission::USER_SET);
        role.grant(Permission::ADMIN);
        let once = role.permissions;
        role.grant(Permission::ADMIN);
        assert_eq!(role.permissions, once);
    }
}
