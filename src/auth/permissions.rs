//! Atomic permissions and canonical role sets.
//!
//! Each permission is a single-bit flag; a role's mask is the bitwise OR of
//! the permissions it holds. The exact-combination semantics matter: a check
//! passes iff every bit of the asked-for permission is set.

use bitflags::bitflags;

bitflags! {
    /// Atomic capabilities grantable to a role.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Permission: u32 {
        /// Follow other users.
        const FOLLOW = 1;
        /// Comment on recipes and dishes.
        const COMMENT = 2;
        /// Author recipes and dishes.
        const WRITE_RECIPES = 4;
        /// Moderate other users' comments.
        const MOD_COMMENT = 8;
        /// Full administrative access.
        const ADMIN = 16;
    }
}

/// Name of the role assigned to ordinary accounts. Marked `default` in the
/// store.
pub const ROLE_USER: &str = "User";

/// Name of the role assigned to the configured administrator address.
pub const ROLE_ADMIN: &str = "Admin";

impl Permission {
    /// Canonical set for the "User" role.
    pub const USER_SET: Self = Self::FOLLOW
        .union(Self::COMMENT)
        .union(Self::WRITE_RECIPES);

    /// Canonical set for the "Admin" role.
    pub const ADMIN_SET: Self = Self::USER_SET
        .union(Self::MOD_COMMENT)
        .union(Self::ADMIN);
}

/// Canonical permission set for a named role, if the name is known.
pub fn canonical_permissions(name: &str) -> Option<Permission> {
    match name {
        ROLE_USER => Some(Permission::USER_SET),
        ROLE_ADMIN => Some(Permission::ADMIN_SET),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_values_are_distinct_powers_of_two() {
        assert_eq!(Permission::FOLLOW.bits(), 1);
        assert_eq!(Permission::COMMENT.bits(), 2);
        assert_eq!(Permission::WRITE_RECIPES.bits(), 4);
        assert_eq!(Permission::MOD_COMMENT.bits(), 8);
        assert_eq!(Permission::ADMIN.bits(), 16);
    }

    #[test]
    fn canonical_user_set() {
        let user = canonical_permissions(ROLE_USER).unwrap();
        assert_eq!(user.bits(), 7);
        assert!(user.contains(Permission::FOLLOW));
        assert!(user.contains(Permission::COMMENT));
        assert!(user.contains(Permission::WRITE_RECIPES));
        assert!(!user.contains(Permission::MOD_COMMENT));
        assert!(!user.contains(Permission::ADMIN));
    }

    #[test]
    fn canonical_admin_set() {
        let admin = canonical_permissions(ROLE_ADMIN).unwrap();
        assert_eq!(admin.bits(), 31);
        assert!(admin.contains(Permission::ADMIN));
        assert!(admin.contains(Permission::USER_SET));
    }

    #[test]
    fn unknown_role_has_no_canonical_set() {
        assert_eq!(canonical_permissions("Moderator"), None);
        assert_eq!(canonical_permissions(""), None);
    }

    #[test]
    fn grant_then_revoke_restores_mask() {
        let original = Permission::USER_SET;
        let granted = original | Permission::ADMIN;
        assert_ne!(granted, original);
        assert_eq!(granted - Permission::ADMIN, original);
    }

    #[test]
    fn contains_requires_every_bit() {
        let mask = Permission::FOLLOW | Permission::COMMENT;
        assert!(mask.contains(Permission::FOLLOW));
        assert!(!mask.contains(Permission::FOLLOW | Permission::ADMIN));
    }
}
