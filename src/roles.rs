//! Role lookup, mutation, and idempotent bootstrap.

use bson::doc;
use tracing::info;

use crate::auth::{canonical_permissions, Permission, ROLE_ADMIN, ROLE_USER};
use crate::db::schemas::{RoleDoc, ROLE_COLLECTION};
use crate::db::{MongoClient, MongoCollection};
use crate::types::{PantryError, Result};

/// Persisted roles keyed by unique name.
#[derive(Clone)]
pub struct RoleStore {
    roles: MongoCollection<RoleDoc>,
}

impl RoleStore {
    pub async fn new(mongo: &MongoClient) -> Result<Self> {
        Ok(Self {
            roles: mongo.collection(ROLE_COLLECTION).await?,
        })
    }

    /// Resolve a role by name, creating it with its canonical permission set
    /// when absent.
    ///
    /// Idempotent: the unique index on `name` keeps concurrent resolution
    /// from duplicating roles. Unknown names resolve to nothing.
    pub async fn resolve(&self, name: &str) -> Result<RoleDoc> {
        if let Some(role) = self.roles.find_one(doc! { "name": name }).await? {
            return Ok(role);
        }

        let permissions = canonical_permissions(name)
            .ok_or_else(|| PantryError::NotFound(format!("unknown role: {name}")))?;

        let mut role = RoleDoc::new(name, name == ROLE_USER, permissions);
        let id = self.roles.insert_one(role.clone()).await?;
        role._id = Some(id);

        info!("Created role '{}' (permissions {})", name, role.permissions);
        Ok(role)
    }

    /// Ensure both canonical roles exist. Safe to run on every start.
    pub async fn bootstrap(&self) -> Result<()> {
        self.resolve(ROLE_USER).await?;
        self.resolve(ROLE_ADMIN).await?;
        Ok(())
    }

    /// Look up a role by name without creating it.
    pub async fn find(&self, name: &str) -> Result<Option<RoleDoc>> {
        self.roles.find_one(doc! { "name": name }).await
    }

    /// The role marked `default`, assigned to non-administrator identities.
    pub async fn default_role(&self) -> Result<Option<RoleDoc>> {
        self.roles.find_one(doc! { "default": true }).await
    }

    /// Add permissions to a role's mask and persist the result.
    pub async fn grant(&self, name: &str, permissions: Permission) -> Result<RoleDoc> {
        let mut role = self
            .find(name)
            .await?
            .ok_or_else(|| PantryError::NotFound(format!("unknown role: {name}")))?;

        role.grant(permissions);
        self.persist_mask(&role).await?;
        Ok(role)
    }

    /// Remove permissions from a role's mask and persist the result.
    ///
    /// Permissions the role does not hold are ignored.
    pub async fn revoke(&self, name: &str, permissions: Permission) -> Result<RoleDoc> {
        let mut role = self
            .find(name)
            .await?
            .ok_or_else(|| PantryError::NotFound(format!("unknown role: {name}")))?;

        role.revoke(permissions);
        self.persist_mask(&role).await?;
        Ok(role)
    }

    /// True iff the named role holds every bit of `permission`.
    pub async fn has(&self, name: &str, permission: Permission) -> Result<bool> {
        Ok(self
            .find(name)
            .await?
            .map(|role| role.has(permission))
            .unwrap_or(false))
    }

    async fn persist_mask(&self, role: &RoleDoc) -> Result<()> {
        self.roles
            .update_one(
                doc! { "name": &role.name },
                doc! { "$set": { "permissions": role.permissions } },
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    // Store-backed properties (bootstrap idempotence, resolve-twice keeps one
    // role per name) are integration tests requiring a running MongoDB. The
    // mask algebra itself is covered in db::schemas::role.
}
