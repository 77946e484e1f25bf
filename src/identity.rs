//! Identity records and their lifecycle.
//!
//! Identities are created unconfirmed with a role resolved exactly once: the
//! configured administrator address gets "Admin", everyone else the role
//! marked default. Confirmation happens through a signed, time-limited token
//! bound to the identity's public id.

use bson::{doc, oid::ObjectId};
use tracing::info;

use crate::auth::{hash_password, verify_password, Permission, TokenSigner, ROLE_ADMIN};
use crate::db::schemas::{UserDoc, USER_COLLECTION};
use crate::db::{MongoClient, MongoCollection};
use crate::roles::RoleStore;
use crate::types::{PantryError, Result};

/// Fields required to create an identity.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl NewIdentity {
    /// Validation names the first omission.
    fn validated(&self) -> Result<()> {
        let fields = [
            (&self.email, "email"),
            (&self.username, "username"),
            (&self.password, "password"),
        ];
        for (value, name) in fields {
            if value.is_empty() {
                return Err(PantryError::Validation(format!("missing field: {name}")));
            }
        }
        Ok(())
    }
}

/// Persisted identities plus the credential and confirmation machinery.
#[derive(Clone)]
pub struct IdentityStore {
    users: MongoCollection<UserDoc>,
    mongo: MongoClient,
    roles: RoleStore,
    signer: TokenSigner,
    admin_email: String,
}

impl IdentityStore {
    pub async fn new(
        mongo: &MongoClient,
        roles: RoleStore,
        signer: TokenSigner,
        admin_email: String,
    ) -> Result<Self> {
        Ok(Self {
            users: mongo.collection(USER_COLLECTION).await?,
            mongo: mongo.clone(),
            roles,
            signer,
            admin_email,
        })
    }

    /// Create an identity. Role assignment happens here and only here.
    pub async fn create(&self, new: NewIdentity) -> Result<UserDoc> {
        new.validated()?;

        if self.find_by_email(&new.email).await?.is_some() {
            return Err(PantryError::Validation(format!(
                "email already registered: {}",
                new.email
            )));
        }

        let role = if new.email == self.admin_email {
            self.roles.resolve(ROLE_ADMIN).await?
        } else {
            self.roles.default_role().await?.ok_or_else(|| {
                PantryError::Database("no default role; role bootstrap has not run".into())
            })?
        };

        let id = self.mongo.next_sequence("users").await?;
        let mut user = UserDoc {
            _id: None,
            metadata: Default::default(),
            id,
            email: new.email,
            username: new.username,
            password_hash: hash_password(&new.password)?,
            confirmed: false,
            role: role.name.clone(),
            recipes: Vec::new(),
            dishes: Vec::new(),
        };
        let oid = self.users.insert_one(user.clone()).await?;
        user._id = Some(oid);

        info!("Created identity {} ({}) with role '{}'", user.id, user.email, role.name);
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserDoc>> {
        self.users.find_one(doc! { "email": email }).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<UserDoc>> {
        self.users.find_one(doc! { "id": id }).await
    }

    /// Replace the stored credential hash. The raw secret is hashed and
    /// dropped; it cannot be read back.
    pub async fn set_credential(&self, user: &mut UserDoc, raw: &str) -> Result<()> {
        user.password_hash = hash_password(raw)?;
        self.users
            .update_one(
                doc! { "id": user.id },
                doc! { "$set": { "password_hash": &user.password_hash } },
            )
            .await?;
        Ok(())
    }

    /// Verify a presented secret against the stored hash.
    pub fn verify_credential(&self, user: &UserDoc, raw: &str) -> Result<bool> {
        verify_password(raw, &user.password_hash)
    }

    /// Issue a confirmation token bound to this identity's public id.
    pub fn confirmation_token(&self, user: &UserDoc, ttl_seconds: u64) -> Result<String> {
        self.signer.issue_confirmation(user.id, ttl_seconds)
    }

    /// Confirm an identity with a token.
    ///
    /// Returns false when the token is invalid, expired, or bound to a
    /// different id; the stored record is untouched in that case. On success
    /// sets `confirmed = true` and persists.
    pub async fn confirm(&self, user: &mut UserDoc, token: &str) -> Result<bool> {
        match self.signer.verify_confirmation(token) {
            Some(id) if id == user.id => {
                user.confirmed = true;
                self.users
                    .update_one(doc! { "id": user.id }, doc! { "$set": { "confirmed": true } })
                    .await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// True iff the identity's role carries `permission`. False when the role
    /// is missing.
    pub async fn is_permitted(&self, user: &UserDoc, permission: Permission) -> Result<bool> {
        self.roles.has(&user.role, permission).await
    }

    /// Append an authored recipe to the owner's collection.
    ///
    /// `$addToSet` keeps each authored resource in the collection exactly
    /// once.
    pub async fn link_recipe(&self, user: &UserDoc, rid: i64) -> Result<()> {
        self.users
            .update_one(doc! { "id": user.id }, doc! { "$addToSet": { "recipes": rid } })
            .await?;
        Ok(())
    }

    /// Append an authored dish to the owner's collection.
    pub async fn link_dish(&self, user: &UserDoc, dish_id: ObjectId) -> Result<()> {
        self.users
            .update_one(doc! { "id": user.id }, doc! { "$addToSet": { "dishes": dish_id } })
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Lifecycle properties (admin address resolves to "Admin", others to the
    // default role; confirm flips exactly the bound identity) are integration
    // tests requiring a running MongoDB. Token binding and credential
    // hashing are covered in auth::token and auth::password.

    fn full_identity() -> NewIdentity {
        NewIdentity {
            email: "cook@example.com".into(),
            username: "cook".into(),
            password: "secret".into(),
        }
    }

    #[test]
    fn complete_identity_passes_validation() {
        assert!(full_identity().validated().is_ok());
    }

    #[test]
    fn missing_identity_field_is_named() {
        let mut new = full_identity();
        new.username.clear();

        let err = new.validated().unwrap_err();
        assert!(matches!(err, PantryError::Validation(ref m) if m.contains("username")));
    }

    #[test]
    fn first_omission_wins() {
        let new = NewIdentity {
            email: String::new(),
            username: String::new(),
            password: String::new(),
        };

        let err = new.validated().unwrap_err();
        assert!(matches!(err, PantryError::Validation(ref m) if m.contains("email")));
    }
}
