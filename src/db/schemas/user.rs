//! User document schema.
//!
//! An identity carries a hashed credential, a role reference, and the
//! back-references to everything it has authored. The public `id` is a
//! sequence value independent of the storage key.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for users.
pub const USER_COLLECTION: &str = "users";

/// User document stored in MongoDB.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct UserDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub metadata: Metadata,

    /// Public sequence id, independent of the storage key.
    pub id: i64,

    /// Unique email address, the authentication principal.
    pub email: String,

    /// Display name.
    pub username: String,

    /// Argon2 hash of the credential. The raw secret is never stored.
    pub password_hash: String,

    /// Whether the account has been confirmed. Unconfirmed identities are
    /// rejected at the authorization gate.
    #[serde(default)]
    pub confirmed: bool,

    /// Name of the role this identity holds.
    pub role: String,

    /// Public ids of recipes this identity authored.
    #[serde(default)]
    pub recipes: Vec<i64>,

    /// Storage ids of dishes this identity authored.
    #[serde(default)]
    pub dishes: Vec<ObjectId>,
}

impl IntoIndexes for UserDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (
                doc! { "email": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("email_unique".to_string())
                        .build(),
                ),
            ),
            (
                doc! { "id": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("id_unique".to_string())
                        .build(),
                ),
            ),
            (
                doc! { "username": 1 },
                Some(IndexOptions::builder().name("username_index".to_string()).build()),
            ),
        ]
    }
}

impl MutMetadata for UserDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
