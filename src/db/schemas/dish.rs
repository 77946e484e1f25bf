//! Dish document schema.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for dishes.
pub const DISH_COLLECTION: &str = "dishes";

/// Dish document stored in MongoDB.
///
/// A dish is a user's rendition of a recipe: owned by exactly one user and
/// parented to exactly one recipe, which must exist before the dish does.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct DishDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub metadata: Metadata,

    /// Public id of the parent recipe.
    pub parent: i64,

    /// Public id of the authoring user.
    pub author: i64,

    /// Image reference (path or URL).
    pub image: String,

    /// Free-text comment.
    pub comment: String,
}

impl IntoIndexes for DishDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (
                doc! { "parent": 1 },
                Some(IndexOptions::builder().name("parent_index".to_string()).build()),
            ),
            (
                doc! { "author": 1 },
                Some(IndexOptions::builder().name("author_index".to_string()).build()),
            ),
        ]
    }
}

impl MutMetadata for DishDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
