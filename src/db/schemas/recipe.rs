//! Recipe document schema.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for recipes.
pub const RECIPE_COLLECTION: &str = "recipes";

/// Recipe document stored in MongoDB.
///
/// Owned by exactly one user; `rid` is the public sequence id, distinct from
/// the storage key.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct RecipeDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub metadata: Metadata,

    /// Public sequence id.
    pub rid: i64,

    /// Public id of the authoring user.
    pub author: i64,

    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub steps: String,

    /// Image reference (path or URL).
    pub image: String,

    /// Classification tags.
    pub region: String,
    pub main_ingredient: String,
    pub kind: String,

    /// Dishes cooked from this recipe.
    #[serde(default)]
    pub works: Vec<ObjectId>,

    /// Rating accumulator.
    #[serde(default)]
    pub rating: f64,

    /// Number of raters.
    #[serde(default = "default_raters")]
    pub raters: i64,
}

fn default_raters() -> i64 {
    1
}

impl IntoIndexes for RecipeDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (
                doc! { "rid": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("rid_unique".to_string())
                        .build(),
                ),
            ),
            (
                doc! { "author": 1 },
                Some(IndexOptions::builder().name("author_index".to_string()).build()),
            ),
        ]
    }
}

impl MutMetadata for RecipeDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
