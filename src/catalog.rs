//! Recipe and dish records with ownership linking.
//!
//! Creating a resource is two independent document writes: the resource
//! itself, then the append to the author's owned collection. There is no
//! multi-document transaction. If the second write fails the resource is
//! orphaned but still valid: it stays retrievable and its own author field
//! keeps owner lookup working. That is the accepted recovery path.

use bson::doc;
use serde::Deserialize;
use tracing::info;

use crate::auth::Permission;
use crate::db::schemas::{DishDoc, RecipeDoc, UserDoc, DISH_COLLECTION, RECIPE_COLLECTION};
use crate::db::{MongoClient, MongoCollection};
use crate::identity::IdentityStore;
use crate::types::{PantryError, Result};

/// Incoming recipe fields. Everything is required; validation names the
/// first omission.
#[derive(Debug, Default, Deserialize)]
pub struct NewRecipe {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<String>,
    pub steps: Option<String>,
    pub image: Option<String>,
    /// Classification tags in order: region, main ingredient, kind.
    pub tags: Option<Vec<String>>,
}

impl NewRecipe {
    fn validated(self) -> Result<ValidRecipe> {
        let tags = require(self.tags, "tags")?;
        let [region, main_ingredient, kind]: [String; 3] = tags.try_into().map_err(|_| {
            PantryError::Validation(
                "tags must be exactly [region, main ingredient, kind]".into(),
            )
        })?;

        Ok(ValidRecipe {
            title: require(self.title, "title")?,
            description: require(self.description, "description")?,
            ingredients: require(self.ingredients, "ingredients")?,
            steps: require(self.steps, "steps")?,
            image: require(self.image, "image")?,
            region,
            main_ingredient,
            kind,
        })
    }
}

#[derive(Debug)]
struct ValidRecipe {
    title: String,
    description: String,
    ingredients: String,
    steps: String,
    image: String,
    region: String,
    main_ingredient: String,
    kind: String,
}

/// Incoming dish fields.
#[derive(Debug, Default, Deserialize)]
pub struct NewDish {
    pub image: Option<String>,
    pub comment: Option<String>,
}

impl NewDish {
    fn validated(self) -> Result<(String, String)> {
        Ok((require(self.image, "image")?, require(self.comment, "comment")?))
    }
}

fn require<T>(value: Option<T>, name: &str) -> Result<T> {
    value.ok_or_else(|| PantryError::Validation(format!("missing field: {name}")))
}

/// Recipe and dish storage plus the ownership-linking writes.
#[derive(Clone)]
pub struct Catalog {
    recipes: MongoCollection<RecipeDoc>,
    dishes: MongoCollection<DishDoc>,
    identities: IdentityStore,
    mongo: MongoClient,
}

impl Catalog {
    pub async fn new(mongo: &MongoClient, identities: IdentityStore) -> Result<Self> {
        Ok(Self {
            recipes: mongo.collection(RECIPE_COLLECTION).await?,
            dishes: mongo.collection(DISH_COLLECTION).await?,
            identities,
            mongo: mongo.clone(),
        })
    }

    /// Create a recipe owned by `author` and link it into the author's
    /// owned-recipe collection.
    pub async fn create_recipe(&self, author: &UserDoc, new: NewRecipe) -> Result<RecipeDoc> {
        self.check_write_permission(author).await?;
        let fields = new.validated()?;

        let rid = self.mongo.next_sequence("recipes").await?;
        let mut recipe = RecipeDoc {
            _id: None,
            metadata: Default::default(),
            rid,
            author: author.id,
            title: fields.title,
            description: fields.description,
            ingredients: fields.ingredients,
            steps: fields.steps,
            image: fields.image,
            region: fields.region,
            main_ingredient: fields.main_ingredient,
            kind: fields.kind,
            works: Vec::new(),
            rating: 0.0,
            raters: 1,
        };
        let oid = self.recipes.insert_one(recipe.clone()).await?;
        recipe._id = Some(oid);

        // Second, independent write. A failure here orphans the recipe; its
        // author field stays correct and it remains retrievable by rid.
        self.identities.link_recipe(author, rid).await?;

        info!("Recipe {} created by user {}", rid, author.id);
        Ok(recipe)
    }

    /// Create a dish owned by `author` under the recipe with public id
    /// `parent_rid`, which must already exist.
    pub async fn create_dish(
        &self,
        author: &UserDoc,
        parent_rid: i64,
        new: NewDish,
    ) -> Result<DishDoc> {
        self.check_write_permission(author).await?;

        let parent = self
            .recipe_by_rid(parent_rid)
            .await?
            .ok_or_else(|| PantryError::NotFound("recipe does not exist".into()))?;

        let (image, comment) = new.validated()?;

        let mut dish = DishDoc {
            _id: None,
            metadata: Default::default(),
            parent: parent.rid,
            author: author.id,
            image,
            comment,
        };
        let oid = self.dishes.insert_one(dish.clone()).await?;
        dish._id = Some(oid);

        // Back-links: parent recipe's works list and the author's owned
        // dishes. Both are independent writes with the same orphan-tolerant
        // recovery path as recipe creation.
        self.recipes
            .update_one(doc! { "rid": parent.rid }, doc! { "$addToSet": { "works": oid } })
            .await?;
        self.identities.link_dish(author, oid).await?;

        info!("Dish created by user {} under recipe {}", author.id, parent.rid);
        Ok(dish)
    }

    async fn check_write_permission(&self, author: &UserDoc) -> Result<()> {
        if !self
            .identities
            .is_permitted(author, Permission::WRITE_RECIPES)
            .await?
        {
            return Err(PantryError::Authorization("insufficient permission".into()));
        }
        Ok(())
    }

    pub async fn list_recipes(&self) -> Result<Vec<RecipeDoc>> {
        self.recipes.find_many(doc! {}).await
    }

    pub async fn recipe_by_rid(&self, rid: i64) -> Result<Option<RecipeDoc>> {
        self.recipes.find_one(doc! { "rid": rid }).await
    }

    /// Recipes authored by a user, in the order of their public ids.
    pub async fn recipes_by_rids(&self, rids: &[i64]) -> Result<Vec<RecipeDoc>> {
        if rids.is_empty() {
            return Ok(Vec::new());
        }
        self.recipes.find_many(doc! { "rid": { "$in": rids } }).await
    }

    pub async fn dishes_for_recipe(&self, rid: i64) -> Result<Vec<DishDoc>> {
        self.dishes.find_many(doc! { "parent": rid }).await
    }

    pub async fn dishes_by_author(&self, author_id: i64) -> Result<Vec<DishDoc>> {
        self.dishes.find_many(doc! { "author": author_id }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Linking writes are integration tests requiring a running MongoDB;
    // payload validation is covered here.

    fn full_recipe() -> NewRecipe {
        NewRecipe {
            title: Some("Mapo tofu".into()),
            description: Some("Numbing and hot".into()),
            ingredients: Some("tofu, doubanjiang, peppercorn".into()),
            steps: Some("fry, simmer, serve".into()),
            image: Some("recipes/mapo.png".into()),
            tags: Some(vec!["Sichuan".into(), "tofu".into(), "main".into()]),
        }
    }

    #[test]
    fn complete_recipe_passes_validation() {
        let valid = full_recipe().validated().unwrap();
        assert_eq!(valid.region, "Sichuan");
        assert_eq!(valid.main_ingredient, "tofu");
        assert_eq!(valid.kind, "main");
    }

    #[test]
    fn missing_field_is_named() {
        let mut recipe = full_recipe();
        recipe.steps = None;

        let err = recipe.validated().unwrap_err();
        assert!(matches!(err, PantryError::Validation(ref m) if m.contains("steps")));
    }

    #[test]
    fn missing_tags_are_named() {
        let mut recipe = full_recipe();
        recipe.tags = None;

        let err = recipe.validated().unwrap_err();
        assert!(matches!(err, PantryError::Validation(ref m) if m.contains("tags")));
    }

    #[test]
    fn wrong_tag_arity_fails() {
        let mut recipe = full_recipe();
        recipe.tags = Some(vec!["Sichuan".into(), "tofu".into()]);
        assert!(recipe.validated().is_err());

        let mut recipe = full_recipe();
        recipe.tags = Some(vec!["a".into(), "b".into(), "c".into(), "d".into()]);
        assert!(recipe.validated().is_err());
    }

    #[test]
    fn dish_requires_image_and_comment() {
        let ok = NewDish {
            image: Some("dishes/1.png".into()),
            comment: Some("turned out great".into()),
        };
        assert!(ok.validated().is_ok());

        let err = NewDish {
            image: None,
            comment: Some("x".into()),
        }
        .validated()
        .unwrap_err();
        assert!(matches!(err, PantryError::Validation(ref m) if m.contains("image")));

        let err = NewDish {
            image: Some("x".into()),
            comment: None,
        }
        .validated()
        .unwrap_err();
        assert!(matches!(err, PantryError::Validation(ref m) if m.contains("comment")));
    }
}
