//! Recipe and dish endpoints.
//!
//! - GET  /recipe            list all recipes
//! - POST /recipe            create a recipe owned by the caller
//! - GET  /recipe/{id}       fetch one recipe by public id
//! - GET  /recipe/{id}/dish  list dishes under a recipe
//! - POST /recipe/{id}/dish  create a dish under a recipe

use hyper::{Request, Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;

use crate::auth::RequestContext;
use crate::catalog::{NewDish, NewRecipe};
use crate::db::schemas::{DishDoc, RecipeDoc};
use crate::routes::{error_response, json_response, parse_json_body, BoxBody};
use crate::server::AppState;

#[derive(Serialize)]
pub struct RecipeResponse {
    pub url: String,
    pub rid: i64,
    pub title: String,
    pub author_id: i64,
    pub description: String,
    pub ingredients: String,
    pub steps: String,
    pub image: String,
    pub tags: [String; 3],
    pub rating: f64,
    pub raters: i64,
}

#[derive(Serialize)]
pub struct DishResponse {
    pub parent_url: String,
    pub author_id: i64,
    pub image: String,
    pub comment: String,
}

#[derive(Serialize)]
struct RecipeListResponse {
    recipes: Vec<RecipeResponse>,
}

#[derive(Serialize)]
struct DishListResponse {
    dishes: Vec<DishResponse>,
}

pub(crate) fn recipe_response(doc: RecipeDoc) -> RecipeResponse {
    RecipeResponse {
        url: format!("/recipe/{}", doc.rid),
        rid: doc.rid,
        title: doc.title,
        author_id: doc.author,
        description: doc.description,
        ingredients: doc.ingredients,
        steps: doc.steps,
        image: doc.image,
        tags: [doc.region, doc.main_ingredient, doc.kind],
        rating: doc.rating,
        raters: doc.raters,
    }
}

pub(crate) fn dish_response(doc: DishDoc) -> DishResponse {
    DishResponse {
        parent_url: format!("/recipe/{}", doc.parent),
        author_id: doc.author,
        image: doc.image,
        comment: doc.comment,
    }
}

pub async fn list_recipes(state: &Arc<AppState>) -> Response<BoxBody> {
    match state.catalog.list_recipes().await {
        Ok(docs) => json_response(
            StatusCode::OK,
            &RecipeListResponse {
                recipes: docs.into_iter().map(recipe_response).collect(),
            },
        ),
        Err(e) => error_response(&e),
    }
}

pub async fn create_recipe(
    req: Request<hyper::body::Incoming>,
    ctx: &RequestContext,
    state: &Arc<AppState>,
) -> Response<BoxBody> {
    let body: NewRecipe = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return error_response(&e),
    };

    match state.catalog.create_recipe(&ctx.identity, body).await {
        Ok(doc) => json_response(StatusCode::CREATED, &recipe_response(doc)),
        Err(e) => error_response(&e),
    }
}

pub async fn get_recipe(state: &Arc<AppState>, rid: i64) -> Response<BoxBody> {
    match state.catalog.recipe_by_rid(rid).await {
        Ok(Some(doc)) => json_response(StatusCode::OK, &recipe_response(doc)),
        Ok(None) => error_response(&crate::types::PantryError::NotFound(
            "recipe does not exist".into(),
        )),
        Err(e) => error_response(&e),
    }
}

pub async fn list_dishes(state: &Arc<AppState>, rid: i64) -> Response<BoxBody> {
    match state.catalog.dishes_for_recipe(rid).await {
        Ok(docs) => json_response(
            StatusCode::OK,
            &DishListResponse {
                dishes: docs.into_iter().map(dish_response).collect(),
            },
        ),
        Err(e) => error_response(&e),
    }
}

pub async fn create_dish(
    req: Request<hyper::body::Incoming>,
    ctx: &RequestContext,
    state: &Arc<AppState>,
    parent_rid: i64,
) -> Response<BoxBody> {
    let body: NewDish = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return error_response(&e),
    };

    match state.catalog.create_dish(&ctx.identity, parent_rid, body).await {
        Ok(doc) => json_response(StatusCode::CREATED, &dish_response(doc)),
        Err(e) => error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schemas::Metadata;

    #[test]
    fn recipe_response_keeps_tag_order() {
        let doc = RecipeDoc {
            _id: None,
            metadata: Metadata::default(),
            rid: 3,
            author: 9,
            title: "Pho".into(),
            description: "Beef noodle soup".into(),
            ingredients: "bones, noodles, herbs".into(),
            steps: "simmer overnight".into(),
            image: "recipes/pho.png".into(),
            region: "Vietnam".into(),
            main_ingredient: "beef".into(),
            kind: "soup".into(),
            works: Vec::new(),
            rating: 4.5,
            raters: 12,
        };

        let resp = recipe_response(doc);
        assert_eq!(resp.url, "/recipe/3");
        assert_eq!(resp.tags, ["Vietnam", "beef", "soup"]);
        assert_eq!(resp.author_id, 9);
    }

    #[test]
    fn dish_response_links_parent() {
        let doc = DishDoc {
            _id: None,
            metadata: Metadata::default(),
            parent: 3,
            author: 9,
            image: "dishes/1.png".into(),
            comment: "needs more herbs".into(),
        };

        let resp = dish_response(doc);
        assert_eq!(resp.parent_url, "/recipe/3");
        assert_eq!(resp.author_id, 9);
    }
}
