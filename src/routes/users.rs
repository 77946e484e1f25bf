//! User read endpoints.
//!
//! - GET /user/{id}          public profile with links to owned listings
//! - GET /user/{id}/recipe   recipes the user authored
//! - GET /user/{id}/dish     dishes the user authored

use hyper::{Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;

use crate::db::schemas::UserDoc;
use crate::routes::recipes::{dish_response, recipe_response, DishResponse, RecipeResponse};
use crate::routes::{error_response, json_response, BoxBody};
use crate::server::AppState;
use crate::types::PantryError;

#[derive(Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub recipes_url: String,
    pub dishes_url: String,
    pub uploads: usize,
}

#[derive(Serialize)]
struct UserRecipesResponse {
    recipes: Vec<RecipeResponse>,
}

#[derive(Serialize)]
struct UserDishesResponse {
    dishes: Vec<DishResponse>,
}

fn user_response(doc: &UserDoc) -> UserResponse {
    UserResponse {
        id: doc.id,
        username: doc.username.clone(),
        recipes_url: format!("/user/{}/recipe", doc.id),
        dishes_url: format!("/user/{}/dish", doc.id),
        uploads: doc.recipes.len() + doc.dishes.len(),
    }
}

fn user_not_found() -> Response<BoxBody> {
    error_response(&PantryError::NotFound("user does not exist".into()))
}

pub async fn get_user(state: &Arc<AppState>, id: i64) -> Response<BoxBody> {
    match state.identities.find_by_id(id).await {
        Ok(Some(user)) => json_response(StatusCode::OK, &user_response(&user)),
        Ok(None) => user_not_found(),
        Err(e) => error_response(&e),
    }
}

pub async fn get_user_recipes(state: &Arc<AppState>, id: i64) -> Response<BoxBody> {
    let user = match state.identities.find_by_id(id).await {
        Ok(Some(user)) => user,
        Ok(None) => return user_not_found(),
        Err(e) => return error_response(&e),
    };

    match state.catalog.recipes_by_rids(&user.recipes).await {
        Ok(docs) => json_response(
            StatusCode::OK,
            &UserRecipesResponse {
                recipes: docs.into_iter().map(recipe_response).collect(),
            },
        ),
        Err(e) => error_response(&e),
    }
}

pub async fn get_user_dishes(state: &Arc<AppState>, id: i64) -> Response<BoxBody> {
    let user = match state.identities.find_by_id(id).await {
        Ok(Some(user)) => user,
        Ok(None) => return user_not_found(),
        Err(e) => return error_response(&e),
    };

    match state.catalog.dishes_by_author(user.id).await {
        Ok(docs) => json_response(
            StatusCode::OK,
            &UserDishesResponse {
                dishes: docs.into_iter().map(dish_response).collect(),
            },
        ),
        Err(e) => error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schemas::Metadata;

    #[test]
    fn user_response_counts_uploads() {
        let user = UserDoc {
            _id: None,
            metadata: Metadata::default(),
            id: 5,
            email: "cook@example.com".into(),
            username: "cook".into(),
            password_hash: "$argon2id$...".into(),
            confirmed: true,
            role: "User".into(),
            recipes: vec![1, 2, 3],
            dishes: vec![bson::oid::ObjectId::new()],
        };

        let resp = user_response(&user);
        assert_eq!(resp.uploads, 4);
        assert_eq!(resp.recipes_url, "/user/5/recipe");
        assert_eq!(resp.dishes_url, "/user/5/dish");
    }
}
