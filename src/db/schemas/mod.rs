//! Typed document schemas.

pub mod dish;
pub mod metadata;
pub mod recipe;
pub mod role;
pub mod user;

pub use dish::{DishDoc, DISH_COLLECTION};
pub use metadata::Metadata;
pub use recipe::{RecipeDoc, RECIPE_COLLECTION};
pub use role::{RoleDoc, ROLE_COLLECTION};
pub use user::{UserDoc, USER_COLLECTION};
