//! Pantry - recipe sharing REST backend.
//!
//! Users hold roles built from a permission bitmask; every API request passes
//! an authorization gate (basic credentials, then a confirmation check)
//! before any resource accessor runs. Recipes and dishes are owned documents
//! linked bidirectionally to their authors in MongoDB.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod identity;
pub mod roles;
pub mod routes;
pub mod server;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{PantryError, Result};
