//! Authentication and authorization.
//!
//! Provides:
//! - Permission bitmask and canonical role sets
//! - Credential hashing with Argon2
//! - Signed confirmation tokens
//! - The per-request authorization gate

pub mod gate;
pub mod password;
pub mod permissions;
pub mod token;

pub use gate::{authorize, parse_basic_auth, RequestContext};
pub use password::{hash_password, verify_password};
pub use permissions::{canonical_permissions, Permission, ROLE_ADMIN, ROLE_USER};
pub use token::TokenSigner;
