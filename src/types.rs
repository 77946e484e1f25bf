//! Core error type and result alias.
//!
//! Every fallible path in the crate speaks `PantryError`; the HTTP layer maps
//! each variant onto its status code and machine-readable kind through
//! `status()` and `kind()`.

use hyper::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PantryError>;

#[derive(Debug, Error)]
pub enum PantryError {
    /// Malformed or incomplete input.
    #[error("{0}")]
    Validation(String),

    /// Credentials absent, unknown, or wrong.
    #[error("{0}")]
    Authentication(String),

    /// Identity known but not allowed: unconfirmed, or missing a permission.
    #[error("{0}")]
    Authorization(String),

    /// The addressed resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// MongoDB failure.
    #[error("database error: {0}")]
    Database(String),

    /// Token signing failure.
    #[error("token error: {0}")]
    Token(String),

    /// Transport-level problem with the request itself.
    #[error("{0}")]
    Http(String),
}

impl PantryError {
    /// HTTP status code for this error class.
    pub fn status(&self) -> StatusCode {
        match self {
            PantryError::Validation(_) | PantryError::Http(_) => StatusCode::BAD_REQUEST,
            PantryError::Authentication(_) => StatusCode::UNAUTHORIZED,
            PantryError::Authorization(_) => StatusCode::FORBIDDEN,
            PantryError::NotFound(_) => StatusCode::NOT_FOUND,
            PantryError::Database(_) | PantryError::Token(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Machine-readable kind for the error envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            PantryError::Validation(_) | PantryError::Http(_) => "bad request",
            PantryError::Authentication(_) => "unauthorized access",
            PantryError::Authorization(_) => "forbidden access",
            PantryError::NotFound(_) => "not found",
            PantryError::Database(_) | PantryError::Token(_) => "internal error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let err = PantryError::Validation("missing field: title".into());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.kind(), "bad request");
    }

    #[test]
    fn http_maps_to_400() {
        let err = PantryError::Http("invalid JSON".into());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.kind(), "bad request");
    }

    #[test]
    fn authentication_maps_to_401() {
        let err = PantryError::Authentication("invalid credentials".into());
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.kind(), "unauthorized access");
    }

    #[test]
    fn authorization_maps_to_403() {
        let err = PantryError::Authorization("unconfirmed user".into());
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.kind(), "forbidden access");
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = PantryError::NotFound("recipe does not exist".into());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.kind(), "not found");
    }

    #[test]
    fn internal_classes_map_to_500() {
        let db = PantryError::Database("insert failed".into());
        assert_eq!(db.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(db.kind(), "internal error");

        let token = PantryError::Token("failed to sign token".into());
        assert_eq!(token.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(token.kind(), "internal error");
    }

    #[test]
    fn message_survives_display() {
        let err = PantryError::NotFound("user does not exist".into());
        assert_eq!(err.to_string(), "user does not exist");
    }
}
