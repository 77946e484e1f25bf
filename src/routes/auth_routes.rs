//! Account endpoints.
//!
//! - POST /auth/register  create an identity (public); responds with the
//!   confirmation token in lieu of mail delivery
//! - POST /auth/confirm   confirm an identity with its token (public)
//! - POST /auth/password  change the caller's credential (gated)

use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::RequestContext;
use crate::identity::NewIdentity;
use crate::routes::{error_response, json_response, parse_json_body, BoxBody};
use crate::server::AppState;
use crate::types::PantryError;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub role: String,
    pub confirmed: bool,
    /// Time-limited token to present at /auth/confirm.
    pub confirmation_token: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

pub async fn register(
    req: Request<hyper::body::Incoming>,
    state: &Arc<AppState>,
) -> Response<BoxBody> {
    let body: RegisterRequest = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return error_response(&e),
    };

    let user = match state
        .identities
        .create(NewIdentity {
            email: body.email,
            username: body.username,
            password: body.password,
        })
        .await
    {
        Ok(user) => user,
        Err(e) => return error_response(&e),
    };

    let token = match state
        .identities
        .confirmation_token(&user, state.args.confirm_ttl_seconds)
    {
        Ok(token) => token,
        Err(e) => return error_response(&e),
    };

    json_response(
        StatusCode::CREATED,
        &RegisterResponse {
            id: user.id,
            email: user.email,
            username: user.username,
            role: user.role,
            confirmed: user.confirmed,
            confirmation_token: token,
        },
    )
}

pub async fn confirm(
    req: Request<hyper::body::Incoming>,
    state: &Arc<AppState>,
) -> Response<BoxBody> {
    let body: ConfirmRequest = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return error_response(&e),
    };

    let mut user = match state.identities.find_by_email(&body.email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return error_response(&PantryError::NotFound("user does not exist".into()))
        }
        Err(e) => return error_response(&e),
    };

    match state.identities.confirm(&mut user, &body.token).await {
        Ok(true) => json_response(
            StatusCode::OK,
            &SuccessResponse {
                success: true,
                message: "account confirmed".into(),
            },
        ),
        Ok(false) => error_response(&PantryError::Authorization(
            "invalid or expired confirmation token".into(),
        )),
        Err(e) => error_response(&e),
    }
}

pub async fn change_password(
    req: Request<hyper::body::Incoming>,
    ctx: &RequestContext,
    state: &Arc<AppState>,
) -> Response<BoxBody> {
    let body: ChangePasswordRequest = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => return error_response(&e),
    };

    if body.password.is_empty() {
        return error_response(&PantryError::Validation("missing field: password".into()));
    }

    let mut user = ctx.identity.clone();
    match state.identities.set_credential(&mut user, &body.password).await {
        Ok(()) => json_response(
            StatusCode::OK,
            &SuccessResponse {
                success: true,
                message: "password updated".into(),
            },
        ),
        Err(e) => error_response(&e),
    }
}
