//! Health and version probes.
//!
//! The only public routes: everything else sits behind the authorization
//! gate.

use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::routes::{json_response, BoxBody};

#[derive(Serialize)]
struct HealthResponse {
    healthy: bool,
    version: &'static str,
}

#[derive(Serialize)]
struct VersionResponse {
    version: &'static str,
    commit: &'static str,
    built_at: &'static str,
}

pub fn health_check() -> Response<BoxBody> {
    json_response(
        StatusCode::OK,
        &HealthResponse {
            healthy: true,
            version: env!("CARGO_PKG_VERSION"),
        },
    )
}

pub fn version_info() -> Response<BoxBody> {
    json_response(
        StatusCode::OK,
        &VersionResponse {
            version: env!("CARGO_PKG_VERSION"),
            commit: env!("GIT_COMMIT_SHORT"),
            built_at: env!("BUILD_TIMESTAMP"),
        },
    )
}
