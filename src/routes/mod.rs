//! HTTP routes and response shaping.

pub mod auth_routes;
pub mod health;
pub mod recipes;
pub mod users;

use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::types::{PantryError, Result};

pub use health::{health_check, version_info};

pub type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

const MAX_BODY_BYTES: usize = 10240;

/// Fixed error envelope: machine-readable kind plus a human message.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: &'static str,
    pub message: String,
}

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<BoxBody> {
    let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(full_body(json))
        .unwrap()
}

/// Map a core error onto its envelope and status code.
pub fn error_response(err: &PantryError) -> Response<BoxBody> {
    json_response(
        err.status(),
        &ErrorEnvelope {
            error: err.kind(),
            message: err.to_string(),
        },
    )
}

pub fn full_body(data: impl Into<Bytes>) -> BoxBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed()
}

/// Read and deserialize a JSON request body, bounded in size.
///
/// The bound applies while reading: an oversized body is rejected without
/// being buffered past the limit.
pub async fn parse_json_body<T, B>(req: Request<B>) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
    B: hyper::body::Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limited = Limited::new(req.into_body(), MAX_BODY_BYTES);

    let bytes = match limited.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is::<LengthLimitError>() => {
            return Err(PantryError::Http("request body too large".into()))
        }
        Err(e) => return Err(PantryError::Http(format!("failed to read body: {e}"))),
    };

    serde_json::from_slice(&bytes).map_err(|e| PantryError::Http(format!("invalid JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Payload {
        name: String,
    }

    fn request_with(body: String) -> Request<Full<Bytes>> {
        Request::builder()
            .body(Full::new(Bytes::from(body)))
            .unwrap()
    }

    #[tokio::test]
    async fn small_body_parses() {
        let req = request_with(r#"{"name": "pho"}"#.to_string());
        let payload: Payload = parse_json_body(req).await.unwrap();
        assert_eq!(payload.name, "pho");
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let filler = "x".repeat(MAX_BODY_BYTES + 1);
        let req = request_with(format!(r#"{{"name": "{filler}"}}"#));

        let err = parse_json_body::<Payload, _>(req).await.unwrap_err();
        assert!(matches!(err, PantryError::Http(ref m) if m.contains("too large")));
    }

    #[tokio::test]
    async fn invalid_json_is_rejected() {
        let req = request_with("not json".to_string());
        let err = parse_json_body::<Payload, _>(req).await.unwrap_err();
        assert!(matches!(err, PantryError::Http(ref m) if m.contains("invalid JSON")));
    }
}
