//! HTTP server and request dispatch.
//!
//! hyper http1 with TokioIo. The authorization gate runs before every API
//! route; only the probes and the registration pair are public.

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::auth::{gate, TokenSigner};
use crate::catalog::Catalog;
use crate::config::Args;
use crate::db::MongoClient;
use crate::identity::IdentityStore;
use crate::roles::RoleStore;
use crate::routes::{self, error_response, BoxBody};
use crate::types::{PantryError, Result};

/// Shared application state.
pub struct AppState {
    pub args: Args,
    pub mongo: MongoClient,
    pub roles: RoleStore,
    pub identities: IdentityStore,
    pub catalog: Catalog,
}

impl AppState {
    /// Open the stores and run the role bootstrap.
    pub async fn new(args: Args, mongo: MongoClient) -> Result<Self> {
        let roles = RoleStore::new(&mongo).await?;
        roles.bootstrap().await?;

        let signer = TokenSigner::new(&args.token_secret);
        let identities =
            IdentityStore::new(&mongo, roles.clone(), signer, args.admin_email.clone()).await?;
        let catalog = Catalog::new(&mongo, identities.clone()).await?;

        Ok(Self {
            args,
            mongo,
            roles,
            identities,
            catalog,
        })
    }
}

/// Accept loop. Each connection is served on its own task.
pub async fn run(state: Arc<AppState>) -> Result<()> {
    let listener = TcpListener::bind(state.args.listen)
        .await
        .map_err(|e| PantryError::Http(format!("failed to bind {}: {e}", state.args.listen)))?;

    info!("Listening on {}", state.args.listen);

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let io = TokioIo::new(stream);
                let state = Arc::clone(&state);

                tokio::spawn(async move {
                    let service = service_fn(move |req| {
                        handle_request(Arc::clone(&state), addr, req)
                    });

                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Route incoming HTTP requests.
async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> std::result::Result<Response<BoxBody>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    info!("[{}] {} {}", addr, method, path);

    // Public routes skip the gate: probes, plus registration and
    // confirmation (an identity cannot authenticate before it exists).
    match (&method, path.as_str()) {
        (&Method::GET, "/health") | (&Method::GET, "/healthz") => {
            return Ok(routes::health_check())
        }
        (&Method::GET, "/version") => return Ok(routes::version_info()),
        (&Method::POST, "/auth/register") => {
            return Ok(routes::auth_routes::register(req, &state).await)
        }
        (&Method::POST, "/auth/confirm") => {
            return Ok(routes::auth_routes::confirm(req, &state).await)
        }
        _ => {}
    }

    // Authorization gate: credential check, then confirmation check. The
    // admitted identity rides the context for the rest of the request.
    let ctx = match gate::authorize(&req, &state.identities).await {
        Ok(ctx) => ctx,
        Err(e) => return Ok(error_response(&e)),
    };

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    let response = match (method, segments.as_slice()) {
        (Method::POST, ["auth", "password"]) => {
            routes::auth_routes::change_password(req, &ctx, &state).await
        }
        (Method::GET, ["recipe"]) => routes::recipes::list_recipes(&state).await,
        (Method::POST, ["recipe"]) => routes::recipes::create_recipe(req, &ctx, &state).await,
        (Method::GET, ["recipe", rid]) => match parse_id(rid) {
            Ok(rid) => routes::recipes::get_recipe(&state, rid).await,
            Err(e) => error_response(&e),
        },
        (Method::GET, ["recipe", rid, "dish"]) => match parse_id(rid) {
            Ok(rid) => routes::recipes::list_dishes(&state, rid).await,
            Err(e) => error_response(&e),
        },
        (Method::POST, ["recipe", rid, "dish"]) => match parse_id(rid) {
            Ok(rid) => routes::recipes::create_dish(req, &ctx, &state, rid).await,
            Err(e) => error_response(&e),
        },
        (Method::GET, ["user", id]) => match parse_id(id) {
            Ok(id) => routes::users::get_user(&state, id).await,
            Err(e) => error_response(&e),
        },
        (Method::GET, ["user", id, "recipe"]) => match parse_id(id) {
            Ok(id) => routes::users::get_user_recipes(&state, id).await,
            Err(e) => error_response(&e),
        },
        (Method::GET, ["user", id, "dish"]) => match parse_id(id) {
            Ok(id) => routes::users::get_user_dishes(&state, id).await,
            Err(e) => error_response(&e),
        },
        _ => error_response(&PantryError::NotFound("no such endpoint".into())),
    };

    Ok(response)
}

fn parse_id(segment: &str) -> Result<i64> {
    segment
        .parse::<i64>()
        .map_err(|_| PantryError::Validation(format!("invalid id: {segment}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_integers() {
        assert_eq!(parse_id("42").unwrap(), 42);
    }

    #[test]
    fn parse_id_rejects_garbage() {
        assert!(parse_id("abc").is_err());
        assert!(parse_id("").is_err());
        assert!(parse_id("1.5").is_err());
    }
}
