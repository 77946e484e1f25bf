//! Request authorization gate.
//!
//! Every API route runs through here before any resource accessor:
//! credential extraction, hash verification, then the confirmation check.
//! Unknown principal and wrong secret collapse into the same rejection so a
//! caller cannot probe which half failed.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hyper::header::AUTHORIZATION;
use hyper::Request;

use crate::db::schemas::UserDoc;
use crate::identity::IdentityStore;
use crate::types::{PantryError, Result};

const INVALID_CREDENTIALS: &str = "invalid credentials";
const UNCONFIRMED: &str = "unconfirmed user";

/// Identity attached to a request once the gate admits it. Downstream
/// handlers never re-verify within the request's lifetime.
pub struct RequestContext {
    pub identity: UserDoc,
}

/// Extract the (principal, secret) pair from a Basic Authorization header.
pub fn parse_basic_auth(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (email, password) = decoded.split_once(':')?;
    Some((email.to_string(), password.to_string()))
}

/// Admit or reject a request.
///
/// Walks the per-request states in order: credential extraction, identity
/// lookup, secret verification, confirmation check. Any failure rejects with
/// the matching error class.
pub async fn authorize<B>(req: &Request<B>, identities: &IdentityStore) -> Result<RequestContext> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| PantryError::Authentication(INVALID_CREDENTIALS.into()))?;

    let (email, password) = parse_basic_auth(header)
        .ok_or_else(|| PantryError::Authentication(INVALID_CREDENTIALS.into()))?;

    let user = identities
        .find_by_email(&email)
        .await?
        .ok_or_else(|| PantryError::Authentication(INVALID_CREDENTIALS.into()))?;

    if !identities.verify_credential(&user, &password)? {
        return Err(PantryError::Authentication(INVALID_CREDENTIALS.into()));
    }

    if !user.confirmed {
        return Err(PantryError::Authorization(UNCONFIRMED.into()));
    }

    Ok(RequestContext { identity: user })
}

#[cfg(test)]
mod tests {
    use super::*;

    // The full gate pipeline against stored identities is an integration test
    // requiring a running MongoDB; credential extraction is covered here.

    fn encode(pair: &str) -> String {
        format!("Basic {}", BASE64.encode(pair))
    }

    #[test]
    fn parses_a_valid_header() {
        let header = encode("cook@example.com:secret");
        assert_eq!(
            parse_basic_auth(&header),
            Some(("cook@example.com".to_string(), "secret".to_string()))
        );
    }

    #[test]
    fn secret_may_contain_colons() {
        let header = encode("cook@example.com:a:b:c");
        assert_eq!(
            parse_basic_auth(&header),
            Some(("cook@example.com".to_string(), "a:b:c".to_string()))
        );
    }

    #[test]
    fn rejects_non_basic_schemes() {
        assert_eq!(parse_basic_auth("Bearer abc123"), None);
    }

    #[test]
    fn rejects_invalid_base64() {
        assert_eq!(parse_basic_auth("Basic !!not-base64!!"), None);
    }

    #[test]
    fn rejects_pair_without_separator() {
        let header = encode("no-colon-here");
        assert_eq!(parse_basic_auth(&header), None);
    }
}
