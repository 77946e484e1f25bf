//! Configuration.
//!
//! CLI arguments and environment variable handling using clap, read once at
//! process start.

use clap::Parser;
use std::net::SocketAddr;

/// Pantry - recipe sharing REST backend
#[derive(Parser, Debug, Clone)]
#[command(name = "pantry")]
#[command(about = "Recipe sharing REST backend with role-based permissions")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "pantry")]
    pub mongodb_db: String,

    /// Administrator email; an identity created with this address is assigned
    /// the Admin role
    #[arg(long, env = "ADMIN_EMAIL")]
    pub admin_email: String,

    /// Secret for signing confirmation tokens
    #[arg(long, env = "TOKEN_SECRET")]
    pub token_secret: String,

    /// Confirmation token lifetime in seconds
    #[arg(long, env = "CONFIRM_TTL_SECONDS", default_value = "3600")]
    pub confirm_ttl_seconds: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Validate configuration before serving.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.admin_email.is_empty() {
            return Err("ADMIN_EMAIL must not be empty".to_string());
        }

        if self.token_secret.len() < 16 {
            return Err("TOKEN_SECRET must be at least 16 bytes".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(admin_email: &str, token_secret: &str) -> Args {
        Args {
            listen: "127.0.0.1:8080".parse().unwrap(),
            mongodb_uri: "mongodb://localhost:27017".into(),
            mongodb_db: "pantry".into(),
            admin_email: admin_email.into(),
            token_secret: token_secret.into(),
            confirm_ttl_seconds: 3600,
            log_level: "info".into(),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(args("admin@example.com", "a-long-enough-secret").validate().is_ok());
    }

    #[test]
    fn empty_admin_email_fails() {
        assert!(args("", "a-long-enough-secret").validate().is_err());
    }

    #[test]
    fn short_secret_fails() {
        assert!(args("admin@example.com", "short").validate().is_err());
    }
}
