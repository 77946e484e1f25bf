//! HTTP server.

mod http;

pub use http::{run, AppState};
