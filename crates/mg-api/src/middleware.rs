//! mental-game/crates/mg-api/src/middleware.rs
//!
//! Standard middleware for the Mental Game API.

use actix_cors::Cors;
use actix_web::middleware::Logger;

/// The request logger: remote-ip "request-line" status-code response-size
/// "referrer" "user-agent".
pub fn standard_middleware() -> Logger {
    Logger::default()
}

/// CORS policy. The site and the API may live on different subdomains, and
/// reads should work for anonymous visitors everywhere.
pub fn cors_policy() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST"])
        .max_age(3600)
}
