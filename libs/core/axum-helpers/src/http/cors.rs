use axum::http::{HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

/// Comma-separated list of allowed origins
pub const CORS_ALLOWED_ORIGIN: &str = "CORS_ALLOWED_ORIGIN";

/// CORS layer restricted to `origins`.
///
/// Allows GET, POST, PUT, DELETE and OPTIONS with the Content-Type and
/// Accept headers, cached by browsers for one hour.
pub fn create_cors_layer(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Allows any origin, method and header.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}

/// Parses a comma-separated origin list, ignoring blank entries.
pub fn parse_origins(raw: &str) -> io::Result<Vec<HeaderValue>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<HeaderValue>().map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("Invalid {} value '{}': {}", CORS_ALLOWED_ORIGIN, s, e),
                )
            })
        })
        .collect()
}

/// Restricted layer when `CORS_ALLOWED_ORIGIN` lists origins, otherwise permissive.
pub fn cors_layer_from_env() -> io::Result<CorsLayer> {
    let origins = match std::env::var(CORS_ALLOWED_ORIGIN) {
        Ok(raw) => parse_origins(&raw)?,
        Err(_) => Vec::new(),
    };

    if origins.is_empty() {
        info!("{} not set, allowing any origin", CORS_ALLOWED_ORIGIN);
        Ok(create_permissive_cors_layer())
    } else {
        info!(count = origins.len(), "CORS restricted to configured origins");
        Ok(create_cors_layer(origins))
    }
}
