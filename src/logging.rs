use std::{env, time::Instant};

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber. `RUST_LOG` sets the filter (default
/// `info`); `LOG_FORMAT=json` switches to one JSON object per line.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let builder = fmt().with_env_filter(filter).with_target(false);
    if json {
        builder.json().flatten_event(true).init();
    } else {
        builder.compact().init();
    }
}

pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let route = request.uri().path().to_string();
    let started_at = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let duration_ms = started_at.elapsed().as_millis();

    info!(
        method = %method,
        path = %route,
        status = status.as_u16(),
        duration_ms,
        "request summary"
    );

    if status.is_server_error() {
        warn!(
            method = %method,
            path = %route,
            status = status.as_u16(),
            "request failed on an upstream dependency"
        );
    }

    response
}
