//! Middleware stack for the API server
//!
//! Request ids, tracing, timeouts and CORS.

use std::time::Duration;

use axum::{
    body::Body,
    http::{header::HeaderName, HeaderValue, Method, Request, StatusCode},
    Router,
};
use roster_common::CorsConfig;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

use crate::extractors::ACTOR_HEADER;
use crate::state::AppState;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Requests still running after this are answered with 503
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn header_str<'a>(request: &'a Request<Body>, name: &str) -> Option<&'a str> {
    request.headers().get(name).and_then(|v| v.to_str().ok())
}

/// Apply the middleware stack.
///
/// Layers wrap in reverse order, so requests pass request-id generation
/// first and reach CORS last.
pub fn apply_middleware(
    router: Router<AppState>,
    cors_config: &CorsConfig,
    is_production: bool,
) -> Router<AppState> {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    router
        .layer(create_cors_layer(cors_config, is_production))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::SERVICE_UNAVAILABLE,
            REQUEST_TIMEOUT,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = header_str(request, REQUEST_ID_HEADER).unwrap_or("-"),
                        actor = header_str(request, ACTOR_HEADER).unwrap_or("-"),
                    )
                })
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}

/// Any origin is allowed only outside production and only when the list is
/// empty; otherwise the configured origins are the whole allow list.
fn create_cors_layer(config: &CorsConfig, is_production: bool) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
            HeaderName::from_static(REQUEST_ID_HEADER),
            HeaderName::from_static(ACTOR_HEADER),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)]);

    if config.allowed_origins.is_empty() {
        if is_production {
            warn!("CORS_ALLOWED_ORIGINS is empty; cross-origin requests are refused");
            return layer.allow_origin(AllowOrigin::list(Vec::<HeaderValue>::new()));
        }
        warn!("CORS allows any origin; set CORS_ALLOWED_ORIGINS to restrict it");
        return layer.allow_origin(Any);
    }

    let mut origins = Vec::with_capacity(config.allowed_origins.len());
    for origin in &config.allowed_origins {
        match origin.parse::<HeaderValue>() {
            Ok(value) => origins.push(value),
            Err(_) => warn!(origin = %origin, "Ignoring malformed CORS origin"),
        }
    }

    info!(count = origins.len(), "CORS origins configured");
    layer.allow_origin(AllowOrigin::list(origins))
}
