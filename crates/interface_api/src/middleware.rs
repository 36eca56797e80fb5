//! API middleware

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{info, warn};
use uuid::Uuid;

use core_kernel::OperationMetadata;
use domain_identity::Principal;

use crate::auth::{parse_authorization, AuthError, Authorization};
use crate::error::ApiError;
use crate::AppState;

/// Response header carrying the handling time in seconds
pub const PROCESS_TIME_HEADER: &str = "x-process-time";

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Authentication middleware
///
/// Accepts HTTP Basic credentials (verified by the auth gate) or a bearer
/// token. On success the `Principal` and an `OperationMetadata` for the
/// request are added to the request extensions; the principal is also
/// copied onto the response for the request logger.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let principal = match authenticate(&state, request.headers()).await {
        Ok(principal) => principal,
        Err(e) => return e.into_response(),
    };

    let correlation_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let metadata = OperationMetadata::with_correlation_id(correlation_id)
        .initiated_by(principal.username.clone());

    request.extensions_mut().insert(principal.clone());
    request.extensions_mut().insert(metadata);

    let mut response = next.run(request).await;
    response.extensions_mut().insert(principal);
    response
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Principal, ApiError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            warn!("Missing or invalid Authorization header");
            ApiError::from(AuthError::MissingCredentials)
        })?;

    match parse_authorization(header)? {
        Authorization::Basic(credentials) => Ok(state.auth.authenticate(&credentials).await?),
        Authorization::Bearer(token) => state.tokens.validate(&token).map_err(|e| {
            warn!("Token validation failed: {:?}", e);
            ApiError::from(e)
        }),
    }
}

/// Request logging middleware
///
/// Logs every request with its latency and sets the `X-Process-Time`
/// header.
pub async fn request_logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    info!(method = %method, path = %path, "Request started");

    let mut response = next.run(request).await;

    let elapsed = start.elapsed();
    let user = response
        .extensions()
        .get::<Principal>()
        .map(|p| p.username.clone())
        .unwrap_or_else(|| "anonymous".to_string());

    info!(
        method = %method,
        path = %path,
        user = %user,
        status = %response.status().as_u16(),
        latency_ms = elapsed.as_millis() as u64,
        "Request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&elapsed.as_secs_f64().to_string()) {
        response.headers_mut().insert(PROCESS_TIME_HEADER, value);
    }
    response
}
