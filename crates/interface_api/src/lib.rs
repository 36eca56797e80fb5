//! HTTP API Layer
//!
//! This crate provides the REST API for the billing service using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: bills, token issue, health checks and service info
//! - **Middleware**: authentication (Basic or bearer), request logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//! - **Seeding**: default principals and historical bills at startup
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::new(bill_store, principal_store, &config);
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod auth;
pub mod extract;
pub mod seed;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
    middleware as axum_middleware,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_billing::{BillService, BillStore};
use domain_identity::{AuthGate, CredentialHasher, PrincipalStore};

use crate::auth::TokenIssuer;
use crate::config::ApiConfig;
use crate::handlers::{auth as auth_handlers, bills, health};
use crate::middleware::{auth_middleware, request_logging_middleware};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    pub bills: BillService,
    pub auth: AuthGate,
    pub tokens: TokenIssuer,
}

impl AppState {
    /// Wires the services over the given stores
    pub fn new(
        bill_store: Arc<dyn BillStore>,
        principal_store: Arc<dyn PrincipalStore>,
        config: &ApiConfig,
    ) -> Self {
        Self {
            bills: BillService::new(bill_store),
            auth: AuthGate::new(principal_store, CredentialHasher::new()),
            tokens: TokenIssuer::new(&config.jwt_secret, config.jwt_expiration_secs),
        }
    }
}

/// Creates the main API router
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/", get(health::service_info))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/v1/auth/token", post(auth_handlers::issue_token));

    // Bill routes
    let bill_routes = Router::new()
        .route("/", post(bills::create_bill).get(bills::list_bills))
        .route("/:bill_id", get(bills::get_bill))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/v1/bills", bill_routes)
        .layer(axum_middleware::from_fn(request_logging_middleware))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
