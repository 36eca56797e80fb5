//! Health check handlers

use axum::{extract::State, Json};
use tracing::{debug, error};

use core_kernel::HealthCheckable;

use crate::dto::health::{
    LivenessResponse, ReadinessResponse, ServiceEndpoints, ServiceInfo, SERVICE_NAME,
};
use crate::AppState;

/// Service information
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "Billing Service".to_string(),
        status: "running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: ServiceEndpoints {
            health_live: "/health/live".to_string(),
            health_ready: "/health/ready".to_string(),
        },
    })
}

/// Liveness check
pub async fn liveness() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "alive".to_string(),
        service: SERVICE_NAME.to_string(),
    })
}

/// Readiness check (includes database)
///
/// Always answers 200; the body says whether the store is reachable.
pub async fn readiness(State(state): State<AppState>) -> Json<ReadinessResponse> {
    let health = state.bills.store().health_check().await;

    if health.status.is_operational() {
        debug!(latency_ms = health.latency_ms, "Readiness check passed");
        Json(ReadinessResponse {
            status: "ready".to_string(),
            service: SERVICE_NAME.to_string(),
            database: "connected".to_string(),
            error: None,
        })
    } else {
        let message = health.message.unwrap_or_else(|| "unavailable".to_string());
        error!(error = %message, "Readiness check failed");
        Json(ReadinessResponse {
            status: "not_ready".to_string(),
            service: SERVICE_NAME.to_string(),
            database: "disconnected".to_string(),
            error: Some(message),
        })
    }
}
