//! Token handler

use axum::{extract::State, Json};
use tracing::info;

use crate::dto::auth::{TokenRequest, TokenResponse};
use crate::extract::ValidatedJson;
use crate::{error::ApiError, AppState};

/// Exchanges a username and password for a bearer token
pub async fn issue_token(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let principal = state.auth.authenticate(&request.into()).await?;
    let token = state.tokens.issue(&principal)?;

    info!(
        username = %principal,
        expires_in_secs = state.tokens.expiration_secs(),
        "Access token issued"
    );
    Ok(Json(TokenResponse::bearer(token)))
}
