//! Token DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use domain_identity::Credentials;

/// Body of `POST /v1/auth/token`
#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl From<TokenRequest> for Credentials {
    fn from(request: TokenRequest) -> Self {
        Credentials::new(request.username, request.password)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}
