use axum::http::{HeaderMap, header::AUTHORIZATION};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::User;
use crate::state::AppState;

/// Bearer token claims. Tokens are issued by the account service; `sub`
/// carries the numeric user id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

pub async fn extract_current_user(state: &AppState, headers: &HeaderMap) -> Result<User> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized("Missing authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::Unauthorized("Invalid authorization header"))?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.config.secret_key.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("rejecting bearer token: {e}");
        AppError::Unauthorized("Invalid token")
    })?;

    let user_id: i64 = token_data
        .claims
        .sub
        .parse()
        .map_err(|_| AppError::Unauthorized("Invalid token"))?;

    state
        .storage
        .find_user(user_id)
        .await?
        .ok_or(AppError::Unauthorized("User not found"))
}
