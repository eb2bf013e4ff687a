// handlers/system.rs - service health and token issuance

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::json;

use crate::auth::{generate_jwt, Claims, JwtError};
use crate::error::ApiError;
use crate::middleware::RequireUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}

/// GET /health - public, reports store reachability
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.gateway.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}

/// POST /auth/token - exchange valid credentials for a Bearer JWT
pub async fn issue_token(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
) -> Result<Json<TokenResponse>, ApiError> {
    let expiry_hours = state.security.jwt_expiry_hours;
    let claims = Claims::new(user.name.clone(), user.role, expiry_hours)?;
    let expires_in = expiry_hours
        .checked_mul(3600)
        .ok_or_else(|| JwtError::TokenGeneration(format!("expiry of {} hours is out of range", expiry_hours)))?;
    let token = generate_jwt(&claims, &state.security.jwt_secret)?;

    tracing::info!("Issued token for {} ({})", user.name, user.role);
    Ok(Json(TokenResponse {
        token,
        token_type: "Bearer",
        expires_in,
    }))
}
