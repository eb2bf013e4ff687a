// HTTP API Error Types
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

use crate::auth::JwtError;
use crate::database::DatabaseError;
use crate::services::validation::IntegrityError;

/// Realm advertised on 401 responses.
pub const AUTH_REALM: &str = "Basic realm=\"autos-api\"";

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    InvalidJson(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::InvalidJson(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::InternalServerError(_) => 500,
        }
    }

    /// Get client-facing error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::InvalidJson(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::InvalidJson(_) => "INVALID_JSON",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "error": true,
            "message": self.message(),
            "code": self.error_code()
        })
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

// Store faults keep their underlying message so operators see the proximate cause.
impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        tracing::error!("Store fault: {}", err);
        ApiError::internal_server_error(format!("Database error: {}", err))
    }
}

impl From<IntegrityError> for ApiError {
    fn from(err: IntegrityError) -> Self {
        match err {
            IntegrityError::Store(db) => db.into(),
            IntegrityError::AutoNotFound(_) => ApiError::not_found(err.to_string()),
            IntegrityError::MarkeInUse { .. } => ApiError::conflict(err.to_string()),
            IntegrityError::MarkeNotFound(_)
            | IntegrityError::EmptyModell
            | IntegrityError::FutureBaujahr(_)
            | IntegrityError::NonPositiveGewicht(_)
            | IntegrityError::NonPositiveLeistung(_)
            | IntegrityError::EmptyName => ApiError::bad_request(err.to_string()),
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::InvalidToken(_) => ApiError::unauthorized(err.to_string()),
            JwtError::InvalidSecret | JwtError::TokenGeneration(_) => {
                tracing::error!("Token error: {}", err);
                ApiError::internal_server_error(err.to_string())
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let challenge = matches!(self, ApiError::Unauthorized(_));

        let mut response = (status, Json(self.to_json())).into_response();
        if challenge {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(AUTH_REALM));
        }
        response
    }
}
