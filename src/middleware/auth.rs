use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{decode_basic, validate_jwt, verify_password, Role};
use crate::config::SecurityConfig;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller, resolved from Basic credentials or a Bearer JWT
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub name: String,
    pub role: Role,
}

/// Outcome of looking at the Authorization header, stored in request extensions.
///
/// Rejections are only acted on by protected handlers, so public routes keep
/// working even when a client sends stale credentials.
#[derive(Clone, Debug)]
pub enum Authentication {
    Anonymous,
    Authenticated(AuthUser),
    Rejected(String),
}

/// Resolve the caller for every request and hand the result to the role guards.
pub async fn authenticate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let authentication = match resolve(request.headers(), &state.security) {
        Ok(Some(user)) => {
            tracing::debug!("Authenticated {} as {}", user.name, user.role);
            Authentication::Authenticated(user)
        }
        Ok(None) => Authentication::Anonymous,
        Err(reason) => {
            tracing::warn!("Authentication failed: {}", reason);
            Authentication::Rejected(reason)
        }
    };

    request.extensions_mut().insert(authentication);
    next.run(request).await
}

fn resolve(headers: &HeaderMap, security: &SecurityConfig) -> Result<Option<AuthUser>, String> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(encoded) = value.strip_prefix("Basic ") {
        let (name, password) = decode_basic(encoded)?;
        let role = verify_password(&security.users, &name, &password)
            .ok_or_else(|| "Invalid username or password".to_string())?;
        return Ok(Some(AuthUser { name, role }));
    }

    if let Some(token) = value.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        let claims = validate_jwt(token.trim(), &security.jwt_secret).map_err(|e| e.to_string())?;
        return Ok(Some(AuthUser {
            name: claims.sub,
            role: claims.role,
        }));
    }

    Err("Authorization header must use Basic or Bearer scheme".to_string())
}

fn authorize(parts: &Parts, allowed: &[Role]) -> Result<AuthUser, ApiError> {
    match parts.extensions.get::<Authentication>() {
        Some(Authentication::Authenticated(user)) if allowed.contains(&user.role) => Ok(user.clone()),
        Some(Authentication::Authenticated(user)) => {
            tracing::warn!("{} ({}) lacks a role for {}", user.name, user.role, parts.uri.path());
            Err(ApiError::forbidden(format!(
                "Role {} is not allowed to perform this operation",
                user.role
            )))
        }
        Some(Authentication::Rejected(reason)) => Err(ApiError::unauthorized(reason.clone())),
        Some(Authentication::Anonymous) | None => Err(ApiError::unauthorized("Authentication required")),
    }
}

/// Guard for read operations: ADMIN or USER.
#[derive(Clone, Debug)]
pub struct RequireUser(pub AuthUser);

/// Guard for mutating operations: ADMIN only.
#[derive(Clone, Debug)]
pub struct RequireAdmin(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        authorize(parts, &[Role::Admin, Role::User]).map(RequireUser)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        authorize(parts, &[Role::Admin]).map(RequireAdmin)
    }
}
