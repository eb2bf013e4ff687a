use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::config::UserCredential;

/// Roles recognised by the access gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Fails when `expiry_hours` pushes `exp` past what a timestamp can hold.
    pub fn new(sub: String, role: Role, expiry_hours: u64) -> Result<Self, JwtError> {
        let now = Utc::now();
        let exp = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| JwtError::TokenGeneration(format!("expiry of {} hours is out of range", expiry_hours)))?;

        Ok(Self {
            sub,
            role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),
    #[error("JWT secret not configured")]
    InvalidSecret,
}

pub fn generate_jwt(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Validate signature and expiry, returning the claims.
pub fn validate_jwt(token: &str, secret: &str) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

/// Decode the payload of a `Basic` authorization value into `(user, password)`.
pub fn decode_basic(encoded: &str) -> Result<(String, String), String> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|_| "Basic credentials are not valid base64".to_string())?;
    let text = String::from_utf8(bytes).map_err(|_| "Basic credentials are not valid UTF-8".to_string())?;

    let (user, password) = text
        .split_once(':')
        .ok_or_else(|| "Basic credentials must be user:password".to_string())?;

    Ok((user.to_string(), password.to_string()))
}

/// Look up a user and compare the password in constant time.
pub fn verify_password(users: &[UserCredential], name: &str, password: &str) -> Option<Role> {
    let user = users.iter().find(|u| u.name == name)?;
    if bool::from(user.password.as_bytes().ct_eq(password.as_bytes())) {
        Some(user.role)
    } else {
        None
    }
}
