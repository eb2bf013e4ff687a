use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

use crate::auth::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub store: StoreBackend,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Which gateway implementation backs the handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub connect_timeout_secs: u64,
    pub enable_query_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub users: Vec<UserCredential>,
}

/// A Basic-auth login known to the access gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCredential {
    pub name: String,
    pub password: String,
    pub role: Role,
}

impl UserCredential {
    pub fn new(name: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
            role,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("AUTOS_STORE") {
            match v.to_ascii_lowercase().as_str() {
                "memory" => self.store = StoreBackend::Memory,
                "postgres" => self.store = StoreBackend::Postgres,
                other => tracing::warn!("Ignoring unknown AUTOS_STORE value '{}'", other),
            }
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connect_timeout_secs = v.parse().unwrap_or(self.database.connect_timeout_secs);
        }
        if let Ok(v) = env::var("DATABASE_ENABLE_QUERY_LOGGING") {
            self.database.enable_query_logging = v.parse().unwrap_or(self.database.enable_query_logging);
        }

        // API overrides
        if let Ok(v) = env::var("API_HOST") {
            self.api.host = v;
        }
        if let Some(port) = env::var("AUTOS_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.api.port = port;
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("AUTH_USERS") {
            self.security.users = parse_users(&v);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            store: StoreBackend::Postgres,
            database: DatabaseConfig {
                url: None,
                connect_timeout_secs: 30,
                enable_query_logging: true,
            },
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                enable_request_logging: true,
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                jwt_secret: "development-secret-change-me".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                users: vec![
                    UserCredential::new("admin", "admin", Role::Admin),
                    UserCredential::new("user", "user", Role::User),
                ],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            store: StoreBackend::Postgres,
            database: DatabaseConfig {
                url: None,
                connect_timeout_secs: 10,
                enable_query_logging: true,
            },
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                enable_request_logging: true,
                max_request_size_bytes: 512 * 1024,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                users: Vec::new(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            store: StoreBackend::Postgres,
            database: DatabaseConfig {
                url: None,
                connect_timeout_secs: 5,
                enable_query_logging: false,
            },
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                enable_request_logging: false,
                max_request_size_bytes: 256 * 1024,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
                users: Vec::new(),
            },
        }
    }
}

/// Parse `name:password:ROLE` entries separated by commas. Malformed entries
/// are skipped with a warning rather than failing startup.
fn parse_users(raw: &str) -> Vec<UserCredential> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let mut parts = entry.splitn(3, ':');
            let (name, password, role) = (parts.next()?, parts.next(), parts.next());
            match (password, role.and_then(|r| r.parse::<Role>().ok())) {
                (Some(password), Some(role)) if !name.is_empty() => {
                    Some(UserCredential::new(name, password, role))
                }
                _ => {
                    tracing::warn!("Ignoring malformed AUTH_USERS entry for '{}'", name);
                    None
                }
            }
        })
        .collect()
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
