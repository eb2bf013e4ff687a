pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::config::{AppConfig, Environment, StoreBackend};
use crate::database::{DatabaseManager, Gateway, MemoryGateway, PgGateway};
use crate::state::AppState;

/// Build the gateway selected by configuration.
pub fn gateway_from_config(config: &AppConfig) -> anyhow::Result<Arc<dyn Gateway>> {
    match config.store {
        StoreBackend::Postgres => {
            let manager = DatabaseManager::from_config(&config.database)?;
            Ok(Arc::new(PgGateway::new(manager)))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on shutdown");
            Ok(Arc::new(MemoryGateway::new()))
        }
    }
}

/// Full application router with the access gate and global middleware applied.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        // Public
        .route("/health", get(handlers::system::health))
        .route("/autos/ping", get(handlers::autos::ping))
        .route("/marken/ping", get(handlers::marken::ping))
        // Role-gated
        .route("/auth/token", post(handlers::system::issue_token))
        .merge(auto_routes())
        .merge(marke_routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::authenticate,
        ))
        .layer(RequestBodyLimitLayer::new(config.api.max_request_size_bytes))
        .with_state(state);

    if let Some(cors) = cors_layer(config) {
        router = router.layer(cors);
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn auto_routes() -> Router<AppState> {
    use handlers::autos;

    Router::new()
        .route(
            "/autos",
            get(autos::get_auto)
                .post(autos::create_auto)
                .put(autos::update_auto)
                .delete(autos::delete_auto),
        )
        .route("/autos/all", get(autos::list_autos).delete(autos::delete_all_autos))
        .route("/autos/baujahr", get(autos::list_autos_by_year))
        .route("/autos/count", get(autos::count_autos))
}

fn marke_routes() -> Router<AppState> {
    use handlers::marken;

    Router::new()
        .route(
            "/marken",
            get(marken::get_marke)
                .post(marken::create_marke)
                .delete(marken::delete_marke),
        )
        .route("/marken/all", get(marken::list_marken))
}

fn cors_layer(config: &AppConfig) -> Option<CorsLayer> {
    if !config.security.enable_cors {
        return None;
    }
    if matches!(config.environment, Environment::Development) {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
    )
}
