// handlers/marken.rs - /marken resource

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{info, warn};

use crate::database::Marke;
use crate::error::ApiError;
use crate::middleware::{RequireAdmin, RequireUser};
use crate::services::validation;
use crate::state::AppState;

use super::utils::{json_rejection, parse_id, rejected, IdQuery};

/// GET /marken/ping
pub async fn ping() -> &'static str {
    info!("Ping request for Marke API");
    "Marke API is running"
}

/// GET /marken?id=
pub async fn get_marke(
    _auth: RequireUser,
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<Marke>, ApiError> {
    let id = parse_id(query.id.as_deref())?;
    info!("GET request for brand {}", id);

    match state.gateway.read_marke_by_id(id).await? {
        Some(marke) => Ok(Json(marke)),
        None => {
            warn!("Brand {} not found", id);
            Err(ApiError::not_found("Brand not found"))
        }
    }
}

/// GET /marken/all
pub async fn list_marken(_auth: RequireUser, State(state): State<AppState>) -> Result<Json<Vec<Marke>>, ApiError> {
    let marken = state.gateway.list_marken().await?;
    info!("Listed {} brands", marken.len());
    Ok(Json(marken))
}

/// POST /marken
pub async fn create_marke(
    _auth: RequireAdmin,
    State(state): State<AppState>,
    body: Result<Json<Marke>, JsonRejection>,
) -> Result<(StatusCode, String), ApiError> {
    let Json(marke) = body.map_err(json_rejection)?;
    info!("POST request to add brand '{}'", marke.name);

    validation::require_marke_name(&marke.name).map_err(rejected)?;

    if state.gateway.insert_marke(&marke.name).await? == 0 {
        warn!("Insert of brand '{}' affected no rows", marke.name);
        return Err(ApiError::bad_request("Brand could not be added"));
    }

    info!("Added brand '{}'", marke.name);
    Ok((StatusCode::CREATED, format!("New brand {} added successfully", marke.name)))
}

/// DELETE /marken?id=
pub async fn delete_marke(
    _auth: RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<(StatusCode, String), ApiError> {
    let id = parse_id(query.id.as_deref())?;
    info!("DELETE request for brand {}", id);

    validation::validate_marke_delete(state.gateway.as_ref(), id)
        .await
        .map_err(rejected)?;

    if state.gateway.delete_marke(id).await? == 0 {
        warn!("Brand {} not found", id);
        return Err(ApiError::not_found("Brand not found"));
    }

    info!("Deleted brand {}", id);
    Ok((StatusCode::OK, format!("Brand {} deleted successfully!", id)))
}
