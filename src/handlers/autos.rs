// handlers/autos.rs - /autos resource
//
// Each handler runs the applicable rule chain, then exactly one mutating
// gateway call. A targeted write that touches no rows is reported as 404.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{info, warn};

use crate::database::Auto;
use crate::error::ApiError;
use crate::middleware::{RequireAdmin, RequireUser};
use crate::services::validation;
use crate::state::AppState;

use super::utils::{json_rejection, parse_id, parse_year, rejected, today, CountResponse, IdQuery, YearQuery};

/// GET /autos/ping
pub async fn ping() -> &'static str {
    info!("Ping request for Auto API");
    "Auto API is running"
}

/// GET /autos?id=
pub async fn get_auto(
    _auth: RequireUser,
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<Auto>, ApiError> {
    let id = parse_id(query.id.as_deref())?;
    info!("GET request for auto {}", id);

    match state.gateway.read_auto_by_id(id).await? {
        Some(auto) => Ok(Json(auto)),
        None => {
            warn!("Auto {} not found", id);
            Err(ApiError::not_found("Auto not found"))
        }
    }
}

/// GET /autos/all
pub async fn list_autos(_auth: RequireUser, State(state): State<AppState>) -> Result<Json<Vec<Auto>>, ApiError> {
    let autos = state.gateway.list_autos().await?;
    info!("Listed {} autos", autos.len());
    Ok(Json(autos))
}

/// GET /autos/baujahr?jahr=
pub async fn list_autos_by_year(
    _auth: RequireUser,
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> Result<Json<Vec<Auto>>, ApiError> {
    let year = parse_year(query.jahr.as_deref())?;
    let autos = state.gateway.list_autos_by_year(year).await?;
    info!("Found {} autos built in {}", autos.len(), year);
    Ok(Json(autos))
}

/// GET /autos/count
pub async fn count_autos(_auth: RequireUser, State(state): State<AppState>) -> Result<Json<CountResponse>, ApiError> {
    let count = state.gateway.count_autos().await?;
    info!("Auto count: {}", count);
    Ok(Json(CountResponse { count }))
}

/// POST /autos
pub async fn create_auto(
    _auth: RequireAdmin,
    State(state): State<AppState>,
    body: Result<Json<Auto>, JsonRejection>,
) -> Result<(StatusCode, String), ApiError> {
    let Json(auto) = body.map_err(json_rejection)?;
    info!("POST request to add auto '{}'", auto.modell);

    validation::validate_auto_create(state.gateway.as_ref(), &auto, today())
        .await
        .map_err(rejected)?;

    if state.gateway.insert_auto(&auto).await? == 0 {
        warn!("Insert of auto '{}' affected no rows", auto.modell);
        return Err(ApiError::bad_request("Auto could not be added"));
    }

    info!("Added auto '{}'", auto.modell);
    Ok((StatusCode::CREATED, format!("New auto {} added successfully", auto.modell)))
}

/// PUT /autos
pub async fn update_auto(
    _auth: RequireAdmin,
    State(state): State<AppState>,
    body: Result<Json<Auto>, JsonRejection>,
) -> Result<(StatusCode, String), ApiError> {
    let Json(auto) = body.map_err(json_rejection)?;
    info!("PUT request to update auto {}", auto.id_autos);

    validation::validate_auto_update(state.gateway.as_ref(), &auto, today())
        .await
        .map_err(rejected)?;

    // Zero rows here means the auto vanished after the existence check.
    if state.gateway.update_auto(&auto).await? == 0 {
        warn!("Auto {} disappeared before update", auto.id_autos);
        return Err(ApiError::not_found("Auto not found"));
    }

    info!("Updated auto {}", auto.id_autos);
    Ok((StatusCode::OK, format!("Auto {} updated successfully", auto.id_autos)))
}

/// DELETE /autos?id=
pub async fn delete_auto(
    _auth: RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<(StatusCode, String), ApiError> {
    let id = parse_id(query.id.as_deref())?;
    info!("DELETE request for auto {}", id);

    if state.gateway.delete_auto(id).await? == 0 {
        warn!("Auto {} not found", id);
        return Err(ApiError::not_found("Auto not found"));
    }

    info!("Deleted auto {}", id);
    Ok((StatusCode::OK, format!("Auto {} deleted successfully!", id)))
}

/// DELETE /autos/all
pub async fn delete_all_autos(
    _auth: RequireAdmin,
    State(state): State<AppState>,
) -> Result<(StatusCode, String), ApiError> {
    warn!("DELETE request for ALL autos");
    let deleted = state.gateway.delete_all_autos().await?;
    info!("{} autos deleted", deleted);
    Ok((StatusCode::OK, format!("{} autos deleted successfully", deleted)))
}
