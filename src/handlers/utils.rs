use axum::extract::rejection::JsonRejection;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::services::validation::IntegrityError;

/// `?id=<int>`
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

/// `?jahr=<int>`
#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub jahr: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: i64,
}

pub fn parse_id(raw: Option<&str>) -> Result<i32, ApiError> {
    let raw = raw.ok_or_else(|| ApiError::bad_request("Query parameter 'id' is required"))?;
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ApiError::bad_request(format!("Query parameter 'id' must be an integer, got '{}'", raw)))
}

pub fn parse_year(raw: Option<&str>) -> Result<i32, ApiError> {
    raw.and_then(|r| r.trim().parse::<i32>().ok()).ok_or_else(|| {
        ApiError::bad_request(format!(
            "Please provide a valid year (e.g. 2020), got '{}'",
            raw.unwrap_or_default()
        ))
    })
}

/// Calendar date the build-year rule compares against.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn json_rejection(rejection: JsonRejection) -> ApiError {
    tracing::warn!("Rejected request body: {}", rejection.body_text());
    ApiError::invalid_json(rejection.body_text())
}

/// Log a failed rule at warn level before it becomes a response. Store faults
/// are logged by the `ApiError` conversion itself.
pub fn rejected(err: IntegrityError) -> ApiError {
    if !matches!(err, IntegrityError::Store(_)) {
        tracing::warn!("Validation failed: {}", err);
    }
    err.into()
}
