//! Validation and referential-integrity rules for brands and vehicles.
//!
//! The field rules are pure. The chains combine them with gateway existence
//! checks in a fixed order and stop at the first failure, so a given invalid
//! input always produces the same message.
//!
//! None of the chains are atomic with the write that follows them: a brand can
//! disappear between `marke_exists` and `insert_auto`, and an auto can appear
//! between `count_autos_referencing` and `delete_marke`.

use chrono::NaiveDate;
use thiserror::Error;

use crate::database::{Auto, DatabaseError, Gateway};

#[derive(Debug, Error)]
pub enum IntegrityError {
    #[error("Brand with ID {0} does not exist")]
    MarkeNotFound(i32),

    #[error("Model must not be empty")]
    EmptyModell,

    #[error("Build date must not be in the future ({0})")]
    FutureBaujahr(NaiveDate),

    #[error("Weight must be greater than 0")]
    NonPositiveGewicht(f64),

    #[error("Power must be greater than 0 (PS)")]
    NonPositiveLeistung(i32),

    #[error("Auto with ID {0} does not exist")]
    AutoNotFound(i32),

    #[error("Brand name must not be empty")]
    EmptyName,

    #[error("Brand {id} cannot be deleted: it is still referenced by {count} auto(s). Delete those autos first.")]
    MarkeInUse { id: i32, count: i64 },

    #[error(transparent)]
    Store(#[from] DatabaseError),
}

pub fn require_modell(modell: &str) -> Result<(), IntegrityError> {
    if modell.trim().is_empty() {
        return Err(IntegrityError::EmptyModell);
    }
    Ok(())
}

/// `baujahr` may be today but not after it.
pub fn require_past_baujahr(baujahr: NaiveDate, today: NaiveDate) -> Result<(), IntegrityError> {
    if baujahr > today {
        return Err(IntegrityError::FutureBaujahr(baujahr));
    }
    Ok(())
}

pub fn require_positive_gewicht(gewicht: f64) -> Result<(), IntegrityError> {
    // written this way round so NaN fails too
    if !(gewicht > 0.0) {
        return Err(IntegrityError::NonPositiveGewicht(gewicht));
    }
    Ok(())
}

pub fn require_positive_leistung(leistung: i32) -> Result<(), IntegrityError> {
    if leistung <= 0 {
        return Err(IntegrityError::NonPositiveLeistung(leistung));
    }
    Ok(())
}

pub fn require_marke_name(name: &str) -> Result<(), IntegrityError> {
    if name.trim().is_empty() {
        return Err(IntegrityError::EmptyName);
    }
    Ok(())
}

/// Field rules shared by create and update: model, date, weight, power.
pub fn check_auto_fields(auto: &Auto, today: NaiveDate) -> Result<(), IntegrityError> {
    require_modell(&auto.modell)?;
    require_past_baujahr(auto.baujahr, today)?;
    require_positive_gewicht(auto.gewicht)?;
    require_positive_leistung(auto.leistung)
}

/// brand exists → model → date → weight → power
pub async fn validate_auto_create(gateway: &dyn Gateway, auto: &Auto, today: NaiveDate) -> Result<(), IntegrityError> {
    if !gateway.marke_exists(auto.fs_marken).await? {
        return Err(IntegrityError::MarkeNotFound(auto.fs_marken));
    }
    check_auto_fields(auto, today)
}

/// target exists → then the create chain
pub async fn validate_auto_update(gateway: &dyn Gateway, auto: &Auto, today: NaiveDate) -> Result<(), IntegrityError> {
    if !gateway.auto_exists(auto.id_autos).await? {
        return Err(IntegrityError::AutoNotFound(auto.id_autos));
    }
    validate_auto_create(gateway, auto, today).await
}

/// A brand may only go once nothing references it.
pub async fn validate_marke_delete(gateway: &dyn Gateway, id: i32) -> Result<(), IntegrityError> {
    let count = gateway.count_autos_referencing(id).await?;
    if count > 0 {
        return Err(IntegrityError::MarkeInUse { id, count });
    }
    Ok(())
}
