use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::marke::Marke;

/// A vehicle record referencing exactly one brand through `fs_marken`.
///
/// `marke` is filled in by the gateway on read and never deserialized from a
/// request body, so a client cannot smuggle a brand in alongside the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Auto {
    #[serde(default)]
    pub id_autos: i32,
    #[serde(default)]
    pub modell: String,
    pub baujahr: NaiveDate,
    #[serde(default)]
    pub gewicht: f64,
    #[serde(default)]
    pub leistung: i32,
    #[serde(default)]
    pub verbrenner: bool,
    #[serde(default)]
    pub produktion: bool,
    #[serde(default)]
    pub fs_marken: i32,
    #[serde(default, skip_deserializing)]
    pub marke: Option<Marke>,
}

/// Flat row as selected from `autos LEFT JOIN marken`.
///
/// The brand columns are nullable because the join finds nothing once the
/// referenced brand is gone.
#[derive(Debug, Clone, FromRow)]
pub struct AutoRow {
    pub id_autos: i32,
    pub modell: String,
    pub baujahr: NaiveDate,
    pub gewicht: f64,
    pub leistung: i32,
    pub verbrenner: bool,
    pub produktion: bool,
    pub fs_marken: i32,
    pub marke_id: Option<i32>,
    pub marke_name: Option<String>,
}

impl AutoRow {
    /// Assemble the transport entity, embedding the brand when the join found one.
    pub fn assemble(self) -> Auto {
        let marke = match (self.marke_id, self.marke_name) {
            (Some(id), Some(name)) => Some(Marke::new(id, name)),
            _ => None,
        };

        Auto {
            id_autos: self.id_autos,
            modell: self.modell,
            baujahr: self.baujahr,
            gewicht: self.gewicht,
            leistung: self.leistung,
            verbrenner: self.verbrenner,
            produktion: self.produktion,
            fs_marken: self.fs_marken,
            marke,
        }
    }
}
