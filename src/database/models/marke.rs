use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A vehicle brand. `id_marke` is assigned by the store and is `0` until then.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Marke {
    #[serde(default)]
    #[sqlx(rename = "id_marken")]
    pub id_marke: i32,
    #[serde(default)]
    pub name: String,
}

impl Marke {
    pub fn new(id_marke: i32, name: impl Into<String>) -> Self {
        Self {
            id_marke,
            name: name.into(),
        }
    }
}
