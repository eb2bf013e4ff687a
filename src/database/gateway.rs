use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{Auto, Marke};

/// Persistence operations for brands and vehicles.
///
/// Every call is self-contained: implementations must not hold state across
/// calls that would let one request observe another's uncommitted work. A
/// missing row is `Ok(None)`, never an error; only store faults are `Err`.
///
/// Check-then-act sequences built on top of this trait (existence check
/// followed by a write) are not atomic.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn read_marke_by_id(&self, id: i32) -> Result<Option<Marke>, DatabaseError>;

    async fn list_marken(&self) -> Result<Vec<Marke>, DatabaseError>;

    async fn insert_marke(&self, name: &str) -> Result<u64, DatabaseError>;

    async fn delete_marke(&self, id: i32) -> Result<u64, DatabaseError>;

    /// Fetch a vehicle with its brand embedded as the brand exists right now.
    async fn read_auto_by_id(&self, id: i32) -> Result<Option<Auto>, DatabaseError>;

    async fn list_autos(&self) -> Result<Vec<Auto>, DatabaseError>;

    /// Vehicles whose `baujahr` falls in the given calendar year.
    async fn list_autos_by_year(&self, year: i32) -> Result<Vec<Auto>, DatabaseError>;

    /// Insert ignoring `id_autos` and `marke`.
    async fn insert_auto(&self, auto: &Auto) -> Result<u64, DatabaseError>;

    /// Full-row update keyed by `id_autos`.
    async fn update_auto(&self, auto: &Auto) -> Result<u64, DatabaseError>;

    async fn delete_auto(&self, id: i32) -> Result<u64, DatabaseError>;

    async fn delete_all_autos(&self) -> Result<u64, DatabaseError>;

    async fn count_autos(&self) -> Result<i64, DatabaseError>;

    async fn marke_exists(&self, id: i32) -> Result<bool, DatabaseError>;

    async fn auto_exists(&self, id: i32) -> Result<bool, DatabaseError>;

    async fn count_autos_referencing(&self, marke_id: i32) -> Result<i64, DatabaseError>;

    /// Liveness probe for `/health`.
    async fn health_check(&self) -> Result<(), DatabaseError>;
}
