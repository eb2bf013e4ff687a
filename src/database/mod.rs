pub mod gateway;
pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;

pub use gateway::Gateway;
pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryGateway;
pub use models::{Auto, Marke};
pub use postgres::PgGateway;
