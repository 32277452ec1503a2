pub mod gateway;
pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;

pub use gateway::{MarketplaceGateway, StorageError, StorageResult};
pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryGateway;
pub use postgres::PgGateway;
