pub mod context;
pub mod infrastructure;
pub mod ports;
pub mod postgres;

pub use context::DatabaseContext;
pub use infrastructure::memory::InMemoryDatabase;
pub use postgres::{PoolStats, PostgresDatabase};
