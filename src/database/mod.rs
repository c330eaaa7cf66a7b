pub mod manager;
pub mod memory;
pub mod models;
pub mod pagination;
pub mod postgres;
pub mod query_builder;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use pagination::{MetaData, Page, PageQuery};
pub use postgres::PgStore;
pub use store::Store;
