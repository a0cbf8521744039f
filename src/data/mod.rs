// Store access and caching
pub mod cache;
pub mod postgres;
pub mod store;

// Re-export commonly used types
pub use cache::SeriesCache;
pub use postgres::{PgConnector, PgStore};
pub use store::{SeriesStore, StoreConnector};
