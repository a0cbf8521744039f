// Materialized data models
pub mod series;

// Re-export commonly used types
pub use series::{Series, filter_by_years};
