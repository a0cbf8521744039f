// Domain types and value objects
pub mod indicator;
pub mod observation;
pub mod period;

// Re-export commonly used types
pub use indicator::Indicator;
pub use observation::Observation;
pub use period::{PeriodGroup, group_periods};
