use thiserror::Error;

/// Error taxonomy for every dashboard operation.
///
/// Each variant is caught at the boundary of the operation that produced it and
/// turned into an inline message; none of them ends the render. Errors are
/// `Clone` because the cache keeps failed outcomes until a manual refresh.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    /// Required database settings are absent or malformed.
    #[error("Database credentials are not configured (missing: {missing})")]
    Configuration { missing: String },

    /// The store could not be reached.
    #[error("Could not connect to the database: {message}")]
    Connection { message: String },

    /// Malformed query or schema mismatch.
    #[error("Query failed: {message}")]
    Query { message: String },

    /// Fewer points than the operation needs.
    #[error("Not enough data: {message}")]
    InsufficientData { message: String },

    /// The forecasting collaborator failed.
    #[error("Forecast failed: {message}")]
    ExternalLibrary { message: String },
}

impl DashboardError {
    pub fn configuration(missing: impl Into<String>) -> Self {
        Self::Configuration {
            missing: missing.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::InsufficientData {
            message: message.into(),
        }
    }

    pub fn external(message: impl Into<String>) -> Self {
        Self::ExternalLibrary {
            message: message.into(),
        }
    }

    /// True for the "not enough points" outcome, which the UI shows as a warning
    /// rather than an error.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;
