use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::Observation;
use crate::error::DashboardResult;

/// A live handle to the series store. Read-only once constructed, so one handle
/// is shared by every fetch in the process.
#[async_trait]
pub trait SeriesStore: Send + Sync {
    /// Run a read query returning `(date, value)` rows, in store order.
    async fn fetch_rows(&self, query: &str) -> DashboardResult<Vec<Observation>>;

    /// A unique identifier for this implementation (for logs).
    fn signature(&self) -> &'static str;
}

/// Builds a `SeriesStore`. Reading credentials and opening the connection both
/// happen here, so configuration problems surface at first use rather than at
/// start-up.
#[async_trait]
pub trait StoreConnector: Send + Sync {
    async fn connect(&self) -> DashboardResult<Arc<dyn SeriesStore>>;
}
