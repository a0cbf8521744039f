//! PostgreSQL store through sqlx.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::{Pool, Postgres, Row};
use std::sync::Arc;

use crate::config::{DASHBOARD, DbSettings};
use crate::data::store::{SeriesStore, StoreConnector};
use crate::domain::Observation;
use crate::error::{DashboardError, DashboardResult};

/// Reads `DbSettings` from the environment and opens a small pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct PgConnector;

#[async_trait]
impl StoreConnector for PgConnector {
    async fn connect(&self) -> DashboardResult<Arc<dyn SeriesStore>> {
        let settings = DbSettings::from_env().inspect_err(|e| log::error!("⚠️  {}", e))?;
        let store = PgStore::connect(&settings).await?;
        Ok(Arc::new(store))
    }
}

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub async fn connect(settings: &DbSettings) -> DashboardResult<Self> {
        let options = PgConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .database(&settings.database)
            .username(&settings.user)
            .password(&settings.password);

        let pool: PgPool = PgPoolOptions::new()
            .max_connections(DASHBOARD.max_connections)
            .acquire_timeout(DASHBOARD.connect_timeout)
            .connect_with(options)
            .await
            .map_err(|e| {
                log::error!("Error connecting to the database: {}", e);
                DashboardError::connection(e.to_string())
            })?;

        log::info!(
            "🔌 Connected to {}:{}/{}",
            settings.host,
            settings.port,
            settings.database
        );
        Ok(Self { pool })
    }
}

#[async_trait]
impl SeriesStore for PgStore {
    async fn fetch_rows(&self, query: &str) -> DashboardResult<Vec<Observation>> {
        let rows = sqlx::query(query)
            .fetch_all(&self.pool)
            .await
            .map_err(classify_error)?;

        rows.iter()
            .map(|row| {
                let date: Option<NaiveDate> = row
                    .try_get(0)
                    .map_err(|e| DashboardError::query(format!("date column: {}", e)))?;
                let value: Option<f64> = row
                    .try_get(1)
                    .map_err(|e| DashboardError::query(format!("value column: {}", e)))?;
                Ok(Observation::raw(date, value))
            })
            .collect()
    }

    fn signature(&self) -> &'static str {
        "PostgreSQL (sqlx)"
    }
}

/// Split transport failures from failures of the query itself.
fn classify_error(error: sqlx::Error) -> DashboardError {
    match error {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => DashboardError::connection(error.to_string()),
        other => DashboardError::query(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(matches!(
            classify_error(sqlx::Error::PoolTimedOut),
            DashboardError::Connection { .. }
        ));
        assert!(matches!(
            classify_error(sqlx::Error::RowNotFound),
            DashboardError::Query { .. }
        ));
    }
}
