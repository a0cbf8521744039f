use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::config::DASHBOARD;
use crate::data::store::{SeriesStore, StoreConnector};
use crate::domain::Indicator;
use crate::error::DashboardResult;
use crate::models::Series;
use crate::utils::app_time::{AppInstant, Clock, SystemClock};

struct CacheEntry {
    fetched_at: AppInstant,
    outcome: DashboardResult<Arc<Series>>,
}

/// Read-through cache in front of the store.
///
/// Holds (a) the store connection for the life of the process and (b) fetch
/// outcomes keyed by exact query text for `ttl`. Failures are cached like
/// successes: nothing is retried until the entry expires or `invalidate` is
/// called.
pub struct SeriesCache {
    connector: Box<dyn StoreConnector>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    connection: Option<DashboardResult<Arc<dyn SeriesStore>>>,
    entries: HashMap<String, CacheEntry>,
    round_trips: usize,
}

impl SeriesCache {
    pub fn new(connector: impl StoreConnector + 'static) -> Self {
        Self::with_clock(connector, Arc::new(SystemClock), DASHBOARD.cache_ttl)
    }

    pub fn with_clock(
        connector: impl StoreConnector + 'static,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            connector: Box::new(connector),
            clock,
            ttl,
            connection: None,
            entries: HashMap::new(),
            round_trips: 0,
        }
    }

    /// The shared store handle, connecting on first use.
    pub async fn connection(&mut self) -> DashboardResult<Arc<dyn SeriesStore>> {
        if let Some(outcome) = &self.connection {
            return outcome.clone();
        }

        let outcome = self.connector.connect().await;
        match &outcome {
            Ok(store) => log::info!("Store connection ready ({})", store.signature()),
            Err(e) => log::error!("⚠️  Store connection failed: {}", e),
        }
        self.connection = Some(outcome.clone());
        outcome
    }

    pub async fn fetch(&mut self, indicator: Indicator) -> DashboardResult<Arc<Series>> {
        let query = indicator.query();
        self.fetch_query(indicator, &query).await
    }

    /// Fetch `query` and materialize it as `indicator`'s series, serving from the
    /// cache while the entry is younger than the TTL.
    pub async fn fetch_query(
        &mut self,
        indicator: Indicator,
        query: &str,
    ) -> DashboardResult<Arc<Series>> {
        let now = self.clock.now();

        if let Some(entry) = self.entries.get(query) {
            if now.saturating_duration_since(entry.fetched_at) < self.ttl {
                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_cache_events {
                    log::info!("[cache] hit for {:?}", indicator);
                }
                return entry.outcome.clone();
            }
            #[cfg(debug_assertions)]
            if DEBUG_FLAGS.print_cache_events {
                log::info!("[cache] expired entry for {:?}", indicator);
            }
        }

        let outcome = match self.connection().await {
            Ok(store) => {
                self.round_trips += 1;
                store
                    .fetch_rows(query)
                    .await
                    .map(|rows| Arc::new(Series::from_rows(indicator, rows)))
            }
            Err(e) => Err(e),
        };

        if let Err(e) = &outcome {
            log::error!("Error fetching {}: {}", indicator, e);
        }

        self.entries.insert(
            query.to_string(),
            CacheEntry {
                fetched_at: now,
                outcome: outcome.clone(),
            },
        );
        outcome
    }

    /// Drop the connection and every cached result.
    pub fn invalidate(&mut self) {
        self.connection = None;
        self.entries.clear();
        log::info!("🔄 Cache cleared; next fetch goes to the store");
    }

    /// Store round trips issued so far.
    pub fn round_trips(&self) -> usize {
        self.round_trips
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::store::testing::{MemoryConnector, MemoryStore};
    use crate::domain::Observation;
    use crate::error::DashboardError;
    use crate::utils::ManualClock;
    use chrono::NaiveDate;

    fn rows() -> Vec<Observation> {
        vec![
            Observation::raw(NaiveDate::from_ymd_opt(2023, 1, 2), Some(13.75)),
            Observation::raw(NaiveDate::from_ymd_opt(2024, 1, 2), Some(11.75)),
        ]
    }

    fn setup() -> (SeriesCache, Arc<MemoryStore>, Arc<MemoryConnector>, Arc<ManualClock>) {
        let store = MemoryStore::new();
        store.insert(Indicator::PolicyRate.query(), rows());
        let connector = Arc::new(MemoryConnector::new(store.clone()));
        let clock = Arc::new(ManualClock::new());
        let cache = SeriesCache::with_clock(
            connector.clone(),
            clock.clone(),
            Duration::from_secs(3600),
        );
        (cache, store, connector, clock)
    }

    #[tokio::test]
    async fn test_second_fetch_is_served_from_cache() {
        let (mut cache, store, connector, _clock) = setup();

        let first = cache.fetch(Indicator::PolicyRate).await.unwrap();
        let second = cache.fetch(Indicator::PolicyRate).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(store.round_trips(), 1);
        assert_eq!(cache.round_trips(), 1);
        assert_eq!(connector.connects(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_new_round_trip_and_connection() {
        let (mut cache, store, connector, _clock) = setup();

        cache.fetch(Indicator::PolicyRate).await.unwrap();
        cache.invalidate();
        cache.fetch(Indicator::PolicyRate).await.unwrap();

        assert_eq!(store.round_trips(), 2);
        assert_eq!(connector.connects(), 2);
    }

    #[tokio::test]
    async fn test_entries_expire_after_ttl() {
        let (mut cache, store, connector, clock) = setup();

        cache.fetch(Indicator::PolicyRate).await.unwrap();
        clock.advance(Duration::from_secs(3599));
        cache.fetch(Indicator::PolicyRate).await.unwrap();
        assert_eq!(store.round_trips(), 1);

        clock.advance(Duration::from_secs(1));
        cache.fetch(Indicator::PolicyRate).await.unwrap();
        assert_eq!(store.round_trips(), 2);
        // The connection outlives data entries
        assert_eq!(connector.connects(), 1);
    }

    #[tokio::test]
    async fn test_cache_key_is_exact_query_text() {
        let (mut cache, store, _connector, _clock) = setup();
        let query = Indicator::PolicyRate.query();
        store.insert(format!("{} ", query), rows());

        cache.fetch_query(Indicator::PolicyRate, &query).await.unwrap();
        cache
            .fetch_query(Indicator::PolicyRate, &format!("{} ", query))
            .await
            .unwrap();

        assert_eq!(store.round_trips(), 2);
    }

    #[tokio::test]
    async fn test_failures_are_cached_until_refresh() {
        let (mut cache, store, _connector, _clock) = setup();

        let err = cache.fetch(Indicator::Gdp).await.unwrap_err();
        assert!(matches!(err, DashboardError::Query { .. }));
        let again = cache.fetch(Indicator::Gdp).await.unwrap_err();
        assert_eq!(err, again);
        assert_eq!(store.round_trips(), 1);

        store.insert(Indicator::Gdp.query(), rows());
        cache.invalidate();
        assert!(cache.fetch(Indicator::Gdp).await.is_ok());
    }

    #[tokio::test]
    async fn test_connection_failure_is_not_retried() {
        let connector = Arc::new(MemoryConnector::failing(DashboardError::configuration(
            "DB_HOST",
        )));
        let mut cache = SeriesCache::with_clock(
            connector.clone(),
            Arc::new(ManualClock::new()),
            Duration::from_secs(3600),
        );

        for indicator in [Indicator::PolicyRate, Indicator::PriceIndex] {
            let err = cache.fetch(indicator).await.unwrap_err();
            assert!(matches!(err, DashboardError::Configuration { .. }));
        }
        assert_eq!(connector.connects(), 1);
        assert_eq!(cache.round_trips(), 0);
    }
}
