use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{error, info};

use crate::aggregator::Aggregator;
use crate::cache::ResultCache;
use crate::error::AggregateError;
use crate::transport::Transport;

/// Runs the pipeline and publishes its result into the cache.
pub struct Refresher<T: Transport> {
    aggregator: Aggregator<T>,
    cache: Arc<ResultCache>,
    roster_url: String,
    article_count: usize,
    refreshing: Arc<RwLock<bool>>,
    last_error: RwLock<Option<String>>,
}

impl<T: Transport> Refresher<T> {
    pub fn new(
        aggregator: Aggregator<T>,
        cache: Arc<ResultCache>,
        roster_url: impl Into<String>,
        article_count: usize,
    ) -> Self {
        Self {
            aggregator,
            cache,
            roster_url: roster_url.into(),
            article_count,
            refreshing: Arc::new(RwLock::new(false)),
            last_error: RwLock::new(None),
        }
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    pub async fn is_refreshing(&self) -> bool {
        *self.refreshing.read().await
    }

    /// Message of the most recent failed run, cleared by the next success.
    pub async fn last_error(&self) -> Option<String> {
        self.last_error.read().await.clone()
    }

    /// Run once and publish. A failed run leaves the cached result untouched.
    pub async fn refresh(&self) -> Result<(), AggregateError> {
        // Check if already refreshing
        {
            let mut refreshing = self.refreshing.write().await;
            if *refreshing {
                info!("Refresh already in progress, skipping");
                return Ok(());
            }
            *refreshing = true;
        }

        let result = self.do_refresh().await;
        *self.last_error.write().await = result.as_ref().err().map(|e| e.to_string());

        // Clear refreshing flag
        {
            let mut refreshing = self.refreshing.write().await;
            *refreshing = false;
        }

        result
    }

    async fn do_refresh(&self) -> Result<(), AggregateError> {
        info!(
            "Fetching roster from {}, {} articles per source",
            self.roster_url, self.article_count
        );
        let result = self
            .aggregator
            .run_once(&self.roster_url, self.article_count)
            .await?;
        self.cache.publish(result).await;
        info!("Published new aggregation result");
        Ok(())
    }
}

pub async fn start_background_refresh<T: Transport>(refresher: Arc<Refresher<T>>, interval: Duration) {
    // Do initial fetch
    info!("Starting initial aggregation");
    if let Err(e) = refresher.refresh().await {
        error!("Initial aggregation failed: {}", e);
    }

    // Then schedule periodic refreshes
    loop {
        tokio::time::sleep(interval).await;
        info!("Starting scheduled aggregation");
        if let Err(e) = refresher.refresh().await {
            error!("Scheduled aggregation failed: {}", e);
        }
    }
}
