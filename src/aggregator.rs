//! Fan-out over the roster and merge into one result.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Local;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::error::AggregateError;
use crate::models::{AggregateResult, ArticleRecord, Source, SourceOutcome, SourceStatus, Statistics};
use crate::roster::fetch_roster;
use crate::source::process;
use crate::transport::Transport;

const LAST_UPDATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct Aggregator<T: Transport> {
    transport: Arc<T>,
    max_concurrency: usize,
}

impl<T: Transport> Aggregator<T> {
    pub fn new(transport: T, max_concurrency: usize) -> Self {
        Self {
            transport: Arc::new(transport),
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Fetch the roster at `roster_url` and aggregate it.
    ///
    /// Only a roster failure is an error; every per-source problem is folded
    /// into the returned result.
    pub async fn run_once(&self, roster_url: &str, limit: usize) -> Result<AggregateResult, AggregateError> {
        let roster = fetch_roster(self.transport.as_ref(), roster_url).await?;
        Ok(self.aggregate(roster, limit).await)
    }

    /// Process every source with at most `max_concurrency` in flight.
    ///
    /// Outcomes are tallied as they complete but merged in roster order, and
    /// the article list is sorted before returning.
    pub async fn aggregate(&self, roster: Vec<Source>, limit: usize) -> AggregateResult {
        let friends_total = roster.len();
        info!(
            "Aggregating {} sources (concurrency {}, limit {})",
            friends_total, self.max_concurrency, limit
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();
        let mut pending = HashMap::with_capacity(friends_total);

        for (index, source) in roster.into_iter().enumerate() {
            let transport = self.transport.clone();
            let semaphore = semaphore.clone();
            let task_source = source.clone();

            let handle = tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return SourceOutcome::error(task_source.name);
                };
                process(transport.as_ref(), &task_source, limit).await
            });
            pending.insert(handle.id(), (index, source));
        }

        // Slots indexed by roster position keep the merge independent of
        // completion order.
        let mut slots: Vec<Option<Vec<ArticleRecord>>> = vec![None; friends_total];
        let mut failed = Vec::new();
        let mut active_total = 0;

        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((id, outcome)) => {
                    let Some((index, source)) = pending.remove(&id) else {
                        continue;
                    };
                    match outcome.status {
                        SourceStatus::Active => {
                            active_total += 1;
                            info!(
                                "'{}' active with {} articles ({}/{})",
                                outcome.name,
                                outcome.articles.len(),
                                friends_total - pending.len(),
                                friends_total
                            );
                            slots[index] = Some(outcome.articles);
                        }
                        SourceStatus::Error => {
                            warn!("'{}' unreachable ({})", source.name, source.url);
                            failed.push((index, source));
                        }
                    }
                }
                Err(e) => {
                    let Some((index, source)) = pending.remove(&e.id()) else {
                        continue;
                    };
                    error!("Processing '{}' failed: {}", source.name, e);
                    failed.push((index, source));
                }
            }
        }

        failed.sort_by_key(|(index, _)| *index);
        let error_sources: Vec<Source> = failed.into_iter().map(|(_, source)| source).collect();
        let mut articles: Vec<ArticleRecord> = slots.into_iter().flatten().flatten().collect();
        sort_articles(&mut articles);

        let statistics = Statistics {
            friends_total,
            active_total,
            error_total: error_sources.len(),
            article_total: articles.len(),
            last_updated: Local::now().format(LAST_UPDATED_FORMAT).to_string(),
        };
        info!(
            "Aggregation complete: {} active, {} errors, {} articles",
            statistics.active_total, statistics.error_total, statistics.article_total
        );

        AggregateResult {
            statistics,
            articles,
            error_sources,
        }
    }
}

/// Newest first by normalized creation time.
///
/// Stable, so equal timestamps keep their relative order; empty timestamps
/// compare smallest and end up last.
pub fn sort_articles(articles: &mut [ArticleRecord]) {
    articles.sort_by(|a, b| b.created.cmp(&a.created));
}
