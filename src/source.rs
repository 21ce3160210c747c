use tracing::{debug, warn};

use crate::feed::fetch_snapshot;
use crate::locator::locate;
use crate::models::{ArticleRecord, FeedKind, FeedSnapshot, Source, SourceOutcome, SourceStatus};
use crate::transport::Transport;

/// Discover, fetch and shape one source's articles.
///
/// Reachability decides the status: a source whose feed was found is active
/// even when the feed turns out empty or unparseable.
pub async fn process<T: Transport>(transport: &T, source: &Source, limit: usize) -> SourceOutcome {
    let reference = locate(transport, &source.url).await;
    if reference.kind == FeedKind::None {
        warn!("No reachable feed for '{}' ({})", source.name, source.url);
        return SourceOutcome::error(source.name.clone());
    }

    let snapshot = fetch_snapshot(transport, &reference.resolved_url, limit).await;
    let articles = articles_for(source, snapshot);

    for article in &articles {
        debug!("{} published '{}' at {}", source.name, article.title, article.created);
    }

    SourceOutcome {
        name: source.name.clone(),
        status: SourceStatus::Active,
        articles,
    }
}

/// Attribute every entry to the roster source rather than the feed's author.
pub fn articles_for(source: &Source, snapshot: FeedSnapshot) -> Vec<ArticleRecord> {
    snapshot
        .entries
        .into_iter()
        .map(|entry| ArticleRecord {
            title: entry.title,
            created: entry.published,
            link: entry.link,
            author: source.name.clone(),
            avatar: source.avatar.clone(),
        })
        .collect()
}
