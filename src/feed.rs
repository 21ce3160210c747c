//! Feed retrieval and parsing.

use feed_rs::model::{Entry, Feed, Link};
use feed_rs::parser;
use tracing::warn;

use crate::models::{FeedEntry, FeedSnapshot};
use crate::time::{display, parse_wall_clock};
use crate::transport::Transport;

/// Fetch `feed_url` and parse at most `limit` entries from it.
///
/// Any transport, decode or parse failure yields an empty snapshot; the
/// caller decides reachability on its own.
pub async fn fetch_snapshot<T: Transport>(transport: &T, feed_url: &str, limit: usize) -> FeedSnapshot {
    let fetched = match transport.get(feed_url).await {
        Ok(fetched) => fetched,
        Err(e) => {
            warn!("Unreachable feed {}: {}", feed_url, e);
            return FeedSnapshot::default();
        }
    };

    match parse_snapshot(&fetched.body, limit) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!("Failed to parse feed {}: {}", feed_url, e);
            FeedSnapshot::default()
        }
    }
}

/// Layout of `published_raw`: the wall-clock time the feed wrote.
const RAW_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a feed document, decoding the body as UTF-8 first.
///
/// Every date field goes through the normalizer's own strategies instead of
/// feed-rs's default timestamp parser.
pub fn parse_snapshot(body: &[u8], limit: usize) -> Result<FeedSnapshot, parser::ParseFeedError> {
    let text = force_utf8(body);
    let feed = parser::Builder::new()
        .timestamp_parser(|raw| parse_wall_clock(raw).map(|wall_clock| wall_clock.and_utc()))
        .build()
        .parse(text.as_bytes())?;
    Ok(snapshot_from_feed(feed, limit))
}

/// Decode `body` as UTF-8 and rewrite any XML declaration to say so, since
/// feed-rs otherwise re-decodes the text with the declared encoding.
fn force_utf8(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim_start_matches('\u{feff}');
    let trimmed = text.trim_start();

    if trimmed.starts_with("<?xml") {
        if let Some(end) = trimmed.find("?>") {
            return format!(r#"<?xml version="1.0" encoding="UTF-8"?>{}"#, &trimmed[end + 2..]);
        }
    }
    text.to_string()
}

fn snapshot_from_feed(feed: Feed, limit: usize) -> FeedSnapshot {
    FeedSnapshot {
        site_title: feed.title.map(|t| t.content).unwrap_or_default(),
        site_author: feed
            .authors
            .into_iter()
            .next()
            .map(|a| a.name)
            .unwrap_or_default(),
        site_link: primary_link(&feed.links),
        entries: feed.entries.into_iter().take(limit).map(entry_from_feed).collect(),
    }
}

fn entry_from_feed(entry: Entry) -> FeedEntry {
    let wall_clock = entry.published.or(entry.updated).map(|dt| dt.naive_utc());
    let published_raw = wall_clock
        .map(|dt| dt.format(RAW_TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default();
    let published = wall_clock.map(display).unwrap_or_default();

    let summary = entry.summary.map(|s| s.content).unwrap_or_default();
    let content = entry
        .content
        .and_then(|c| c.body)
        .unwrap_or_else(|| summary.clone());

    FeedEntry {
        title: entry.title.map(|t| t.content).unwrap_or_default(),
        author: entry
            .authors
            .into_iter()
            .next()
            .map(|a| a.name)
            .unwrap_or_default(),
        link: primary_link(&entry.links),
        published_raw,
        published,
        summary,
        content,
    }
}

/// The first `alternate` (or rel-less) link, else the first link at all.
fn primary_link(links: &[Link]) -> String {
    links
        .iter()
        .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .or_else(|| links.first())
        .map(|l| l.href.clone())
        .unwrap_or_default()
}
