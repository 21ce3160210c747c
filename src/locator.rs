use tracing::debug;

use crate::models::{FeedKind, FeedReference};
use crate::transport::Transport;

/// Paths probed under a blog's base URL, in probe order.
pub const CANDIDATE_PATHS: [&str; 4] = ["index.xml", "atom.xml", "rss2.xml", "feed"];

pub fn candidate_urls(base_url: &str) -> Vec<String> {
    let base = base_url.trim_end_matches('/');
    CANDIDATE_PATHS
        .iter()
        .map(|path| format!("{}/{}", base, path))
        .collect()
}

/// Find the first candidate feed URL that answers with HTTP 200.
///
/// Transport errors, timeouts and other statuses all just move on to the next
/// candidate. When nothing answers the reference has kind `None` and points
/// back at the base URL.
pub async fn locate<T: Transport>(transport: &T, base_url: &str) -> FeedReference {
    for url in candidate_urls(base_url) {
        match transport.get(&url).await {
            Ok(fetched) if fetched.is_ok() => {
                let kind = FeedKind::classify(&url);
                debug!("Found {} feed at {}", kind.as_str(), url);
                return FeedReference {
                    kind,
                    resolved_url: url,
                };
            }
            Ok(fetched) => debug!("Probe {} returned HTTP {}", url, fetched.status),
            Err(e) => debug!("Probe {} failed: {}", url, e),
        }
    }

    FeedReference {
        kind: FeedKind::None,
        resolved_url: base_url.to_string(),
    }
}
