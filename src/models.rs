//! Records flowing through one aggregation run.

use serde::{Deserialize, Serialize};

/// One roster entry: a blog to monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub url: String,
    #[serde(rename = "logo")]
    pub avatar: String,
}

impl Source {
    pub fn new(name: impl Into<String>, url: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            avatar: avatar.into(),
        }
    }
}

/// Which candidate path answered during feed discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    Index,
    Atom,
    Rss2,
    Feed,
    None,
}

impl FeedKind {
    /// Classify a candidate URL by the first probe keyword it contains.
    ///
    /// Matches on the whole URL, so a base address that itself contains a
    /// keyword (`https://atom.example`) is classified by that keyword.
    pub fn classify(url: &str) -> Self {
        if url.contains("index") {
            FeedKind::Index
        } else if url.contains("atom") {
            FeedKind::Atom
        } else if url.contains("rss2") {
            FeedKind::Rss2
        } else if url.contains("feed") {
            FeedKind::Feed
        } else {
            FeedKind::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedKind::Index => "index",
            FeedKind::Atom => "atom",
            FeedKind::Rss2 => "rss2",
            FeedKind::Feed => "feed",
            FeedKind::None => "none",
        }
    }
}

/// Outcome of feed discovery for one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedReference {
    pub kind: FeedKind,
    pub resolved_url: String,
}

/// Parsed contents of one feed, with every field resolved to a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedSnapshot {
    pub site_title: String,
    pub site_author: String,
    pub site_link: String,
    pub entries: Vec<FeedEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub author: String,
    pub link: String,
    pub published_raw: String,
    pub published: String,
    pub summary: String,
    pub content: String,
}

/// An article as published to consumers.
///
/// `author` is always the roster name of the source, never the feed's own
/// author field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub created: String,
    pub link: String,
    pub author: String,
    pub avatar: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStatus {
    Active,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOutcome {
    pub name: String,
    pub status: SourceStatus,
    pub articles: Vec<ArticleRecord>,
}

impl SourceOutcome {
    pub fn error(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: SourceStatus::Error,
            articles: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(rename = "friends_num")]
    pub friends_total: usize,
    #[serde(rename = "active_num")]
    pub active_total: usize,
    #[serde(rename = "error_num")]
    pub error_total: usize,
    #[serde(rename = "article_num")]
    pub article_total: usize,
    #[serde(rename = "last_updated_time")]
    pub last_updated: String,
}

/// Final payload of one run, published whole into the result cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResult {
    #[serde(rename = "statistical_data")]
    pub statistics: Statistics,
    #[serde(rename = "article_data")]
    pub articles: Vec<ArticleRecord>,
    #[serde(rename = "error_friends")]
    pub error_sources: Vec<Source>,
}

#[cfg(test)]
mod tests {
    use super::*;

    mod classify_tests {
        use super::*;

        #[test]
        fn test_classify_each_candidate() {
            assert_eq!(FeedKind::classify("https://blog.test/index.xml"), FeedKind::Index);
            assert_eq!(FeedKind::classify("https://blog.test/atom.xml"), FeedKind::Atom);
            assert_eq!(FeedKind::classify("https://blog.test/rss2.xml"), FeedKind::Rss2);
            assert_eq!(FeedKind::classify("https://blog.test/feed"), FeedKind::Feed);
            assert_eq!(FeedKind::classify("https://blog.test/"), FeedKind::None);
        }

        #[test]
        fn test_keyword_in_base_url_wins() {
            // Substring match over the whole URL, checked in probe order
            assert_eq!(FeedKind::classify("https://atom.test/feed"), FeedKind::Atom);
            assert_eq!(FeedKind::classify("https://index.test/rss2.xml"), FeedKind::Index);
        }

        #[test]
        fn test_as_str() {
            assert_eq!(FeedKind::Rss2.as_str(), "rss2");
            assert_eq!(FeedKind::None.as_str(), "none");
        }
    }

    mod serialization_tests {
        use super::*;

        #[test]
        fn test_aggregate_result_wire_names() {
            let result = AggregateResult {
                statistics: Statistics {
                    friends_total: 2,
                    active_total: 1,
                    error_total: 1,
                    article_total: 1,
                    last_updated: "2024-03-11 22:10:00".to_string(),
                },
                articles: vec![ArticleRecord {
                    title: "Hello".to_string(),
                    created: "2024-03-11 22:08".to_string(),
                    link: "http://a.test/hello".to_string(),
                    author: "A".to_string(),
                    avatar: "http://a.test/logo.png".to_string(),
                }],
                error_sources: vec![Source::new("B", "http://b.test", "")],
            };

            let json = serde_json::to_value(&result).unwrap();

            assert_eq!(json["statistical_data"]["friends_num"], 2);
            assert_eq!(json["statistical_data"]["active_num"], 1);
            assert_eq!(json["statistical_data"]["error_num"], 1);
            assert_eq!(json["statistical_data"]["article_num"], 1);
            assert_eq!(json["statistical_data"]["last_updated_time"], "2024-03-11 22:10:00");
            assert_eq!(json["article_data"][0]["created"], "2024-03-11 22:08");
            assert_eq!(json["article_data"][0]["author"], "A");
            assert_eq!(json["error_friends"][0]["name"], "B");
            assert_eq!(json["error_friends"][0]["logo"], "");
        }

        #[test]
        fn test_error_outcome_is_empty() {
            let outcome = SourceOutcome::error("B");
            assert_eq!(outcome.status, SourceStatus::Error);
            assert!(outcome.articles.is_empty());
        }
    }
}
