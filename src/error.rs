use thiserror::Error;

/// A single request against a source failed.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unreachable: {0}")]
    Unreachable(String),
}

/// Failures that abort a whole aggregation run.
///
/// Per-source problems never show up here; they are reported as
/// `SourceStatus::Error` inside the result instead.
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("failed to fetch roster from {url}: {source}")]
    RosterFetch {
        url: String,
        #[source]
        source: TransportError,
    },

    #[error("roster request to {url} returned HTTP {status}")]
    RosterStatus { url: String, status: u16 },

    #[error("failed to decode roster from {url}: {source}")]
    RosterDecode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
