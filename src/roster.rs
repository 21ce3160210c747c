//! The roster document listing every source to aggregate.
//!
//! Shape: `{"data": {"attributes": {"friends": [{"name", "url", "logo"}, ...]}}}`.
//! Any level of the path may be missing, which means an empty roster.

use serde::Deserialize;
use tracing::info;

use crate::error::AggregateError;
use crate::models::Source;
use crate::transport::Transport;

#[derive(Debug, Default, Deserialize)]
struct RosterDocument {
    #[serde(default)]
    data: RosterData,
}

#[derive(Debug, Default, Deserialize)]
struct RosterData {
    #[serde(default)]
    attributes: RosterAttributes,
}

#[derive(Debug, Default, Deserialize)]
struct RosterAttributes {
    #[serde(default)]
    friends: Vec<RosterEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct RosterEntry {
    name: Option<String>,
    url: Option<String>,
    logo: Option<String>,
}

impl From<RosterEntry> for Source {
    fn from(entry: RosterEntry) -> Self {
        Source {
            name: entry.name.unwrap_or_default(),
            url: entry.url.unwrap_or_default(),
            avatar: entry.logo.unwrap_or_default(),
        }
    }
}

/// Extract the sources from a roster document.
pub fn parse_roster(body: &[u8]) -> Result<Vec<Source>, serde_json::Error> {
    let document: RosterDocument = serde_json::from_slice(body)?;
    Ok(document
        .data
        .attributes
        .friends
        .into_iter()
        .map(Source::from)
        .collect())
}

/// Fetch and parse the roster. Every failure here is fatal for the run.
pub async fn fetch_roster<T: Transport>(transport: &T, url: &str) -> Result<Vec<Source>, AggregateError> {
    let fetched = transport
        .get(url)
        .await
        .map_err(|source| AggregateError::RosterFetch {
            url: url.to_string(),
            source,
        })?;

    if !(200..300).contains(&fetched.status) {
        return Err(AggregateError::RosterStatus {
            url: url.to_string(),
            status: fetched.status,
        });
    }

    let sources = parse_roster(&fetched.body).map_err(|source| AggregateError::RosterDecode {
        url: url.to_string(),
        source,
    })?;

    info!("Loaded {} sources from roster {}", sources.len(), url);
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpConfig;
    use crate::transport::HttpTransport;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    mod parse_roster_tests {
        use super::*;

        #[test]
        fn test_parse_full_roster() {
            let json = br#"{"data": {"attributes": {"friends": [
                {"name": "A", "url": "https://a.test", "logo": "https://a.test/a.png"},
                {"name": "B", "url": "https://b.test", "logo": "https://b.test/b.png"}
            ]}}}"#;

            let sources = parse_roster(json).unwrap();

            assert_eq!(
                sources,
                vec![
                    Source::new("A", "https://a.test", "https://a.test/a.png"),
                    Source::new("B", "https://b.test", "https://b.test/b.png"),
                ]
            );
        }

        #[test]
        fn test_missing_fields_default_to_empty() {
            let json = br#"{"data": {"attributes": {"friends": [
                {"name": "A"},
                {"url": "https://b.test", "logo": null, "extra": 1}
            ]}}}"#;

            let sources = parse_roster(json).unwrap();

            assert_eq!(sources[0], Source::new("A", "", ""));
            assert_eq!(sources[1], Source::new("", "https://b.test", ""));
        }

        #[test]
        fn test_missing_path_is_empty_roster() {
            assert!(parse_roster(b"{}").unwrap().is_empty());
            assert!(parse_roster(br#"{"data": {}}"#).unwrap().is_empty());
            assert!(parse_roster(br#"{"data": {"attributes": {}}}"#).unwrap().is_empty());
        }

        #[test]
        fn test_invalid_json() {
            assert!(parse_roster(b"<html>").is_err());
        }
    }

    mod fetch_roster_tests {
        use super::*;

        fn transport() -> HttpTransport {
            HttpTransport::new(&HttpConfig {
                connect_timeout: 1,
                read_timeout: 1,
                user_agent: "friend-circle-test".to_string(),
            })
            .unwrap()
        }

        #[tokio::test]
        async fn test_fetch_roster() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/friends.json"))
                .respond_with(ResponseTemplate::new(200).set_body_string(
                    r#"{"data": {"attributes": {"friends": [{"name": "A", "url": "https://a.test", "logo": ""}]}}}"#,
                ))
                .mount(&server)
                .await;

            let sources = fetch_roster(&transport(), &format!("{}/friends.json", server.uri()))
                .await
                .unwrap();

            assert_eq!(sources, vec![Source::new("A", "https://a.test", "")]);
        }

        #[tokio::test]
        async fn test_status_error() {
            let server = MockServer::start().await;

            let result = fetch_roster(&transport(), &format!("{}/friends.json", server.uri())).await;

            assert!(matches!(
                result,
                Err(AggregateError::RosterStatus { status: 404, .. })
            ));
        }

        #[tokio::test]
        async fn test_decode_error() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/friends.json"))
                .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
                .mount(&server)
                .await;

            let result = fetch_roster(&transport(), &format!("{}/friends.json", server.uri())).await;

            assert!(matches!(result, Err(AggregateError::RosterDecode { .. })));
        }

        #[tokio::test]
        async fn test_transport_error() {
            let result = fetch_roster(&transport(), "http://127.0.0.1:9/friends.json").await;
            assert!(matches!(result, Err(AggregateError::RosterFetch { .. })));
        }
    }
}
