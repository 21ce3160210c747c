use std::sync::Arc;

use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use rand::seq::IndexedRandom;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::models::{ArticleRecord, Statistics};
use crate::refresh::Refresher;
use crate::transport::HttpTransport;

/// Articles listed on the landing page.
const INDEX_ARTICLES: usize = 20;

pub struct AppState {
    pub refresher: Arc<Refresher<HttpTransport>>,
    /// Aggregation switch from the config; manual refreshes obey it too
    pub enable: bool,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub statistics: Option<Statistics>,
    pub articles: Vec<ArticleRecord>,
}

// Wrapper for HTML responses
struct HtmlTemplate<T>(T);

impl<T: Template> IntoResponse for HtmlTemplate<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {}", err),
            )
                .into_response(),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/all", get(all_articles))
        .route("/errors", get(error_sources))
        .route("/random", get(random_article))
        .route("/refresh", post(refresh))
        .route("/refresh/status", get(refresh_status))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Route handlers
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let latest = state.refresher.cache().latest().await;

    let template = match latest {
        Some(result) => IndexTemplate {
            statistics: Some(result.statistics.clone()),
            articles: result.articles.iter().take(INDEX_ARTICLES).cloned().collect(),
        },
        None => IndexTemplate {
            statistics: None,
            articles: Vec::new(),
        },
    };

    HtmlTemplate(template)
}

pub async fn all_articles(State(state): State<Arc<AppState>>) -> Response {
    match state.refresher.cache().latest().await {
        Some(result) => Json(result.as_ref()).into_response(),
        None => Json(json!({"statistical_data": {}, "article_data": []})).into_response(),
    }
}

pub async fn error_sources(State(state): State<Arc<AppState>>) -> Response {
    match state.refresher.cache().latest().await {
        Some(result) => Json(&result.error_sources).into_response(),
        None => Json(json!([])).into_response(),
    }
}

pub async fn random_article(State(state): State<Arc<AppState>>) -> Response {
    let latest = state.refresher.cache().latest().await;
    let article = latest
        .as_ref()
        .and_then(|result| result.articles.choose(&mut rand::rng()).cloned());

    match article {
        Some(article) => Json(article).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "No articles available"})),
        )
            .into_response(),
    }
}

pub async fn refresh(State(state): State<Arc<AppState>>) -> Response {
    if !state.enable {
        info!("Manual refresh rejected, aggregation is disabled");
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"refreshing": false, "error": "Aggregation is disabled"})),
        )
            .into_response();
    }

    // Spawn the refresh task
    let refresher = state.refresher.clone();
    tokio::spawn(async move {
        if let Err(e) = refresher.refresh().await {
            error!("Manual aggregation failed: {}", e);
        }
    });

    Json(json!({"refreshing": true})).into_response()
}

pub async fn refresh_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let refreshing = state.refresher.is_refreshing().await;
    let last_error = state.refresher.last_error().await;
    Json(json!({ "refreshing": refreshing, "last_error": last_error }))
}

pub async fn health() -> impl IntoResponse {
    Html("OK")
}
