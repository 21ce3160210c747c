use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use friend_circle::aggregator::Aggregator;
use friend_circle::cache::ResultCache;
use friend_circle::config::Config;
use friend_circle::refresh::{start_background_refresh, Refresher};
use friend_circle::routes::{self, AppState};
use friend_circle::transport::HttpTransport;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "friend_circle=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path =
        std::env::var("FRIEND_CIRCLE_CONFIG").unwrap_or_else(|_| "conf.toml".to_string());
    let config = Config::load(&config_path)?;
    info!("Loaded configuration from {}", config_path);

    let transport = HttpTransport::new(&config.http)?;
    let aggregator = Aggregator::new(transport, config.concurrency());
    let cache = Arc::new(ResultCache::new());
    let refresher = Arc::new(Refresher::new(
        aggregator,
        cache,
        config.roster_url.clone(),
        config.article_count,
    ));

    // Start background refresh task
    if config.enable {
        let bg_refresher = refresher.clone();
        let refresh_period = config.refresh_period();
        tokio::spawn(async move {
            start_background_refresh(bg_refresher, refresh_period).await;
        });
    } else {
        info!("Aggregation disabled in configuration");
    }

    let app = routes::router(Arc::new(AppState {
        refresher,
        enable: config.enable,
    }));

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.listen).await?;
    info!("Server starting on http://{}", config.listen);

    axum::serve(listener, app).await?;

    Ok(())
}
