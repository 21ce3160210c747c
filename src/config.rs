use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// URL of the JSON document listing the sources to aggregate
    pub roster_url: String,
    /// Run the aggregation loop at all
    #[serde(default = "default_enable")]
    pub enable: bool,
    /// Refresh interval in minutes
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,
    /// Maximum number of entries taken from each source's feed
    #[serde(default = "default_article_count")]
    pub article_count: usize,
    /// Number of sources processed at the same time
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_enable() -> bool {
    true
}

fn default_refresh_interval() -> u64 {
    240
}

fn default_article_count() -> usize {
    5
}

fn default_max_concurrency() -> usize {
    10
}

fn default_listen() -> String {
    "0.0.0.0:1223".to_string()
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    /// Connect timeout in seconds
    pub connect_timeout: u64,
    /// Read timeout in seconds
    pub read_timeout: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: 5,
            read_timeout: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout)
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Pause between scheduled runs; at least one minute, saturating on
    /// absurdly large values.
    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(self.refresh_interval.max(1).saturating_mul(60))
    }

    /// Worker-pool ceiling, never zero.
    pub fn concurrency(&self) -> usize {
        self.max_concurrency.max(1)
    }
}
