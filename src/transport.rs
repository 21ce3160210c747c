use std::future::Future;

use reqwest::Client;

use crate::config::HttpConfig;
use crate::error::{AggregateError, TransportError};

/// Status and raw body of one GET request.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Fetched {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// The network seam of the pipeline.
///
/// One instance is shared by every worker task, so implementations must be
/// safe for concurrent use. Each call is expected to bound its own time.
pub trait Transport: Send + Sync + 'static {
    fn get(&self, url: &str) -> impl Future<Output = Result<Fetched, TransportError>> + Send;
}

/// reqwest-backed transport with bounded connect and read times.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &HttpConfig) -> Result<Self, AggregateError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .timeout(config.connect_timeout() + config.read_timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(AggregateError::Client)?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Fetched, TransportError> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(Fetched { status, body })
    }
}
