use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client as HttpClient;

use crate::core::{DriveError, GatewayConfig, Result};

/// Fetches the bytes behind a fully resolved gateway URL
#[async_trait]
pub trait GatewayFetcher: Send + Sync {
    /// Any error means "try the next gateway"
    async fn fetch(&self, url: &str) -> Result<Bytes>;
}

/// Plain HTTP GET against a gateway
pub struct HttpGatewayFetcher {
    http: HttpClient,
}

impl HttpGatewayFetcher {
    /// Create a fetcher with a per-attempt timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DriveError::Gateway(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http })
    }

    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        Self::new(Duration::from_secs(config.timeout_secs))
    }
}

#[async_trait]
impl GatewayFetcher for HttpGatewayFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| DriveError::Gateway(format!("GET {} failed: {}", url, e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DriveError::Gateway(format!("GET {} returned {}", url, status)));
        }

        resp.bytes()
            .await
            .map_err(|e| DriveError::Gateway(format!("Failed to read body from {}: {}", url, e)))
    }
}
