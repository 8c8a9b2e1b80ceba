use std::sync::Arc;

use bytes::Bytes;
use parking_lot::RwLock;
use url::Url;

use crate::core::{ConfigError, DriveError, GatewayConfig, Result};
use super::fetcher::{GatewayFetcher, HttpGatewayFetcher};

/// A gateway base URL; content is addressed as `base_url + content_id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayEndpoint {
    base_url: String,
}

impl GatewayEndpoint {
    pub fn new(base_url: &str) -> Result<Self> {
        Url::parse(base_url)
            .map_err(|e| DriveError::InvalidArgument(format!("Invalid gateway URL '{}': {}", base_url, e)))?;

        Ok(Self {
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn resolve(&self, content_id: &str) -> String {
        format!("{}{}", self.base_url, content_id)
    }
}

/// Bytes retrieved through a gateway
#[derive(Debug, Clone)]
pub struct Retrieved {
    /// URL that served the content
    pub url: String,
    /// Index of the gateway that served it
    pub endpoint_index: usize,
    /// Number of gateways tried, including the successful one
    pub attempts: usize,
    pub bytes: Bytes,
}

/// Ordered gateway list with a sticky preference for the last one that worked
pub struct GatewayResolver {
    endpoints: Vec<GatewayEndpoint>,
    current: RwLock<usize>,
    fetcher: Arc<dyn GatewayFetcher>,
}

impl GatewayResolver {
    /// Create a resolver; the endpoint list must not be empty
    pub fn new(endpoints: Vec<GatewayEndpoint>, fetcher: Arc<dyn GatewayFetcher>) -> Result<Self> {
        if endpoints.is_empty() {
            return Err(ConfigError::Invalid(
                "At least one gateway endpoint is required".to_string(),
            )
            .into());
        }

        Ok(Self {
            endpoints,
            current: RwLock::new(0),
            fetcher,
        })
    }

    /// Build a resolver over HTTP from the gateway configuration
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        let endpoints = config
            .endpoints
            .iter()
            .map(|url| GatewayEndpoint::new(url))
            .collect::<Result<Vec<_>>>()?;
        let fetcher = HttpGatewayFetcher::from_config(config)?;

        Self::new(endpoints, Arc::new(fetcher))
    }

    /// URL for `content_id` at the currently preferred gateway
    pub fn resolve_url(&self, content_id: &str) -> String {
        self.endpoints[self.current_index()].resolve(content_id)
    }

    /// Retrieve `content_id`, trying each gateway at most once.
    ///
    /// Starts at the preferred gateway and walks the list in order, wrapping
    /// around. The first gateway to succeed becomes the preferred one.
    pub async fn fetch_with_fallback(&self, content_id: &str) -> Result<Retrieved> {
        let start = self.current_index();
        let total = self.endpoints.len();

        for attempt in 0..total {
            let idx = (start + attempt) % total;
            let url = self.endpoints[idx].resolve(content_id);

            match self.fetcher.fetch(&url).await {
                Ok(bytes) => {
                    if idx != start {
                        log::info!(
                            "Gateway {} served {} after {} failure(s), preferring it from now on",
                            self.endpoints[idx].base_url(),
                            content_id,
                            attempt
                        );
                    }
                    *self.current.write() = idx;

                    return Ok(Retrieved {
                        url,
                        endpoint_index: idx,
                        attempts: attempt + 1,
                        bytes,
                    });
                }
                Err(e) => {
                    log::warn!("Gateway attempt {}/{} failed: {}", attempt + 1, total, e);
                }
            }
        }

        log::error!("All {} gateway(s) failed for {}", total, content_id);
        Err(DriveError::GatewayUnavailable {
            content_id: content_id.to_string(),
            attempts: total,
        })
    }

    /// Go back to the first gateway, e.g. when a preview is reopened
    pub fn reset(&self) {
        *self.current.write() = 0;
    }

    pub fn current_index(&self) -> usize {
        *self.current.read()
    }

    pub fn endpoints(&self) -> &[GatewayEndpoint] {
        &self.endpoints
    }
}
