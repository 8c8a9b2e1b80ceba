use std::io::Cursor;

use async_trait::async_trait;
use bytes::Bytes;
use ipfs_api_backend_hyper::{IpfsApi, IpfsClient as ApiClient, TryFromUri};

use crate::core::{DriveError, PinningConfig, Result};
use super::{PinReceipt, PinningService};

/// Pins content on a local IPFS (Kubo) node through its HTTP API
pub struct KuboPinner {
    /// The underlying IPFS API client
    api: ApiClient,

    config: PinningConfig,
}

impl KuboPinner {
    /// Create a client for the configured node; no request is made yet
    pub fn new(config: PinningConfig) -> Result<Self> {
        let api = ApiClient::from_str(&config.kubo_api_url)
            .map_err(|e| DriveError::Pinning(format!("Failed to create IPFS client: {}", e)))?;

        Ok(Self { api, config })
    }
}

#[async_trait]
impl PinningService for KuboPinner {
    fn name(&self) -> &str {
        "IPFS node"
    }

    async fn pin_bytes(&self, file_name: &str, data: Bytes) -> Result<PinReceipt> {
        let size = data.len() as u64;

        let response = self
            .api
            .add(Cursor::new(data.to_vec()))
            .await
            .map_err(|e| DriveError::Pinning(format!("Failed to add {} to IPFS: {}", file_name, e)))?;

        if self.config.pin {
            self.api
                .pin_add(&response.hash, true)
                .await
                .map_err(|e| DriveError::Pinning(format!("Failed to pin {}: {}", response.hash, e)))?;
        }

        log::info!("Added {} to IPFS node as {}", file_name, response.hash);
        Ok(PinReceipt {
            content_id: response.hash,
            size: response.size.parse().unwrap_or(size),
            timestamp: None,
        })
    }
}
