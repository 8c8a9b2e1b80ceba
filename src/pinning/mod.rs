//! Pinning boundary: store raw bytes on the content-addressed network.
//!
//! Uploads are single request/response operations; there is no chunking or
//! resumable upload.

mod pinata;
#[cfg(feature = "ipfs")]
mod kubo;

pub use pinata::PinataClient;
#[cfg(feature = "ipfs")]
pub use kubo::KuboPinner;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::core::{PinningConfig, PinningProvider, Result};

/// Result of a successful pin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinReceipt {
    /// Content identifier of the stored bytes
    pub content_id: String,
    /// Size reported by the service
    pub size: u64,
    /// Service-side timestamp, if reported
    pub timestamp: Option<String>,
}

/// A service that stores bytes and returns their content identifier
#[async_trait]
pub trait PinningService: Send + Sync {
    /// Human-readable name of this service
    fn name(&self) -> &str;

    /// Store `data` and return its content identifier
    async fn pin_bytes(&self, file_name: &str, data: Bytes) -> Result<PinReceipt>;
}

/// Build the configured pinning service
pub fn from_config(config: &PinningConfig) -> Result<Arc<dyn PinningService>> {
    match config.provider {
        PinningProvider::Pinata => Ok(Arc::new(PinataClient::new(config.clone())?)),
        #[cfg(feature = "ipfs")]
        PinningProvider::Kubo => Ok(Arc::new(KuboPinner::new(config.clone())?)),
        #[cfg(not(feature = "ipfs"))]
        PinningProvider::Kubo => Err(crate::core::DriveError::Pinning(
            "Local IPFS node support requires the 'ipfs' feature".to_string(),
        )),
    }
}
