use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart;
use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::core::{ConfigError, DriveError, PinningConfig, Result};
use super::{PinReceipt, PinningService};

/// Pinata `pinFileToIPFS` response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PinFileResponse {
    ipfs_hash: String,
    #[serde(default)]
    pin_size: u64,
    #[serde(default)]
    timestamp: Option<String>,
}

/// Client for the Pinata pinning API
pub struct PinataClient {
    http: HttpClient,
    config: PinningConfig,
}

impl PinataClient {
    pub fn new(config: PinningConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DriveError::Pinning(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    fn credentials(&self) -> Result<(&str, &str)> {
        match (self.config.api_key.as_deref(), self.config.secret_key.as_deref()) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => Ok((key, secret)),
            _ => Err(ConfigError::Invalid(
                "pinning.api_key and pinning.secret_key are required for Pinata".to_string(),
            )
            .into()),
        }
    }
}

#[async_trait]
impl PinningService for PinataClient {
    fn name(&self) -> &str {
        "Pinata"
    }

    async fn pin_bytes(&self, file_name: &str, data: Bytes) -> Result<PinReceipt> {
        let (api_key, secret_key) = self.credentials()?;
        let size = data.len() as u64;

        let metadata = serde_json::json!({ "name": file_name }).to_string();
        let options = serde_json::json!({ "cidVersion": self.config.cid_version }).to_string();

        let part = multipart::Part::stream(data).file_name(file_name.to_string());
        let form = multipart::Form::new()
            .part("file", part)
            .text("pinataMetadata", metadata)
            .text("pinataOptions", options);

        let url = format!("{}/pinning/pinFileToIPFS", self.config.api_url.trim_end_matches('/'));
        log::debug!("Pinning {} ({} bytes) via {}", file_name, size, url);

        let resp = self
            .http
            .post(&url)
            .header("pinata_api_key", api_key)
            .header("pinata_secret_api_key", secret_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| DriveError::Pinning(format!("Request to {} failed: {}", url, e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DriveError::Pinning(format!("Pinata returned {}: {}", status, body)));
        }

        let pinned: PinFileResponse = resp
            .json()
            .await
            .map_err(|e| DriveError::Serialization(format!("Pinata response parse error: {}", e)))?;

        log::info!("Pinned {} as {}", file_name, pinned.ipfs_hash);
        Ok(PinReceipt {
            content_id: pinned.ipfs_hash,
            size: if pinned.pin_size > 0 { pinned.pin_size } else { size },
            timestamp: pinned.timestamp,
        })
    }
}
