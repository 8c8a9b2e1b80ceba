use thiserror::Error;

use crate::core::config::ConfigError;

/// Result type used throughout the application
pub type Result<T> = std::result::Result<T, DriveError>;

/// Errors raised by the drive client and its boundaries
#[derive(Error, Debug)]
pub enum DriveError {
    /// The wallet node could not be reached
    #[error("Wallet unavailable: {0}")]
    WalletUnavailable(String),

    /// The wallet exposed no account to connect
    #[error("Wallet connection rejected: {0}")]
    ConnectionRejected(String),

    /// JSON-RPC level failure
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Contract call failed before producing a receipt
    #[error("Contract call failed: {0}")]
    Contract(String),

    /// Transaction mined with a failure status
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// Malformed contract input or return data
    #[error("ABI error: {0}")]
    Abi(String),

    /// A file listing could not be loaded
    #[error("Listing failed: {0}")]
    ListingFailed(String),

    /// Pinning service failure
    #[error("Pinning failed: {0}")]
    Pinning(String),

    /// A single gateway attempt failed
    #[error("Gateway request failed: {0}")]
    Gateway(String),

    /// Every configured gateway failed for this content
    #[error("Content {content_id} unavailable after trying {attempts} gateway(s)")]
    GatewayUnavailable { content_id: String, attempts: usize },

    /// Local persistence failure
    #[error("Persistence failed: {0}")]
    Persistence(String),

    /// Persisted document written with an unknown schema
    #[error("Unsupported document version {found} for '{key}'")]
    UnsupportedVersion { key: String, found: u32 },

    /// Price-quote API failure
    #[error("Market data error: {0}")]
    Market(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DriveError {
    /// Message suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            DriveError::WalletUnavailable(_) => {
                "No wallet provider reachable. Check that your wallet node is running.".to_string()
            }
            DriveError::ConnectionRejected(_) => {
                "Wallet connection was rejected or no account is available.".to_string()
            }
            DriveError::Rpc(_) | DriveError::Contract(_) | DriveError::Abi(_) => {
                "The request to the network failed. Please try again.".to_string()
            }
            DriveError::Reverted(_) => {
                "Transaction failed. Check the log for details.".to_string()
            }
            DriveError::ListingFailed(msg) => msg.clone(),
            DriveError::Pinning(_) => "Uploading to the storage network failed.".to_string(),
            DriveError::Gateway(_) | DriveError::GatewayUnavailable { .. } => {
                "The file could not be retrieved from any gateway right now.".to_string()
            }
            DriveError::Persistence(_) | DriveError::UnsupportedVersion { .. } => {
                "Local data could not be saved or read; changes are kept for this session only."
                    .to_string()
            }
            DriveError::Market(_) => "Market data is unavailable at the moment.".to_string(),
            DriveError::InvalidArgument(msg) => msg.clone(),
            DriveError::Serialization(msg) => format!("Unexpected data format: {}", msg),
            DriveError::Config(e) => format!("Configuration problem: {}", e),
            DriveError::Io(e) => format!("File error: {}", e),
        }
    }

    /// Whether the error came from a contract or RPC call
    pub fn is_remote_call(&self) -> bool {
        matches!(
            self,
            DriveError::Rpc(_) | DriveError::Contract(_) | DriveError::Reverted(_) | DriveError::Abi(_)
        )
    }
}
