use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config format error: {0}")]
    Format(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// DgDrive configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DriveConfig {
    /// Directory holding persisted history and favorites
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub pinning: PinningConfig,

    #[serde(default)]
    pub wallet: WalletConfig,

    #[serde(default)]
    pub contract: ContractConfig,

    #[serde(default)]
    pub market: MarketConfig,

    #[serde(default)]
    pub history: HistoryConfig,
}

/// Content retrieval gateways
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Ordered gateway base URLs; the content identifier is appended verbatim
    #[serde(default = "default_gateways")]
    pub endpoints: Vec<String>,

    /// Timeout for a single gateway attempt
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Which pinning service receives uploads
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinningProvider {
    /// Pinata pinning API
    Pinata,
    /// Local IPFS (Kubo) node HTTP API
    Kubo,
}

/// Pinning service settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PinningConfig {
    #[serde(default = "default_provider")]
    pub provider: PinningProvider,

    /// Pinata API base URL
    #[serde(default = "default_pinata_url")]
    pub api_url: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub secret_key: Option<String>,

    #[serde(default = "default_cid_version")]
    pub cid_version: u8,

    /// Local IPFS node API URL
    #[serde(default = "default_kubo_url")]
    pub kubo_api_url: String,

    /// Whether to pin objects added to the local node
    #[serde(default = "default_pin")]
    pub pin: bool,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Wallet provider settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WalletConfig {
    /// JSON-RPC endpoint of the wallet node
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Account to use when the node exposes several
    #[serde(default)]
    pub account: Option<String>,
}

/// File registry contract settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContractConfig {
    #[serde(default = "default_contract_address")]
    pub address: String,

    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,

    #[serde(default = "default_receipt_poll_ms")]
    pub receipt_poll_ms: u64,

    #[serde(default = "default_receipt_attempts")]
    pub receipt_attempts: u32,
}

/// Price-quote API settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MarketConfig {
    #[serde(default = "default_market_url")]
    pub api_url: String,

    #[serde(default = "default_asset")]
    pub asset: String,

    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,
}

/// Access history settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of remembered owners
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
}

// Default functions for serde
fn default_data_dir() -> PathBuf {
    let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("~/.local/share"));
    path.push("dgdrive");
    path
}

fn default_gateways() -> Vec<String> {
    vec![
        "https://gateway.pinata.cloud/ipfs/".to_string(),
        "https://ipfs.io/ipfs/".to_string(),
        "https://cloudflare-ipfs.com/ipfs/".to_string(),
        "https://dweb.link/ipfs/".to_string(),
    ]
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_provider() -> PinningProvider {
    PinningProvider::Pinata
}

fn default_pinata_url() -> String {
    "https://api.pinata.cloud".to_string()
}

fn default_cid_version() -> u8 {
    1
}

fn default_kubo_url() -> String {
    "http://127.0.0.1:5001".to_string()
}

fn default_pin() -> bool {
    true
}

fn default_rpc_url() -> String {
    "http://127.0.0.1:8545".to_string() // Hardhat node
}

fn default_contract_address() -> String {
    "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string()
}

fn default_gas_limit() -> u64 {
    500_000
}

fn default_receipt_poll_ms() -> u64 {
    500
}

fn default_receipt_attempts() -> u32 {
    60
}

fn default_market_url() -> String {
    "https://api.coingecko.com/api/v3".to_string()
}

fn default_asset() -> String {
    "ethereum".to_string()
}

fn default_vs_currency() -> String {
    "usd".to_string()
}

fn default_history_capacity() -> usize {
    crate::history::DEFAULT_CAPACITY
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            gateway: GatewayConfig::default(),
            pinning: PinningConfig::default(),
            wallet: WalletConfig::default(),
            contract: ContractConfig::default(),
            market: MarketConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoints: default_gateways(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for PinningConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_url: default_pinata_url(),
            api_key: None,
            secret_key: None,
            cid_version: default_cid_version(),
            kubo_api_url: default_kubo_url(),
            pin: default_pin(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            account: None,
        }
    }
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: default_contract_address(),
            gas_limit: default_gas_limit(),
            receipt_poll_ms: default_receipt_poll_ms(),
            receipt_attempts: default_receipt_attempts(),
        }
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            api_url: default_market_url(),
            asset: default_asset(),
            vs_currency: default_vs_currency(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_history_capacity(),
        }
    }
}

impl DriveConfig {
    /// Load configuration from a file, layering `DGDRIVE_*` environment overrides.
    ///
    /// A missing file is created with default values first.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("No configuration at {}, writing defaults", path.display());
            Self::default().save_to_file(path)?;
        }

        let layered = config::Config::builder()
            .add_source(
                config::File::from(path.to_path_buf())
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix("DGDRIVE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("gateway.endpoints"),
            )
            .build()
            .map_err(|e| ConfigError::Format(format!("Failed to read config: {}", e)))?;

        let config: Self = layered
            .try_deserialize()
            .map_err(|e| ConfigError::Format(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string, without environment overrides
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::Format(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration location
    pub fn default_location() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("~/.config"));
        path.push("dgdrive");
        path.push("config.toml");
        path
    }

    /// Save configuration to a file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Format(format!("Failed to serialize config: {}", e)))
    }

    /// Check invariants the rest of the crate relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gateway.endpoints.is_empty() {
            return Err(ConfigError::Invalid(
                "gateway.endpoints must list at least one gateway".to_string(),
            ));
        }

        for endpoint in &self.gateway.endpoints {
            Url::parse(endpoint).map_err(|e| {
                ConfigError::Invalid(format!("Invalid gateway URL '{}': {}", endpoint, e))
            })?;
        }

        if self.history.capacity == 0 {
            return Err(ConfigError::Invalid(
                "history.capacity must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
