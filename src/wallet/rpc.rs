use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::core::{DriveError, Result, WalletConfig};
use super::WalletSummary;

/// JSON-RPC "method not found"
const METHOD_NOT_FOUND: i64 = -32601;

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    #[serde(default)]
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    transaction_hash: String,
    block_number: Option<String>,
    gas_used: Option<String>,
    status: Option<String>,
}

/// A mined transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: String,
    pub block_number: u64,
    pub gas_used: u128,
}

/// Client for the wallet node's JSON-RPC interface
pub struct WalletRpc {
    http: HttpClient,
    rpc_url: String,
    next_id: AtomicU64,
}

impl WalletRpc {
    pub fn new(config: &WalletConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DriveError::WalletUnavailable(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            rpc_url: config.rpc_url.clone(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Send one request; the inner result carries a JSON-RPC error object
    async fn raw_request(
        &self,
        method: &str,
        params: Value,
    ) -> Result<std::result::Result<Value, JsonRpcError>> {
        let body = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
        });

        let resp: JsonRpcResponse = self
            .http
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DriveError::WalletUnavailable(format!("{} unreachable: {}", self.rpc_url, e)))?
            .json()
            .await
            .map_err(|e| DriveError::Rpc(format!("{} response parse error: {}", method, e)))?;

        if let Some(err) = resp.error {
            log::debug!("{} returned error {}: {}", method, err.code, err.message);
            return Ok(Err(err));
        }

        Ok(Ok(resp.result.unwrap_or(Value::Null)))
    }

    async fn request<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let value = self
            .raw_request(method, params)
            .await?
            .map_err(|e| DriveError::Rpc(format!("{}: {}", method, e.message)))?;

        serde_json::from_value(value)
            .map_err(|e| DriveError::Rpc(format!("Unexpected {} result: {}", method, e)))
    }

    /// Accounts the node exposes without prompting
    pub async fn accounts(&self) -> Result<Vec<String>> {
        self.request("eth_accounts", json!([])).await
    }

    /// Ask the wallet for account access, falling back to `eth_accounts`
    /// on nodes that do not implement the request method
    pub async fn request_accounts(&self) -> Result<Vec<String>> {
        match self.raw_request("eth_requestAccounts", json!([])).await? {
            Ok(value) => serde_json::from_value(value)
                .map_err(|e| DriveError::Rpc(format!("Unexpected eth_requestAccounts result: {}", e))),
            Err(err) if err.code == METHOD_NOT_FOUND => self.accounts().await,
            Err(err) => Err(DriveError::ConnectionRejected(err.message)),
        }
    }

    /// Pick the account to act as: the preferred one if exposed, else the first
    pub async fn connect(&self, preferred: Option<&str>) -> Result<String> {
        let accounts = self.request_accounts().await?;

        if let Some(wanted) = preferred {
            if let Some(found) = accounts.iter().find(|a| a.eq_ignore_ascii_case(wanted)) {
                return Ok(found.clone());
            }
            log::warn!("Configured account {} is not exposed by the wallet", wanted);
        }

        accounts
            .into_iter()
            .next()
            .ok_or_else(|| DriveError::ConnectionRejected("Wallet exposed no accounts".to_string()))
    }

    /// Balance in wei
    pub async fn balance(&self, address: &str) -> Result<u128> {
        let hex: String = self.request("eth_getBalance", json!([address, "latest"])).await?;
        parse_quantity(&hex)
    }

    pub async fn chain_id(&self) -> Result<u64> {
        let hex: String = self.request("eth_chainId", json!([])).await?;
        let value = parse_quantity(&hex)?;
        u64::try_from(value).map_err(|_| DriveError::Rpc(format!("Chain id out of range: {}", hex)))
    }

    /// Gas price in wei
    pub async fn gas_price(&self) -> Result<u128> {
        let hex: String = self.request("eth_gasPrice", json!([])).await?;
        parse_quantity(&hex)
    }

    /// Balance, network and gas price for `account`, queried concurrently
    pub async fn summary(&self, account: &str) -> Result<WalletSummary> {
        let (balance_wei, chain_id, gas_price_wei) =
            futures::try_join!(self.balance(account), self.chain_id(), self.gas_price())?;

        Ok(WalletSummary {
            account: account.to_string(),
            balance_wei,
            chain_id,
            gas_price_wei,
        })
    }

    /// Read-only contract call at the latest block
    pub async fn call(&self, from: Option<&str>, to: &str, data: &[u8]) -> Result<Vec<u8>> {
        let mut tx = json!({
            "to": to,
            "data": format!("0x{}", hex::encode(data)),
        });
        if let Some(from) = from {
            tx["from"] = json!(from);
        }

        let result: String = self
            .raw_request("eth_call", json!([tx, "latest"]))
            .await?
            .map_err(|e| DriveError::Contract(e.message))
            .and_then(|v| {
                serde_json::from_value(v)
                    .map_err(|e| DriveError::Rpc(format!("Unexpected eth_call result: {}", e)))
            })?;

        decode_hex(&result)
    }

    /// Submit a transaction for the node to sign; returns its hash
    pub async fn send_transaction(&self, from: &str, to: &str, data: &[u8], gas: u64) -> Result<String> {
        let tx = json!({
            "from": from,
            "to": to,
            "gas": format!("0x{:x}", gas),
            "data": format!("0x{}", hex::encode(data)),
        });

        let value = self
            .raw_request("eth_sendTransaction", json!([tx]))
            .await?
            .map_err(|e| DriveError::Contract(e.message))?;

        serde_json::from_value(value)
            .map_err(|e| DriveError::Rpc(format!("Unexpected eth_sendTransaction result: {}", e)))
    }

    /// Poll until the transaction is mined
    pub async fn wait_for_receipt(&self, tx_hash: &str, attempts: u32, interval: Duration) -> Result<TxReceipt> {
        for attempt in 0..attempts.max(1) {
            let receipt: Option<RawReceipt> = self
                .request("eth_getTransactionReceipt", json!([tx_hash]))
                .await?;

            if let Some(raw) = receipt {
                if let Some(block) = raw.block_number.as_deref() {
                    if raw.status.as_deref() == Some("0x0") {
                        return Err(DriveError::Reverted(format!("{} failed in block {}", tx_hash, block)));
                    }

                    let block_number = u64::try_from(parse_quantity(block)?)
                        .map_err(|_| DriveError::Rpc(format!("Block number out of range: {}", block)))?;
                    let gas_used = match raw.gas_used.as_deref() {
                        Some(gas) => parse_quantity(gas)?,
                        None => 0,
                    };

                    log::info!("Transaction {} mined in block {}", raw.transaction_hash, block_number);
                    return Ok(TxReceipt {
                        tx_hash: raw.transaction_hash,
                        block_number,
                        gas_used,
                    });
                }
            }

            log::debug!("Waiting for receipt of {} (attempt {})", tx_hash, attempt + 1);
            tokio::time::sleep(interval).await;
        }

        Err(DriveError::Contract(format!(
            "Transaction {} not mined after {} polls",
            tx_hash, attempts
        )))
    }
}

/// Parse a hex quantity such as `0x1bc16d674ec80000`
pub fn parse_quantity(hex: &str) -> Result<u128> {
    let digits = hex.trim_start_matches("0x");
    if digits.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(digits, 16)
        .map_err(|e| DriveError::Rpc(format!("Invalid quantity '{}': {}", hex, e)))
}

fn decode_hex(data: &str) -> Result<Vec<u8>> {
    hex::decode(data.trim_start_matches("0x"))
        .map_err(|e| DriveError::Rpc(format!("Invalid hex data: {}", e)))
}
