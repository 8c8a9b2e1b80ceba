use std::sync::Arc;
use std::time::Duration;

use alloy::sol_types::SolCall;
use async_trait::async_trait;

use crate::core::{AccessGrant, ContractConfig, DriveError, FileRecord, Result};
use crate::wallet::{TxReceipt, WalletRpc};
use super::abi::{self, allowCall, disallowCall, getMyFilesCall, getSharedFilesCall, shareAccessCall, uploadFileCall};

/// The file registry smart contract, consumed through its public functions
#[async_trait]
pub trait FileRegistry: Send + Sync {
    /// Record an uploaded file for the connected account
    async fn upload_file(&self, name: &str, content_id: &str, is_public: bool) -> Result<TxReceipt>;

    /// Files owned by the connected account
    async fn my_files(&self) -> Result<Vec<FileRecord>>;

    /// Files of `owner` visible to the connected account
    async fn files_of(&self, owner: &str) -> Result<Vec<FileRecord>>;

    async fn grant_access(&self, user: &str) -> Result<TxReceipt>;

    async fn revoke_access(&self, user: &str) -> Result<TxReceipt>;

    /// Everyone the connected account has ever granted access to
    async fn access_list(&self) -> Result<Vec<AccessGrant>>;
}

/// Registry reached through the wallet node's JSON-RPC interface
pub struct RpcFileRegistry {
    rpc: Arc<WalletRpc>,
    config: ContractConfig,
    account: String,
}

impl RpcFileRegistry {
    /// Act on the registry as `account`
    pub fn new(rpc: Arc<WalletRpc>, config: ContractConfig, account: &str) -> Result<Self> {
        abi::parse_address(&config.address)?;
        abi::parse_address(account)?;

        Ok(Self {
            rpc,
            config,
            account: account.to_string(),
        })
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    async fn view<C: SolCall + Send>(&self, call: C) -> Result<C::Return> {
        let data = call.abi_encode();
        let output = self
            .rpc
            .call(Some(&self.account), &self.config.address, &data)
            .await?;

        if output.is_empty() {
            return Err(DriveError::Contract(format!("{} returned no data", C::SIGNATURE)));
        }

        abi::decode_returns::<C>(&output)
    }

    async fn transact<C: SolCall + Send>(&self, call: C) -> Result<TxReceipt> {
        let data = call.abi_encode();
        let tx_hash = self
            .rpc
            .send_transaction(&self.account, &self.config.address, &data, self.config.gas_limit)
            .await?;

        log::info!("Submitted {} as {}", C::SIGNATURE, tx_hash);
        self.rpc
            .wait_for_receipt(
                &tx_hash,
                self.config.receipt_attempts,
                Duration::from_millis(self.config.receipt_poll_ms),
            )
            .await
    }
}

#[async_trait]
impl FileRegistry for RpcFileRegistry {
    async fn upload_file(&self, name: &str, content_id: &str, is_public: bool) -> Result<TxReceipt> {
        self.transact(uploadFileCall {
            name: name.to_string(),
            hash: content_id.to_string(),
            isPublic: is_public,
        })
        .await
    }

    async fn my_files(&self) -> Result<Vec<FileRecord>> {
        let files = self.view(getMyFilesCall {}).await?._0;
        Ok(files.into_iter().map(FileRecord::from).collect())
    }

    async fn files_of(&self, owner: &str) -> Result<Vec<FileRecord>> {
        let owner = abi::parse_address(owner)?;
        let files = self.view(getSharedFilesCall { owner }).await?._0;
        Ok(files.into_iter().map(FileRecord::from).collect())
    }

    async fn grant_access(&self, user: &str) -> Result<TxReceipt> {
        let user = abi::parse_address(user)?;
        self.transact(allowCall { user }).await
    }

    async fn revoke_access(&self, user: &str) -> Result<TxReceipt> {
        let user = abi::parse_address(user)?;
        self.transact(disallowCall { user }).await
    }

    async fn access_list(&self) -> Result<Vec<AccessGrant>> {
        let grants = self.view(shareAccessCall {}).await?._0;
        Ok(grants.into_iter().map(AccessGrant::from).collect())
    }
}
