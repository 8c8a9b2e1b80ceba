// Wallet provider boundary
// Accounts, balances, network and transaction submission over JSON-RPC.
// Signing stays with the wallet node.

mod rpc;
mod units;

pub use rpc::{parse_quantity, TxReceipt, WalletRpc};
pub use units::{explorer_base, format_ether, format_gwei, format_units, network_name};

use std::fmt;

use crate::core::short_address;

/// Snapshot of the connected account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletSummary {
    pub account: String,
    pub balance_wei: u128,
    pub chain_id: u64,
    pub gas_price_wei: u128,
}

impl WalletSummary {
    pub fn network_name(&self) -> String {
        network_name(self.chain_id)
    }

    pub fn explorer_url(&self) -> String {
        format!("{}/address/{}", explorer_base(self.chain_id), self.account)
    }
}

impl fmt::Display for WalletSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Account:   {} ({})", self.account, short_address(&self.account))?;
        writeln!(f, "Balance:   {} ETH", format_ether(self.balance_wei))?;
        writeln!(f, "Network:   {}", self.network_name())?;
        writeln!(f, "Gas price: {} Gwei", format_gwei(self.gas_price_wei))?;
        write!(f, "Explorer:  {}", self.explorer_url())
    }
}
