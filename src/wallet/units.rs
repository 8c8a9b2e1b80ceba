/// Format an integer amount with `decimals` fractional digits, e.g. wei to ether.
///
/// Trailing zeros are dropped but at least one fractional digit is kept:
/// `1_500_000_000_000_000_000` with 18 decimals is `"1.5"`, one ether is `"1.0"`.
pub fn format_units(value: u128, decimals: u32) -> String {
    if decimals == 0 {
        return value.to_string();
    }

    let scale = 10u128.pow(decimals);
    let whole = value / scale;
    let frac = value % scale;

    let mut frac = format!("{:0width$}", frac, width = decimals as usize);
    while frac.len() > 1 && frac.ends_with('0') {
        frac.pop();
    }

    format!("{}.{}", whole, frac)
}

pub fn format_ether(wei: u128) -> String {
    format_units(wei, 18)
}

pub fn format_gwei(wei: u128) -> String {
    format_units(wei, 9)
}

pub fn network_name(chain_id: u64) -> String {
    match chain_id {
        1 => "Ethereum Mainnet".to_string(),
        5 => "Goerli Testnet".to_string(),
        11155111 => "Sepolia Testnet".to_string(),
        1337 | 31337 => "Hardhat Local".to_string(),
        other => format!("Chain ID: {}", other),
    }
}

/// Block explorer for a chain; unknown chains use mainnet's
pub fn explorer_base(chain_id: u64) -> &'static str {
    match chain_id {
        5 => "https://goerli.etherscan.io",
        11155111 => "https://sepolia.etherscan.io",
        _ => "https://etherscan.io",
    }
}
