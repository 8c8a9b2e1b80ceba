//! Registry contract interface.
//!
//! Calldata and return data are handled by alloy's `sol!` bindings; this
//! module adds address parsing and the conversions into crate types.

use std::str::FromStr;

use alloy::primitives::{keccak256, Address};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::core::{AccessGrant, DriveError, FileRecord, Result};

sol! {
    /// A file as stored by the registry
    struct File {
        string name;
        string hash;
        bool isPublic;
        address owner;
    }

    /// One entry of the caller's access list
    #[derive(Debug)]
    struct Access {
        address user;
        bool access;
    }

    function uploadFile(string name, string hash, bool isPublic);
    function getMyFiles() returns (File[]);
    function getSharedFiles(address owner) returns (File[]);
    function allow(address user);
    function disallow(address user);
    #[derive(Debug)]
    function shareAccess() returns (Access[]);
}

impl From<File> for FileRecord {
    fn from(file: File) -> Self {
        FileRecord {
            name: file.name,
            content_id: file.hash,
            is_public: file.isPublic,
            owner: format_address(&file.owner),
        }
    }
}

impl From<Access> for AccessGrant {
    fn from(entry: Access) -> Self {
        AccessGrant {
            user: format_address(&entry.user),
            access: entry.access,
        }
    }
}

/// First four bytes of `keccak256(signature)`
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = keccak256(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&digest[..4]);
    out
}

/// Decode the return data of `C`, rejecting non-canonical encodings
pub fn decode_returns<C: SolCall>(data: &[u8]) -> Result<C::Return> {
    C::abi_decode_returns(data, true)
        .map_err(|e| DriveError::Abi(format!("{} returned malformed data: {}", C::SIGNATURE, e)))
}

/// Parse a `0x`-prefixed 20-byte hex address
pub fn parse_address(address: &str) -> Result<Address> {
    let address = address.trim();
    let digits = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| DriveError::InvalidArgument(format!("Address must start with 0x: {}", address)))?;

    if digits.len() != 40 {
        return Err(DriveError::InvalidArgument(format!(
            "Address must have 40 hex digits: {}",
            address
        )));
    }

    Address::from_str(digits)
        .map_err(|e| DriveError::InvalidArgument(format!("Invalid address {}: {}", address, e)))
}

/// Lower-case `0x` form of an address
pub fn format_address(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_slice()))
}
