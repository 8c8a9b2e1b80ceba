//! DgDrive: a decentralized file-storage client. Files are pinned to IPFS,
//! their records live on a registry contract, and retrieval falls back
//! across public gateways.

pub mod core;
pub mod gateway;
pub mod history;
pub mod store;
pub mod pinning;
pub mod wallet;
pub mod contract;
pub mod market;
pub mod inventory;
pub mod commands;

// Re-export main components for easier consumption
pub use crate::core::{
    AccessGrant, ConfigError, ContentReference, DriveClient, DriveConfig, DriveError, DriveParts,
    FileCategory, FileRecord, Result, Session,
};
pub use gateway::{GatewayEndpoint, GatewayFetcher, GatewayResolver, HttpGatewayFetcher, Retrieved};
pub use history::{AccessHistory, AccessHistoryEntry, Favorites};
pub use store::{DocumentStore, JsonFileStore, MemoryStore};
pub use pinning::{PinReceipt, PinningService};
pub use contract::{FileRegistry, RpcFileRegistry};
pub use inventory::{FileQuery, Listing, ListingState};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
