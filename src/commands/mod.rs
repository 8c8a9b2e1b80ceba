//! Command handlers for the `dgdrive` CLI

use std::path::PathBuf;

use clap::{Args, Subcommand};

mod files;
mod history;
mod retrieve;
mod share;
mod upload;
mod wallet;

pub use files::FilesCommand;
pub use history::{FavoritesCommand, HistoryCommand};
pub use retrieve::{DownloadCommand, PreviewCommand, ResolveCommand};
pub use share::ShareCommand;
pub use upload::UploadCommand;
pub use wallet::{MarketCommand, WalletCommand};

/// Top-level subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Upload files to IPFS and record them on the registry
    Upload(UploadArgs),

    /// List your files or another owner's files
    Files(FilesArgs),

    /// Print the gateway URL currently used for a content identifier
    Resolve(ResolveArgs),

    /// Fetch content and report where it was served from
    Preview(PreviewArgs),

    /// Download content into a directory
    Download(DownloadArgs),

    /// Grant, revoke or list access to your files
    Share(ShareArgs),

    /// Recently viewed owners
    History(HistoryArgs),

    /// Favorite content identifiers
    Favorites(FavoritesArgs),

    /// Show the connected wallet
    Wallet,

    /// Show wallet balance together with market data
    Market(MarketArgs),

    /// Inspect configuration
    Config(ConfigArgs),
}

/// Arguments for upload command
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Files to upload
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// List the files publicly
    #[arg(long, default_value_t = false)]
    pub public: bool,
}

/// Arguments for files command
#[derive(Debug, Args)]
pub struct FilesArgs {
    #[command(subcommand)]
    pub target: FilesTarget,

    /// Only show files whose name or CID contains this text
    #[arg(long, global = true)]
    pub search: Option<String>,

    /// Only show one category: pdf, document, image, other
    #[arg(long, global = true)]
    pub category: Option<String>,

    /// Only show public or private files
    #[arg(long, global = true)]
    pub visibility: Option<String>,

    /// Sort by name, type or owner
    #[arg(long, global = true, default_value = "name")]
    pub sort: String,

    /// Reverse the sort order
    #[arg(long, global = true, default_value_t = false)]
    pub desc: bool,
}

/// Whose files to list
#[derive(Debug, Subcommand)]
pub enum FilesTarget {
    /// Files owned by the connected account
    Mine,

    /// Files of another owner that you can see
    Owner {
        /// Owner wallet address
        address: String,
    },
}

/// Arguments for resolve command
#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Content identifier
    pub cid: String,
}

/// Arguments for preview command
#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Content identifiers; several are fetched concurrently
    #[arg(required = true)]
    pub cids: Vec<String>,
}

/// Arguments for download command
#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// Content identifier
    pub cid: String,

    /// File name to save as
    #[arg(long)]
    pub name: Option<String>,

    /// Destination directory
    #[arg(long, default_value = ".")]
    pub out: PathBuf,
}

/// Arguments for share command
#[derive(Debug, Args)]
pub struct ShareArgs {
    #[command(subcommand)]
    pub command: ShareCommands,
}

/// Sharing subcommands
#[derive(Debug, Subcommand)]
pub enum ShareCommands {
    /// Allow an address to view your files
    Grant { address: String },

    /// Withdraw an address's access
    Revoke { address: String },

    /// List addresses you have shared with
    List {
        /// Only show addresses containing this text
        #[arg(long)]
        filter: Option<String>,
    },
}

/// Arguments for history command
#[derive(Debug, Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: HistoryCommands,
}

/// History subcommands
#[derive(Debug, Subcommand)]
pub enum HistoryCommands {
    /// List recently viewed owners, most recent first
    List,

    /// Give an owner a nickname
    Label { address: String, label: String },

    /// Forget an owner
    Remove { address: String },
}

/// Arguments for favorites command
#[derive(Debug, Args)]
pub struct FavoritesArgs {
    #[command(subcommand)]
    pub command: FavoritesCommands,
}

/// Favorites subcommands
#[derive(Debug, Subcommand)]
pub enum FavoritesCommands {
    List,
    Add { cid: String },
    Remove { cid: String },
}

/// Arguments for market command
#[derive(Debug, Args)]
pub struct MarketArgs {
    /// Chart period: 1d, 7d, 30d, 90d or 365d
    #[arg(long, default_value = "7d")]
    pub period: String,
}

/// Arguments for config command
#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the configuration file location
    Path,

    /// Print the effective configuration
    Show,
}
