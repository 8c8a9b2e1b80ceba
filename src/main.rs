use std::path::PathBuf;
use std::process;

use clap::Parser;

use dgdrive::commands::{
    Commands, ConfigCommands, DownloadCommand, FavoritesCommand, FilesCommand, HistoryCommand,
    MarketCommand, PreviewCommand, ResolveCommand, ShareCommand, UploadCommand, WalletCommand,
};
use dgdrive::{DriveClient, DriveConfig, Result};

#[derive(Parser)]
#[command(name = "dgdrive")]
#[command(author = "DgDrive Team")]
#[command(version)]
#[command(about = "Decentralized file storage on IPFS with an on-chain file registry", long_about = None)]
struct Cli {
    /// Configuration file to use
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        log::debug!("Command failed: {:?}", e);
        eprintln!("Error: {}", e.user_message());
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.unwrap_or_else(DriveConfig::default_location);

    if let Commands::Config(args) = &cli.command {
        if let ConfigCommands::Path = args.command {
            println!("{}", config_path.display());
            return Ok(());
        }
    }

    let config = DriveConfig::from_file(&config_path)?;

    if let Commands::Config(_) = &cli.command {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let client = DriveClient::new(config)?;

    match &cli.command {
        Commands::Upload(args) => UploadCommand::new(args).execute(&client).await,
        Commands::Files(args) => FilesCommand::new(args).execute(&client).await,
        Commands::Resolve(args) => ResolveCommand::new(args).execute(&client),
        Commands::Preview(args) => PreviewCommand::new(args).execute(&client).await,
        Commands::Download(args) => DownloadCommand::new(args).execute(&client).await,
        Commands::Share(args) => ShareCommand::new(args).execute(&client).await,
        Commands::History(args) => HistoryCommand::new(args).execute(&client),
        Commands::Favorites(args) => FavoritesCommand::new(args).execute(&client),
        Commands::Wallet => WalletCommand::execute(&client).await,
        Commands::Market(args) => MarketCommand::new(args).execute(&client).await,
        Commands::Config(_) => Ok(()),
    }
}
