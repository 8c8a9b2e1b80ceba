use crate::core::{DriveClient, Result};
use super::{FavoritesArgs, FavoritesCommands, HistoryArgs, HistoryCommands};

/// Implements the `history` command
pub struct HistoryCommand<'a> {
    args: &'a HistoryArgs,
}

impl<'a> HistoryCommand<'a> {
    pub fn new(args: &'a HistoryArgs) -> Self {
        Self { args }
    }

    pub fn execute(&self, client: &DriveClient) -> Result<()> {
        match &self.args.command {
            HistoryCommands::List => {
                if let Some(err) = client.history_load_error() {
                    eprintln!("Warning: saved history could not be read: {}", err);
                }
                let entries = client.history();
                if entries.is_empty() {
                    println!("No owners viewed yet.");
                }
                for entry in entries {
                    println!(
                        "{:<16} {}  {} file(s)  {}",
                        entry.label,
                        entry.owner_address,
                        entry.file_count,
                        entry.last_accessed_at.format("%Y-%m-%d %H:%M")
                    );
                }
            }
            HistoryCommands::Label { address, label } => {
                if client.label_owner(address, label)? {
                    println!("Labelled {}", address.trim());
                } else {
                    println!("{} is not in the history", address.trim());
                }
            }
            HistoryCommands::Remove { address } => {
                client.forget_owner(address)?;
                println!("Removed {}", address.trim());
            }
        }
        Ok(())
    }
}

/// Implements the `favorites` command
pub struct FavoritesCommand<'a> {
    args: &'a FavoritesArgs,
}

impl<'a> FavoritesCommand<'a> {
    pub fn new(args: &'a FavoritesArgs) -> Self {
        Self { args }
    }

    pub fn execute(&self, client: &DriveClient) -> Result<()> {
        match &self.args.command {
            FavoritesCommands::List => {
                if let Some(err) = client.favorites_load_error() {
                    eprintln!("Warning: saved favorites could not be read: {}", err);
                }
                let favorites = client.favorites();
                if favorites.is_empty() {
                    println!("No favorites yet.");
                }
                for cid in favorites {
                    println!("{}", cid);
                }
            }
            FavoritesCommands::Add { cid } => {
                if client.add_favorite(cid)? {
                    println!("Added {}", cid.trim());
                } else {
                    println!("{} is already a favorite", cid.trim());
                }
            }
            FavoritesCommands::Remove { cid } => {
                if client.remove_favorite(cid)? {
                    println!("Removed {}", cid.trim());
                } else {
                    println!("{} is not a favorite", cid.trim());
                }
            }
        }
        Ok(())
    }
}
