use crate::core::{DriveClient, Result};
use super::{ShareArgs, ShareCommands};

/// Implements the `share` command
pub struct ShareCommand<'a> {
    args: &'a ShareArgs,
}

impl<'a> ShareCommand<'a> {
    pub fn new(args: &'a ShareArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, client: &DriveClient) -> Result<()> {
        match &self.args.command {
            ShareCommands::Grant { address } => {
                let tx = client.grant_access(address).await?;
                println!("Access granted to {} (tx {})", address.trim(), tx);
            }
            ShareCommands::Revoke { address } => {
                let tx = client.revoke_access(address).await?;
                println!("Access revoked for {} (tx {})", address.trim(), tx);
            }
            ShareCommands::List { filter } => {
                let grants = match filter {
                    Some(input) => client.access_suggestions(input).await?,
                    None => client.access_list().await?,
                };

                if grants.is_empty() {
                    println!("No users have access yet.");
                }
                for grant in grants {
                    let state = if grant.access { "Access Granted" } else { "Revoked" };
                    println!("{}  {}", grant.user, state);
                }
            }
        }
        Ok(())
    }
}
