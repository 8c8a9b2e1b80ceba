use crate::core::{ContentReference, DriveClient, Result};
use super::{DownloadArgs, PreviewArgs, ResolveArgs};

/// Implements the `resolve` command
pub struct ResolveCommand<'a> {
    args: &'a ResolveArgs,
}

impl<'a> ResolveCommand<'a> {
    pub fn new(args: &'a ResolveArgs) -> Self {
        Self { args }
    }

    pub fn execute(&self, client: &DriveClient) -> Result<()> {
        println!("{}", client.resolve_url(&self.args.cid)?);
        Ok(())
    }
}

/// Implements the `preview` command
pub struct PreviewCommand<'a> {
    args: &'a PreviewArgs,
}

impl<'a> PreviewCommand<'a> {
    pub fn new(args: &'a PreviewArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, client: &DriveClient) -> Result<()> {
        let results = client.preview_many(&self.args.cids).await;
        let mut first_error = None;

        for (cid, result) in self.args.cids.iter().zip(results) {
            match result {
                Ok(retrieved) => println!(
                    "{}: {} bytes from {} ({} attempt(s))",
                    cid,
                    retrieved.bytes.len(),
                    retrieved.url,
                    retrieved.attempts
                ),
                Err(e) => {
                    eprintln!("{}: {}", cid, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Implements the `download` command
pub struct DownloadCommand<'a> {
    args: &'a DownloadArgs,
}

impl<'a> DownloadCommand<'a> {
    pub fn new(args: &'a DownloadArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, client: &DriveClient) -> Result<()> {
        let mut reference = ContentReference::new(&self.args.cid)?;
        if let Some(name) = &self.args.name {
            reference = reference.with_name(name);
        }

        let path = client.download(&reference, &self.args.out).await?;
        println!("Saved {}", path.display());
        Ok(())
    }
}
