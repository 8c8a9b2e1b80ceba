use crate::core::{DriveClient, DriveError, Result};
use super::UploadArgs;

/// Implements the `upload` command
pub struct UploadCommand<'a> {
    args: &'a UploadArgs,
}

impl<'a> UploadCommand<'a> {
    pub fn new(args: &'a UploadArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, client: &DriveClient) -> Result<()> {
        let outcomes = client.upload_files(&self.args.files, self.args.public).await?;

        let mut failed = 0;
        for outcome in &outcomes {
            match (&outcome.content_id, &outcome.error) {
                (Some(cid), None) => println!("Uploaded {} -> {}", outcome.name, cid),
                (_, Some(err)) => {
                    failed += 1;
                    eprintln!("Failed {}: {}", outcome.name, err);
                }
                (None, None) => {}
            }
        }

        if failed > 0 {
            return Err(DriveError::Contract(format!(
                "{} of {} upload(s) failed",
                failed,
                outcomes.len()
            )));
        }

        println!("All files uploaded successfully!");
        Ok(())
    }
}
