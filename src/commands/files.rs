use crate::core::{short_address, DriveClient, DriveError, FileCategory, Result};
use crate::inventory::{FileQuery, Listing, ListingState, SortKey, Visibility};
use super::{FilesArgs, FilesTarget};

/// Implements the `files` command
pub struct FilesCommand<'a> {
    args: &'a FilesArgs,
}

impl<'a> FilesCommand<'a> {
    pub fn new(args: &'a FilesArgs) -> Self {
        Self { args }
    }

    fn query(&self) -> Result<FileQuery> {
        Ok(FileQuery {
            search: self.args.search.clone(),
            category: self
                .args
                .category
                .as_deref()
                .map(str::parse::<FileCategory>)
                .transpose()?,
            visibility: self
                .args
                .visibility
                .as_deref()
                .map(str::parse::<Visibility>)
                .transpose()?,
            sort: self.args.sort.parse::<SortKey>()?,
            descending: self.args.desc,
        })
    }

    pub async fn execute(&self, client: &DriveClient) -> Result<()> {
        // Bad filter flags are reported before any network call
        let query = self.query()?;

        let listing = match &self.args.target {
            FilesTarget::Mine => client.my_files().await?,
            FilesTarget::Owner { address } => client.owner_files(address).await?,
        };

        print_listing(&listing, &query, matches!(self.args.target, FilesTarget::Mine))
    }
}

/// Prints a loaded or empty listing; a failed one becomes the command's error
fn print_listing(listing: &Listing, query: &FileQuery, mine: bool) -> Result<()> {
    if let Some(err) = &listing.history_error {
        eprintln!("Warning: access history not saved: {}", err);
    }

    match &listing.state {
        ListingState::Failed(message) => return Err(DriveError::ListingFailed(message.clone())),
        ListingState::Empty => {
            if mine {
                println!("You have not uploaded any files yet.");
            } else {
                println!("{} has no files visible to you.", short_address(&listing.owner));
            }
        }
        ListingState::Loaded(files) => {
            let shown = query.apply(files);
            if shown.is_empty() {
                println!("No files match the current filters ({} total).", files.len());
                return Ok(());
            }

            for file in &shown {
                println!(
                    "{:<9} {:<7} {:<40} {}",
                    file.category(),
                    if file.is_public { "public" } else { "private" },
                    file.name,
                    file.content_id
                );
            }
            println!("{} of {} file(s)", shown.len(), files.len());
        }
    }

    Ok(())
}
