//! File listings: outcome of a registry fetch, and client-side
//! search/filter/sort over the returned records.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::core::{AccessGrant, DriveError, FileCategory, FileRecord, Result};

/// Outcome of fetching a listing
#[derive(Debug, Clone, PartialEq)]
pub enum ListingState {
    /// The registry returned at least one file
    Loaded(Vec<FileRecord>),
    /// The call succeeded with no files
    Empty,
    /// The call failed; a revert is indistinguishable from missing access
    Failed(String),
}

/// A listing for one owner
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub owner: String,
    pub state: ListingState,
    /// Set when the listing succeeded but the access history could not be saved
    pub history_error: Option<String>,
}

impl Listing {
    pub fn from_files(owner: &str, files: Vec<FileRecord>) -> Self {
        let state = if files.is_empty() {
            ListingState::Empty
        } else {
            ListingState::Loaded(files)
        };
        Self {
            owner: owner.to_string(),
            state,
            history_error: None,
        }
    }

    pub fn failed(owner: &str, message: &str) -> Self {
        Self {
            owner: owner.to_string(),
            state: ListingState::Failed(message.to_string()),
            history_error: None,
        }
    }

    /// Files to display; always empty for a failed listing
    pub fn files(&self) -> &[FileRecord] {
        match &self.state {
            ListingState::Loaded(files) => files,
            _ => &[],
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self.state, ListingState::Failed(_))
    }
}

/// Visibility filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

impl FromStr for Visibility {
    type Err = DriveError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            _ => Err(DriveError::InvalidArgument(format!("Unknown visibility: {}", s))),
        }
    }
}

/// Sort key for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Name,
    Type,
    Owner,
}

impl FromStr for SortKey {
    type Err = DriveError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "type" => Ok(SortKey::Type),
            "owner" => Ok(SortKey::Owner),
            _ => Err(DriveError::InvalidArgument(format!("Unknown sort key: {}", s))),
        }
    }
}

/// Search, filter and sort settings for a listing
#[derive(Debug, Clone, Default)]
pub struct FileQuery {
    /// Case-insensitive substring matched against name and content id
    pub search: Option<String>,
    pub category: Option<FileCategory>,
    pub visibility: Option<Visibility>,
    pub sort: SortKey,
    pub descending: bool,
}

impl FileQuery {
    pub fn matches(&self, file: &FileRecord) -> bool {
        if let Some(needle) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = needle.to_lowercase();
            if !file.name.to_lowercase().contains(&needle)
                && !file.content_id.to_lowercase().contains(&needle)
            {
                return false;
            }
        }

        if let Some(category) = self.category {
            if file.category() != category {
                return false;
            }
        }

        match self.visibility {
            Some(Visibility::Public) if !file.is_public => false,
            Some(Visibility::Private) if file.is_public => false,
            _ => true,
        }
    }

    /// Matching files in display order
    pub fn apply(&self, files: &[FileRecord]) -> Vec<FileRecord> {
        let mut out: Vec<FileRecord> = files.iter().filter(|f| self.matches(f)).cloned().collect();
        out.sort_by(|a, b| {
            let ord = self.compare(a, b);
            if self.descending {
                ord.reverse()
            } else {
                ord
            }
        });
        out
    }

    fn compare(&self, a: &FileRecord, b: &FileRecord) -> Ordering {
        match self.sort {
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortKey::Type => a
                .extension()
                .cmp(&b.extension())
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
            SortKey::Owner => a
                .owner
                .to_lowercase()
                .cmp(&b.owner.to_lowercase())
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
        }
    }
}

/// Grants whose address contains `input`, ignoring case
pub fn suggest<'a>(grants: &'a [AccessGrant], input: &str) -> Vec<&'a AccessGrant> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return Vec::new();
    }
    grants
        .iter()
        .filter(|g| g.user.to_lowercase().contains(&input))
        .collect()
}
