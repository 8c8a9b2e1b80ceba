use std::fmt;
use serde::{Deserialize, Serialize};

mod client;
mod config;
mod error;

pub use client::{DriveClient, DriveParts, Session, UploadOutcome, Dashboard};
pub use config::{
    ConfigError, ContractConfig, DriveConfig, GatewayConfig, HistoryConfig, MarketConfig,
    PinningConfig, PinningProvider, WalletConfig,
};
pub use error::{DriveError, Result};

/// Reference to immutable bytes in a content-addressed store
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentReference {
    content_id: String,
    name: Option<String>,
}

impl ContentReference {
    /// Create a reference from a content identifier
    pub fn new(content_id: &str) -> Result<Self> {
        let content_id = content_id.trim();
        if content_id.is_empty() {
            return Err(DriveError::InvalidArgument(
                "Content identifier must not be empty".to_string(),
            ));
        }

        Ok(Self {
            content_id: content_id.to_string(),
            name: None,
        })
    }

    /// Attach a human-readable file name
    pub fn with_name(mut self, name: &str) -> Self {
        let name = name.trim();
        if !name.is_empty() {
            self.name = Some(name.to_string());
        }
        self
    }

    pub fn content_id(&self) -> &str {
        &self.content_id
    }

    /// The file name if known, otherwise the content identifier
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.content_id)
    }

    pub fn extension(&self) -> String {
        extension_of(self.display_name())
    }

    pub fn category(&self) -> FileCategory {
        FileCategory::from_extension(&self.extension())
    }
}

impl fmt::Display for ContentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.content_id)
    }
}

/// A file record as stored by the registry contract
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Original file name
    pub name: String,
    /// Content identifier returned by the pinning service
    pub content_id: String,
    /// Whether the file is listed publicly
    pub is_public: bool,
    /// Owner wallet address
    pub owner: String,
}

impl FileRecord {
    pub fn extension(&self) -> String {
        extension_of(&self.name)
    }

    pub fn category(&self) -> FileCategory {
        FileCategory::from_extension(&self.extension())
    }

    /// Build a content reference suitable for retrieval
    pub fn reference(&self) -> Result<ContentReference> {
        Ok(ContentReference::new(&self.content_id)?.with_name(&self.name))
    }
}

/// Coarse file category, used for display only
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Pdf,
    Document,
    Image,
    Other,
}

impl FileCategory {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => FileCategory::Pdf,
            "doc" | "docx" | "odt" | "rtf" | "txt" => FileCategory::Document,
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "svg" | "bmp" => FileCategory::Image,
            _ => FileCategory::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Pdf => "pdf",
            FileCategory::Document => "document",
            FileCategory::Image => "image",
            FileCategory::Other => "other",
        }
    }
}

impl std::str::FromStr for FileCategory {
    type Err = DriveError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(FileCategory::Pdf),
            "document" | "doc" => Ok(FileCategory::Document),
            "image" => Ok(FileCategory::Image),
            "other" => Ok(FileCategory::Other),
            _ => Err(DriveError::InvalidArgument(format!("Unknown file category: {}", s))),
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// An on-chain access grant made by the connected account
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrant {
    /// Address that was granted access
    pub user: String,
    /// False once the grant has been revoked
    pub access: bool,
}

/// Shorten an address for display: `0x1234...abcd`
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }

    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

fn extension_of(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => String::new(),
    }
}
