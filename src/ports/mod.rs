// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use crate::domain::errors::*;
use crate::domain::model::*;
use async_trait::async_trait;

/// Port for fetching text from the cut list service
#[async_trait]
pub trait TransportPort: Send + Sync {
    /// GET `url` and return the decoded body
    async fn get_text(&self, url: &str) -> Result<String, DomainError>;
}

/// Port for line-oriented user interaction
#[async_trait]
pub trait PromptPort: Send + Sync {
    /// Show `prompt` and read one line without its terminator; `None` on end of input
    async fn read_line(&self, prompt: &str) -> Result<Option<String>, DomainError>;

    /// Print one message to the user
    async fn say(&self, message: &str);
}

/// Port for the external cut list editor
#[async_trait]
pub trait EditorPort: Send + Sync {
    /// Let the user author a cut list for `video`; `None` when nothing was saved
    async fn author(&self, video: &Path) -> Result<Option<TimingModel>, DomainError>;
}

/// Rendered preview artifacts handed to a player
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerJob {
    pub video: PathBuf,
    /// Edit decision list body
    pub edl: String,
    /// Caption file body
    pub subtitles: String,
}

/// Port for the external preview player
#[async_trait]
pub trait PlayerPort: Send + Sync {
    /// Play `job` and wait for the player to exit
    async fn play(&self, job: &PlayerJob) -> Result<(), DomainError>;
}

/// Port for file system operations
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Check if a regular file exists
    async fn file_exists(&self, path: &Path) -> Result<bool, DomainError>;

    /// Get file size
    async fn file_size(&self, path: &Path) -> Result<u64, DomainError>;

    /// Read a whole file as text
    async fn read_text(&self, path: &Path) -> Result<String, DomainError>;

    /// Write text, creating parent directories
    async fn write_text(&self, path: &Path, content: &str) -> Result<(), DomainError>;

    /// Delete file
    async fn delete_file(&self, path: &Path) -> Result<(), DomainError>;
}
