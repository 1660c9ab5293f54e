//! Cut list files given by path

use std::path::Path;
use std::sync::Arc;

use tracing::warn;

use crate::domain::errors::DomainError;
use crate::domain::model::{CutRecord, RecordMetadata, SourceKind};
use crate::ports::FsPort;
use crate::utils::PathUtils;

/// Reads cut lists from files named by the user
pub struct FileSystemSource {
    fs: Arc<dyn FsPort>,
}

impl FileSystemSource {
    pub fn new(fs: Arc<dyn FsPort>) -> Self {
        Self { fs }
    }

    /// The token is a path; unusable when no file exists there
    pub async fn resolve_candidate(&self, token: &str) -> Result<Option<CutRecord>, DomainError> {
        let path = PathUtils::expand_tilde(token.trim());
        if !self.fs.file_exists(&path).await? {
            warn!("'{}' is not a valid file", token.trim());
            return Ok(None);
        }
        let id = path.to_string_lossy().into_owned();
        Ok(Some(CutRecord::new(
            SourceKind::FileSystem,
            RecordMetadata::with_id(id),
        )))
    }

    pub async fn fetch_content(&self, id: &str) -> Result<String, DomainError> {
        self.fs.read_text(Path::new(id)).await
    }
}

pub(crate) fn render_view() -> Vec<String> {
    vec!["[  ] enter a file path".to_string()]
}
