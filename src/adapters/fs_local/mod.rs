// Local filesystem adapter - File system operations through tokio::fs

use std::path::Path;

use async_trait::async_trait;
use tokio::fs;

use crate::domain::errors::*;
use crate::ports::*;

/// Local filesystem adapter
pub struct FsLocalAdapter;

impl FsLocalAdapter {
    /// Create new filesystem adapter
    pub fn new() -> Self {
        Self
    }
}

impl Default for FsLocalAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FsPort for FsLocalAdapter {
    async fn file_exists(&self, path: &Path) -> Result<bool, DomainError> {
        match fs::metadata(path).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(DomainError::FsFail(format!(
                "Failed to inspect {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn file_size(&self, path: &Path) -> Result<u64, DomainError> {
        let metadata = fs::metadata(path)
            .await
            .map_err(|e| DomainError::FsFail(format!("Failed to get file size: {}", e)))?;
        Ok(metadata.len())
    }

    async fn read_text(&self, path: &Path) -> Result<String, DomainError> {
        let bytes = fs::read(path).await.map_err(|e| {
            DomainError::FsFail(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn write_text(&self, path: &Path, content: &str) -> Result<(), DomainError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::FsFail(format!("Failed to create directory: {}", e)))?;
        }
        fs::write(path, content).await.map_err(|e| {
            DomainError::FsFail(format!("Failed to write {}: {}", path.display(), e))
        })
    }

    async fn delete_file(&self, path: &Path) -> Result<(), DomainError> {
        fs::remove_file(path)
            .await
            .map_err(|e| DomainError::FsFail(format!("Failed to delete file: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_read_delete() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/a.cutlist");
        let fs_port = FsLocalAdapter::new();

        assert!(!fs_port.file_exists(&path).await.unwrap());
        fs_port.write_text(&path, "[General]\n").await.unwrap();
        assert!(fs_port.file_exists(&path).await.unwrap());
        assert_eq!(fs_port.file_size(&path).await.unwrap(), 10);
        assert_eq!(fs_port.read_text(&path).await.unwrap(), "[General]\n");

        fs_port.delete_file(&path).await.unwrap();
        assert!(!fs_port.file_exists(&path).await.unwrap());
    }

    #[tokio::test]
    async fn test_directory_is_not_a_file() {
        let dir = TempDir::new().unwrap();
        assert!(!FsLocalAdapter::new().file_exists(dir.path()).await.unwrap());
    }
}
