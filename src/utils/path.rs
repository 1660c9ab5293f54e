//! Path utilities

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{CutselError, CutselResult};

/// Path utilities for inputs, outputs and configured directories
pub struct PathUtils;

impl PathUtils {
    /// Replace a leading `~` with the home directory
    pub fn expand_tilde(path: &str) -> PathBuf {
        let home = dirs::home_dir();
        match (path.strip_prefix('~'), home) {
            (Some(""), Some(home)) => home,
            (Some(rest), Some(home)) if rest.starts_with('/') || rest.starts_with('\\') => {
                home.join(&rest[1..])
            }
            _ => PathBuf::from(path),
        }
    }

    /// File name component as a string
    pub fn file_name(path: &Path) -> String {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned())
    }

    /// Whether `path` has one of `extensions`, compared case-insensitively
    pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy())
            .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)))
    }

    /// Expand files and directories into a sorted list of video files
    pub fn collect_videos(inputs: &[PathBuf], extensions: &[String]) -> CutselResult<Vec<PathBuf>> {
        let mut videos = BTreeSet::new();

        for input in inputs {
            if input.is_file() {
                videos.insert(input.clone());
            } else if input.is_dir() {
                for entry in WalkDir::new(input).follow_links(true) {
                    let entry = entry.map_err(|e| CutselError::IoError(e.into()))?;
                    if entry.file_type().is_file() && Self::has_extension(entry.path(), extensions) {
                        videos.insert(entry.into_path());
                    } else {
                        debug!("skipping {}", entry.path().display());
                    }
                }
            } else {
                return Err(CutselError::InputNotFound {
                    path: input.display().to_string(),
                });
            }
        }

        Ok(videos.into_iter().collect())
    }
}
