// Avidemux editor adapter - Authoring cut lists in an external editor

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::codec::{parse_project, project_preamble};
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;
use crate::utils::PathUtils;

const PROJECT_FILE: &str = "own_project.js";

/// Editor adapter driving Avidemux through a project script
pub struct AvidemuxEditorAdapter {
    command: String,
    save_workbench: bool,
    fs: Arc<dyn FsPort>,
}

impl AvidemuxEditorAdapter {
    pub fn new(command: impl Into<String>, save_workbench: bool, fs: Arc<dyn FsPort>) -> Self {
        Self {
            command: command.into(),
            save_workbench,
            fs,
        }
    }
}

#[async_trait]
impl EditorPort for AvidemuxEditorAdapter {
    async fn author(&self, video: &Path) -> Result<Option<TimingModel>, DomainError> {
        let workdir = tempfile::tempdir()?;
        let project = workdir.path().join(PROJECT_FILE);
        tokio::fs::write(&project, project_preamble(&video.to_string_lossy())).await?;

        info!("Starting {}. Save the project manually, then quit the editor.", self.command);
        let mut command = Command::new(&self.command);
        command.arg("--force-smart").arg("--run").arg(&project);
        if self.save_workbench {
            command.arg("--save-workbench").arg(&project);
        }
        let status = command
            .status()
            .await
            .map_err(|e| DomainError::ToolFail(format!("Failed to start {}: {}", self.command, e)))?;
        if !status.success() {
            warn!("{} exited with {}", self.command, status);
        }

        let text = match tokio::fs::read_to_string(&project).await {
            Ok(text) => text,
            Err(e) => {
                warn!("No project saved: {}", e);
                return Ok(None);
            }
        };
        let parsed = match parse_project(&text) {
            Ok(parsed) => parsed,
            Err(DomainError::MissingField(field)) => {
                warn!("Saved project has no {}", field);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        debug!("editor produced {} cuts at {} fps", parsed.segments.len(), parsed.fps);

        let size = self.fs.file_size(video).await?;
        let model = TimingModel::new(parsed.fps, parsed.segments, PathUtils::file_name(video), size)?;
        Ok(Some(model))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::adapters::MockFsAdapter;
    use std::os::unix::fs::PermissionsExt;

    /// Stand-in editor that "saves" two segments into the project passed after `--run`
    fn fake_editor(dir: &Path) -> String {
        let script = dir.join("editor.sh");
        std::fs::write(
            &script,
            "#!/bin/sh\nprintf 'app.addSegment(0,250,125);\\napp.addSegment(0,1000,50);\\napp.video.fps1000=25000;\\n' >> \"$3\"\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script.to_string_lossy().into_owned()
    }

    #[tokio::test]
    async fn test_author_reads_size_through_fs_port() {
        let dir = tempfile::tempdir().unwrap();
        let fs = MockFsAdapter::new().with_file("/videos/show.avi", "0123456789");
        let editor = AvidemuxEditorAdapter::new(fake_editor(dir.path()), false, Arc::new(fs));

        let model = editor.author(Path::new("/videos/show.avi")).await.unwrap().unwrap();
        assert_eq!(model.fps, 25.0);
        assert_eq!(model.cuts, vec![Cut::new(250, 125), Cut::new(1000, 50)]);
        assert_eq!(model.source_file, "show.avi");
        assert_eq!(model.source_size_bytes, 10);
    }

    #[tokio::test]
    async fn test_author_without_video_fails() {
        let dir = tempfile::tempdir().unwrap();
        let editor =
            AvidemuxEditorAdapter::new(fake_editor(dir.path()), false, Arc::new(MockFsAdapter::new()));

        let result = editor.author(Path::new("/videos/missing.avi")).await;
        assert!(matches!(result, Err(DomainError::FsFail(_))));
    }
}
