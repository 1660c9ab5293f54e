// MPlayer adapter - Previews through an external player

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::*;
use crate::ports::*;

/// Player adapter passing an EDL and a caption file to MPlayer
pub struct MplayerPlayerAdapter {
    command: String,
}

impl MplayerPlayerAdapter {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl PlayerPort for MplayerPlayerAdapter {
    async fn play(&self, job: &PlayerJob) -> Result<(), DomainError> {
        let workdir = tempfile::tempdir()?;
        let edl = workdir.path().join("preview.edl");
        let subtitles = workdir.path().join("preview.sub");
        tokio::fs::write(&edl, &job.edl).await?;
        tokio::fs::write(&subtitles, &job.subtitles).await?;

        debug!("playing {} with {}", job.video.display(), self.command);
        let status = Command::new(&self.command)
            .arg("-edl")
            .arg(&edl)
            .arg("-sub")
            .arg(&subtitles)
            .arg("-osdlevel")
            .arg("3")
            .arg(&job.video)
            .status()
            .await
            .map_err(|e| DomainError::ToolFail(format!("Failed to start {}: {}", self.command, e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(DomainError::ToolFail(format!("{} exited with {}", self.command, status)))
        }
    }
}
