// Preview interactor - Preview a cut list file against a video

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::planner::{render_captions, render_edl, render_subtitles, PreviewPlanner};
use crate::ports::*;
use crate::sources::{CutlistSource, SourceSet};

/// Request to preview one cut list file
#[derive(Debug, Clone)]
pub struct PreviewRequest {
    pub video: PathBuf,
    pub cutlist: PathBuf,
    pub mode: PreviewMode,
    pub planner: PreviewPlanner,
}

/// Plan and captions built for a request
#[derive(Debug, Clone, Serialize)]
pub struct PreviewReport {
    pub video: PathBuf,
    pub cutlist: PathBuf,
    pub timing: TimingModel,
    pub plan: PreviewPlan,
    pub captions: Vec<CaptionLine>,
}

/// Interactor for the preview use case
pub struct PreviewInteractor {
    sources: Arc<SourceSet>,
    player: Arc<dyn PlayerPort>,
}

impl PreviewInteractor {
    /// Create new preview interactor with injected ports
    pub fn new(sources: Arc<SourceSet>, player: Arc<dyn PlayerPort>) -> Self {
        Self { sources, player }
    }

    /// Build the preview plan without playing it
    pub async fn plan(&self, request: &PreviewRequest) -> Result<PreviewReport, DomainError> {
        let source = self
            .sources
            .get(SourceKind::FileSystem)
            .ok_or_else(|| DomainError::Unsupported("file source is not configured".to_string()))?;
        let CutlistSource::FileSystem(files) = source else {
            return Err(DomainError::Unsupported("file source is not configured".to_string()));
        };

        let token = request.cutlist.to_string_lossy();
        let record = files
            .resolve_candidate(&token)
            .await?
            .ok_or_else(|| DomainError::FsFail(format!("'{}' is not a valid file", token)))?;
        let timing = self.sources.timing_of(&record).await?.clone();

        let plan = request.planner.plan(&timing, request.mode);
        let captions = render_captions(&plan);
        info!(
            "Planned {} discard interval(s) and {} marker(s) for {}",
            plan.discard.len(),
            plan.markers.len(),
            request.video.display()
        );

        Ok(PreviewReport {
            video: request.video.clone(),
            cutlist: request.cutlist.clone(),
            timing,
            plan,
            captions,
        })
    }

    /// Build the preview plan and hand it to the player
    pub async fn play(&self, request: &PreviewRequest) -> Result<PreviewReport, DomainError> {
        let report = self.plan(request).await?;
        let job = PlayerJob {
            video: request.video.clone(),
            edl: render_edl(&report.plan),
            subtitles: render_subtitles(&report.plan),
        };
        self.player.play(&job).await?;
        Ok(report)
    }
}
