// Batch interactor - Choose, export and check cut lists for many videos

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::app::selection_interactor::SelectionInteractor;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::planner::{render_edl, render_subtitles};
use crate::ports::*;
use crate::sources::SourceSet;
use crate::utils::{parse_index_range, PathUtils};

/// Extension of exported cut list files
pub const CUTLIST_EXTENSION: &str = "cutlist";

/// Settings of one batch run
#[derive(Debug, Clone)]
pub struct BatchSettings {
    /// Where cut lists are exported and cut videos are expected
    pub cut_dir: PathBuf,
    /// Run the check phase after exporting
    pub check: bool,
}

/// One video of the batch and the cut list picked for it
#[derive(Debug)]
pub struct BatchEntry {
    pub video: PathBuf,
    pub chosen: Option<ChosenCutlist>,
}

/// What a batch run did
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Exported cut list files, one per chosen video
    pub exported: Vec<PathBuf>,
    /// Videos left without a cut list
    pub skipped: Vec<PathBuf>,
    /// Videos whose cut list could not be exported
    pub failed: Vec<PathBuf>,
    /// Videos deleted on request
    pub deleted: Vec<PathBuf>,
    /// Videos whose cut was checked
    pub checked: Vec<PathBuf>,
}

/// Answer to a list prompt
#[derive(Debug, Clone, PartialEq, Eq)]
enum ListChoice {
    /// Zero-based positions picked by the user
    Picked(Vec<usize>),
    All,
    Pending,
    Stop,
}

/// Interactor running the whole batch flow
pub struct BatchInteractor {
    selection: Arc<SelectionInteractor>,
    sources: Arc<SourceSet>,
    prompt: Arc<dyn PromptPort>,
    fs: Arc<dyn FsPort>,
    player: Arc<dyn PlayerPort>,
    settings: BatchSettings,
}

impl BatchInteractor {
    /// Create new batch interactor with injected ports
    pub fn new(
        selection: Arc<SelectionInteractor>,
        sources: Arc<SourceSet>,
        prompt: Arc<dyn PromptPort>,
        fs: Arc<dyn FsPort>,
        player: Arc<dyn PlayerPort>,
        settings: BatchSettings,
    ) -> Self {
        Self {
            selection,
            sources,
            prompt,
            fs,
            player,
            settings,
        }
    }

    /// Run every phase for `videos`
    pub async fn execute(&self, videos: Vec<PathBuf>) -> Result<BatchReport, DomainError> {
        let mut report = BatchReport::default();

        info!("Choosing cut lists for {} file(s)", videos.len());
        let mut entries = Vec::new();
        for video in videos {
            if let Some(entry) = self.choose(video, &mut report).await {
                entries.push(entry);
            }
        }

        self.reselect(&mut entries, &mut report).await?;

        let mut exported = Vec::new();
        for entry in &entries {
            let Some(chosen) = entry.chosen.as_ref() else {
                report.skipped.push(entry.video.clone());
                continue;
            };
            match self.export(&entry.video, chosen).await {
                Ok(path) => {
                    report.exported.push(path);
                    exported.push(entry);
                }
                Err(e) => {
                    error!("Export failed for {}: {}", entry.video.display(), e);
                    report.failed.push(entry.video.clone());
                }
            }
        }

        if self.settings.check {
            self.check(&exported, &mut report).await?;
        }

        self.sources.flush_caches();
        Ok(report)
    }

    /// Selection for one video; `None` when the video was deleted
    async fn choose(&self, video: PathBuf, report: &mut BatchReport) -> Option<BatchEntry> {
        let chosen = match self.selection.choose(&video).await {
            Ok(SelectionOutcome::Chosen(chosen)) => Some(chosen),
            Ok(SelectionOutcome::Skipped(reason)) => {
                info!("Skipping {}: {:?}", video.display(), reason);
                None
            }
            Ok(SelectionOutcome::Deleted) => {
                report.deleted.push(video);
                return None;
            }
            Err(e) => {
                error!("Selection failed for {}: {}", video.display(), e);
                None
            }
        };
        Some(BatchEntry { video, chosen })
    }

    async fn reselect(&self, entries: &mut Vec<BatchEntry>, report: &mut BatchReport) -> Result<(), DomainError> {
        while !entries.is_empty() {
            self.prompt.say("").await;
            for (i, entry) in entries.iter().enumerate() {
                let mark = if entry.chosen.is_some() { "x" } else { " " };
                self.prompt
                    .say(&format!("[{:2}] {} {}", i + 1, mark, PathUtils::file_name(&entry.video)))
                    .await;
            }
            self.prompt.say("[ a] choose all again").await;
            self.prompt.say("[ n] or empty input: keep choices and continue").await;

            let letters = [('n', ListChoice::Stop), ('a', ListChoice::All)];
            let picked = match self.read_choice(entries.len(), &letters).await? {
                ListChoice::All => (0..entries.len()).collect(),
                ListChoice::Picked(picked) => picked,
                ListChoice::Pending | ListChoice::Stop => return Ok(()),
            };

            let mut deleted = Vec::new();
            for i in picked {
                let video = entries[i].video.clone();
                match self.choose(video, report).await {
                    Some(entry) => entries[i] = entry,
                    None => deleted.push(i),
                }
            }
            for i in deleted.into_iter().rev() {
                entries.remove(i);
            }
        }
        Ok(())
    }

    /// Read a list selection; `letters` map single letters to answers, checked in order
    async fn read_choice(&self, len: usize, letters: &[(char, ListChoice)]) -> Result<ListChoice, DomainError> {
        loop {
            let Some(input) = self.prompt.read_line("Selection (1,1-3,1-2-9): ").await? else {
                return Ok(ListChoice::Stop);
            };
            let input = input.trim().to_ascii_lowercase();
            if input.is_empty() {
                return Ok(ListChoice::Pending);
            }
            if let Some((_, choice)) = letters.iter().find(|(letter, _)| input.contains(*letter)) {
                return Ok(choice.clone());
            }
            match parse_index_range(&input, len) {
                Ok(indices) => {
                    return Ok(ListChoice::Picked(indices.into_iter().map(|i| i - 1).collect()))
                }
                Err(e) => {
                    warn!("{}", e);
                    self.prompt.say("Invalid input, please try again.").await;
                }
            }
        }
    }

    /// Write the cut list for `video` next to the expected cut output
    async fn export(&self, video: &Path, chosen: &ChosenCutlist) -> Result<PathBuf, DomainError> {
        let path = self.settings.cut_dir.join(format!(
            "{}.{}",
            PathUtils::file_name(video),
            CUTLIST_EXTENSION
        ));
        let text = chosen
            .record
            .generate_raw_text()
            .unwrap_or_else(|| chosen.timing.to_raw_text());
        self.fs.write_text(&path, &text).await?;
        self.prompt
            .say(&format!(
                "{} -> {} (output name: {})",
                PathUtils::file_name(video),
                path.display(),
                chosen.output_name
            ))
            .await;
        Ok(path)
    }

    async fn check(&self, entries: &[&BatchEntry], report: &mut BatchReport) -> Result<(), DomainError> {
        let mut checked = vec![0usize; entries.len()];

        while !entries.is_empty() {
            self.prompt.say("").await;
            for (i, entry) in entries.iter().enumerate() {
                let mark = if checked[i] > 0 { "x" } else { " " };
                self.prompt
                    .say(&format!("[{:2}] {} {}", i + 1, mark, PathUtils::file_name(&entry.video)))
                    .await;
            }
            let pending: Vec<usize> = (0..entries.len()).filter(|&i| checked[i] == 0).collect();
            if pending.is_empty() {
                self.prompt.say("[ f] check all").await;
                self.prompt.say("[ a] or empty input: finish").await;
            } else {
                self.prompt.say("[ n] check none and finish").await;
                self.prompt.say("[ f] check all").await;
                self.prompt.say("[ a] or empty input: check all unchecked").await;
            }

            let letters = [
                ('a', ListChoice::Pending),
                ('f', ListChoice::All),
                ('n', ListChoice::Stop),
            ];
            let picked = match self.read_choice(entries.len(), &letters).await? {
                ListChoice::Pending => pending,
                ListChoice::All => (0..entries.len()).collect(),
                ListChoice::Picked(picked) => picked,
                ListChoice::Stop => return Ok(()),
            };
            if picked.is_empty() {
                return Ok(());
            }

            let total = picked.len();
            for (n, i) in picked.into_iter().enumerate() {
                self.prompt.say(&format!("{} of {}", n + 1, total)).await;
                self.check_one(entries[i]).await;
                checked[i] += 1;
                report.checked.push(entries[i].video.clone());
            }
        }
        Ok(())
    }

    /// Play the cut output when it exists, then run the consumed hook
    async fn check_one(&self, entry: &BatchEntry) {
        let Some(chosen) = entry.chosen.as_ref() else {
            return;
        };
        let output = self.settings.cut_dir.join(&chosen.output_name);

        match self.fs.file_exists(&output).await {
            Ok(true) => {
                let plan = self
                    .selection
                    .settings()
                    .planner
                    .plan(&chosen.timing, PreviewMode::AfterCut);
                let job = PlayerJob {
                    video: output,
                    edl: render_edl(&plan),
                    subtitles: render_subtitles(&plan),
                };
                if let Err(e) = self.player.play(&job).await {
                    error!("Preview failed: {}", e);
                }
            }
            Ok(false) => info!("No cut output at {}", output.display()),
            Err(e) => warn!("Could not check {}: {}", output.display(), e),
        }

        if let Err(e) = self.sources.on_record_consumed(&chosen.record, &entry.video).await {
            error!("Follow-up for {} failed: {}", entry.video.display(), e);
        }
    }
}
