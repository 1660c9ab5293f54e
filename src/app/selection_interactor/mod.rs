// Selection interactor - Interactive choice of one cut list per video

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::planner::{render_edl, render_subtitles, PreviewPlanner};
use crate::ports::*;
use crate::sources::SourceSet;
use crate::utils::PathUtils;

/// Settings shared by every selection session
#[derive(Debug, Clone)]
pub struct SelectionSettings {
    /// Sources tried in this order until one offers candidates
    pub priority: Vec<SourceKind>,
    pub planner: PreviewPlanner,
    /// Output naming template
    pub cut_name: String,
}

/// Where a selection session currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoSourceTried,
    SourceActive,
    CandidateChosen,
    TimingResolved,
    Deleted,
}

/// Post-selection action typed on an input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Preview,
    ShowRaw,
    Delete,
}

impl Verb {
    /// Accepted spellings, longest first where they share a prefix
    const WORDS: [(&'static str, Verb); 4] = [
        ("preview", Verb::Preview),
        ("test", Verb::Preview),
        ("show-raw", Verb::ShowRaw),
        ("delete", Verb::Delete),
    ];

    fn strip(input: &str) -> Option<(Verb, &str)> {
        Self::WORDS.iter().find_map(|(word, verb)| {
            strip_prefix_ignore_case(input, word).map(|rest| (*verb, rest))
        })
    }
}

fn strip_prefix_ignore_case<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    let head = input.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &input[prefix.len()..])
}

/// Interactor running one selection session per video
pub struct SelectionInteractor {
    sources: Arc<SourceSet>,
    prompt: Arc<dyn PromptPort>,
    fs: Arc<dyn FsPort>,
    player: Arc<dyn PlayerPort>,
    settings: SelectionSettings,
}

impl SelectionInteractor {
    /// Create new selection interactor with injected ports
    pub fn new(
        sources: Arc<SourceSet>,
        prompt: Arc<dyn PromptPort>,
        fs: Arc<dyn FsPort>,
        player: Arc<dyn PlayerPort>,
        settings: SelectionSettings,
    ) -> Self {
        Self {
            sources,
            prompt,
            fs,
            player,
            settings,
        }
    }

    pub fn settings(&self) -> &SelectionSettings {
        &self.settings
    }

    /// Let the user pick a cut list for `video`
    pub async fn choose(&self, video: &Path) -> Result<SelectionOutcome, DomainError> {
        let mut session = SelectionSession::new(self, video);
        session.run().await
    }
}

/// State of one selection run; owns the records fetched during it
struct SelectionSession<'a> {
    interactor: &'a SelectionInteractor,
    video: &'a Path,
    state: SessionState,
    active: Option<SourceKind>,
    candidates: Vec<CutRecord>,
    choice: Option<CutRecord>,
}

impl<'a> SelectionSession<'a> {
    fn new(interactor: &'a SelectionInteractor, video: &'a Path) -> Self {
        Self {
            interactor,
            video,
            state: SessionState::NoSourceTried,
            active: None,
            candidates: Vec::new(),
            choice: None,
        }
    }

    fn enter(&mut self, state: SessionState) {
        debug!(from = ?self.state, to = ?state, "selection state");
        self.state = state;
    }

    fn prompt(&self) -> &dyn PromptPort {
        self.interactor.prompt.as_ref()
    }

    async fn run(&mut self) -> Result<SelectionOutcome, DomainError> {
        let file_name = PathUtils::file_name(self.video);
        self.prompt().say("").await;
        self.prompt().say(&format!("  {}", file_name)).await;
        self.prompt().say("").await;

        if !self.activate_first_source().await {
            info!("No cut list found for {}", file_name);
            return Ok(SelectionOutcome::Skipped(SkipReason::NoCutlistFound));
        }

        loop {
            let Some(line) = self.prompt().read_line("Selection/Test: ").await? else {
                return Ok(SelectionOutcome::Skipped(SkipReason::InputClosed));
            };
            if line.trim().is_empty() && self.choice.is_none() {
                self.prompt().say("File will not be cut").await;
                return Ok(SelectionOutcome::Skipped(SkipReason::UserSkipped));
            }

            let verbs = self.consume_line(&line).await;

            if verbs.contains(&Verb::Delete) && self.confirm_delete().await? {
                return Ok(SelectionOutcome::Deleted);
            }
            if verbs.contains(&Verb::Preview) {
                self.preview().await;
                continue;
            }
            if verbs.contains(&Verb::ShowRaw) {
                self.show_raw().await;
                continue;
            }

            if let Some(record) = self.choice.take() {
                if let Some(chosen) = self.finalize(record).await? {
                    return Ok(SelectionOutcome::Chosen(chosen));
                }
            }
        }
    }

    /// Fallback over the configured priority; errors count as no candidates
    async fn activate_first_source(&mut self) -> bool {
        for kind in self.interactor.settings.priority.clone() {
            let candidates = self.list(kind).await;
            if !candidates.is_empty() {
                self.show_listing(kind, candidates).await;
                return true;
            }
            debug!("source '{}' offered no candidates", kind);
        }
        false
    }

    async fn list(&self, kind: SourceKind) -> Vec<CutRecord> {
        let Some(source) = self.interactor.sources.get(kind) else {
            warn!("source '{}' is not configured", kind);
            return Vec::new();
        };
        match source.list_candidates(self.video).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("source '{}' failed: {}", kind, e);
                Vec::new()
            }
        }
    }

    async fn show_listing(&mut self, kind: SourceKind, candidates: Vec<CutRecord>) {
        self.active = Some(kind);
        self.candidates = candidates;
        self.prompt()
            .say(&format!("Source '{}': {}", kind, kind.description()))
            .await;
        if let Some(source) = self.interactor.sources.get(kind) {
            for line in source.render_view(&self.candidates) {
                self.prompt().say(&line).await;
            }
        }
        self.enter(SessionState::SourceActive);
    }

    /// Tokenize one input line left to right, returning the queued verbs
    async fn consume_line(&mut self, line: &str) -> Vec<Verb> {
        let mut verbs = Vec::new();
        let mut rest = line.trim_start();

        while !rest.is_empty() {
            if let Some((kind, after)) = self.strip_source_name(rest) {
                self.prompt()
                    .say(&format!("Switching to source '{}'", kind))
                    .await;
                let candidates = self.list(kind).await;
                self.show_listing(kind, candidates).await;
                rest = after;
            } else if let Some((verb, after)) = Verb::strip(rest) {
                verbs.push(verb);
                rest = after;
            } else {
                let (token, after) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                self.choice = self.resolve(token).await;
                if self.choice.is_some() {
                    self.enter(SessionState::CandidateChosen);
                }
                rest = after;
            }
            rest = rest.trim_start();
        }

        verbs
    }

    fn strip_source_name<'l>(&self, input: &'l str) -> Option<(SourceKind, &'l str)> {
        self.interactor
            .sources
            .kinds()
            .into_iter()
            .find_map(|kind| strip_prefix_ignore_case(input, kind.name()).map(|rest| (kind, rest)))
    }

    async fn resolve(&mut self, token: &str) -> Option<CutRecord> {
        let interactor = self.interactor;
        let source = self.active.and_then(|kind| interactor.sources.get(kind))?;
        match source
            .resolve_candidate(token, &mut self.candidates, self.video)
            .await
        {
            Ok(record) => record,
            Err(e) => {
                warn!("Could not use '{}': {}", token, e);
                None
            }
        }
    }

    async fn confirm_delete(&mut self) -> Result<bool, DomainError> {
        let question = format!(
            "Really delete {}? [y/N]: ",
            PathUtils::file_name(self.video)
        );
        let answer = self.prompt().read_line(&question).await?.unwrap_or_default();
        if !answer.trim().eq_ignore_ascii_case("y") {
            return Ok(false);
        }

        match self.interactor.fs.delete_file(self.video).await {
            Ok(()) => {
                info!("Deleted {}", self.video.display());
                self.choice = None;
                self.enter(SessionState::Deleted);
                Ok(true)
            }
            Err(e) => {
                error!("Failed to delete {}: {}", self.video.display(), e);
                Ok(false)
            }
        }
    }

    async fn show_raw(&self) {
        let Some(record) = &self.choice else {
            self.prompt().say("No cut list chosen to show!").await;
            return;
        };
        match self.interactor.sources.raw_text(record).await {
            Ok(text) => self.prompt().say(&text).await,
            Err(e) => warn!("Could not load cut list {}: {}", record.id(), e),
        }
    }

    /// Play the chosen cut list, then drop the choice
    async fn preview(&mut self) {
        let Some(record) = self.choice.take() else {
            self.prompt().say("No cut list chosen to test!").await;
            return;
        };
        self.enter(SessionState::SourceActive);

        let timing = match self.interactor.sources.timing_of(&record).await {
            Ok(timing) => timing,
            Err(e) => {
                warn!("Could not load cut list {}: {}", record.id(), e);
                return;
            }
        };
        let plan = self
            .interactor
            .settings
            .planner
            .plan(timing, PreviewMode::BeforeCut);
        let job = PlayerJob {
            video: self.video.to_path_buf(),
            edl: render_edl(&plan),
            subtitles: render_subtitles(&plan),
        };
        if let Err(e) = self.interactor.player.play(&job).await {
            error!("Preview failed: {}", e);
        }
    }

    /// Resolve timing and output name; `None` sends the user back to the prompt
    async fn finalize(&mut self, record: CutRecord) -> Result<Option<ChosenCutlist>, DomainError> {
        let timing = match self.interactor.sources.timing_of(&record).await {
            Ok(timing) => timing.clone(),
            Err(e) => {
                warn!("Could not load cut list {}: {}", record.id(), e);
                self.enter(SessionState::SourceActive);
                return Ok(None);
            }
        };
        self.enter(SessionState::TimingResolved);

        let file_name = PathUtils::file_name(self.video);
        let generic = OutputNaming::render(
            &self.interactor.settings.cut_name,
            &file_name,
            record.metadata().rating,
            record.metarating(),
        );
        let output_name = match &timing.suggested_name {
            Some(suggested) => {
                let proposed = OutputNaming::from_suggestion(suggested, &file_name);
                self.pick_name(generic, proposed).await?
            }
            None => generic,
        };

        Ok(Some(ChosenCutlist {
            record,
            timing,
            output_name,
        }))
    }

    async fn pick_name(&self, generic: String, suggested: String) -> Result<String, DomainError> {
        self.prompt().say("Output name:").await;
        self.prompt().say(&format!("[1] {}", generic)).await;
        self.prompt().say(&format!("[2] {}", suggested)).await;
        let answer = self
            .prompt()
            .read_line("Name [1]: ")
            .await?
            .unwrap_or_default();
        Ok(if answer.trim() == "2" { suggested } else { generic })
    }
}
