//! Cut list sources
//!
//! Every source lists candidates for a video, turns one token of user input
//! into a record, supplies raw cut list text and runs a hook once a record
//! has been used.

use std::path::Path;

use tracing::{debug, warn};

use crate::cache::ContentCache;
use crate::domain::errors::DomainError;
use crate::domain::model::{CutRecord, SourceKind, TimingModel};

pub mod filesystem;
pub mod local;
pub mod network;

pub use filesystem::FileSystemSource;
pub use local::LocalAuthoredSource;
pub use network::NetworkSource;

/// One provider of cut lists
pub enum CutlistSource {
    Network(NetworkSource),
    LocalAuthored(LocalAuthoredSource),
    FileSystem(FileSystemSource),
}

impl CutlistSource {
    pub fn kind(&self) -> SourceKind {
        match self {
            CutlistSource::Network(_) => SourceKind::Network,
            CutlistSource::LocalAuthored(_) => SourceKind::LocalAuthored,
            CutlistSource::FileSystem(_) => SourceKind::FileSystem,
        }
    }

    /// Caches the source reads and writes through
    pub fn caches(&self) -> Vec<&ContentCache> {
        match self {
            CutlistSource::Network(source) => source.caches(),
            CutlistSource::LocalAuthored(source) => source.caches(),
            CutlistSource::FileSystem(_) => Vec::new(),
        }
    }

    /// Candidates for `video`, best first
    pub async fn list_candidates(&self, video: &Path) -> Result<Vec<CutRecord>, DomainError> {
        match self {
            CutlistSource::Network(source) => source.list_candidates(video).await,
            CutlistSource::LocalAuthored(source) => source.list_candidates(video).await,
            CutlistSource::FileSystem(_) => Ok(Vec::new()),
        }
    }

    /// Turn one input token into a record; `None` when the token is not usable
    pub async fn resolve_candidate(
        &self,
        token: &str,
        candidates: &mut Vec<CutRecord>,
        video: &Path,
    ) -> Result<Option<CutRecord>, DomainError> {
        match self {
            CutlistSource::Network(_) => Ok(pick_by_index(token, candidates)),
            CutlistSource::LocalAuthored(source) => {
                source.resolve_candidate(token, candidates, video).await
            }
            CutlistSource::FileSystem(source) => source.resolve_candidate(token).await,
        }
    }

    /// Raw cut list text for `id`
    pub async fn fetch_content(&self, id: &str) -> Result<String, DomainError> {
        match self {
            CutlistSource::Network(source) => source.fetch_content(id).await,
            CutlistSource::LocalAuthored(_) => Err(DomainError::Unsupported(
                "locally authored cut lists are not fetched".to_string(),
            )),
            CutlistSource::FileSystem(source) => source.fetch_content(id).await,
        }
    }

    /// Hook run after `record` was used for `video`
    pub async fn on_record_consumed(&self, record: &CutRecord, video: &Path) -> Result<(), DomainError> {
        match self {
            CutlistSource::Network(source) => source.on_record_consumed(record).await,
            CutlistSource::LocalAuthored(source) => source.on_record_consumed(record, video).await,
            CutlistSource::FileSystem(_) => Ok(()),
        }
    }

    /// Lines presenting `candidates` to the user
    pub fn render_view(&self, candidates: &[CutRecord]) -> Vec<String> {
        match self {
            CutlistSource::Network(_) => network::render_view(candidates),
            CutlistSource::LocalAuthored(_) => local::render_view(candidates),
            CutlistSource::FileSystem(_) => filesystem::render_view(),
        }
    }
}

/// Pick a candidate by its 1-based listing number
pub(crate) fn pick_by_index(token: &str, candidates: &[CutRecord]) -> Option<CutRecord> {
    match token.trim().parse::<usize>() {
        Ok(n) if (1..=candidates.len()).contains(&n) => Some(candidates[n - 1].clone()),
        Ok(_) => {
            warn!("Illegal index: {}", token);
            None
        }
        Err(_) => {
            warn!("Illegal input: {}", token);
            None
        }
    }
}

/// All configured sources, looked up by kind
pub struct SourceSet {
    sources: Vec<CutlistSource>,
}

impl SourceSet {
    pub fn new(sources: Vec<CutlistSource>) -> Self {
        Self { sources }
    }

    pub fn get(&self, kind: SourceKind) -> Option<&CutlistSource> {
        self.sources.iter().find(|source| source.kind() == kind)
    }

    pub fn kinds(&self) -> Vec<SourceKind> {
        self.sources.iter().map(CutlistSource::kind).collect()
    }

    fn require(&self, kind: SourceKind) -> Result<&CutlistSource, DomainError> {
        self.get(kind)
            .ok_or_else(|| DomainError::Unsupported(format!("source '{}' is not configured", kind)))
    }

    /// Raw text of `record`, from the record itself or its source
    pub async fn raw_text(&self, record: &CutRecord) -> Result<String, DomainError> {
        let source = self.require(record.origin())?;
        record
            .raw_text(|id| async move { source.fetch_content(&id).await })
            .await
    }

    /// Timing model of `record`, parsed once
    pub async fn timing_of<'r>(&self, record: &'r CutRecord) -> Result<&'r TimingModel, DomainError> {
        let source = self.require(record.origin())?;
        record
            .timing_model(|id| async move { source.fetch_content(&id).await })
            .await
    }

    /// Rewrite the index of every disk-backed cache, dropping stale lines
    pub fn flush_caches(&self) {
        for cache in self.sources.iter().flat_map(CutlistSource::caches) {
            if !cache.is_persistent() {
                debug!("cache '{}' is memory only", cache.name());
                continue;
            }
            if let Err(e) = cache.flush() {
                warn!("could not flush cache '{}': {}", cache.name(), e);
            }
        }
    }

    /// Run the consumed hook of the source `record` came from
    pub async fn on_record_consumed(&self, record: &CutRecord, video: &Path) -> Result<(), DomainError> {
        self.require(record.origin())?
            .on_record_consumed(record, video)
            .await
    }
}
