//! Community web service source

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::ContentCache;
use crate::codec::{extract_tags, split_candidates};
use crate::domain::errors::DomainError;
use crate::domain::model::{CutRecord, RecordMetadata, SourceKind};
use crate::domain::rules::{CandidateRanking, SearchNameRule};
use crate::ports::{PromptPort, TransportPort};
use crate::utils::{PathUtils, TimeFormatter};

/// Protocol version announced in search requests
pub const SEARCH_VERSION: &str = "0.9.8.0";

const RATING_SCALE: [&str; 6] = [
    "[0] Dummy or no cut list",
    "[1] Beginning and end cut roughly",
    "[2] Beginning and end cut fairly accurately",
    "[3] Acceptable cut, commercials removed",
    "[4] Duplicate scenes not removed or nicer cuts possible",
    "[5] All unwanted material removed frame-accurately",
];

/// Cut lists from the community service
pub struct NetworkSource {
    transport: Arc<dyn TransportPort>,
    prompt: Arc<dyn PromptPort>,
    search_cache: Arc<ContentCache>,
    content_cache: Arc<ContentCache>,
    base_url: String,
    rate_after_use: bool,
}

impl NetworkSource {
    pub fn new(
        transport: Arc<dyn TransportPort>,
        prompt: Arc<dyn PromptPort>,
        search_cache: Arc<ContentCache>,
        content_cache: Arc<ContentCache>,
        base_url: impl Into<String>,
        rate_after_use: bool,
    ) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            transport,
            prompt,
            search_cache,
            content_cache,
            base_url,
            rate_after_use,
        }
    }

    pub fn caches(&self) -> Vec<&ContentCache> {
        vec![self.search_cache.as_ref(), self.content_cache.as_ref()]
    }

    pub fn search_url(&self, name: &str) -> String {
        format!(
            "{}getxml.php?name={}&version={}",
            self.base_url,
            urlencoding::encode(name),
            SEARCH_VERSION
        )
    }

    pub fn content_url(&self, id: &str) -> String {
        format!("{}getfile.php?id={}", self.base_url, urlencoding::encode(id))
    }

    pub fn rating_url(&self, id: &str, rating: u8) -> String {
        format!(
            "{}rate.php?rate={}&rating={}",
            self.base_url,
            urlencoding::encode(id),
            rating
        )
    }

    /// Search by file name, retrying compound names with a shorter name
    pub async fn list_candidates(&self, video: &Path) -> Result<Vec<CutRecord>, DomainError> {
        let name = PathUtils::file_name(video);
        info!("Fetching cut list overview for {}", name);

        let mut records = self.search(&name).await?;
        if records.is_empty() {
            if let Some(shorter) = SearchNameRule::shortened(&name) {
                info!("No cut lists for {}, retrying as {}", name, shorter);
                records = self.search(&shorter).await?;
            }
        }

        CandidateRanking::rank(&mut records);
        Ok(records)
    }

    async fn search(&self, name: &str) -> Result<Vec<CutRecord>, DomainError> {
        let url = self.search_url(name);
        let listing = self
            .search_cache
            .get_or_fetch(name, || self.transport.get_text(&url))
            .await?;
        Ok(parse_listing(&listing))
    }

    /// Raw cut list text, cached for days
    pub async fn fetch_content(&self, id: &str) -> Result<String, DomainError> {
        let url = self.content_url(id);
        self.content_cache
            .get_or_fetch(id, || self.transport.get_text(&url))
            .await
    }

    /// Send a 0-5 rating, returning the service answer
    pub async fn rate(&self, id: &str, rating: u8) -> Result<String, DomainError> {
        debug!("rating cut list {} with {}", id, rating);
        self.transport.get_text(&self.rating_url(id, rating)).await
    }

    /// Ask the user for a rating of the used cut list
    pub async fn on_record_consumed(&self, record: &CutRecord) -> Result<(), DomainError> {
        if !self.rate_after_use {
            self.prompt.say("Rating skipped.").await;
            return Ok(());
        }

        self.prompt
            .say(&format!("Please rate cut list {}:", record.id()))
            .await;
        for line in RATING_SCALE {
            self.prompt.say(line).await;
        }

        loop {
            let Some(line) = self.prompt.read_line("Rating: ").await? else {
                return Ok(());
            };
            let input = line.trim();
            if input.is_empty() {
                return Ok(());
            }
            match input.parse::<u8>() {
                Ok(rating) if rating <= 5 => {
                    self.prompt
                        .say(&format!(
                            "Sending rating {} for cut list '{}'...",
                            rating,
                            record.id()
                        ))
                        .await;
                    let answer = self.rate(record.id(), rating).await?;
                    self.prompt.say(&format!("Answer: '{}'", answer.trim())).await;
                    return Ok(());
                }
                _ => warn!("Illegal input: {}", input),
            }
        }
    }
}

/// Records of every candidate in a search listing, in listing order
pub fn parse_listing(xml: &str) -> Vec<CutRecord> {
    split_candidates(xml)
        .into_iter()
        .filter_map(|body| {
            let metadata = RecordMetadata::from_tags(extract_tags(body));
            if metadata.id.is_empty() {
                warn!("candidate without id ignored");
                return None;
            }
            Some(CutRecord::new(SourceKind::Network, metadata))
        })
        .collect()
}

pub(crate) fn render_view(candidates: &[CutRecord]) -> Vec<String> {
    let mut lines = vec![format!("{} cut list(s) found", candidates.len()), String::new()];
    for (i, record) in candidates.iter().enumerate() {
        lines.extend(render_candidate(i + 1, record));
    }
    lines
}

/// Listing block of one candidate
pub fn render_candidate(number: usize, record: &CutRecord) -> Vec<String> {
    let meta = record.metadata();
    let formatter = TimeFormatter::new();

    let units = if meta.uses_frame_units {
        "frames"
    } else if meta.uses_time_units {
        "time"
    } else {
        "unknown"
    };
    let cuts = meta
        .cut_count
        .map(|n| n.to_string())
        .unwrap_or_else(|| "?".to_string());
    let duration = meta
        .duration_seconds
        .map(|d| formatter.format_clock(d))
        .unwrap_or_else(|| "?".to_string());
    let rating = meta
        .rating
        .map(|r| format!("{:.2}", r))
        .unwrap_or_else(|| "-".to_string());
    let by_author = meta
        .rating_by_author
        .map(|r| format!("{:.1}", r))
        .unwrap_or_else(|| "-".to_string());

    let mut lines = vec![
        format!("[{:2}] cuts: {} ({})  duration: {}", number, cuts, units, duration),
        format!(
            "     {:.2} rating: {} ({}/{})  author: {} ({})",
            record.metarating(),
            rating,
            meta.rating_count.unwrap_or(0),
            meta.download_count.unwrap_or(0),
            meta.author.as_deref().unwrap_or("---"),
            by_author
        ),
    ];

    let errors = meta.error_labels();
    if !errors.is_empty() {
        lines.push(format!("     errors: {}", errors.join(", ")));
    }
    if let Some(comment) = &meta.user_comment {
        lines.push(format!("     comment: {}", comment));
    }
    lines
}
