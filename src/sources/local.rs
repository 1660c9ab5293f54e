//! Locally authored cut lists
//!
//! Every video keeps a log of the cut lists authored for it in a dedicated
//! cache. Entries are joined by a fixed delimiter; each entry starts with a
//! timestamp line followed by the cut list text.

use std::path::Path;
use std::sync::Arc;

use chrono::Local;
use tracing::{info, warn};

use crate::cache::ContentCache;
use crate::codec::cutlist_ini::render_section;
use crate::domain::errors::DomainError;
use crate::domain::model::{CutRecord, RecordMetadata, SourceKind};
use crate::ports::{EditorPort, PromptPort};
use crate::utils::{PathUtils, TimeFormatter};

/// Separator between stored entries
pub const ENTRY_DELIMITER: &str = "\n;;;; cutsel entry ;;;;\n";

/// Token that starts the editor
const NEW_TOKEN: &str = "n";

/// One authored cut list in the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    pub heading: String,
    pub body: String,
}

/// Split stored text into entries
pub fn split_entries(stored: &str) -> Vec<StoredEntry> {
    stored
        .split(ENTRY_DELIMITER)
        .filter(|chunk| !chunk.trim().is_empty())
        .map(|chunk| match chunk.split_once('\n') {
            Some((heading, body)) => StoredEntry {
                heading: heading.to_string(),
                body: body.to_string(),
            },
            None => StoredEntry {
                heading: chunk.to_string(),
                body: String::new(),
            },
        })
        .collect()
}

/// Join entries back into stored text
pub fn join_entries(entries: &[StoredEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("{}\n{}", entry.heading, entry.body))
        .collect::<Vec<_>>()
        .join(ENTRY_DELIMITER)
}

/// Cut lists authored with the external editor
pub struct LocalAuthoredSource {
    store: Arc<ContentCache>,
    editor: Arc<dyn EditorPort>,
    prompt: Arc<dyn PromptPort>,
    author: String,
}

impl LocalAuthoredSource {
    pub fn new(
        store: Arc<ContentCache>,
        editor: Arc<dyn EditorPort>,
        prompt: Arc<dyn PromptPort>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            store,
            editor,
            prompt,
            author: author.into(),
        }
    }

    pub fn caches(&self) -> Vec<&ContentCache> {
        vec![self.store.as_ref()]
    }

    async fn load(&self, name: &str) -> Result<Vec<StoredEntry>, DomainError> {
        if !self.store.contains(name) {
            return Ok(Vec::new());
        }
        let stored = self
            .store
            .get_or_fetch(name, || async { Ok(String::new()) })
            .await?;
        Ok(split_entries(&stored))
    }

    fn save(&self, name: &str, entries: &[StoredEntry]) -> Result<(), DomainError> {
        self.store.update(name, &join_entries(entries))
    }

    /// Every entry stored for `video`, oldest first
    pub async fn list_candidates(&self, video: &Path) -> Result<Vec<CutRecord>, DomainError> {
        let name = PathUtils::file_name(video);
        let records = self
            .load(&name)
            .await?
            .into_iter()
            .map(|entry| {
                let mut metadata = RecordMetadata::with_id(entry.heading.clone());
                metadata.user_comment = Some(entry.heading);
                CutRecord::with_content(SourceKind::LocalAuthored, metadata, entry.body)
            })
            .collect();
        Ok(records)
    }

    /// `n` authors a new cut list, a number picks a stored one
    pub async fn resolve_candidate(
        &self,
        token: &str,
        candidates: &mut Vec<CutRecord>,
        video: &Path,
    ) -> Result<Option<CutRecord>, DomainError> {
        if !token.trim().eq_ignore_ascii_case(NEW_TOKEN) {
            return Ok(super::pick_by_index(token, candidates));
        }

        let Some(model) = self.editor.author(video).await? else {
            self.prompt.say("No cut list created.").await;
            return Ok(None);
        };

        let heading = TimeFormatter::new().format_entry_timestamp(Local::now());
        let body = model.to_raw_text();
        let name = PathUtils::file_name(video);
        let mut entries = self.load(&name).await?;
        entries.push(StoredEntry {
            heading: heading.clone(),
            body: body.clone(),
        });
        self.save(&name, &entries)?;
        info!("Stored new cut list for {}", name);

        let mut metadata = RecordMetadata::with_id(heading);
        metadata.user_comment = Some("newly created".to_string());
        let record = CutRecord::with_content(SourceKind::LocalAuthored, metadata, body);
        candidates.push(record.clone());
        self.prompt
            .say(&format!("[{:2}] Cut list: newly created", candidates.len()))
            .await;
        Ok(Some(record))
    }

    /// Offer to attach an `[Info]` section to the stored entry
    pub async fn on_record_consumed(&self, record: &CutRecord, video: &Path) -> Result<(), DomainError> {
        let Some(body) = record.inline_content() else {
            return Ok(());
        };

        let answer = self
            .prompt
            .read_line("Attach an info section to this cut list [Y/n]: ")
            .await?
            .ok_or(DomainError::InputClosed)?;
        if answer.to_ascii_lowercase().contains('n') {
            return Ok(());
        }

        let suggested = record
            .resolved_timing()
            .and_then(|timing| timing.suggested_name.clone())
            .unwrap_or_default();
        let mut fields = vec![
            ("Author", "Author", self.author.clone()),
            ("Your rating", "RatingByAuthor", String::new()),
            ("Comment", "UserComment", String::new()),
            ("Suggested movie name", "SuggestedMovieName", suggested),
        ];

        let info = loop {
            for (display, _, value) in fields.iter_mut() {
                let input = self
                    .prompt
                    .read_line(&format!("{}[{}]: ", display, value))
                    .await?
                    .ok_or(DomainError::InputClosed)?;
                let input = input.trim();
                if input.eq_ignore_ascii_case("clear") {
                    value.clear();
                } else if !input.is_empty() {
                    *value = input.to_string();
                }
            }

            let info = render_info(&fields);
            self.prompt.say("Cut list info:").await;
            self.prompt.say(&info).await;

            let accept = self
                .prompt
                .read_line("Accept info [Y/n]: ")
                .await?
                .ok_or(DomainError::InputClosed)?;
            if !accept.to_ascii_lowercase().contains('n') {
                break info;
            }
        };

        let name = PathUtils::file_name(video);
        let mut entries = self.load(&name).await?;
        let Some(entry) = entries.iter_mut().find(|entry| entry.body == body) else {
            warn!("Cut list entry for {} is no longer stored", name);
            return Ok(());
        };

        let mut updated = strip_info(&entry.body).to_string();
        if !updated.ends_with('\n') {
            updated.push('\n');
        }
        updated.push_str(&info);
        entry.body = updated;
        self.save(&name, &entries)
    }
}

fn render_info(fields: &[(&str, &str, String)]) -> String {
    let mut entries: Vec<(&str, &str)> = fields
        .iter()
        .map(|(_, key, value)| (*key, value.as_str()))
        .collect();
    for key in [
        "EPGError",
        "ActualContent",
        "MissingBeginning",
        "MissingEnding",
        "MissingAudio",
        "MissingVideo",
        "OtherError",
        "OtherErrorDescription",
    ] {
        entries.push((key, ""));
    }
    render_section("Info", &entries)
}

fn strip_info(body: &str) -> &str {
    match body.find("\n[Info]") {
        Some(pos) => &body[..=pos],
        None => body,
    }
}

pub(crate) fn render_view(candidates: &[CutRecord]) -> Vec<String> {
    let mut lines = vec![format!("{} cut list(s) found", candidates.len())];
    for (i, record) in candidates.iter().enumerate() {
        lines.push(format!(
            "[{:2}] Cut list: {}",
            i + 1,
            record.metadata().user_comment.as_deref().unwrap_or("")
        ));
    }
    lines.push(format!("[{:>2}] author a new cut list", NEW_TOKEN));
    lines
}
