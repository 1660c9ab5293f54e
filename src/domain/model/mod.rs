// Domain models - Core types and data structures

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::codec::cutlist_ini;
use crate::domain::errors::DomainError;

/// Correction applied to sizes written by 32-bit signed writers
const SIZE_WRAPAROUND: i64 = 1 << 32;

/// Where a cut list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    /// Community web service
    Network,
    /// Authored locally with an external editor
    LocalAuthored,
    /// Read from a path on disk
    FileSystem,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [
        SourceKind::Network,
        SourceKind::LocalAuthored,
        SourceKind::FileSystem,
    ];

    /// Name the user types to switch to this source
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::Network => "internet",
            SourceKind::LocalAuthored => "own",
            SourceKind::FileSystem => "file",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SourceKind::Network => "Download cut lists from the community service.",
            SourceKind::LocalAuthored => "Author your own cut lists.",
            SourceKind::FileSystem => "Use cut lists from disk.",
        }
    }

    /// Parse a source name
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        let trimmed = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                DomainError::BadArgs(format!(
                    "Unknown source: {}. Valid sources: internet, own, file",
                    name
                ))
            })
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One interval of a cut list, in frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cut {
    pub start_frame: i64,
    pub duration_frames: i64,
}

impl Cut {
    /// Create a cut, flipping negative durations so the end frame is preserved.
    /// Values whose far end does not fit into a frame number saturate.
    pub fn new(start_frame: i64, duration_frames: i64) -> Self {
        Self::checked(start_frame, duration_frames).unwrap_or_else(|| {
            if duration_frames < 0 {
                Self {
                    start_frame: start_frame.saturating_add(duration_frames),
                    duration_frames: duration_frames.saturating_neg(),
                }
            } else {
                Self {
                    start_frame,
                    duration_frames,
                }
            }
        })
    }

    /// Like [`Cut::new`], but `None` when either end overflows
    pub fn checked(start_frame: i64, duration_frames: i64) -> Option<Self> {
        let far_end = start_frame.checked_add(duration_frames)?;
        if duration_frames < 0 {
            Some(Self {
                start_frame: far_end,
                duration_frames: duration_frames.checked_neg()?,
            })
        } else {
            Some(Self {
                start_frame,
                duration_frames,
            })
        }
    }

    /// Create a cut from second values
    pub fn from_seconds(start: f64, duration: f64, fps: f64) -> Self {
        Self::new(seconds_to_frame(start, fps), seconds_to_frame(duration, fps))
    }

    /// Frame right after the cut
    pub fn end_frame(&self) -> i64 {
        self.start_frame.saturating_add(self.duration_frames)
    }
}

/// Convert seconds to the nearest frame
pub fn seconds_to_frame(seconds: f64, fps: f64) -> i64 {
    (seconds * fps).round() as i64
}

/// Undo the 32-bit signed wraparound of legacy size fields
pub fn correct_size_wraparound(size: i64) -> u64 {
    if size < 0 {
        (size + SIZE_WRAPAROUND).max(0) as u64
    } else {
        size as u64
    }
}

/// Normalized timing of one cut list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingModel {
    pub fps: f64,
    pub cuts: Vec<Cut>,
    pub source_file: String,
    pub source_size_bytes: u64,
    pub suggested_name: Option<String>,
}

impl TimingModel {
    /// Create new timing model with validation
    pub fn new(
        fps: f64,
        cuts: Vec<Cut>,
        source_file: String,
        source_size_bytes: u64,
    ) -> Result<Self, DomainError> {
        if !(fps > 0.0) || !fps.is_finite() {
            return Err(DomainError::BadArgs(format!(
                "Frame rate must be positive, got {}",
                fps
            )));
        }
        if cuts.is_empty() {
            return Err(DomainError::MissingField("cut list".to_string()));
        }

        Ok(Self {
            fps,
            cuts,
            source_file,
            source_size_bytes,
            suggested_name: None,
        })
    }

    /// Attach a suggested movie name
    pub fn with_suggested_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.suggested_name = if name.trim().is_empty() {
            None
        } else {
            Some(name)
        };
        self
    }

    /// Parse cut list text
    pub fn from_raw_text(text: &str) -> Result<Self, DomainError> {
        cutlist_ini::decode_timing_model(text)
    }

    /// Serialize back into cut list text
    pub fn to_raw_text(&self) -> String {
        cutlist_ini::encode_timing_model(self)
    }

    pub fn frame_to_seconds(&self, frame: i64) -> f64 {
        frame as f64 / self.fps
    }

    /// Cut intervals as (start, duration) in seconds
    pub fn cuts_in_seconds(&self) -> Vec<(f64, f64)> {
        self.cuts
            .iter()
            .map(|cut| {
                (
                    self.frame_to_seconds(cut.start_frame),
                    self.frame_to_seconds(cut.duration_frames),
                )
            })
            .collect()
    }
}

/// Labels for the six positional error flags of a candidate
const ERROR_FLAG_LABELS: [&str; 6] = [
    "missing beginning",
    "missing ending",
    "video",
    "audio",
    "error",
    "EPG",
];

/// Community metadata of one candidate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub id: String,
    pub name: Option<String>,
    pub rating: Option<f64>,
    pub rating_count: Option<u32>,
    pub author: Option<String>,
    pub rating_by_author: Option<f64>,
    pub download_count: Option<u64>,
    pub error_flags: Option<String>,
    pub other_error_description: Option<String>,
    pub user_comment: Option<String>,
    pub cut_count: Option<u32>,
    pub duration_seconds: Option<f64>,
    pub uses_frame_units: bool,
    pub uses_time_units: bool,
    /// Tags this crate does not interpret
    pub additional_attributes: BTreeMap<String, String>,
}

impl RecordMetadata {
    /// Metadata carrying only an identifier
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Build metadata from flat tag/value pairs
    pub fn from_tags<I, K, V>(tags: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut meta = Self::default();
        for (tag, value) in tags {
            let value = value.as_ref().trim();
            match tag.as_ref() {
                "id" => meta.id = value.to_string(),
                "name" => meta.name = non_empty(value),
                "rating" => meta.rating = value.parse().ok(),
                "ratingcount" => meta.rating_count = value.parse().ok(),
                "author" => meta.author = non_empty(value),
                "ratingbyauthor" => meta.rating_by_author = value.parse().ok(),
                "downloadcount" => meta.download_count = value.parse().ok(),
                "errors" => meta.error_flags = non_empty(value),
                "othererrordescription" => meta.other_error_description = non_empty(value),
                "usercomment" => meta.user_comment = non_empty(value),
                "cuts" => meta.cut_count = value.parse().ok(),
                "duration" => meta.duration_seconds = value.parse().ok(),
                "withframes" => meta.uses_frame_units = is_truthy(value),
                "withtime" => meta.uses_time_units = is_truthy(value),
                other => {
                    meta.additional_attributes
                        .insert(other.to_string(), value.to_string());
                }
            }
        }
        meta
    }

    /// Composite ranking score, each term defaulted on its own
    pub fn metarating(&self) -> f64 {
        self.rating.unwrap_or(0.0)
            + self.rating_by_author.unwrap_or(-1.0)
            + f64::from(self.rating_count.unwrap_or(0)) / 50.0
            + self.download_count.unwrap_or(0) as f64 / 1000.0
    }

    /// Human labels for every raised error flag
    pub fn error_labels(&self) -> Vec<String> {
        let Some(flags) = self.error_flags.as_deref() else {
            return Vec::new();
        };
        flags
            .chars()
            .zip(ERROR_FLAG_LABELS.iter())
            .filter(|(flag, _)| *flag != '0')
            .map(|(_, label)| {
                if *label == "error" {
                    format!(
                        "error: {}",
                        self.other_error_description.as_deref().unwrap_or("?")
                    )
                } else {
                    label.to_string()
                }
            })
            .collect()
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn is_truthy(value: &str) -> bool {
    !value.is_empty() && value != "0" && !value.eq_ignore_ascii_case("false")
}

/// One candidate cut list
#[derive(Debug, Clone)]
pub struct CutRecord {
    origin: SourceKind,
    metadata: RecordMetadata,
    metarating: f64,
    inline_content: Option<String>,
    timing: OnceLock<TimingModel>,
}

impl CutRecord {
    /// Create a record whose text is fetched from its source on demand
    pub fn new(origin: SourceKind, metadata: RecordMetadata) -> Self {
        let metarating = metadata.metarating();
        Self {
            origin,
            metadata,
            metarating,
            inline_content: None,
            timing: OnceLock::new(),
        }
    }

    /// Create a record that already holds its cut list text
    pub fn with_content(
        origin: SourceKind,
        metadata: RecordMetadata,
        content: impl Into<String>,
    ) -> Self {
        let mut record = Self::new(origin, metadata);
        record.inline_content = Some(content.into());
        record
    }

    pub fn id(&self) -> &str {
        &self.metadata.id
    }

    pub fn origin(&self) -> SourceKind {
        self.origin
    }

    pub fn metadata(&self) -> &RecordMetadata {
        &self.metadata
    }

    pub fn metarating(&self) -> f64 {
        self.metarating
    }

    pub fn inline_content(&self) -> Option<&str> {
        self.inline_content.as_deref()
    }

    /// Raw cut list text, fetching it when the record does not hold it
    pub async fn raw_text<F, Fut>(&self, fetch: F) -> Result<String, DomainError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<String, DomainError>>,
    {
        match &self.inline_content {
            Some(content) => Ok(content.clone()),
            None => fetch(self.metadata.id.clone()).await,
        }
    }

    /// Timing model, parsed on first call and cached afterwards
    pub async fn timing_model<F, Fut>(&self, fetch: F) -> Result<&TimingModel, DomainError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<String, DomainError>>,
    {
        if let Some(model) = self.timing.get() {
            return Ok(model);
        }
        let text = self.raw_text(fetch).await?;
        let model = TimingModel::from_raw_text(&text)?;
        Ok(self.timing.get_or_init(|| model))
    }

    /// Timing model if it has been resolved already
    pub fn resolved_timing(&self) -> Option<&TimingModel> {
        self.timing.get()
    }

    /// Serialize the resolved timing model
    pub fn generate_raw_text(&self) -> Option<String> {
        self.timing.get().map(TimingModel::to_raw_text)
    }
}

/// Whether a preview runs against the original or the already-cut file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreviewMode {
    BeforeCut,
    AfterCut,
}

/// Time range a preview skips
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscardInterval {
    pub start: f64,
    pub end: f64,
}

/// Labelled event time for caption bursts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountdownMarker {
    pub label: String,
    pub at_seconds: f64,
}

/// Everything an external player needs to preview a cut list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewPlan {
    pub mode: PreviewMode,
    pub fps: f64,
    pub discard: Vec<DiscardInterval>,
    pub markers: Vec<CountdownMarker>,
}

/// One timed caption line, in frames
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionLine {
    pub start_frame: i64,
    pub end_frame: i64,
    pub text: String,
}

impl fmt::Display for CaptionLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}{{{}}}{}", self.start_frame, self.end_frame, self.text)
    }
}

/// Why no cut list was applied to a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No source offered any candidate
    NoCutlistFound,
    /// The user confirmed an empty selection
    UserSkipped,
    /// Input ended before a choice was made
    InputClosed,
}

/// Cut list picked for one file
#[derive(Debug)]
pub struct ChosenCutlist {
    pub record: CutRecord,
    pub timing: TimingModel,
    pub output_name: String,
}

/// Result of one selection session
#[derive(Debug)]
pub enum SelectionOutcome {
    Chosen(ChosenCutlist),
    Skipped(SkipReason),
    Deleted,
}
