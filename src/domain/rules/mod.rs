// Domain rules - Business logic and policies

use crate::domain::model::*;

/// Marker separating the recording name from the container of re-encoded files
const MPG_MARKER: &str = ".mpg.";

/// Ordering of candidates offered to the user
pub struct CandidateRanking;

impl CandidateRanking {
    /// Sort by descending metarating; ties keep the order the source gave
    pub fn rank(records: &mut [CutRecord]) {
        records.sort_by(|a, b| b.metarating().total_cmp(&a.metarating()));
    }
}

/// Fallback search names for recordings with compound names
pub struct SearchNameRule;

impl SearchNameRule {
    /// A compound name carries more than one extension
    pub fn is_compound(name: &str) -> bool {
        name.matches('.').count() > 1
    }

    /// Shorter name to search with when the full name found nothing
    pub fn shortened(name: &str) -> Option<String> {
        if !Self::is_compound(name) {
            return None;
        }
        if let Some(pos) = name.find(MPG_MARKER) {
            return Some(name[..pos + MPG_MARKER.len() - 1].to_string());
        }
        name.rsplit_once('.').map(|(stem, _)| stem.to_string())
    }
}

/// Name parts a naming template can refer to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameParts {
    pub base: String,
    pub ext: String,
}

impl NameParts {
    pub fn split(file_name: &str) -> Self {
        if let Some(pos) = file_name.find(MPG_MARKER) {
            return Self {
                base: file_name[..pos].to_string(),
                ext: file_name[pos + 1..].to_string(),
            };
        }
        match file_name.rsplit_once('.') {
            Some((base, ext)) if !base.is_empty() => Self {
                base: base.to_string(),
                ext: ext.to_string(),
            },
            _ => Self {
                base: file_name.to_string(),
                ext: String::new(),
            },
        }
    }

    /// Extension without the `mpg.` prefix
    pub fn short_ext(&self) -> &str {
        self.ext.strip_prefix("mpg.").unwrap_or(&self.ext)
    }
}

/// Output file naming
pub struct OutputNaming;

impl OutputNaming {
    /// Expand `template` for `file_name`; unknown placeholders stay as written
    pub fn render(template: &str, file_name: &str, rating: Option<f64>, metarating: f64) -> String {
        let parts = NameParts::split(file_name);
        let mut out = String::with_capacity(template.len() + file_name.len());
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open..];
            let Some(close) = after.find('}') else {
                break;
            };
            let placeholder = &after[..=close];
            match &placeholder[1..placeholder.len() - 1] {
                "base" => out.push_str(&parts.base),
                "ext" => out.push_str(&parts.ext),
                "shortext" => out.push_str(parts.short_ext()),
                "rating" => {
                    if let Some(r) = rating {
                        out.push_str(&percent(r).to_string());
                    }
                }
                "metarating" => out.push_str(&percent(metarating).to_string()),
                "full" => out.push_str(file_name),
                _ => out.push_str(placeholder),
            }
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        out
    }

    /// Output name built from a suggested movie name
    pub fn from_suggestion(suggested: &str, file_name: &str) -> String {
        let parts = NameParts::split(file_name);
        if parts.ext.is_empty() {
            suggested.to_string()
        } else {
            format!("{}.{}", suggested, parts.ext)
        }
    }
}

fn percent(value: f64) -> i64 {
    (value * 100.0).round() as i64
}
