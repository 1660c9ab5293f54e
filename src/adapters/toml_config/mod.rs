// TOML config adapter - Configuration loaded from TOML files

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::model::SourceKind;
use crate::error::{CutselError, CutselResult};

/// Upper bound for lead and trail offsets, in seconds
pub const MAX_OFFSET_SECONDS: u32 = 600;

/// Application settings under the `[cutsel]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where cut lists are exported and cut videos are expected
    pub cut_dir: String,
    /// Disk cache location; empty keeps caches in memory
    pub cache_dir: String,
    pub lead_seconds: u32,
    pub trail_seconds: u32,
    /// Ask for a rating after a downloaded cut list was used
    pub rate_after_use: bool,
    /// Offer to check cut outputs after exporting
    pub check_cuts: bool,
    /// Output naming template
    pub cut_name: String,
    pub author: String,
    pub editor_command: String,
    pub editor_save_workbench: bool,
    pub player_command: String,
    pub service_url: String,
    pub source_priority: Vec<String>,
    pub search_expiry_hours: u32,
    pub cutlist_expiry_days: u32,
    pub video_extensions: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let cache_dir = dirs::cache_dir()
            .map(|dir| dir.join("cutsel").to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            cut_dir: ".".to_string(),
            cache_dir,
            lead_seconds: 10,
            trail_seconds: 5,
            rate_after_use: true,
            check_cuts: true,
            cut_name: "{base}-cut{rating}.{ext}".to_string(),
            author: "anonymous".to_string(),
            editor_command: "avidemux2_qt4".to_string(),
            editor_save_workbench: true,
            player_command: "mplayer".to_string(),
            service_url: "http://www.cutlist.at/".to_string(),
            source_priority: vec!["internet".to_string(), "own".to_string()],
            search_expiry_hours: 2,
            cutlist_expiry_days: 14,
            video_extensions: vec!["avi".to_string(), "mp4".to_string(), "mkv".to_string()],
        }
    }
}

impl AppConfig {
    /// Check value ranges and names
    pub fn validate(&self) -> CutselResult<()> {
        if self.lead_seconds > MAX_OFFSET_SECONDS || self.trail_seconds > MAX_OFFSET_SECONDS {
            return Err(CutselError::config(format!(
                "lead_seconds and trail_seconds must not exceed {}",
                MAX_OFFSET_SECONDS
            )));
        }
        if self.search_expiry_hours == 0 || self.cutlist_expiry_days == 0 {
            return Err(CutselError::config("expiry periods must be positive"));
        }
        self.source_order()?;
        Ok(())
    }

    /// Configured source priority as source kinds
    pub fn source_order(&self) -> CutselResult<Vec<SourceKind>> {
        self.source_priority
            .iter()
            .map(|name| SourceKind::parse(name).map_err(|e| CutselError::config(e.to_string())))
            .collect()
    }

    pub fn cut_dir_path(&self) -> PathBuf {
        crate::utils::PathUtils::expand_tilde(&self.cut_dir)
    }

    /// Disk cache directory, `None` when persistence is disabled
    pub fn cache_dir_path(&self) -> Option<PathBuf> {
        let trimmed = self.cache_dir.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(crate::utils::PathUtils::expand_tilde(trimmed))
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    cutsel: AppConfig,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cutsel").join("config.toml"))
    }

    /// Parse configuration text
    pub fn parse(content: &str) -> CutselResult<AppConfig> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| CutselError::config(format!("Failed to parse TOML config: {}", e)))?;
        debug!("parsed configuration: {:?}", file.cutsel);
        Ok(file.cutsel)
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> CutselResult<AppConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CutselError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        info!("Loading configuration from: {}", path.display());
        Self::parse(&content)
    }

    /// Serialize configuration to TOML
    pub fn serialize(config: &AppConfig) -> CutselResult<String> {
        toml::to_string(&ConfigFile {
            cutsel: config.clone(),
        })
        .map_err(|e| CutselError::config(format!("Failed to serialize config: {}", e)))
    }
}
