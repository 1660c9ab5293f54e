//! cutsel library
//!
//! Cut list selection for recorded videos: a two-layer content cache, the
//! cut list and listing formats, interchangeable cut list sources, the
//! interactive selection session and preview planning.

pub mod adapters;
pub mod app;
pub mod cache;
pub mod cli;
pub mod codec;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod planner;
pub mod ports;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use cache::{CacheSettings, ContentCache};
pub use domain::errors::DomainError;
pub use domain::model::{CutRecord, PreviewMode, SelectionOutcome, SourceKind, TimingModel};
pub use error::{CutselError, CutselResult};
pub use planner::PreviewPlanner;
pub use sources::{CutlistSource, SourceSet};
