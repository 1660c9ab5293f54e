//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

use crate::adapters::toml_config::MAX_OFFSET_SECONDS;

/// Parse a lead or trail offset in whole seconds
fn offset_seconds(s: &str) -> Result<u32, String> {
    clap_num::number_range(s, 0, MAX_OFFSET_SECONDS)
}

/// Arguments for the select command
#[derive(Args, Debug, Clone)]
pub struct SelectArgs {
    /// Video files or directories containing videos
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Skip checking the cut outputs
    #[arg(long)]
    pub no_check: bool,

    /// Seconds shown before the end of every cut
    #[arg(long, value_parser = offset_seconds)]
    pub lead: Option<u32>,

    /// Seconds shown after the start of every cut
    #[arg(long, value_parser = offset_seconds)]
    pub trail: Option<u32>,

    /// Directory for exported cut lists and cut videos
    #[arg(long)]
    pub cut_dir: Option<PathBuf>,
}

/// Arguments for the preview command
#[derive(Args, Debug, Clone)]
pub struct PreviewArgs {
    /// Video file to preview
    #[arg(short, long)]
    pub input: PathBuf,

    /// Cut list file
    #[arg(short, long)]
    pub cutlist: PathBuf,

    /// The video has been cut already
    #[arg(long)]
    pub after_cut: bool,

    /// Seconds shown before the end of every cut
    #[arg(long, value_parser = offset_seconds)]
    pub lead: Option<u32>,

    /// Seconds shown after the start of every cut
    #[arg(long, value_parser = offset_seconds)]
    pub trail: Option<u32>,

    /// Print the plan as JSON instead of playing it
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the range command
#[derive(Args, Debug, Clone)]
pub struct RangeArgs {
    /// Expression such as 1,3-5,2-2-10
    pub expr: String,

    /// Largest valid index
    #[arg(long)]
    pub max: usize,
}
