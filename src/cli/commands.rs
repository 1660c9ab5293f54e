//! Command implementations

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::AppConfig;
use crate::app::{AppContainer, DefaultAppContainer, PreviewRequest};
use crate::cli::args::{PreviewArgs, RangeArgs, SelectArgs};
use crate::domain::model::PreviewMode;
use crate::planner::PreviewPlanner;
use crate::utils::{parse_index_range, PathUtils};

/// Execute the select command
pub async fn select(args: SelectArgs, config: &AppConfig) -> Result<()> {
    let videos = PathUtils::collect_videos(&args.paths, &config.video_extensions)
        .context("Failed to collect input videos")?;
    if videos.is_empty() {
        return Err(anyhow::anyhow!("No video files found in the given paths"));
    }
    info!("Selecting cut lists for {} file(s)", videos.len());

    let container = DefaultAppContainer::new(config).context("Failed to set up")?;
    let report = container
        .batch_interactor()
        .execute(videos)
        .await
        .context("Batch run failed")?;

    println!();
    println!("Exported {} cut list(s)", report.exported.len());
    for path in &report.exported {
        println!("  {}", path.display());
    }
    if !report.failed.is_empty() {
        println!("Failed to export {} cut list(s)", report.failed.len());
        for path in &report.failed {
            println!("  {}", path.display());
        }
    }
    if !report.skipped.is_empty() {
        println!("Skipped {} file(s)", report.skipped.len());
    }
    if !report.deleted.is_empty() {
        println!("Deleted {} file(s)", report.deleted.len());
    }

    info!("Select operation completed successfully");
    Ok(())
}

/// Execute the preview command
pub async fn preview(args: PreviewArgs, config: &AppConfig) -> Result<()> {
    if !args.input.is_file() {
        return Err(anyhow::anyhow!(
            "Input file does not exist: {}",
            args.input.display()
        ));
    }

    let request = PreviewRequest {
        video: args.input,
        cutlist: args.cutlist,
        mode: if args.after_cut {
            PreviewMode::AfterCut
        } else {
            PreviewMode::BeforeCut
        },
        planner: PreviewPlanner::new(
            f64::from(config.lead_seconds),
            f64::from(config.trail_seconds),
        ),
    };

    let container = DefaultAppContainer::new(config).context("Failed to set up")?;
    let interactor = container.preview_interactor();

    if args.json {
        let report = interactor
            .plan(&request)
            .await
            .context("Failed to plan preview")?;
        let json = serde_json::to_string_pretty(&report)
            .context("Failed to serialize preview plan to JSON")?;
        println!("{}", json);
    } else {
        interactor
            .play(&request)
            .await
            .context("Failed to play preview")?;
    }

    info!("Preview operation completed successfully");
    Ok(())
}

/// Execute the range command
pub fn range(args: RangeArgs) -> Result<()> {
    let indices = parse_index_range(&args.expr, args.max)?;
    let rendered: Vec<String> = indices.iter().map(usize::to_string).collect();
    println!("{}", rendered.join(" "));
    Ok(())
}
