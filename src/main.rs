//! cutsel
//!
//! Chooses cut lists for recorded videos from a community service, from
//! locally authored lists or from files, previews them with an external
//! player and exports the chosen lists for cutting.
//!
//! # Usage
//!
//! ```bash
//! cutsel select ~/recordings
//! cutsel preview --input show.avi --cutlist show.cutlist --json
//! cutsel range 1,3-5 --max 9
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cutsel_cli::cli::{commands, Cli, Commands};
use cutsel_cli::config_initialization::initialize_configuration_hierarchy;
use cutsel_cli::utils::logging::init_tracing;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_json)?;

    info!("Starting cutsel {}", env!("CARGO_PKG_VERSION"));

    match &cli.command {
        Commands::Range(args) => commands::range(args.clone())?,
        Commands::Select(args) => {
            let config = initialize_configuration_hierarchy(&cli)?;
            info!("Executing select command");
            commands::select(args.clone(), &config).await?;
        }
        Commands::Preview(args) => {
            let config = initialize_configuration_hierarchy(&cli)?;
            info!("Executing preview command");
            commands::preview(args.clone(), &config).await?;
        }
    }

    Ok(())
}
