//! Configuration initialization and hierarchy management

use tracing::{debug, info, warn};

use crate::adapters::{AppConfig, TomlConfigAdapter};
use crate::cli::{Cli, Commands};
use crate::error::{CutselError, CutselResult};

/// Environment variables overriding configuration keys
pub const ENV_OVERRIDES: [(&str, &str); 6] = [
    ("CUTSEL_CUT_DIR", "cut_dir"),
    ("CUTSEL_CACHE_DIR", "cache_dir"),
    ("CUTSEL_LEAD_SECONDS", "lead_seconds"),
    ("CUTSEL_TRAIL_SECONDS", "trail_seconds"),
    ("CUTSEL_AUTHOR", "author"),
    ("CUTSEL_SERVICE_URL", "service_url"),
];

/// Resolve configuration following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &Cli) -> CutselResult<AppConfig> {
    info!("Initializing configuration hierarchy");

    let mut config = load_config_file(cli)?;
    apply_environment(&mut config, |key| std::env::var(key).ok())?;
    apply_cli_overrides(&mut config, &cli.command);
    config.validate()?;

    debug!("effective configuration: {:?}", config);
    Ok(config)
}

/// An explicit `--config` must load; the default file is optional
fn load_config_file(cli: &Cli) -> CutselResult<AppConfig> {
    if let Some(path) = &cli.config {
        return TomlConfigAdapter::load(path);
    }

    let Some(path) = TomlConfigAdapter::default_config_path() else {
        return Ok(AppConfig::default());
    };
    if !path.is_file() {
        debug!("no configuration file at {}", path.display());
        return Ok(AppConfig::default());
    }
    match TomlConfigAdapter::load(&path) {
        Ok(config) => Ok(config),
        Err(CutselError::Config { message }) if message.starts_with("Failed to read") => {
            warn!("{}", message);
            Ok(AppConfig::default())
        }
        Err(e) => Err(e),
    }
}

/// Apply `CUTSEL_*` overrides read through `lookup`
pub fn apply_environment<F>(config: &mut AppConfig, lookup: F) -> CutselResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let mut applied = 0;
    for (var, key) in ENV_OVERRIDES {
        let Some(value) = lookup(var) else {
            continue;
        };
        info!("Found environment override: {} = {}", var, value);
        match key {
            "cut_dir" => config.cut_dir = value,
            "cache_dir" => config.cache_dir = value,
            "lead_seconds" => config.lead_seconds = parse_seconds(var, &value)?,
            "trail_seconds" => config.trail_seconds = parse_seconds(var, &value)?,
            "author" => config.author = value,
            "service_url" => config.service_url = value,
            _ => continue,
        }
        applied += 1;
    }

    if applied > 0 {
        info!("Applied {} environment variable overrides", applied);
    }
    Ok(())
}

fn parse_seconds(var: &str, value: &str) -> CutselResult<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| CutselError::config(format!("{} must be a whole number of seconds, got '{}'", var, value)))
}

/// Apply command-line flags of `command`
pub fn apply_cli_overrides(config: &mut AppConfig, command: &Commands) {
    match command {
        Commands::Select(args) => {
            if let Some(lead) = args.lead {
                config.lead_seconds = lead;
            }
            if let Some(trail) = args.trail {
                config.trail_seconds = trail;
            }
            if let Some(dir) = &args.cut_dir {
                config.cut_dir = dir.to_string_lossy().into_owned();
            }
            if args.no_check {
                config.check_cuts = false;
            }
        }
        Commands::Preview(args) => {
            if let Some(lead) = args.lead {
                config.lead_seconds = lead;
            }
            if let Some(trail) = args.trail {
                config.trail_seconds = trail;
            }
        }
        Commands::Range(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_environment_overrides() {
        let mut config = AppConfig::default();
        apply_environment(
            &mut config,
            env(&[("CUTSEL_LEAD_SECONDS", "20"), ("CUTSEL_AUTHOR", "someone")]),
        )
        .unwrap();
        assert_eq!(config.lead_seconds, 20);
        assert_eq!(config.author, "someone");
        assert_eq!(config.trail_seconds, 5);
    }

    #[test]
    fn test_invalid_environment_number() {
        let mut config = AppConfig::default();
        let result = apply_environment(&mut config, env(&[("CUTSEL_TRAIL_SECONDS", "soon")]));
        assert!(matches!(result, Err(CutselError::Config { .. })));
    }

    #[test]
    fn test_cli_wins_over_environment() {
        let mut config = AppConfig::default();
        apply_environment(&mut config, env(&[("CUTSEL_LEAD_SECONDS", "20")])).unwrap();

        let cli = Cli::parse_from(["cutsel", "select", "a.avi", "--lead", "30", "--no-check"]);
        apply_cli_overrides(&mut config, &cli.command);
        assert_eq!(config.lead_seconds, 30);
        assert!(!config.check_cuts);
    }

    #[test]
    fn test_offsets_are_bounded() {
        let result = Cli::try_parse_from(["cutsel", "select", "a.avi", "--lead", "601"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[cutsel]\ntrail_seconds = 7\n").unwrap();

        let cli = Cli::parse_from([
            "cutsel",
            "--config",
            path.to_str().unwrap(),
            "range",
            "1",
            "--max",
            "3",
        ]);
        assert_eq!(load_config_file(&cli).unwrap().trail_seconds, 7);

        let missing = Cli::parse_from(["cutsel", "--config", "/nonexistent/cutsel.toml", "range", "1", "--max", "3"]);
        assert!(load_config_file(&missing).is_err());
    }
}
