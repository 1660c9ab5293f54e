//! Logging setup

use tracing_subscriber::EnvFilter;

use crate::error::{CutselError, CutselResult};

/// Valid values of `--log-level`
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Filter for `level`; `RUST_LOG` wins when set
pub fn build_filter(level: &str) -> CutselResult<EnvFilter> {
    let level = level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        return Err(CutselError::config(format!(
            "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
            level
        )));
    }
    Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
}

/// Install the global subscriber writing to stderr
pub fn init_tracing(level: &str, json: bool) -> CutselResult<()> {
    let filter = build_filter(level)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| CutselError::config(format!("Failed to initialize logging: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unknown_level() {
        assert!(build_filter("loud").is_err());
        assert!(build_filter("DEBUG").is_ok());
    }
}
