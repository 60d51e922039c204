//! Configuration initialization and hierarchy management

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::adapters::toml_config::{ProbeConfig, TomlConfigAdapter};
use crate::cli::Cli;
use crate::error::MediaProbeResult;
use crate::utils::logging::LogLevel;

/// Config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "mediaprobe.toml";

/// Environment variables that override the config file
pub const ENV_FFMPEG: &str = "MEDIAPROBE_FFMPEG";
pub const ENV_CACHE_DIR: &str = "MEDIAPROBE_CACHE_DIR";
pub const ENV_NO_CACHE: &str = "MEDIAPROBE_NO_CACHE";
pub const ENV_LOG_LEVEL: &str = "MEDIAPROBE_LOG_LEVEL";

/// Build the effective configuration following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &Cli) -> MediaProbeResult<ProbeConfig> {
    let adapter = TomlConfigAdapter::new();

    // Step 1: defaults are already in place
    // Step 2: config file
    load_config_file(&adapter, cli.config.as_deref())?;

    // Step 3: environment
    apply_environment_overrides(&adapter, |name| std::env::var(name).ok())?;

    // Step 4: command line
    apply_cli_overrides(&adapter, cli)?;

    adapter.validate_config()?;
    debug!("Effective configuration: {:?}", adapter.config());
    Ok(adapter.config())
}

/// Load the explicit config file, or the first default location that exists
fn load_config_file(adapter: &TomlConfigAdapter, explicit: Option<&Path>) -> MediaProbeResult<()> {
    if let Some(path) = explicit {
        // A file the user named must exist
        return adapter.load_config(path);
    }

    let candidates: Vec<PathBuf> = std::iter::once(PathBuf::from(LOCAL_CONFIG_FILE))
        .chain(TomlConfigAdapter::default_config_path())
        .collect();

    for path in candidates {
        if path.is_file() {
            return adapter.load_config(&path);
        }
    }

    debug!("No configuration file found, using defaults");
    Ok(())
}

/// Apply environment overrides read through `lookup`
fn apply_environment_overrides<F>(adapter: &TomlConfigAdapter, lookup: F) -> MediaProbeResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_overrides = 0;

    if let Some(ffmpeg) = lookup(ENV_FFMPEG).filter(|v| !v.is_empty()) {
        info!("Environment override: ffmpeg_path = {}", ffmpeg);
        adapter.update(|config| config.mediaprobe.ffmpeg_path = PathBuf::from(ffmpeg));
        env_overrides += 1;
    }

    if let Some(dir) = lookup(ENV_CACHE_DIR).filter(|v| !v.is_empty()) {
        info!("Environment override: cache directory = {}", dir);
        adapter.update(|config| config.cache.directory = Some(PathBuf::from(dir)));
        env_overrides += 1;
    }

    if let Some(value) = lookup(ENV_NO_CACHE) {
        match parse_flag(&value) {
            Some(no_cache) => {
                adapter.update(|config| config.cache.enabled = !no_cache);
                env_overrides += 1;
            }
            None => warn!("Ignoring {}={}: expected a boolean", ENV_NO_CACHE, value),
        }
    }

    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        let level: LogLevel = level.parse()?;
        adapter.update(|config| config.logging.level = level);
        env_overrides += 1;
    }

    if env_overrides > 0 {
        info!("Applied {} environment variable overrides", env_overrides);
    }
    Ok(())
}

/// Apply command-line overrides
fn apply_cli_overrides(adapter: &TomlConfigAdapter, cli: &Cli) -> MediaProbeResult<()> {
    if let Some(level) = &cli.log_level {
        let level: LogLevel = level.parse()?;
        adapter.update(|config| config.logging.level = level);
    }
    if let Some(format) = cli.log_format {
        adapter.update(|config| config.logging.format = format);
    }
    if let Some(ffmpeg) = &cli.ffmpeg {
        adapter.update(|config| config.mediaprobe.ffmpeg_path = ffmpeg.clone());
    }
    if let Some(dir) = &cli.cache_dir {
        adapter.update(|config| config.cache.directory = Some(dir.clone()));
    }
    if cli.no_cache {
        adapter.update(|config| config.cache.enabled = false);
    }
    Ok(())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
