//! CLI module for MediaProbe
//!
//! This module handles command-line argument parsing and command execution.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::logging::LogFormat;

pub mod args;
pub mod commands;

/// MediaProbe
///
/// Reads ffmpeg's diagnostic report for media files and turns it into a structured
/// description: container, duration, bit rate, tags and per-stream details.
#[derive(Parser, Debug)]
#[command(name = "mediaprobe")]
#[command(about = "MediaProbe - Structured media metadata from ffmpeg diagnostics")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./mediaprobe.toml, then the user config directory)
    #[arg(long, global = true, env = "MEDIAPROBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Logging format
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    /// ffmpeg binary to run
    #[arg(long, global = true)]
    pub ffmpeg: Option<PathBuf>,

    /// Directory for the persistent cache
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Ignore cached results and analyze again
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Describe one or more media files
    Inspect(args::InspectArgs),
    /// Print a single field of a media file
    Field(args::FieldArgs),
    /// Print ffmpeg's raw diagnostic report
    Raw(args::RawArgs),
    /// Describe an image file
    Image(args::ImageArgs),
}
