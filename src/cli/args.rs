//! Command-line argument definitions

use clap::{Args, ValueEnum};
use std::path::PathBuf;

use crate::output::ReportFormat;

/// Upper bound for `--jobs`
pub const MAX_JOBS: usize = 64;

fn parse_jobs(value: &str) -> Result<usize, String> {
    clap_num::number_range(value, 1, MAX_JOBS)
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Media files or directories
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Files analyzed concurrently (default: number of CPUs)
    #[arg(short, long, value_parser = parse_jobs)]
    pub jobs: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the field command
#[derive(Args, Debug)]
pub struct FieldArgs {
    /// Media file
    pub path: PathBuf,

    /// Field to print
    #[arg(value_enum)]
    pub field: FieldName,

    /// Output format for structured fields
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Json)]
    pub format: ReportFormat,
}

/// Arguments for the raw command
#[derive(Args, Debug)]
pub struct RawArgs {
    /// Media file
    pub path: PathBuf,
}

/// Arguments for the image command
#[derive(Args, Debug)]
pub struct ImageArgs {
    /// Image file
    pub path: PathBuf,

    /// Describe the file even if it is not classified as an image
    #[arg(long)]
    pub no_check: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Queryable fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FieldName {
    Type,
    Container,
    Duration,
    Bitrate,
    Start,
    Volume,
    Metadata,
    Video,
    Audio,
    HasAudio,
    HasVideo,
}
