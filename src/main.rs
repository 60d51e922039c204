//! MediaProbe CLI
//!
//! Reads ffmpeg's diagnostic report for media files and prints a structured description.
//!
//! # Features
//!
//! - Container, duration, start offset, bit rate and global tags
//! - Video stream details including display-aspect and rotation handling
//! - Audio stream details and loudness (mean/max volume)
//! - Per-field cache, in memory or on disk, keyed by canonical path
//!
//! # Usage
//!
//! ```bash
//! mediaprobe inspect clip.mp4 song.mp3
//! mediaprobe inspect --recursive --format json ~/Videos
//! mediaprobe field clip.mp4 duration
//! mediaprobe raw clip.mp4
//! mediaprobe image photo.jpg
//! ```

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{debug, info};

use mediaprobe_cli::app::container::DefaultAppContainer;
use mediaprobe_cli::cli::{commands, Cli, Commands};
use mediaprobe_cli::config_initialization::initialize_configuration_hierarchy;
use mediaprobe_cli::utils::logging::LoggingSystem;

/// Main entry point for the MediaProbe CLI
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Resolve configuration, then logging from it
    let config = initialize_configuration_hierarchy(&cli)?;
    LoggingSystem::new(config.logging.clone()).initialize()?;

    info!("Starting MediaProbe");
    debug!("Analyzer binary: {}", config.mediaprobe.ffmpeg_path.display());

    let container = Arc::new(DefaultAppContainer::from_config(&config)?);

    // Execute the requested command
    match cli.command {
        Commands::Inspect(args) => {
            info!("Executing inspect command");
            commands::inspect(container, args).await?;
        }
        Commands::Field(args) => {
            info!("Executing field command");
            commands::field(container, args).await?;
        }
        Commands::Raw(args) => {
            info!("Executing raw command");
            commands::raw(container, args).await?;
        }
        Commands::Image(args) => {
            info!("Executing image command");
            commands::image(container, args).await?;
        }
    }

    info!("MediaProbe completed successfully");
    Ok(())
}
