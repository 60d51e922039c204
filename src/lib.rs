//! MediaProbe Library
//!
//! Extracts structured media metadata (container, duration, bit rate, tags, video and
//! audio stream details, loudness) from the diagnostic report ffmpeg prints while
//! reading a file, with per-field caching keyed by the file's canonical path.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod output;
pub mod ports;
pub mod probe;
pub mod utils;

// Re-export commonly used types
pub use app::{DefaultAppContainer, FieldCache, ImageMedia, MediaParser};
pub use domain::errors::DomainError;
pub use domain::model::{
    AudioStreamDescriptor, Bitrate, Dimensions, MediaInformation, MediaKind, MetadataMap, Timecode,
    VideoStreamDescriptor, Volume,
};
pub use error::{MediaProbeError, MediaProbeResult};
