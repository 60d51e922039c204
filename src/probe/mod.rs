//! Field extraction over ffmpeg's diagnostic transcript.
//!
//! Every extractor here is a pure function of the captured text. Anchor phrases
//! live in [`markers`], token patterns in [`rules`].

pub mod audio;
pub mod codec;
pub mod fields;
pub mod markers;
pub mod metadata;
pub mod rules;
pub mod video;

pub use audio::audio_stream;
pub use fields::{
    bitrate, container, duration, has_audio, has_audio_stream_line, has_video,
    has_video_stream_line, start, volume,
};
pub use metadata::global_metadata;
pub use video::video_stream;
