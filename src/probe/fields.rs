//! Container-level field extractors

use regex::Regex;

use crate::domain::model::*;
use crate::probe::rules;

/// Demuxer name from the input header, empty when undetermined
pub fn container(raw: &str) -> String {
    rules::CONTAINER
        .captures(raw)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}

/// Media duration; `Duration: N/A` and friends yield `None`
pub fn duration(raw: &str) -> Option<Timecode> {
    let caps = rules::DURATION.captures(raw)?;
    Timecode::parse(&caps[1], TimecodeFormat::Clock).ok()
}

/// Start offset, reported by ffmpeg as raw seconds
pub fn start(raw: &str) -> Option<Timecode> {
    let caps = rules::START.captures(raw)?;
    Timecode::parse(&caps[1], TimecodeFormat::Seconds).ok()
}

/// Container bit rate; `N/A` is a distinct value from an absent field
pub fn bitrate(raw: &str) -> Option<Bitrate> {
    let caps = rules::BITRATE.captures(raw)?;
    let value = caps[1].trim();
    if value.eq_ignore_ascii_case("N/A") {
        return Some(Bitrate::Unavailable);
    }
    leading_integer(value).map(Bitrate::Available)
}

/// Loudness figures; `None` only when neither figure is present
pub fn volume(raw: &str) -> Option<Volume> {
    let mean_db = capture_db(&rules::MEAN_VOLUME, raw);
    let max_db = capture_db(&rules::MAX_VOLUME, raw);

    if mean_db.is_none() && max_db.is_none() {
        None
    } else {
        Some(Volume { mean_db, max_db })
    }
}

pub fn has_audio(raw: &str) -> bool {
    rules::HAS_AUDIO.is_match(raw)
}

pub fn has_video(raw: &str) -> bool {
    rules::HAS_VIDEO.is_match(raw)
}

/// A full `Stream ...: Video: ...` header line is present
pub fn has_video_stream_line(raw: &str) -> bool {
    rules::VIDEO_STREAM_LINE.is_match(raw)
}

/// A full `Stream ...: Audio: ...` header line is present
pub fn has_audio_stream_line(raw: &str) -> bool {
    rules::AUDIO_STREAM_LINE.is_match(raw)
}

fn capture_db(rule: &Regex, raw: &str) -> Option<f64> {
    rule.captures(raw)
        .and_then(|caps| caps[1].parse::<f64>().ok())
}

fn leading_integer(value: &str) -> Option<u64> {
    let digits: String = value.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}
