// Domain rules - Classification and correction policies applied to parsed fields

use std::collections::BTreeMap;

use crate::domain::model::*;

/// Multiplier applied to stream bit rates reported in `mb/s`.
///
/// Not a clean decimal or binary unit; existing consumers depend on this exact value.
pub const MEGABIT_MULTIPLIER: u64 = 8_192_000;

/// Multiplier applied to stream bit rates reported in `kb/s`
pub const KILOBIT_MULTIPLIER: u64 = 1000;

/// Decides between image, audio and video for a parsed transcript
pub struct MediaClassifier;

impl MediaClassifier {
    /// Classify from stream-line presence plus the file's MIME type.
    ///
    /// Some containers report a video-looking stream for single-frame image codecs,
    /// so a video stream line only yields `Video` when the MIME type does not say
    /// `image/*` or `audio/*`.
    pub fn classify(has_video_line: bool, has_audio_line: bool, mime: Option<&str>) -> MediaKind {
        if has_video_line {
            let mime = mime.map(|m| m.trim().to_ascii_lowercase()).unwrap_or_default();
            if mime.starts_with("image/") {
                MediaKind::Image
            } else if mime.starts_with("audio/") {
                MediaKind::Audio
            } else {
                MediaKind::Video
            }
        } else if has_audio_line {
            MediaKind::Audio
        } else {
            MediaKind::Unknown
        }
    }
}

/// Rotation-fix heuristic for encoder-rotated video
pub struct AspectRatioCorrector;

impl AspectRatioCorrector {
    /// Read a display aspect ratio as `(num, den)`. Accepts `num:den` or a decimal (`num:1`).
    pub fn parse_ratio(ratio: &str) -> Option<(f64, f64)> {
        let ratio = ratio.trim();
        let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

        if let Some((num, den)) = ratio.split_once(':') {
            if all_digits(num) && all_digits(den) {
                return Some((num.parse().ok()?, den.parse().ok()?));
            }
            return None;
        }
        if let Some((whole, fraction)) = ratio.split_once('.') {
            if all_digits(whole) && all_digits(fraction) {
                return Some((ratio.parse().ok()?, 1.0));
            }
        }
        None
    }

    /// Swap width and height when a portrait display ratio contradicts landscape pixels
    pub fn correct(width: f64, height: f64, display_aspect_ratio: Option<&str>) -> Dimensions {
        let portrait_ratio = display_aspect_ratio
            .and_then(Self::parse_ratio)
            .map(|(num, den)| num < den)
            .unwrap_or(false);

        if portrait_ratio && width > height {
            Dimensions {
                width: height,
                height: width,
                aspect_fix_applied: true,
            }
        } else {
            Dimensions {
                width,
                height,
                aspect_fix_applied: false,
            }
        }
    }
}

/// Fixed channel-count mapping for the recognized layouts; anything else is 0
pub fn channel_count(layout: &str) -> u32 {
    match layout {
        "mono" => 1,
        "stereo" => 2,
        "5.1" => 6,
        _ => 0,
    }
}

/// Convert a stream bit rate token (`<value> kb/s` or `<value> mb/s`) to bits per second.
/// `None` when the result does not fit in a `u64`.
pub fn stream_bitrate(value: u64, unit: &str) -> Option<u64> {
    let multiplier = if unit.eq_ignore_ascii_case("mb") {
        MEGABIT_MULTIPLIER
    } else {
        KILOBIT_MULTIPLIER
    };
    value.checked_mul(multiplier)
}

/// `fps` when present, else `tbr`
pub fn preferred_frame_rate(time_bases: &BTreeMap<String, f64>) -> Option<f64> {
    time_bases
        .get("fps")
        .or_else(|| time_bases.get("tbr"))
        .copied()
}

/// ceil(duration × frame rate) when the duration is known
pub fn frame_count(duration: Option<&Timecode>, frame_rate: f64) -> Option<u64> {
    let total = (duration?.seconds * frame_rate).ceil();
    if total.is_finite() && total >= 0.0 {
        Some(total as u64)
    } else {
        None
    }
}
