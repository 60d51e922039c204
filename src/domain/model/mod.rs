// Domain models - Core types and data structures

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::errors::DomainError;

/// Textual encodings a [`Timecode`] can be read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimecodeFormat {
    /// `H:MM:SS[.fraction]`, hours unbounded
    Clock,
    /// A bare decimal numeral holding elapsed seconds
    Seconds,
}

/// Elapsed duration with fractional-second precision
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Timecode {
    pub seconds: f64,
}

impl Timecode {
    /// Create a new Timecode from seconds
    pub fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    /// Parse text in the given encoding
    pub fn parse(text: &str, format: TimecodeFormat) -> Result<Self, DomainError> {
        let trimmed = text.trim();
        let seconds = match format {
            TimecodeFormat::Clock => Self::parse_clock(trimmed),
            TimecodeFormat::Seconds => Self::parse_seconds(trimmed),
        };
        seconds
            .map(Self::from_seconds)
            .ok_or_else(|| DomainError::InvalidTimecode(format!("{:?} form: {:?}", format, text)))
    }

    fn parse_clock(text: &str) -> Option<f64> {
        let (negative, body) = split_sign(text);
        let parts: Vec<&str> = body.split(':').collect();
        if parts.len() != 3 {
            return None;
        }

        let hours = parse_digits(parts[0])?;
        if parts[1].len() > 2 {
            return None;
        }
        let minutes = parse_digits(parts[1])?;
        let seconds = parse_decimal(parts[2])?;
        if minutes >= 60.0 || seconds >= 60.0 {
            return None;
        }

        let total = hours * 3600.0 + minutes * 60.0 + seconds;
        Some(if negative { -total } else { total })
    }

    fn parse_seconds(text: &str) -> Option<f64> {
        let (negative, body) = split_sign(text);
        let value = parse_decimal(body)?;
        Some(if negative { -value } else { value })
    }

    /// Format as `HH:MM:SS.mmm`
    pub fn format_clock(&self) -> String {
        let sign = if self.seconds < 0.0 { "-" } else { "" };
        let total_ms = (self.seconds.abs() * 1000.0).round() as u64;
        let hours = total_ms / 3_600_000;
        let minutes = (total_ms % 3_600_000) / 60_000;
        let seconds = (total_ms % 60_000) / 1000;
        let millis = total_ms % 1000;
        format!("{}{:02}:{:02}:{:02}.{:03}", sign, hours, minutes, seconds, millis)
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_clock())
    }
}

fn split_sign(text: &str) -> (bool, &str) {
    match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    }
}

fn parse_digits(text: &str) -> Option<f64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<f64>().ok()
}

fn parse_decimal(text: &str) -> Option<f64> {
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text, None),
    };
    let digits_ok = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !digits_ok(whole) {
        return None;
    }
    match fraction {
        Some(fraction) if fraction.is_empty() || !digits_ok(fraction) => return None,
        None if whole.is_empty() => return None,
        _ => {}
    }
    text.parse::<f64>().ok()
}

/// Mutually exclusive media classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
    Image,
    Unknown,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
            MediaKind::Image => "image",
            MediaKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Container-level bit rate as reported in the input header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bitrate {
    /// The header says `N/A`
    Unavailable,
    /// Leading integer of the reported value (ffmpeg prints kb/s here)
    Available(u64),
}

impl Bitrate {
    pub fn value(&self) -> Option<u64> {
        match self {
            Bitrate::Unavailable => None,
            Bitrate::Available(value) => Some(*value),
        }
    }
}

/// Loudness figures from a volume analysis pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    pub mean_db: Option<f64>,
    pub max_db: Option<f64>,
}

/// Codec token and its decomposition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Codec {
    pub name: String,
    pub profile: Option<String>,
    pub tag: Option<String>,
    pub tag_string: Option<String>,
    /// The untouched token before decomposition
    pub raw: String,
}

/// Ordered tag mapping; the first occurrence of a key wins
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataMap {
    entries: Vec<(String, String)>,
}

impl MetadataMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless the key is already present. Returns whether it was inserted.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if self.get(&key).is_some() {
            return false;
        }
        self.entries.push((key, value.into()));
        true
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for MetadataMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = MetadataMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl Serialize for MetadataMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MetadataMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MetadataMapVisitor;

        impl<'de> Visitor<'de> for MetadataMapVisitor {
            type Value = MetadataMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of tag names to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = MetadataMap::new();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(MetadataMapVisitor)
    }
}

/// Frame size of a video stream
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    /// Width and height were swapped to agree with the display aspect ratio
    pub aspect_fix_applied: bool,
}

/// Video stream information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoStreamDescriptor {
    pub stream_id: Option<String>,
    pub language: Option<String>,
    pub dimensions: Option<Dimensions>,
    pub pixel_aspect_ratio: Option<String>,
    pub display_aspect_ratio: Option<String>,
    pub time_bases: BTreeMap<String, f64>,
    pub frame_rate: Option<f64>,
    pub frame_count: Option<u64>,
    pub bitrate: Option<u64>,
    pub pixel_format: Option<String>,
    pub rotation: Option<i32>,
    pub codec: Codec,
    pub metadata: MetadataMap,
}

impl VideoStreamDescriptor {
    /// Get aspect ratio of the (possibly corrected) frame size
    pub fn aspect_ratio(&self) -> Option<f64> {
        self.dimensions.map(|d| d.width / d.height)
    }
}

/// Audio stream information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioStreamDescriptor {
    pub stream_id: Option<String>,
    pub language: Option<String>,
    pub channel_layout: Option<String>,
    /// 0 when the layout is unknown
    pub channel_count: u32,
    pub sample_rate: Option<f64>,
    pub sample_format: Option<String>,
    pub bitrate: Option<u64>,
    pub codec: Codec,
    pub metadata: MetadataMap,
}

/// Complete media file information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaInformation {
    pub path: PathBuf,
    pub kind: MediaKind,
    pub container: String,
    pub duration: Option<Timecode>,
    pub bitrate: Option<Bitrate>,
    pub start: Option<Timecode>,
    pub volume: Option<Volume>,
    pub video: Option<VideoStreamDescriptor>,
    pub audio: Option<AudioStreamDescriptor>,
    pub global_metadata: MetadataMap,
    pub read_at: DateTime<Utc>,
    /// The analyzer produced no text at all
    pub low_confidence: bool,
    #[serde(skip)]
    pub from_cache: bool,
}

impl MediaInformation {
    pub fn has_video(&self) -> bool {
        self.video.is_some()
    }

    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }

    /// A classified kind always comes with at least one stream descriptor
    pub fn is_consistent(&self) -> bool {
        match self.kind {
            MediaKind::Unknown => true,
            _ => self.video.is_some() || self.audio.is_some(),
        }
    }
}
