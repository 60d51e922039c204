//! Audio stream descriptor extraction

use crate::domain::model::AudioStreamDescriptor;
use crate::domain::rules as domain_rules;
use crate::probe::{codec, markers, metadata, rules};

/// Audio metadata may be closed by another stream, the no-output notice, or
/// (for audio-only inputs whose header follows) a `Duration:` marker
const METADATA_TERMINATORS: [&str; 3] = [
    markers::STREAM,
    markers::AT_LEAST_ONE_OUTPUT,
    markers::DURATION,
];

/// Describe the first audio stream of a transcript, `None` when there is no audio header line
pub fn audio_stream(raw: &str) -> Option<AudioStreamDescriptor> {
    let caps = rules::AUDIO_STREAM_LINE.captures(raw)?;
    let whole = caps.get(0)?;
    let reference = caps.get(1).map_or("", |m| m.as_str());
    let description = caps.get(2).map_or("", |m| m.as_str());
    let after = &raw[whole.end()..];

    let mut consumed: Vec<&str> = Vec::new();

    let stream_id = rules::STREAM_ID
        .captures(reference)
        .map(|c| c[1].to_string());
    let language = rules::LANGUAGE
        .captures(reference)
        .map(|c| c[1].to_string());

    let sample_rate = rules::SAMPLE_RATE.captures(description).and_then(|c| {
        consumed.push(c.get(0)?.as_str());
        c[1].parse::<f64>().ok()
    });

    let channel_layout = rules::CHANNEL_LAYOUT.captures(description).and_then(|c| {
        let layout = c.get(1)?.as_str();
        consumed.push(layout);
        Some(layout.to_string())
    });
    let channel_count = channel_layout
        .as_deref()
        .map(|layout| domain_rules::channel_count(&layout.to_ascii_lowercase()))
        .unwrap_or(0);

    let bitrate = rules::STREAM_BITRATE.captures(description).and_then(|c| {
        consumed.push(c.get(0)?.as_str());
        let value = c[1].parse::<u64>().ok()?;
        domain_rules::stream_bitrate(value, &c[2])
    });

    let remaining = codec::remaining_segments(description, &consumed);
    let codec = remaining
        .first()
        .map(|segment| codec::decompose(segment))
        .unwrap_or_default();
    let sample_format = remaining
        .get(1)
        .map(|segment| codec::strip_qualifiers(segment).to_string())
        .filter(|format| !format.is_empty());

    let metadata = metadata::stream_metadata(after, &METADATA_TERMINATORS);

    Some(AudioStreamDescriptor {
        stream_id,
        language,
        channel_layout,
        channel_count,
        sample_rate,
        sample_format,
        bitrate,
        codec,
        metadata,
    })
}
