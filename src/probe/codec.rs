//! Splitting a stream description into segments and decomposing the codec token

use crate::domain::model::Codec;
use crate::probe::rules;

/// Split a stream description on top-level commas.
///
/// Commas inside `(...)` or `[...]` stay with their segment, so
/// `yuv420p(tv, bt709, progressive)` is a single segment.
pub fn split_segments(description: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (index, ch) in description.char_indices() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                segments.push(&description[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    segments.push(&description[start..]);

    segments
        .into_iter()
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Segments left once every segment holding an already-consumed token is dropped
pub fn remaining_segments<'a>(description: &'a str, consumed: &[&str]) -> Vec<&'a str> {
    split_segments(description)
        .into_iter()
        .filter(|segment| !consumed.iter().any(|token| !token.is_empty() && segment.contains(token)))
        .collect()
}

/// Break `h264 (High) (avc1 / 0x31637661)` into name, profile and tag parts
pub fn decompose(raw: &str) -> Codec {
    let raw = raw.trim();
    let (name, details) = match raw.split_once(char::is_whitespace) {
        Some((name, details)) => (name, details),
        None => (raw, ""),
    };

    let profile = rules::CODEC_PROFILE
        .captures(details)
        .map(|caps| caps[1].trim().to_string());
    let (tag, tag_string) = match rules::CODEC_TAG.captures(details) {
        Some(caps) => (Some(caps[1].to_string()), Some(caps[2].to_string())),
        None => (None, None),
    };

    Codec {
        name: name.to_string(),
        profile,
        tag,
        tag_string,
        raw: raw.to_string(),
    }
}

/// `yuv420p(tv, bt709, progressive)` -> `yuv420p`
pub fn strip_qualifiers(segment: &str) -> &str {
    match segment.find('(') {
        Some(at) => segment[..at].trim(),
        None => segment.trim(),
    }
}
