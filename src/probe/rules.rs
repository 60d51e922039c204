//! Named matching rules, one per token the extractors look for.

use once_cell::sync::Lazy;
use regex::Regex;

fn rule(pattern: &str) -> Regex {
    // Patterns are literals in this file and covered by the unit tests below.
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid extraction rule {pattern:?}: {e}"))
}

/// `Input #0, <container>, from`
pub static CONTAINER: Lazy<Regex> = Lazy::new(|| rule(r"Input\s#0,\s+([^\s]+),\s+from"));

/// `Duration: <clock>,`
pub static DURATION: Lazy<Regex> = Lazy::new(|| rule(r"Duration:\s+([^,]*)"));

/// `start: <seconds>,`
pub static START: Lazy<Regex> = Lazy::new(|| rule(r"start:\s+([^,\r\n]*)"));

/// `bitrate: N/A` or `bitrate: <number> <unit>`
pub static BITRATE: Lazy<Regex> =
    Lazy::new(|| rule(r"bitrate:\s+((?i:N/A)|[0-9.]+\s?[bkBmg/s]+)"));

pub static MEAN_VOLUME: Lazy<Regex> =
    Lazy::new(|| rule(r"(?i)mean_volume:\s+([+-]?\d*\.\d+) dB"));

pub static MAX_VOLUME: Lazy<Regex> =
    Lazy::new(|| rule(r"(?i)max_volume:\s+([+-]?\d*\.\d+) dB"));

/// Full video stream header line; group 1 is the stream reference, group 2 the description
pub static VIDEO_STREAM_LINE: Lazy<Regex> = Lazy::new(|| rule(r"Stream(.*):\s+Video:\s+(.*)"));

/// Full audio stream header line; same groups as [`VIDEO_STREAM_LINE`]
pub static AUDIO_STREAM_LINE: Lazy<Regex> = Lazy::new(|| rule(r"Stream(.*):\s+Audio:\s+(.*)"));

/// Cheap presence test, not tied to the full header shape
pub static HAS_VIDEO: Lazy<Regex> = Lazy::new(|| rule(r"Stream.+Video"));

pub static HAS_AUDIO: Lazy<Regex> = Lazy::new(|| rule(r"Stream.+Audio"));

/// `#0:1`
pub static STREAM_ID: Lazy<Regex> = Lazy::new(|| rule(r"#([0-9:]{3,})"));

/// `(eng)`, `(und)`, `(pt-br)`
pub static LANGUAGE: Lazy<Regex> = Lazy::new(|| rule(r"\(([a-z_\-]{2,})\)"));

pub static BRACKETED_RATIOS: Lazy<Regex> =
    Lazy::new(|| rule(r"\[[PS]AR\s+([0-9:.]+)\s+DAR\s+([0-9:.]+)\]"));

pub static BARE_RATIOS: Lazy<Regex> = Lazy::new(|| rule(r"[PS]AR\s+([0-9:.]+)\s+DAR\s+([0-9:.]+)"));

pub static DIMENSIONS: Lazy<Regex> = Lazy::new(|| rule(r"([1-9][0-9]*)x([1-9][0-9]*)"));

/// `29.97 fps`, `30k tbn`
pub static TIME_BASE: Lazy<Regex> = Lazy::new(|| rule(r"([0-9.k]+)\s+(fps|tbr|tbc|tbn)"));

/// `4997 kb/s`, `1 mb/s`
pub static STREAM_BITRATE: Lazy<Regex> = Lazy::new(|| rule(r"(?i)\b([0-9]+)\s+(kb|mb)/s"));

pub static CHANNEL_LAYOUT: Lazy<Regex> = Lazy::new(|| rule(r"(?i)(stereo|mono|5\.1)"));

pub static SAMPLE_RATE: Lazy<Regex> = Lazy::new(|| rule(r"([0-9]{3,6})\s+Hz"));

/// First parenthesized group without a slash: `(High)`
pub static CODEC_PROFILE: Lazy<Regex> = Lazy::new(|| rule(r"\(([^/)]+)\)"));

/// `(avc1 / 0x31637661)`
pub static CODEC_TAG: Lazy<Regex> = Lazy::new(|| rule(r"\(([^\s]+)\s/\s([^\s)]+)\)"));

/// One `key : value` line of a metadata block
pub static TAG_LINE: Lazy<Regex> =
    Lazy::new(|| rule(r"(?m)^[ \t]*([A-Za-z0-9_.\-]+)[ \t]*:[ \t]?([^\r\n]*)"));

/// `displaymatrix: rotation of -90.00 degrees`
pub static DISPLAY_MATRIX_ROTATION: Lazy<Regex> =
    Lazy::new(|| rule(r"displaymatrix:\s+rotation of\s+([+-]?[0-9]+(?:\.[0-9]+)?)\s+degrees"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_rules_compile() {
        let rules: [&Lazy<Regex>; 23] = [
            &CONTAINER,
            &DURATION,
            &START,
            &BITRATE,
            &MEAN_VOLUME,
            &MAX_VOLUME,
            &VIDEO_STREAM_LINE,
            &AUDIO_STREAM_LINE,
            &HAS_VIDEO,
            &HAS_AUDIO,
            &STREAM_ID,
            &LANGUAGE,
            &BRACKETED_RATIOS,
            &BARE_RATIOS,
            &DIMENSIONS,
            &TIME_BASE,
            &STREAM_BITRATE,
            &CHANNEL_LAYOUT,
            &SAMPLE_RATE,
            &CODEC_PROFILE,
            &CODEC_TAG,
            &TAG_LINE,
            &DISPLAY_MATRIX_ROTATION,
        ];
        for rule in rules {
            let _ = rule.is_match("");
        }
    }

    #[test]
    fn test_stream_bitrate_needs_whole_number() {
        let caps = STREAM_BITRATE.captures("14997 kb/s").unwrap();
        assert_eq!(&caps[1], "14997");
    }

    #[test]
    fn test_tag_line_without_padding() {
        let caps = TAG_LINE.captures("    compatible_brands: isomiso2avc1mp41").unwrap();
        assert_eq!(&caps[1], "compatible_brands");
        assert_eq!(&caps[2], "isomiso2avc1mp41");
    }

    #[test]
    fn test_bitrate_accepts_lowercase_na() {
        let caps = BITRATE.captures("bitrate: n/a").unwrap();
        assert_eq!(&caps[1], "n/a");
    }
}
