//! Metadata block extraction

use crate::domain::model::MetadataMap;
use crate::probe::{markers, rules};

/// Parse every `key : value` line of a block; the first occurrence of a key wins
pub fn parse_tag_lines(block: &str) -> MetadataMap {
    rules::TAG_LINE
        .captures_iter(block)
        .map(|caps| (caps[1].to_string(), caps[2].trim().to_string()))
        .collect()
}

/// Container-level tags: the `Metadata:` block that precedes the first `Duration:` marker
pub fn global_metadata(raw: &str) -> MetadataMap {
    let Some(duration_at) = raw.find(markers::DURATION) else {
        return MetadataMap::new();
    };
    match raw[..duration_at].find(markers::METADATA) {
        Some(metadata_at) => {
            let block = &raw[metadata_at + markers::METADATA.len()..duration_at];
            parse_tag_lines(block)
        }
        None => MetadataMap::new(),
    }
}

/// Tags trailing a stream header line.
///
/// `after_line` is the transcript text following the header. The block only counts
/// when that text opens with `Metadata:`. It runs to the first terminator found,
/// trying `terminators` in order, and never past a `Side data:` section.
pub fn stream_metadata(after_line: &str, terminators: &[&str]) -> MetadataMap {
    let trimmed = after_line.trim_start();
    let Some(body) = trimmed.strip_prefix(markers::METADATA) else {
        return MetadataMap::new();
    };

    let Some(end) = terminators.iter().find_map(|marker| body.find(marker)) else {
        return MetadataMap::new();
    };
    let block = &body[..end];
    let block = match block.find(markers::SIDE_DATA) {
        Some(side_data_at) => &block[..side_data_at],
        None => block,
    };
    parse_tag_lines(block)
}

/// The stream's own trailing section: everything up to the next `Stream` marker
pub fn stream_section(after_line: &str) -> &str {
    match after_line.find(markers::STREAM) {
        Some(end) => &after_line[..end],
        None => after_line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRANSCRIPT: &str = "\
Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'clip.mp4':
  Metadata:
    major_brand     : isom
    minor_version   : 512
    compatible_brands: isomiso2avc1mp41
    encoder         : Lavf58.29.100
    encoder         : ignored duplicate
  Duration: 00:00:10.00, start: 0.000000, bitrate: 1205 kb/s
    Stream #0:0(und): Video: h264 (High) (avc1 / 0x31637661), yuv420p, 1280x720, 1070 kb/s, 30 fps, 30 tbr, 15360 tbn, 60 tbc (default)
    Metadata:
      handler_name    : VideoHandler
      rotate          : 90
    Side data:
      displaymatrix: rotation of -90.00 degrees
    Stream #0:1(und): Audio: aac (LC) (mp4a / 0x6134706D), 44100 Hz, stereo, fltp, 128 kb/s (default)
    Metadata:
      handler_name    : SoundHandler
At least one output file must be specified
";

    #[test]
    fn test_global_metadata_in_order() {
        let meta = global_metadata(TRANSCRIPT);
        let keys: Vec<&str> = meta.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["major_brand", "minor_version", "compatible_brands", "encoder"]);
        assert_eq!(meta.get("encoder"), Some("Lavf58.29.100"));
    }

    #[test]
    fn test_global_metadata_ignores_stream_blocks() {
        let raw = "  Duration: 00:00:01.00, start: 0.0, bitrate: 5 kb/s\n    Stream #0:0: Audio: mp3\n    Metadata:\n      title : x\n";
        assert!(global_metadata(raw).is_empty());
        assert!(global_metadata("").is_empty());
    }

    #[test]
    fn test_stream_metadata_stops_at_side_data() {
        let at = TRANSCRIPT.find("(default)\n").unwrap() + "(default)".len();
        let meta = stream_metadata(&TRANSCRIPT[at..], &[markers::STREAM]);
        assert_eq!(meta.len(), 2);
        assert_eq!(meta.get("rotate"), Some("90"));
        assert_eq!(meta.get("displaymatrix"), None);
    }

    #[test]
    fn test_stream_metadata_terminator_order() {
        let after = "\n    Metadata:\n      handler_name    : SoundHandler\nAt least one output file must be specified\n";
        let meta = stream_metadata(after, &[markers::STREAM, markers::AT_LEAST_ONE_OUTPUT, markers::DURATION]);
        assert_eq!(meta.get("handler_name"), Some("SoundHandler"));

        assert!(stream_metadata(after, &[markers::STREAM]).is_empty());
    }

    #[test]
    fn test_stream_metadata_requires_leading_block() {
        let after = "\n    Stream #0:1: Audio: aac\n    Metadata:\n      title : x\nStream mapping:";
        assert!(stream_metadata(after, &[markers::STREAM]).is_empty());
    }
}
