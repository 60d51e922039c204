//! Video stream descriptor extraction

use std::collections::BTreeMap;

use crate::domain::model::{Dimensions, VideoStreamDescriptor};
use crate::domain::rules::{self as domain_rules, AspectRatioCorrector};
use crate::probe::{codec, fields, markers, metadata, rules};

/// Describe the first video stream of a transcript, `None` when there is no video header line
pub fn video_stream(raw: &str) -> Option<VideoStreamDescriptor> {
    let caps = rules::VIDEO_STREAM_LINE.captures(raw)?;
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

    let ratios = rules::BRACKETED_RATIOS
        .captures(description)
        .or_else(|| rules::BARE_RATIOS.captures(description));
    let (pixel_aspect_ratio, display_aspect_ratio) = match &ratios {
        Some(c) => {
            if let Some(m) = c.get(0) {
                consumed.push(m.as_str());
            }
            (Some(c[1].to_string()), Some(c[2].to_string()))
        }
        None => (None, None),
    };

    let dimensions = dimensions(description, display_aspect_ratio.as_deref(), &mut consumed);
    let time_bases = time_bases(description, &mut consumed);
    let frame_rate = domain_rules::preferred_frame_rate(&time_bases);
    let frame_count =
        frame_rate.and_then(|rate| domain_rules::frame_count(fields::duration(raw).as_ref(), rate));

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
    let pixel_format = remaining
        .get(1)
        .map(|segment| codec::strip_qualifiers(segment).to_string())
        .filter(|format| !format.is_empty());

    let metadata = metadata::stream_metadata(after, &[markers::STREAM, markers::AT_LEAST_ONE_OUTPUT]);
    let rotation = metadata
        .get("rotate")
        .and_then(|value| value.trim().parse::<f64>().ok())
        .map(|degrees| degrees.round() as i32)
        .or_else(|| display_matrix_rotation(metadata::stream_section(after)));

    Some(VideoStreamDescriptor {
        stream_id,
        language,
        dimensions,
        pixel_aspect_ratio,
        display_aspect_ratio,
        time_bases,
        frame_rate,
        frame_count,
        bitrate,
        pixel_format,
        rotation,
        codec,
        metadata,
    })
}

fn dimensions<'a>(
    description: &'a str,
    display_aspect_ratio: Option<&str>,
    consumed: &mut Vec<&'a str>,
) -> Option<Dimensions> {
    let caps = rules::DIMENSIONS.captures(description)?;
    let width = caps[1].parse::<f64>().ok()?;
    let height = caps[2].parse::<f64>().ok()?;
    consumed.push(caps.get(0)?.as_str());
    Some(AspectRatioCorrector::correct(width, height, display_aspect_ratio))
}

fn time_bases<'a>(description: &'a str, consumed: &mut Vec<&'a str>) -> BTreeMap<String, f64> {
    let mut bases = BTreeMap::new();
    for caps in rules::TIME_BASE.captures_iter(description) {
        let Some(value) = time_base_value(&caps[1]) else {
            continue;
        };
        if let Some(m) = caps.get(0) {
            consumed.push(m.as_str());
        }
        bases.entry(caps[2].to_string()).or_insert(value);
    }
    bases
}

/// `29.97` -> 29.97, `30k` -> 30000
fn time_base_value(token: &str) -> Option<f64> {
    match token.strip_suffix('k') {
        Some(thousands) => thousands.parse::<f64>().ok().map(|v| v * 1000.0),
        None => token.parse::<f64>().ok(),
    }
}

/// Clockwise rotation implied by a `displaymatrix` side-data line, in [0, 360)
fn display_matrix_rotation(section: &str) -> Option<i32> {
    let caps = rules::DISPLAY_MATRIX_ROTATION.captures(section)?;
    let degrees = caps[1].parse::<f64>().ok()?;
    Some(((-degrees).round() as i32).rem_euclid(360))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHONE_CLIP: &str = "\
Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'phone.mp4':
  Metadata:
    major_brand     : isom
  Duration: 00:00:10.00, start: 0.000000, bitrate: 1205 kb/s
    Stream #0:0(eng): Video: h264 (High) (avc1 / 0x31637661), yuv420p(tv, bt709, progressive), 1920x1080 [SAR 1:1 DAR 9:16], 1070 kb/s, 29.97 fps, 29.97 tbr, 30k tbn, 59.94 tbc (default)
    Metadata:
      handler_name    : VideoHandler
      rotate          : 90
    Stream #0:1(und): Audio: aac (LC) (mp4a / 0x6134706D), 44100 Hz, stereo, fltp, 128 kb/s (default)
At least one output file must be specified
";

    #[test]
    fn test_full_video_descriptor() {
        let video = video_stream(PHONE_CLIP).unwrap();

        assert_eq!(video.stream_id.as_deref(), Some("0:0"));
        assert_eq!(video.language.as_deref(), Some("eng"));
        assert_eq!(video.pixel_aspect_ratio.as_deref(), Some("1:1"));
        assert_eq!(video.display_aspect_ratio.as_deref(), Some("9:16"));

        let dims = video.dimensions.unwrap();
        assert_eq!((dims.width, dims.height), (1080.0, 1920.0));
        assert!(dims.aspect_fix_applied);

        assert_eq!(video.time_bases.get("fps"), Some(&29.97));
        assert_eq!(video.time_bases.get("tbn"), Some(&30000.0));
        assert_eq!(video.time_bases.get("tbc"), Some(&59.94));
        assert_eq!(video.frame_rate, Some(29.97));
        assert_eq!(video.frame_count, Some(300));
        assert_eq!(video.bitrate, Some(1_070_000));

        assert_eq!(video.codec.name, "h264");
        assert_eq!(video.codec.profile.as_deref(), Some("High"));
        assert_eq!(video.codec.tag.as_deref(), Some("avc1"));
        assert_eq!(video.pixel_format.as_deref(), Some("yuv420p"));

        assert_eq!(video.rotation, Some(90));
        assert_eq!(video.metadata.get("handler_name"), Some("VideoHandler"));
    }

    #[test]
    fn test_landscape_ratio_keeps_dimensions() {
        let raw = "    Stream #0:0: Video: vp9 (Profile 0), yuv420p(tv), 1280x720, SAR 1:1 DAR 16:9, 25 fps, 25 tbr, 1k tbn (default)\n";
        let video = video_stream(raw).unwrap();
        let dims = video.dimensions.unwrap();
        assert_eq!((dims.width, dims.height), (1280.0, 720.0));
        assert!(!dims.aspect_fix_applied);
        assert_eq!(video.display_aspect_ratio.as_deref(), Some("16:9"));
        assert_eq!(video.language, None);
        assert_eq!(video.frame_count, None);
        assert_eq!(video.time_bases.get("tbn"), Some(&1000.0));
    }

    #[test]
    fn test_megabit_stream_bitrate() {
        let raw = "    Stream #0:0: Video: mpeg2video (Main), yuv420p, 720x576, 1 mb/s, 25 tbr\n";
        assert_eq!(video_stream(raw).unwrap().bitrate, Some(8_192_000));
    }

    #[test]
    fn test_oversized_stream_bitrate_is_dropped() {
        let raw = "    Stream #0:0: Video: h264, yuv420p, 1280x720, 99999999999999 mb/s, 25 fps\n";
        let video = video_stream(raw).unwrap();
        assert_eq!(video.bitrate, None);
        assert_eq!(video.frame_rate, Some(25.0));
        assert_eq!(video.pixel_format.as_deref(), Some("yuv420p"));
    }

    #[test]
    fn test_tbr_fallback_frame_rate() {
        let raw = "    Stream #0:0: Video: mjpeg, yuvj420p(pc, bt470bg/unknown/unknown), 640x480, 25 tbr, 25 tbn\n";
        let video = video_stream(raw).unwrap();
        assert_eq!(video.frame_rate, Some(25.0));
        assert_eq!(video.codec.name, "mjpeg");
        assert_eq!(video.pixel_format.as_deref(), Some("yuvj420p"));
    }

    #[test]
    fn test_display_matrix_rotation_fallback() {
        let raw = "    Stream #0:0(und): Video: hevc (Main) (hvc1 / 0x31637668), yuv420p(tv), 3840x2160, 30 fps\n    Side data:\n      displaymatrix: rotation of -90.00 degrees\n    Stream #0:1(und): Audio: aac\n";
        assert_eq!(video_stream(raw).unwrap().rotation, Some(90));

        let raw = "    Stream #0:0: Video: hevc, yuv420p, 3840x2160\n    Side data:\n      displaymatrix: rotation of 90.00 degrees\n";
        assert_eq!(video_stream(raw).unwrap().rotation, Some(270));
    }

    #[test]
    fn test_no_video_line() {
        assert!(video_stream("    Stream #0:0: Audio: mp3, 44100 Hz, stereo").is_none());
        assert!(video_stream("").is_none());
    }
}
