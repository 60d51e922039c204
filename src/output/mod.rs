//! Report rendering for extracted media information

use serde::Serialize;

use crate::domain::model::*;
use crate::error::{MediaProbeError, MediaProbeResult};
use crate::utils::Utils;

/// Output format of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
    /// YAML document
    Yaml,
}

/// Serialize any report value as JSON or YAML
pub fn render_value<T: Serialize + ?Sized>(value: &T, format: ReportFormat) -> MediaProbeResult<String> {
    match format {
        ReportFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        ReportFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        ReportFormat::Text => Err(MediaProbeError::Render {
            message: "text rendering needs a dedicated formatter".to_string(),
        }),
    }
}

/// Render a complete record
pub fn render_information(info: &MediaInformation, format: ReportFormat) -> MediaProbeResult<String> {
    match format {
        ReportFormat::Text => Ok(format_as_text(info)),
        _ => render_value(info, format),
    }
}

/// Render several records; structured formats yield one array/sequence
pub fn render_many(infos: &[MediaInformation], format: ReportFormat) -> MediaProbeResult<String> {
    match format {
        ReportFormat::Text => Ok(infos
            .iter()
            .map(format_as_text)
            .collect::<Vec<_>>()
            .join("\n")),
        _ => render_value(infos, format),
    }
}

/// Format media info as human-readable text
pub fn format_as_text(info: &MediaInformation) -> String {
    let mut output = String::new();

    output.push_str("Media File Information:\n");
    output.push_str(&format!("  File: {}\n", info.path.display()));
    output.push_str(&format!("  Type: {}\n", info.kind));
    let container = if info.container.is_empty() { "unknown" } else { info.container.as_str() };
    output.push_str(&format!("  Container: {}\n", container));
    if let Some(duration) = &info.duration {
        output.push_str(&format!("  Duration: {} ({:.3}s)\n", duration, duration.seconds));
    }
    if let Some(start) = &info.start {
        output.push_str(&format!("  Start: {:.6}s\n", start.seconds));
    }
    match info.bitrate {
        Some(Bitrate::Available(kbps)) => {
            output.push_str(&format!("  Bitrate: {} kb/s\n", kbps));
        }
        Some(Bitrate::Unavailable) => {
            output.push_str("  Bitrate: N/A\n");
        }
        None => {}
    }
    if let Some(volume) = &info.volume {
        output.push_str(&format!(
            "  Volume: mean {} / max {}\n",
            format_db(volume.mean_db),
            format_db(volume.max_db)
        ));
    }
    if info.low_confidence {
        output.push_str("  Warning: analyzer produced no output\n");
    }

    if !info.global_metadata.is_empty() {
        output.push_str("\nMetadata:\n");
        write_metadata(&mut output, &info.global_metadata, "  ");
    }

    if let Some(video) = &info.video {
        output.push_str(&format!("\nVideo Stream{}:\n", stream_label(&video.stream_id, &video.language)));
        output.push_str(&format!("  Codec: {}\n", video.codec.raw));
        if let Some(dims) = &video.dimensions {
            let fixed = if dims.aspect_fix_applied { " (rotation corrected)" } else { "" };
            output.push_str(&format!("  Dimensions: {}x{}{}\n", dims.width, dims.height, fixed));
        }
        if let Some(dar) = &video.display_aspect_ratio {
            output.push_str(&format!("  Display Aspect Ratio: {}\n", dar));
        }
        if let Some(format) = &video.pixel_format {
            output.push_str(&format!("  Pixel Format: {}\n", format));
        }
        if let Some(rate) = video.frame_rate {
            output.push_str(&format!("  Frame Rate: {} fps\n", Utils::format_rate(rate)));
        }
        if let Some(count) = video.frame_count {
            output.push_str(&format!("  Frames: {}\n", count));
        }
        if let Some(bitrate) = video.bitrate {
            output.push_str(&format!("  Bitrate: {}\n", Utils::format_bitrate(bitrate)));
        }
        if let Some(rotation) = video.rotation {
            output.push_str(&format!("  Rotation: {}°\n", rotation));
        }
        write_metadata(&mut output, &video.metadata, "    ");
    }

    if let Some(audio) = &info.audio {
        output.push_str(&format!("\nAudio Stream{}:\n", stream_label(&audio.stream_id, &audio.language)));
        output.push_str(&format!("  Codec: {}\n", audio.codec.raw));
        if let Some(rate) = audio.sample_rate {
            output.push_str(&format!("  Sample Rate: {}\n", Utils::format_sample_rate(rate)));
        }
        if let Some(layout) = &audio.channel_layout {
            output.push_str(&format!("  Channels: {} ({})\n", audio.channel_count, layout));
        }
        if let Some(format) = &audio.sample_format {
            output.push_str(&format!("  Sample Format: {}\n", format));
        }
        if let Some(bitrate) = audio.bitrate {
            output.push_str(&format!("  Bitrate: {}\n", Utils::format_bitrate(bitrate)));
        }
        write_metadata(&mut output, &audio.metadata, "    ");
    }

    output
}

fn stream_label(stream_id: &Option<String>, language: &Option<String>) -> String {
    match (stream_id, language) {
        (Some(id), Some(lang)) => format!(" #{} ({})", id, lang),
        (Some(id), None) => format!(" #{}", id),
        (None, Some(lang)) => format!(" ({})", lang),
        (None, None) => String::new(),
    }
}

fn write_metadata(output: &mut String, metadata: &MetadataMap, indent: &str) {
    for (key, value) in metadata.iter() {
        output.push_str(&format!("{}{}: {}\n", indent, key, value));
    }
}

fn format_db(value: Option<f64>) -> String {
    value
        .map(|db| format!("{:.1} dB", db))
        .unwrap_or_else(|| "n/a".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::path::PathBuf;

    fn sample() -> MediaInformation {
        let mut global_metadata = MetadataMap::new();
        global_metadata.insert("title", "Holiday");
        MediaInformation {
            path: PathBuf::from("/media/song.mp3"),
            kind: MediaKind::Audio,
            container: "mp3".to_string(),
            duration: Some(Timecode::from_seconds(180.0)),
            bitrate: Some(Bitrate::Unavailable),
            start: None,
            volume: Some(Volume {
                mean_db: Some(-18.25),
                max_db: None,
            }),
            video: None,
            audio: Some(AudioStreamDescriptor {
                stream_id: Some("0:0".to_string()),
                channel_layout: Some("stereo".to_string()),
                channel_count: 2,
                sample_rate: Some(44100.0),
                ..AudioStreamDescriptor::default()
            }),
            global_metadata,
            read_at: Utc::now(),
            low_confidence: false,
            from_cache: true,
        }
    }

    #[test]
    fn test_text_report() {
        let text = format_as_text(&sample());
        assert!(text.contains("Type: audio"));
        assert!(text.contains("Container: mp3"));
        assert!(text.contains("Bitrate: N/A"));
        assert!(text.contains("Volume: mean -18.2 dB / max n/a") || text.contains("Volume: mean -18.3 dB / max n/a"));
        assert!(text.contains("Audio Stream #0:0:"));
        assert!(text.contains("Channels: 2 (stereo)"));
        assert!(text.contains("  title: Holiday"));
        assert!(!text.contains("Video Stream"));
    }

    #[test]
    fn test_text_report_layout() {
        let mut info = sample();
        info.audio = None;
        info.volume = None;
        info.global_metadata = MetadataMap::new();
        info.low_confidence = true;
        info.video = Some(VideoStreamDescriptor {
            stream_id: Some("0:0".to_string()),
            dimensions: Some(Dimensions {
                width: 1080.0,
                height: 1920.0,
                aspect_fix_applied: true,
            }),
            rotation: Some(90),
            codec: Codec {
                name: "h264".to_string(),
                raw: "h264".to_string(),
                ..Codec::default()
            },
            ..VideoStreamDescriptor::default()
        });

        let expected = "\
Media File Information:
  File: /media/song.mp3
  Type: audio
  Container: mp3
  Duration: 00:03:00.000 (180.000s)
  Bitrate: N/A
  Warning: analyzer produced no output

Video Stream #0:0:
  Codec: h264
  Dimensions: 1080x1920 (rotation corrected)
  Rotation: 90°
";
        assert_eq!(format_as_text(&info), expected);
    }

    #[test]
    fn test_json_report_omits_cache_flag() {
        let json = render_information(&sample(), ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["kind"], "audio");
        assert_eq!(value["bitrate"], "unavailable");
        assert!(value.get("from_cache").is_none());
        assert_eq!(value["global_metadata"]["title"], "Holiday");
    }

    #[test]
    fn test_yaml_report() {
        let yaml = render_many(&[sample()], ReportFormat::Yaml).unwrap();
        assert!(yaml.contains("kind: audio"));
    }
}
