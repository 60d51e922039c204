//! Command implementations

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};
use walkdir::WalkDir;

use crate::app::container::{AppContainer, DefaultAppContainer};
use crate::cli::args::{FieldArgs, FieldName, ImageArgs, InspectArgs, RawArgs};
use crate::domain::model::*;
use crate::output::{self, ReportFormat};
use crate::utils::path::PathUtils;
use crate::utils::Utils;

/// Execute the inspect command
pub async fn inspect(container: Arc<DefaultAppContainer>, args: InspectArgs) -> Result<()> {
    let files = collect_media_files(&args.paths, args.recursive)?;
    let jobs = args.jobs.unwrap_or_else(num_cpus::get).max(1);
    info!("Inspecting {} file(s) with {} job(s)", files.len(), jobs);

    let semaphore = Arc::new(Semaphore::new(jobs));
    let mut tasks = JoinSet::new();
    for (index, path) in files.iter().cloned().enumerate() {
        let container = Arc::clone(&container);
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await;
            let result = container
                .media_parser()
                .get_file_information(&path, container.use_cache())
                .await;
            (index, path, result)
        });
    }

    let mut slots: Vec<Option<MediaInformation>> = vec![None; files.len()];
    let mut failures = 0usize;
    while let Some(joined) = tasks.join_next().await {
        let (index, path, result) = joined.context("Inspection task panicked")?;
        match result {
            Ok(info) => slots[index] = Some(info),
            Err(e) => {
                failures += 1;
                error!("Failed to inspect {}: {}", path.display(), e);
                eprintln!("{}: {}", path.display(), e);
            }
        }
    }

    let infos: Vec<MediaInformation> = slots.into_iter().flatten().collect();
    if !infos.is_empty() {
        let rendered = match infos.as_slice() {
            [single] => output::render_information(single, args.format)?,
            many => output::render_many(many, args.format)?,
        };
        println!("{}", rendered.trim_end());
    }

    if failures > 0 {
        anyhow::bail!("{} of {} file(s) could not be inspected", failures, files.len());
    }
    Ok(())
}

/// Execute the field command
pub async fn field(container: Arc<DefaultAppContainer>, args: FieldArgs) -> Result<()> {
    let parser = container.media_parser();
    let use_cache = container.use_cache();
    let path = args.path.as_path();
    let format = args.format;

    let rendered = match args.field {
        FieldName::Type => scalar(&parser.file_type(path, use_cache).await?, format)?,
        FieldName::Container => {
            let container_format = parser.container_format(path, use_cache).await?;
            scalar(&container_format, format)?
        }
        FieldName::Duration => {
            let duration = parser.duration(path, use_cache).await?;
            match format {
                ReportFormat::Text => optional_text(duration.map(|d| d.to_string())),
                _ => output::render_value(&duration, format)?,
            }
        }
        FieldName::Start => {
            let start = parser.start(path, use_cache).await?;
            match format {
                ReportFormat::Text => optional_text(start.map(|s| s.to_string())),
                _ => output::render_value(&start, format)?,
            }
        }
        FieldName::Bitrate => {
            let bitrate = parser.bitrate(path, use_cache).await?;
            match format {
                ReportFormat::Text => match bitrate {
                    Some(Bitrate::Available(kbps)) => format!("{} kb/s", kbps),
                    Some(Bitrate::Unavailable) => "N/A".to_string(),
                    None => "none".to_string(),
                },
                _ => output::render_value(&bitrate, format)?,
            }
        }
        FieldName::Volume => structured(&parser.volume(path, use_cache).await?, format)?,
        FieldName::Metadata => structured(&parser.global_metadata(path, use_cache).await?, format)?,
        FieldName::Video => structured(&parser.video_component(path, use_cache).await?, format)?,
        FieldName::Audio => structured(&parser.audio_component(path, use_cache).await?, format)?,
        FieldName::HasAudio => scalar(&parser.has_audio(path, use_cache).await?, format)?,
        FieldName::HasVideo => scalar(&parser.has_video(path, use_cache).await?, format)?,
    };

    println!("{}", rendered.trim_end());
    Ok(())
}

/// Execute the raw command
pub async fn raw(container: Arc<DefaultAppContainer>, args: RawArgs) -> Result<()> {
    let text = container
        .media_parser()
        .raw_information(&args.path, container.use_cache())
        .await
        .with_context(|| format!("Failed to analyze {}", args.path.display()))?;
    print!("{}", text);
    Ok(())
}

/// Image summary printed by the image command
#[derive(Debug, Serialize)]
struct ImageReport {
    path: PathBuf,
    kind: MediaKind,
    dimensions: Option<Dimensions>,
    frame_rate: Option<f64>,
}

/// Execute the image command
pub async fn image(container: Arc<DefaultAppContainer>, args: ImageArgs) -> Result<()> {
    let image = container.open_image(&args.path, !args.no_check).await?;
    let use_cache = container.use_cache();

    let report = ImageReport {
        path: image.path().to_path_buf(),
        kind: image.kind(),
        dimensions: image.dimensions(use_cache).await?,
        frame_rate: image.frame_rate(use_cache).await?,
    };

    let rendered = match args.format {
        ReportFormat::Text => {
            let dimensions = report
                .dimensions
                .map(|d| format!("{}x{}", d.width, d.height))
                .unwrap_or_else(|| "unknown".to_string());
            let frame_rate = report
                .frame_rate
                .map(Utils::format_rate)
                .unwrap_or_else(|| "unknown".to_string());
            format!(
                "Image: {}\n  Type: {}\n  Dimensions: {}\n  Frame rate: {}",
                report.path.display(),
                report.kind,
                dimensions,
                frame_rate
            )
        }
        _ => output::render_value(&report, args.format)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

/// Expand the command-line paths into the files to inspect
fn collect_media_files(paths: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            // Missing files are reported per file by the parser
            files.push(path.clone());
            continue;
        }

        let max_depth = if recursive { usize::MAX } else { 1 };
        let mut found: Vec<PathBuf> = WalkDir::new(path)
            .max_depth(max_depth)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !PathUtils::is_hidden(entry.path()))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect();
        found.sort();
        debug!("{} file(s) under {}", found.len(), path.display());
        files.extend(found);
    }

    if files.is_empty() {
        anyhow::bail!("No files to inspect");
    }
    Ok(files)
}

fn scalar<T: Serialize + std::fmt::Display>(value: &T, format: ReportFormat) -> Result<String> {
    Ok(match format {
        ReportFormat::Text => value.to_string(),
        _ => output::render_value(value, format)?,
    })
}

/// Structured values have no text form of their own; YAML reads well enough
fn structured<T: Serialize>(value: &T, format: ReportFormat) -> Result<String> {
    let format = match format {
        ReportFormat::Text => ReportFormat::Yaml,
        other => other,
    };
    Ok(output::render_value(value, format)?)
}

fn optional_text(value: Option<String>) -> String {
    value.unwrap_or_else(|| "none".to_string())
}
