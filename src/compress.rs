use crate::archive::{build_archive, ArchiveFormat};
use crate::batch::run_batch;
use crate::classify::{image_dimensions, is_image_file, ImageDimensions};
use crate::constants::MANIFEST_FILE_NAME;
use crate::error::{ArchiverError, Result};
use crate::monthly::list_monthly_folders;
use crate::transcode::{convert_image, TargetFormat, TranscodeOptions};
use crate::verbose;
use chrono::Local;
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// One file found during the scan phase. Immutable once produced; lives for
/// the duration of a single archival run.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub absolute_path: PathBuf,
    pub relative_path: PathBuf,
    pub size_bytes: u64,
    pub modified: String,
    pub is_image: bool,
}

impl AsRef<Path> for FileRecord {
    fn as_ref(&self) -> &Path {
        &self.absolute_path
    }
}

/// Manifest entry for one processed image.
#[derive(Debug, Clone, Serialize)]
pub struct FileMetadataEntry {
    pub filename: String,
    pub relative_path: String,
    pub size_bytes: u64,
    pub modified: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<ImageDimensions>,
}

/// The JSON index written into every archive as `metadata.json`.
#[derive(Debug, Serialize)]
pub struct RunManifest {
    pub folder_name: String,
    pub compression_timestamp: String,
    pub file_count: usize,
    pub image_count: usize,
    pub entries: Vec<FileMetadataEntry>,
}

/// Increment-only counters for one archival run.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunStatistics {
    pub total: usize,
    pub images: usize,
    pub other: usize,
    pub errors: usize,
    pub total_original_size: u64,
    pub total_compressed_size: u64,
}

impl RunStatistics {
    /// Space saved as a fraction in `[0, 1]`. Exactly `0` when nothing was
    /// scanned, and clamped at `0` when the archive grew.
    pub fn compression_ratio(&self, archive_size: u64) -> f64 {
        if self.total_original_size == 0 {
            return 0.0;
        }
        (1.0 - archive_size as f64 / self.total_original_size as f64).max(0.0)
    }
}

/// Run result returned to the orchestration layer on success.
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveReport {
    pub success: bool,
    pub source_path: String,
    pub output_path: String,
    pub folder_name: String,
    pub file_count: usize,
    pub image_count: usize,
    pub other_count: usize,
    pub error_count: usize,
    pub original_size: u64,
    pub compressed_size: u64,
    pub compression_ratio: f64,
    pub complete_time: String,
}

/// Structured failure for one folder run.
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveFailure {
    pub success: bool,
    pub source_path: String,
    pub error: String,
}

/// Per-folder outcome of a batch archival session. One folder failing never
/// corrupts its siblings, so batch results carry both shapes.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ArchiveRunResult {
    Completed(ArchiveReport),
    Failed(ArchiveFailure),
}

impl ArchiveRunResult {
    pub fn from_error(source: &Path, error: &ArchiverError) -> Self {
        ArchiveRunResult::Failed(ArchiveFailure {
            success: false,
            source_path: source.to_string_lossy().into_owned(),
            error: error.to_string(),
        })
    }
}

/// Recursively enumerate all files under `source` into FileRecords.
pub fn scan_folder(source: &Path) -> Result<Vec<FileRecord>> {
    let mut records = Vec::new();
    for entry in walkdir::WalkDir::new(source) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let metadata = entry.metadata()?;
        let modified = metadata
            .modified()
            .map(|t| chrono::DateTime::<Local>::from(t).to_rfc3339())
            .unwrap_or_default();
        records.push(FileRecord {
            absolute_path: path.to_path_buf(),
            relative_path: path.strip_prefix(source).unwrap_or(path).to_path_buf(),
            size_bytes: metadata.len(),
            modified,
            is_image: is_image_file(path),
        });
    }
    Ok(records)
}

/// Archive one source folder: scan, stage (lossless JXL conversion with
/// verbatim-copy fallback), write the manifest, pack, report.
///
/// Images that fail conversion are still copied verbatim into the staging
/// area and counted as errors, so every scanned file is physically present
/// in the resulting archive. The staging directory is a `TempDir` and is
/// released on every path out of this function.
pub fn archive_folder<P>(
    source: &Path,
    output_dir: &Path,
    format: ArchiveFormat,
    progress: Option<P>,
) -> Result<ArchiveReport>
where
    P: FnMut(usize, usize, &str),
{
    if !source.is_dir() {
        return Err(ArchiverError::SourceNotFound(source.to_path_buf()));
    }
    let folder_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "archive".to_string());

    fs::create_dir_all(output_dir)
        .map_err(|_| ArchiverError::DirectoryCreationFailed(output_dir.to_path_buf()))?;

    let records = scan_folder(source)?;
    let staging = TempDir::new()?;
    verbose!("Staging directory: {:?}", staging.path());

    let mut stats = RunStatistics::default();
    let mut entries: Vec<FileMetadataEntry> = Vec::new();
    let archival_options = TranscodeOptions::archival();

    let outcome = run_batch(
        &records,
        |record| {
            stage_file(record, staging.path(), &archival_options, &mut stats, &mut entries)
        },
        progress,
    );
    // Hard staging failures (copy errors) on top of conversion fallbacks.
    stats.errors += outcome.errors;

    let manifest = RunManifest {
        folder_name: folder_name.clone(),
        compression_timestamp: Local::now().to_rfc3339(),
        file_count: stats.total,
        image_count: stats.images,
        entries,
    };
    let manifest_json = serde_json::to_string_pretty(&manifest)?;
    fs::write(staging.path().join(MANIFEST_FILE_NAME), manifest_json)?;

    let archive_path = output_dir.join(format!("{}.{}", folder_name, format.extension()));
    let archive_size = build_archive(staging.path(), &archive_path, format)?;

    Ok(ArchiveReport {
        success: true,
        source_path: source.to_string_lossy().into_owned(),
        output_path: archive_path.to_string_lossy().into_owned(),
        folder_name,
        file_count: stats.total,
        image_count: stats.images,
        other_count: stats.other,
        error_count: stats.errors,
        original_size: stats.total_original_size,
        compressed_size: archive_size,
        compression_ratio: stats.compression_ratio(archive_size),
        complete_time: Local::now().to_rfc3339(),
    })
}

/// Stage a single scanned file: convert images to lossless JXL, fall back to
/// a verbatim copy on conversion failure, copy non-images verbatim. The
/// fallback is recorded in the statistics rather than raised.
fn stage_file(
    record: &FileRecord,
    staging: &Path,
    options: &TranscodeOptions,
    stats: &mut RunStatistics,
    entries: &mut Vec<FileMetadataEntry>,
) -> Result<()> {
    stats.total += 1;
    stats.total_original_size += record.size_bytes;

    if !record.is_image {
        stats.other += 1;
        copy_verbatim(record, staging)?;
        stats.total_compressed_size += record.size_bytes;
        return Ok(());
    }

    stats.images += 1;
    let dims = image_dimensions(&record.absolute_path);
    entries.push(FileMetadataEntry {
        filename: record
            .absolute_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        relative_path: record.relative_path.to_string_lossy().into_owned(),
        size_bytes: record.size_bytes,
        modified: record.modified.clone(),
        dimensions: dims.is_known().then_some(dims),
    });

    let converted_rel = record
        .relative_path
        .with_extension(TargetFormat::Jxl.extension());
    let converted_path = staging.join(converted_rel);
    match convert_image(
        &record.absolute_path,
        &converted_path,
        TargetFormat::Jxl,
        options,
    ) {
        Ok(conversion) => {
            stats.total_compressed_size += conversion.output_size;
        }
        Err(e) => {
            crate::error!(
                "JXL conversion failed for {:?}, copying verbatim: {}",
                record.absolute_path,
                e
            );
            copy_verbatim(record, staging)?;
            stats.errors += 1;
            stats.total_compressed_size += record.size_bytes;
        }
    }
    Ok(())
}

fn copy_verbatim(record: &FileRecord, staging: &Path) -> Result<()> {
    let dest = staging.join(&record.relative_path);
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .map_err(|_| ArchiverError::DirectoryCreationFailed(parent.to_path_buf()))?;
    }
    fs::copy(&record.absolute_path, &dest)?;
    Ok(())
}

/// Archive every monthly folder under `base` into `output_dir`, one archive
/// per folder. Folders run in parallel and are fully isolated: a failed
/// folder produces a `Failed` entry without touching its siblings.
pub fn archive_monthly_folders(
    base: &Path,
    output_dir: &Path,
    format: ArchiveFormat,
    include_current: bool,
) -> Vec<ArchiveRunResult> {
    let folders = list_monthly_folders(base, include_current);
    folders
        .par_iter()
        .map(|summary| {
            let source = PathBuf::from(&summary.path);
            match archive_folder(
                &source,
                output_dir,
                format,
                None::<fn(usize, usize, &str)>,
            ) {
                Ok(report) => ArchiveRunResult::Completed(report),
                Err(e) => {
                    crate::error!("Archival of {:?} failed: {}", source, e);
                    ArchiveRunResult::from_error(&source, &e)
                }
            }
        })
        .collect()
}
