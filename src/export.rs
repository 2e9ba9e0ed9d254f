use crate::archive::{build_archive, ArchiveFormat};
use crate::error::{ArchiverError, Result};
use crate::{verbose, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The narrow lookup contract to the excluded relational layer: turn an
/// image id into its on-disk path, if known.
pub trait ResolveImagePath {
    fn resolve(&self, id: i64) -> Option<PathBuf>;
}

/// Resolver backed by a JSON object mapping image ids to absolute paths.
/// Stands in for the database lookup when driven from the CLI.
pub struct JsonIndexResolver {
    index: BTreeMap<i64, PathBuf>,
}

impl JsonIndexResolver {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let parsed: BTreeMap<String, PathBuf> = serde_json::from_str(&raw)?;
        let index = parsed
            .into_iter()
            .filter_map(|(k, v)| k.parse::<i64>().ok().map(|id| (id, v)))
            .collect();
        Ok(Self { index })
    }
}

impl ResolveImagePath for JsonIndexResolver {
    fn resolve(&self, id: i64) -> Option<PathBuf> {
        self.index.get(&id).cloned()
    }
}

/// Result of a selective export run.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub success: bool,
    pub output_path: String,
    pub exported_count: usize,
    pub missing_ids: Vec<i64>,
    pub archive_size: u64,
}

/// Export a caller-chosen set of images into a downloadable archive.
///
/// Ids that do not resolve, and ids whose resolved file is missing on disk,
/// are recorded in `missing_ids` and skipped; they never abort the export.
/// Zero resolved files is run-fatal and leaves nothing on disk. The staging
/// directory is a `TempDir`, released on success and failure alike.
pub fn export_images<R: ResolveImagePath>(
    resolver: &R,
    image_ids: &[i64],
    output_path: &Path,
    format: ArchiveFormat,
) -> Result<ExportReport> {
    let staging = TempDir::new()?;
    let mut missing_ids = Vec::new();
    let mut exported_count = 0usize;

    for &id in image_ids {
        let Some(source) = resolver.resolve(id) else {
            warn!("Image id {} not found, skipping", id);
            missing_ids.push(id);
            continue;
        };
        if !source.is_file() {
            warn!("File for image id {} is missing on disk: {:?}", id, source);
            missing_ids.push(id);
            continue;
        }

        let filename = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{}", id));
        let mut dest = staging.path().join(&filename);
        if dest.exists() {
            // Same filename from different folders: disambiguate by id.
            dest = staging.path().join(format!("{}_{}", id, filename));
        }
        fs::copy(&source, &dest)?;
        exported_count += 1;
        verbose!("Staged image {} from {:?}", id, source);
    }

    if exported_count == 0 {
        return Err(ArchiverError::NoFilesResolved);
    }

    let archive_size = build_archive(staging.path(), output_path, format)?;
    Ok(ExportReport {
        success: true,
        output_path: output_path.to_string_lossy().into_owned(),
        exported_count,
        missing_ids,
        archive_size,
    })
}
