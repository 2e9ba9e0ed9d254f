use crate::utils::format_file_size;
use crate::verbose;
use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Summary of one `YYYY-MM` folder under the screenshot base directory.
/// Recomputed fresh on every listing, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyFolderSummary {
    pub name: String,
    pub path: String,
    pub file_count: usize,
    pub size_bytes: u64,
    pub size_formatted: String,
    pub last_modified: String,
}

/// Strict `YYYY-MM` check: four digits, a hyphen, two digits.
pub fn is_monthly_folder_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() == 7
        && bytes[..4].iter().all(|b| b.is_ascii_digit())
        && bytes[4] == b'-'
        && bytes[5..].iter().all(|b| b.is_ascii_digit())
}

/// Enumerate monthly folders directly under `base`, most recent first.
///
/// The folder matching the current calendar month is excluded unless
/// `include_current` is set. A folder that errors while its size is computed
/// is logged and omitted rather than aborting the listing; a missing base
/// directory yields an empty list.
pub fn list_monthly_folders(base: &Path, include_current: bool) -> Vec<MonthlyFolderSummary> {
    let Ok(read_dir) = fs::read_dir(base) else {
        verbose!("Monthly base directory not readable: {:?}", base);
        return Vec::new();
    };

    let current_year_month = Local::now().format("%Y-%m").to_string();
    let mut folders = Vec::new();

    for entry in read_dir.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !is_monthly_folder_name(&name) {
            continue;
        }
        if !include_current && name == current_year_month {
            continue;
        }

        match summarize_folder(&name, &path) {
            Ok(summary) => folders.push(summary),
            Err(e) => crate::error!("Could not summarize folder {:?}: {}", path, e),
        }
    }

    folders.sort_by(|a, b| b.name.cmp(&a.name));
    folders
}

fn summarize_folder(name: &str, path: &Path) -> crate::error::Result<MonthlyFolderSummary> {
    let mut file_count = 0usize;
    let mut size_bytes = 0u64;
    for entry in WalkDir::new(path) {
        let entry = entry?;
        if entry.file_type().is_file() {
            file_count += 1;
            size_bytes += entry.metadata()?.len();
        }
    }

    let last_modified = fs::metadata(path)?
        .modified()
        .map(|t| chrono::DateTime::<Local>::from(t).to_rfc3339())
        .unwrap_or_default();

    Ok(MonthlyFolderSummary {
        name: name.to_string(),
        path: path.to_string_lossy().into_owned(),
        file_count,
        size_bytes,
        size_formatted: format_file_size(size_bytes),
        last_modified,
    })
}
