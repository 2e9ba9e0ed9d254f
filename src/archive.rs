use crate::constants::PARTIAL_ARCHIVE_SUFFIX;
use crate::error::{ArchiverError, Result};
use crate::verbose;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// The closed set of supported archive containers. Anything else is rejected
/// at the boundary by [`FromStr`], never silently mapped to a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    SevenZ,
    Zip,
}

impl ArchiveFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveFormat::SevenZ => "7z",
            ArchiveFormat::Zip => "zip",
        }
    }
}

impl FromStr for ArchiveFormat {
    type Err = ArchiverError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "7z" => Ok(ArchiveFormat::SevenZ),
            "zip" => Ok(ArchiveFormat::Zip),
            other => Err(ArchiverError::UnsupportedArchiveFormat(other.to_string())),
        }
    }
}

/// Pack every file under `staging_dir` into a new archive at `archive_path`,
/// preserving relative paths as entry names. Returns the archive size.
///
/// The archive is written to a `.partial` sibling and renamed into place on
/// success; on any mid-build failure the partial file is removed and nothing
/// is left at the final path.
pub fn build_archive(
    staging_dir: &Path,
    archive_path: &Path,
    format: ArchiveFormat,
) -> Result<u64> {
    let partial_path = partial_path_for(archive_path);

    struct PartialGuard {
        path: PathBuf,
        armed: bool,
    }
    impl Drop for PartialGuard {
        fn drop(&mut self) {
            if self.armed {
                let _ = fs::remove_file(&self.path);
            }
        }
    }
    let mut guard = PartialGuard {
        path: partial_path.clone(),
        armed: true,
    };

    match format {
        ArchiveFormat::Zip => write_zip(staging_dir, &partial_path)?,
        ArchiveFormat::SevenZ => sevenz_rust::compress_to_path(staging_dir, &partial_path)
            .map_err(|e| ArchiverError::SevenZip(format!("{:?}", e)))?,
    }

    fs::rename(&partial_path, archive_path)?;
    guard.armed = false;

    let size = fs::metadata(archive_path)?.len();
    verbose!("Archive written: {:?} ({} bytes)", archive_path, size);
    Ok(size)
}

fn partial_path_for(archive_path: &Path) -> PathBuf {
    let mut name = archive_path.as_os_str().to_owned();
    name.push(".");
    name.push(PARTIAL_ARCHIVE_SUFFIX);
    PathBuf::from(name)
}

fn write_zip(staging_dir: &Path, partial_path: &Path) -> Result<()> {
    let mut writer = ZipWriter::new(File::create(partial_path)?);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(staging_dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(staging_dir)
            .unwrap_or(entry.path());
        let name = rel.to_string_lossy().replace('\\', "/");
        writer.start_file(name, options)?;
        io::copy(&mut File::open(entry.path())?, &mut writer)?;
    }

    writer.finish()?;
    Ok(())
}
