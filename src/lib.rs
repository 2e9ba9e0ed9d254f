pub mod archive;
pub mod batch;
pub mod classify;
pub mod cli;
pub mod compress;
pub mod constants;
pub mod error;
pub mod export;
pub mod logger;
pub mod metadata;
pub mod monthly;
pub mod transcode;
pub mod utils;

pub use archive::{build_archive, ArchiveFormat};
pub use batch::{run_batch, BatchOutcome};
pub use classify::{image_dimensions, is_image_file, ImageDimensions};
pub use compress::{
    archive_folder, archive_monthly_folders, scan_folder, ArchiveFailure, ArchiveReport,
    ArchiveRunResult, FileMetadataEntry, FileRecord, RunManifest, RunStatistics,
};
pub use error::{ArchiverError, Result};
pub use export::{export_images, ExportReport, JsonIndexResolver, ResolveImagePath};
pub use metadata::{read_metadata, write_metadata, EmbeddedMetadata};
pub use monthly::{is_monthly_folder_name, list_monthly_folders, MonthlyFolderSummary};
pub use transcode::{convert_image, Conversion, TargetFormat, TranscodeOptions};
