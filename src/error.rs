use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiverError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    ImageProcessing(#[from] image::ImageError),

    #[error("PNG decode error: {0}")]
    PngDecode(#[from] png::DecodingError),

    #[error("PNG encode error: {0}")]
    PngEncode(#[from] png::EncodingError),

    #[error("PNG optimization error: {0}")]
    PngOptimization(String),

    #[error("JPEG XL encode error: {0}")]
    JxlEncode(String),

    #[error("Invalid quality value: {0}. Must be between 1 and 100")]
    InvalidQuality(u8),

    #[error("Unsupported image format: {0}")]
    UnsupportedImageFormat(String),

    #[error("Unsupported archive format: {0}. Supported formats: 7z, zip")]
    UnsupportedArchiveFormat(String),

    #[error("Source folder not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Failed to create output directory: {0}")]
    DirectoryCreationFailed(PathBuf),

    #[error("No files could be resolved for export")]
    NoFilesResolved,

    #[error("Zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("7z archive error: {0}")]
    SevenZip(String),

    #[error("Walkdir error: {0}")]
    Walkdir(#[from] walkdir::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ArchiverError>;
