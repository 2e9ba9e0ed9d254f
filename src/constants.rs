pub const DEFAULT_QUALITY: u8 = 100;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

/// File extensions treated as images during folder scans (lowercase).
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "jxl", "webp"];

/// Name of the manifest file written at the root of every staging directory.
pub const MANIFEST_FILE_NAME: &str = "metadata.json";

/// The closed set of VRChat metadata keys recognized in PNG tEXt chunks.
pub const VRC_METADATA_KEYS: &[&str] = &["vrc_world_id", "vrc_world_name", "vrc_friends"];

pub const ZOPFLI_ITERATIONS: u8 = 15;
pub const LIBDEFLATER_HIGH_LEVEL: u8 = 12;
pub const LIBDEFLATER_LOW_LEVEL: u8 = 8;

/// Suffix appended to an archive path while it is being written. The partial
/// file is renamed into place only after the archive is complete.
pub const PARTIAL_ARCHIVE_SUFFIX: &str = "partial";
