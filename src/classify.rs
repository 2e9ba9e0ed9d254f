use crate::constants::SUPPORTED_IMAGE_EXTENSIONS;
use crate::verbose;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Pixel dimensions of an image. `(0, 0)` is the sentinel for "could not
/// determine" and must be checked with [`ImageDimensions::is_known`] before
/// the values are used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub const UNKNOWN: ImageDimensions = ImageDimensions {
        width: 0,
        height: 0,
    };

    pub fn is_known(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Check if a file path represents a supported image file
///
/// Pure extension inspection, no I/O.
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext_lower = ext.to_lowercase();
            SUPPORTED_IMAGE_EXTENSIONS.contains(&ext_lower.as_str())
        })
        .unwrap_or(false)
}

/// Probe an image file for its pixel dimensions.
///
/// Only the container header is read, the pixel data is never decoded. Any
/// failure (corrupt file, unsupported codec, I/O error) yields the `(0, 0)`
/// sentinel so callers can log and keep going; this never aborts a batch.
pub fn image_dimensions(path: &Path) -> ImageDimensions {
    match image::image_dimensions(path) {
        Ok((width, height)) => ImageDimensions { width, height },
        Err(e) => {
            verbose!("Could not read dimensions of {:?}: {}", path, e);
            ImageDimensions::UNKNOWN
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("shot.png")));
        assert!(is_image_file(Path::new("shot.jpg")));
        assert!(is_image_file(Path::new("shot.jpeg")));
        assert!(is_image_file(Path::new("shot.jxl")));
        assert!(is_image_file(Path::new("shot.webp")));

        assert!(!is_image_file(Path::new("shot.txt")));
        assert!(!is_image_file(Path::new("shot.gif")));
        assert!(!is_image_file(Path::new("shot")));
    }

    #[test]
    fn test_is_image_file_case_insensitive() {
        assert!(is_image_file(Path::new("shot.PNG")));
        assert!(is_image_file(Path::new("shot.JpEg")));
    }

    #[test]
    fn test_image_dimensions_real_png() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("small.png");
        image::DynamicImage::new_rgb8(12, 7).save(&path).unwrap();

        let dims = image_dimensions(&path);
        assert!(dims.is_known());
        assert_eq!(dims.width, 12);
        assert_eq!(dims.height, 7);
    }

    #[test]
    fn test_image_dimensions_sentinel_on_garbage() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.png");
        File::create(&path)
            .unwrap()
            .write_all(b"not a png at all")
            .unwrap();

        let dims = image_dimensions(&path);
        assert!(!dims.is_known());
        assert_eq!(dims, ImageDimensions::UNKNOWN);
    }

    #[test]
    fn test_image_dimensions_sentinel_on_missing_file() {
        let dims = image_dimensions(Path::new("/nonexistent/shot.png"));
        assert_eq!(dims, ImageDimensions::UNKNOWN);
    }
}
