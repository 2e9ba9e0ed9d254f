use crate::constants::{
    DEFAULT_QUALITY, LIBDEFLATER_HIGH_LEVEL, LIBDEFLATER_LOW_LEVEL, MAX_QUALITY, MIN_QUALITY,
    ZOPFLI_ITERATIONS,
};
use crate::error::{ArchiverError, Result};
use image::codecs::avif::AvifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ImageReader};
use oxipng::{Deflaters, InFile, Options, OutFile};
use std::fs;
use std::io::BufWriter;
use std::num::NonZeroU8;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use zune_core::bit_depth::BitDepth;
use zune_core::colorspace::ColorSpace;
use zune_core::options::EncoderOptions;
use zune_jpegxl::JxlSimpleEncoder;

/// Target container/codec for a conversion. Unknown tags are rejected at the
/// boundary, there is no fallback format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    Jpeg,
    Png,
    WebP,
    Avif,
    Jxl,
}

impl TargetFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            TargetFormat::Jpeg => "jpg",
            TargetFormat::Png => "png",
            TargetFormat::WebP => "webp",
            TargetFormat::Avif => "avif",
            TargetFormat::Jxl => "jxl",
        }
    }

    /// Whether the codec can represent an alpha channel. JPEG cannot, so
    /// sources with alpha are flattened to RGB first.
    pub fn supports_alpha(&self) -> bool {
        !matches!(self, TargetFormat::Jpeg)
    }
}

impl FromStr for TargetFormat {
    type Err = ArchiverError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(TargetFormat::Jpeg),
            "png" => Ok(TargetFormat::Png),
            "webp" => Ok(TargetFormat::WebP),
            "avif" => Ok(TargetFormat::Avif),
            "jxl" | "jpegxl" => Ok(TargetFormat::Jxl),
            other => Err(ArchiverError::UnsupportedImageFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TranscodeOptions {
    pub quality: u8,
    pub lossless: bool,
}

impl TranscodeOptions {
    pub fn new(quality: Option<u8>, lossless: bool) -> Result<Self> {
        let quality = quality.unwrap_or(DEFAULT_QUALITY);
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
            return Err(ArchiverError::InvalidQuality(quality));
        }
        Ok(Self { quality, lossless })
    }

    /// Settings used by the archival staging pass: lossless, quality 100.
    pub fn archival() -> Self {
        Self {
            quality: MAX_QUALITY,
            lossless: true,
        }
    }
}

/// Outcome of a successful conversion.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub output_path: PathBuf,
    pub original_size: u64,
    pub output_size: u64,
}

/// Convert one image from its source container to `format`.
///
/// `quality` applies to lossy targets; `lossless` forces a lossless encode
/// where the codec supports it (JXL always, WebP via the image crate's
/// lossless encoder). Errors are typed and never panic; callers in the
/// archival path treat them as the trigger for the verbatim-copy fallback.
pub fn convert_image(
    source: &Path,
    output: &Path,
    format: TargetFormat,
    options: &TranscodeOptions,
) -> Result<Conversion> {
    let original_size = fs::metadata(source)?.len();
    let img = ImageReader::open(source)?.decode()?;

    let img = if img.color().has_alpha() && !format.supports_alpha() {
        DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
        img
    };

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .map_err(|_| ArchiverError::DirectoryCreationFailed(parent.to_path_buf()))?;
    }

    match format {
        TargetFormat::Jpeg => {
            let writer = BufWriter::new(fs::File::create(output)?);
            let encoder = JpegEncoder::new_with_quality(writer, options.quality);
            img.write_with_encoder(encoder)?;
        }
        TargetFormat::Png => save_optimized_png(&img, output, options)?,
        TargetFormat::WebP => {
            let writer = BufWriter::new(fs::File::create(output)?);
            let encoder = WebPEncoder::new_lossless(writer);
            img.write_with_encoder(encoder)?;
        }
        TargetFormat::Avif => {
            let writer = BufWriter::new(fs::File::create(output)?);
            let encoder = AvifEncoder::new_with_speed_quality(writer, 4, options.quality);
            img.write_with_encoder(encoder)?;
        }
        TargetFormat::Jxl => save_lossless_jxl(&img, output)?,
    }

    let output_size = fs::metadata(output)?.len();
    Ok(Conversion {
        output_path: output.to_path_buf(),
        original_size,
        output_size,
    })
}

/// PNG encode followed by an oxipng pass. Quality tiers pick the deflater,
/// mirroring the archival preference for smaller files at high quality.
fn save_optimized_png(img: &DynamicImage, output: &Path, options: &TranscodeOptions) -> Result<()> {
    let temp_path = output.with_extension("temp.png");
    img.save_with_format(&temp_path, image::ImageFormat::Png)?;

    struct TempFileGuard(PathBuf);
    impl Drop for TempFileGuard {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
        }
    }
    let _guard = TempFileGuard(temp_path.clone());

    let mut oxipng_options = Options::from_preset(4);
    oxipng_options.force = true;

    if options.quality >= 90 {
        oxipng_options.deflate = Deflaters::Zopfli {
            iterations: NonZeroU8::new(ZOPFLI_ITERATIONS).unwrap(),
        };
    } else if options.quality >= 70 {
        oxipng_options.deflate = Deflaters::Libdeflater {
            compression: LIBDEFLATER_HIGH_LEVEL,
        };
    } else {
        oxipng_options.deflate = Deflaters::Libdeflater {
            compression: LIBDEFLATER_LOW_LEVEL,
        };
    }

    let input = InFile::Path(temp_path.clone());
    let out = OutFile::Path {
        path: Some(output.to_path_buf()),
        preserve_attrs: false,
    };
    oxipng::optimize(&input, &out, &oxipng_options)
        .map_err(|e| ArchiverError::PngOptimization(e.to_string()))?;

    Ok(())
}

fn save_lossless_jxl(img: &DynamicImage, output: &Path) -> Result<()> {
    let (width, height) = (img.width() as usize, img.height() as usize);
    let (data, colorspace) = if img.color().has_alpha() {
        (img.to_rgba8().into_raw(), ColorSpace::RGBA)
    } else {
        (img.to_rgb8().into_raw(), ColorSpace::RGB)
    };

    let encoder_options = EncoderOptions::new(width, height, colorspace, BitDepth::Eight);
    let encoder = JxlSimpleEncoder::new(&data, encoder_options);
    let encoded = encoder
        .encode()
        .map_err(|e| ArchiverError::JxlEncode(format!("{:?}", e)))?;

    fs::write(output, encoded)?;
    Ok(())
}
