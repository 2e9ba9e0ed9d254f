use crate::constants::VRC_METADATA_KEYS;
use crate::error::Result;
use crate::verbose;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// VRChat metadata embedded in a PNG's tEXt chunks. Structured values
/// (friend lists) are JSON, scalars stay as plain strings.
pub type EmbeddedMetadata = BTreeMap<String, Value>;

/// Read recognized VRChat metadata keys from a PNG file.
///
/// Values that parse as JSON are decoded, anything else is kept as a raw
/// string. Unrecognized keys are ignored. Metadata is best-effort: any read
/// failure yields an empty map so archival is never blocked.
pub fn read_metadata(path: &Path) -> EmbeddedMetadata {
    match read_text_chunks(path) {
        Ok(chunks) => {
            let mut metadata = EmbeddedMetadata::new();
            for (keyword, text) in chunks {
                if !VRC_METADATA_KEYS.contains(&keyword.as_str()) {
                    continue;
                }
                let value = serde_json::from_str(&text).unwrap_or(Value::String(text));
                metadata.insert(keyword, value);
            }
            metadata
        }
        Err(e) => {
            verbose!("Could not read metadata from {:?}: {}", path, e);
            EmbeddedMetadata::new()
        }
    }
}

/// Write metadata into a PNG's tEXt chunks, replacing the file in place.
///
/// Structured values are JSON-encoded, scalars are written in their string
/// form. The image is re-encoded into a temporary file next to the original
/// and renamed over it, so a failed write never corrupts the source. Returns
/// `false` on any failure instead of raising.
pub fn write_metadata(path: &Path, metadata: &EmbeddedMetadata) -> bool {
    match rewrite_with_text_chunks(path, metadata) {
        Ok(()) => true,
        Err(e) => {
            crate::error!("Failed to write metadata to {:?}: {}", path, e);
            false
        }
    }
}

fn read_text_chunks(path: &Path) -> Result<Vec<(String, String)>> {
    let decoder = png::Decoder::new(File::open(path)?);
    let reader = decoder.read_info()?;
    let info = reader.info();

    let mut chunks: Vec<(String, String)> = info
        .uncompressed_latin1_text
        .iter()
        .map(|chunk| (chunk.keyword.clone(), chunk.text.clone()))
        .collect();
    // Values beyond Latin-1 (Japanese world names) live in iTXt chunks.
    for chunk in &info.utf8_text {
        match chunk.get_text() {
            Ok(text) => chunks.push((chunk.keyword.clone(), text)),
            Err(e) => verbose!("Skipping unreadable iTXt chunk {:?}: {}", chunk.keyword, e),
        }
    }
    Ok(chunks)
}

fn is_latin1_representable(text: &str) -> bool {
    text.chars().all(|c| (c as u32) <= 0xFF)
}

fn rewrite_with_text_chunks(path: &Path, metadata: &EmbeddedMetadata) -> Result<()> {
    let mut decoder = png::Decoder::new(File::open(path)?);
    decoder.set_transformations(png::Transformations::EXPAND);
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf)?;
    let pixels = &buf[..frame.buffer_size()];

    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let temp = tempfile::NamedTempFile::new_in(parent)?;
    {
        let mut encoder = png::Encoder::new(
            BufWriter::new(temp.as_file().try_clone()?),
            frame.width,
            frame.height,
        );
        encoder.set_color(frame.color_type);
        encoder.set_depth(frame.bit_depth);
        for (keyword, value) in metadata {
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            // tEXt is Latin-1 only; anything wider goes into an iTXt chunk.
            if is_latin1_representable(&text) {
                encoder.add_text_chunk(keyword.clone(), text)?;
            } else {
                encoder.add_itxt_chunk(keyword.clone(), text)?;
            }
        }
        let mut writer = encoder.write_header()?;
        writer.write_image_data(pixels)?;
        writer.finish()?;
    }
    temp.persist(path)
        .map_err(|e| crate::error::ArchiverError::Io(e.error))?;
    Ok(())
}
