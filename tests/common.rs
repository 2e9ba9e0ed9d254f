use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write a small real PNG with a deterministic gradient so conversions and
/// dimension probes in tests operate on decodable data.
pub fn write_test_png(path: &Path, width: u32, height: u32) {
    let img = image::ImageBuffer::from_fn(width, height, |x, y| {
        image::Rgb([(x * 13 % 256) as u8, (y * 29 % 256) as u8, 96u8])
    });
    img.save(path).unwrap();
}

/// Populate a screenshot folder with two real images and one text file.
pub fn fill_screenshot_folder(folder: &Path) -> Vec<PathBuf> {
    std::fs::create_dir_all(folder).unwrap();
    let a = folder.join("shot_a.png");
    let b = folder.join("shot_b.png");
    let log = folder.join("session.txt");

    write_test_png(&a, 16, 16);
    write_test_png(&b, 8, 12);
    File::create(&log).unwrap().write_all(b"session log").unwrap();

    vec![a, b, log]
}
