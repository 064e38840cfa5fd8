use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};

pub fn write_test_jpg(path: &Path, shade: u8) {
    write_test_image(path, shade, ImageFormat::Jpeg);
}

pub fn write_test_image(path: &Path, shade: u8, format: ImageFormat) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create image parent dirs");
    }
    RgbImage::from_fn(8, 6, |x, y| Rgb([shade, (x * 20) as u8, (y * 30) as u8]))
        .save_with_format(path, format)
        .expect("encode test image");
}

pub fn write_corrupted_jpg(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create image parent dirs");
    }
    std::fs::write(path, b"\xFF\xD8\xFF\xE0 not really a jpeg").expect("write corrupted jpg");
}

pub fn jpg_count(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "jpg"))
                .count()
        })
        .unwrap_or(0)
}
