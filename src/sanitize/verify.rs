use std::path::Path;

use image::{ImageError, ImageReader};

/// Outcome of checking a single file's image structure.
#[derive(Debug)]
pub enum FileCheck {
    Valid,
    Corrupted(ImageError),
}

impl FileCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, FileCheck::Valid)
    }
}

/// Open `path`, detect its format from content and decode it fully.
///
/// Open failures, unknown formats and decode errors all count as corrupted.
pub fn check_image(path: &Path) -> FileCheck {
    match verify(path) {
        Ok(()) => FileCheck::Valid,
        Err(err) => FileCheck::Corrupted(err),
    }
}

fn verify(path: &Path) -> Result<(), ImageError> {
    ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use tempfile::tempdir;

    #[test]
    fn valid_jpeg_passes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ok.jpg");
        RgbImage::from_pixel(3, 3, Rgb([9, 9, 9]))
            .save_with_format(&path, ImageFormat::Jpeg)
            .unwrap();
        assert!(check_image(&path).is_valid());
    }

    #[test]
    fn png_bytes_behind_jpg_name_pass() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("actually_png.jpg");
        RgbImage::from_pixel(3, 3, Rgb([9, 9, 9]))
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();
        assert!(check_image(&path).is_valid());
    }

    #[test]
    fn garbage_missing_and_empty_files_fail() {
        let dir = tempdir().unwrap();
        let garbage = dir.path().join("garbage.jpg");
        std::fs::write(&garbage, b"<html>not an image</html>").unwrap();
        let empty = dir.path().join("empty.jpg");
        std::fs::write(&empty, b"").unwrap();

        assert!(matches!(check_image(&garbage), FileCheck::Corrupted(_)));
        assert!(matches!(check_image(&empty), FileCheck::Corrupted(_)));
        assert!(matches!(
            check_image(&dir.path().join("missing.jpg")),
            FileCheck::Corrupted(ImageError::IoError(_))
        ));
    }
}
