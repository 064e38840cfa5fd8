use std::path::Path;

/// Extensions indexed by folder datasets (case-sensitive, without dots).
pub const DATASET_IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Extension swept by the sanitizer passes.
pub const SANITIZE_EXTENSION: &str = "jpg";

/// Return true if the path carries one of the dataset image extensions.
pub fn is_dataset_image(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    DATASET_IMAGE_EXTENSIONS.contains(&ext)
}

/// Return true if the path is a `.jpg` file name as seen by the sanitizer.
pub fn is_sanitize_target(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(SANITIZE_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_extensions_are_case_sensitive() {
        assert!(is_dataset_image(Path::new("cat/a.jpg")));
        assert!(is_dataset_image(Path::new("cat/a.jpeg")));
        assert!(is_dataset_image(Path::new("cat/a.png")));
        assert!(!is_dataset_image(Path::new("cat/a.JPG")));
        assert!(!is_dataset_image(Path::new("cat/a.gif")));
        assert!(!is_dataset_image(Path::new("cat/jpg")));
    }

    #[test]
    fn sanitizer_only_targets_jpg() {
        assert!(is_sanitize_target(Path::new("x/y/z.jpg")));
        assert!(!is_sanitize_target(Path::new("x/y/z.jpeg")));
        assert!(!is_sanitize_target(Path::new("x/y/z.png")));
    }
}
