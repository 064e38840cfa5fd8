//! In-place cleanup of image directories.
//!
//! Two destructive passes over every `.jpg` below a directory: the corruption
//! filter deletes files that do not decode as images, and the duplicate filter
//! deletes byte-identical copies among the survivors. Per-file failures never
//! abort a pass; they become deletion or skip decisions and the passes report
//! aggregate counts.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

mod hash;
mod verify;
mod walk;

pub use hash::compute_content_hash;
pub use verify::{FileCheck, check_image};

use walk::{ensure_root_dir, visit_jpgs};

/// Errors that stop a sanitize pass before it starts.
#[derive(Debug, Error)]
pub enum SanitizeError {
    /// The provided path is not a directory.
    #[error("Sanitize root is not a directory: {0}")]
    InvalidRoot(PathBuf),
    /// The root directory could not be listed.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Summary of a corruption filter run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CorruptionReport {
    /// `.jpg` files examined.
    pub scanned: usize,
    /// Corrupted files deleted.
    pub removed: usize,
    /// Corrupted files that could not be deleted.
    pub delete_failures: Vec<PathBuf>,
}

/// Summary of a duplicate filter run, including its corruption pre-pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DedupReport {
    pub corrupted: CorruptionReport,
    /// `.jpg` files examined after the corruption pass.
    pub scanned: usize,
    /// Duplicate files deleted.
    pub duplicates: usize,
    /// Files kept because their bytes could not be read for hashing.
    pub unreadable: usize,
    /// Duplicates that could not be deleted.
    pub delete_failures: Vec<PathBuf>,
}

/// What happened to a file that a pass decided to drop.
#[derive(Debug)]
enum Removal {
    Deleted,
    Failed(PathBuf),
}

impl CorruptionReport {
    fn record(&mut self, removal: Removal) {
        match removal {
            Removal::Deleted => self.removed += 1,
            Removal::Failed(path) => self.delete_failures.push(path),
        }
    }
}

impl DedupReport {
    fn record(&mut self, removal: Removal) {
        match removal {
            Removal::Deleted => self.duplicates += 1,
            Removal::Failed(path) => self.delete_failures.push(path),
        }
    }
}

/// Delete every `.jpg` below `dir` that fails image verification.
///
/// Symbolic links are not followed: symlinked files and directories are
/// neither verified nor deleted.
///
/// A file that cannot be deleted is logged, listed in the report and left in
/// place; the pass continues with the next file.
pub fn remove_corrupted_images(dir: &Path) -> Result<CorruptionReport, SanitizeError> {
    let root = ensure_root_dir(dir)?;
    let mut report = CorruptionReport::default();
    visit_jpgs(&root, &mut |path| {
        report.scanned += 1;
        match check_image(path) {
            FileCheck::Valid => debug!(path = %path.display(), "Image verified"),
            FileCheck::Corrupted(err) => {
                info!(path = %path.display(), error = %err, "Removing corrupted image");
                report.record(delete_file(path));
            }
        }
    })?;
    info!(
        "Removed {} corrupted images from {}",
        report.removed,
        root.display()
    );
    Ok(report)
}

/// Delete byte-identical `.jpg` copies below `dir`, keeping the first seen.
///
/// Always runs [`remove_corrupted_images`] first so hashing only sees files
/// that verified. Symlinked files are skipped, as in the corruption pass.
/// Two images that look the same but differ in encoding are not duplicates.
pub fn remove_duplicate_images(dir: &Path) -> Result<DedupReport, SanitizeError> {
    let corrupted = remove_corrupted_images(dir)?;
    let root = ensure_root_dir(dir)?;
    let mut report = DedupReport {
        corrupted,
        ..DedupReport::default()
    };
    let mut seen: HashSet<String> = HashSet::new();
    visit_jpgs(&root, &mut |path| {
        report.scanned += 1;
        let digest = match compute_content_hash(path) {
            Ok(digest) => digest,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Failed to hash image; keeping it");
                report.unreadable += 1;
                return;
            }
        };
        if seen.insert(digest) {
            return;
        }
        info!(path = %path.display(), "Duplicate found; removing");
        report.record(delete_file(path));
    })?;
    info!(
        "Removed {} duplicate images from {}",
        report.duplicates,
        root.display()
    );
    Ok(report)
}

fn delete_file(path: &Path) -> Removal {
    match fs::remove_file(path) {
        Ok(()) => Removal::Deleted,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Failed to delete image; skipping");
            Removal::Failed(path.to_path_buf())
        }
    }
}
