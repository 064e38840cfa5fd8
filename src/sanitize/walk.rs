use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::warn;

use crate::image_support::is_sanitize_target;

use super::SanitizeError;

pub(super) fn ensure_root_dir(root: &Path) -> Result<PathBuf, SanitizeError> {
    if root.is_dir() {
        Ok(root.to_path_buf())
    } else {
        Err(SanitizeError::InvalidRoot(root.to_path_buf()))
    }
}

/// Visit every `.jpg` file below `root`, depth first.
///
/// Unreadable subdirectories are logged and skipped; only a failure to read
/// `root` itself is returned. Symlinks are not followed.
pub(super) fn visit_jpgs(
    root: &Path,
    visitor: &mut impl FnMut(&Path),
) -> Result<(), SanitizeError> {
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(source) if dir != root => {
                warn!(
                    dir = %dir.display(),
                    error = %source,
                    "Failed to read directory during sanitize"
                );
                continue;
            }
            Err(source) => {
                return Err(SanitizeError::Io {
                    path: dir.clone(),
                    source,
                });
            }
        };
        for entry_result in entries {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(
                        dir = %dir.display(),
                        error = %err,
                        "Failed to read directory entry during sanitize"
                    );
                    continue;
                }
            };

            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "Failed to read file type during sanitize"
                    );
                    continue;
                }
            };
            if file_type.is_symlink() {
                continue;
            }
            if file_type.is_dir() {
                stack.push(path);
                continue;
            }
            if file_type.is_file() && is_sanitize_target(&path) {
                visitor(&path);
            }
        }
    }
    Ok(())
}
