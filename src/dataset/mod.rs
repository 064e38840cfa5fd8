//! Label-indexed image datasets.
//!
//! A dataset is anything exposing a fixed length and positional
//! `(sample, label)` retrieval. [`ImageFolderDataset`] indexes a
//! directory-per-class tree once at construction; wrappers such as
//! [`OffsetDataset`] compose over the same [`Dataset`] trait.

use std::path::PathBuf;

use thiserror::Error;

pub mod class_map;
pub mod collate;
pub mod folder;
pub mod offset;
pub mod preview;
pub mod transform;

pub use class_map::ClassLabelMap;
pub use collate::{Batch, DataLoader, collate};
pub use folder::{ImageFolderDataset, SampleEntry};
pub use offset::OffsetDataset;
pub use preview::{MAX_PREVIEW_IMAGES, PreviewItem, preview_random, random_indices};
pub use transform::{Identity, Resize, ToTensor, Transform};

/// Integer class label emitted by datasets.
///
/// Signed so offset wrappers can shift label spaces in either direction.
pub type Label = i64;

/// Errors surfaced by dataset construction and retrieval.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The dataset root does not exist or is not a directory.
    #[error("Dataset root is not a directory: {0}")]
    DirectoryNotFound(PathBuf),
    /// Requested position lies outside `[0, len)`.
    #[error("Index {index} out of range for dataset of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    /// Failed to read a directory or open an image file.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The image library could not decode a file.
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    /// Batches must hold at least one sample.
    #[error("Batch size must be greater than zero")]
    InvalidBatchSize,
}

/// Fixed-size, randomly addressable collection of `(sample, label)` pairs.
pub trait Dataset {
    /// Value produced for each position.
    type Sample;

    /// Number of addressable positions.
    fn len(&self) -> usize;

    /// Retrieve the sample and label stored at `index`.
    fn get(&self, index: usize) -> Result<(Self::Sample, Label), DatasetError>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<D: Dataset + ?Sized> Dataset for &D {
    type Sample = D::Sample;

    fn len(&self) -> usize {
        (**self).len()
    }

    fn get(&self, index: usize) -> Result<(Self::Sample, Label), DatasetError> {
        (**self).get(index)
    }
}

pub(crate) fn check_index(index: usize, len: usize) -> Result<(), DatasetError> {
    if index < len {
        Ok(())
    } else {
        Err(DatasetError::IndexOutOfRange { index, len })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{Dataset, DatasetError, Label, check_index};

    /// In-memory dataset with integer samples, used to exercise wrappers.
    pub(crate) struct VecDataset {
        pub(crate) items: Vec<(u32, Label)>,
    }

    impl VecDataset {
        pub(crate) fn new(items: &[(u32, Label)]) -> Self {
            Self {
                items: items.to_vec(),
            }
        }
    }

    impl Dataset for VecDataset {
        type Sample = u32;

        fn len(&self) -> usize {
            self.items.len()
        }

        fn get(&self, index: usize) -> Result<(u32, Label), DatasetError> {
            check_index(index, self.items.len())?;
            Ok(self.items[index])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::VecDataset;
    use super::*;

    #[test]
    fn reference_delegates_to_dataset() {
        let data = VecDataset::new(&[(7, 0), (8, 1)]);
        let borrowed = &data;
        assert_eq!(Dataset::len(&borrowed), 2);
        assert_eq!(borrowed.get(1).unwrap(), (8, 1));
    }

    #[test]
    fn check_index_rejects_len_and_beyond() {
        assert!(check_index(0, 1).is_ok());
        assert!(matches!(
            check_index(1, 1),
            Err(DatasetError::IndexOutOfRange { index: 1, len: 1 })
        ));
        assert!(check_index(usize::MAX, 3).is_err());
        assert!(check_index(0, 0).is_err());
    }
}
