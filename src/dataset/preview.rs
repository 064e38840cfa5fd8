//! Random sample selection for visual inspection of a folder dataset.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::transform::Transform;
use super::{Dataset, DatasetError, ImageFolderDataset, Label};

/// Upper bound on the number of images drawn for a preview.
pub const MAX_PREVIEW_IMAGES: usize = 15;

/// A drawn sample alongside what is needed to present it.
#[derive(Debug, Clone)]
pub struct PreviewItem<S> {
    pub index: usize,
    pub class_name: String,
    pub label: Label,
    /// Width and height of the file before any transform.
    pub original_size: (u32, u32),
    pub sample: S,
}

/// Draw up to [`MAX_PREVIEW_IMAGES`] positions from `[0, len)`, with replacement.
///
/// The same `seed` always yields the same positions.
pub fn random_indices(len: usize, count: usize, seed: Option<u64>) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    (0..count.min(MAX_PREVIEW_IMAGES))
        .map(|_| rng.random_range(0..len))
        .collect()
}

/// Load a random selection of samples together with their original sizes.
pub fn preview_random<T: Transform>(
    dataset: &ImageFolderDataset<T>,
    count: usize,
    seed: Option<u64>,
) -> Result<Vec<PreviewItem<T::Output>>, DatasetError> {
    random_indices(dataset.len(), count, seed)
        .into_iter()
        .map(|index| {
            let (sample, label) = dataset.get(index)?;
            let path = dataset.sample(index)?.path.clone();
            let original_size = dataset
                .load_raw(index)?
                .into_dimensions()
                .map_err(|source| DatasetError::Decode { path, source })?;
            let class_name = usize::try_from(label)
                .ok()
                .and_then(|label| dataset.class_map().class_name(label))
                .unwrap_or_default()
                .to_string();
            Ok(PreviewItem {
                index,
                class_name,
                label,
                original_size,
                sample,
            })
        })
        .collect()
}
