use std::fmt;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageReader};
use tracing::{debug, info};

use super::transform::{Identity, Transform};
use super::{ClassLabelMap, Dataset, DatasetError, Label, check_index};
use crate::image_support::is_dataset_image;

/// One indexed image: its path and the label of its class directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleEntry {
    pub path: PathBuf,
    pub label: usize,
}

/// Directory-per-class image dataset.
///
/// The layout is `<root>/<class>/<file>.{jpg,jpeg,png}`. Classes and files
/// are indexed once in the constructor; later changes to the directory are
/// not observed.
pub struct ImageFolderDataset<T = Identity> {
    root: PathBuf,
    class_map: ClassLabelMap,
    samples: Vec<SampleEntry>,
    transform: T,
}

impl ImageFolderDataset<Identity> {
    /// Index `root`, yielding decoded images untouched.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, DatasetError> {
        Self::with_transform(root, Identity)
    }
}

impl<T> ImageFolderDataset<T> {
    /// Index `root` and apply `transform` to every retrieved image.
    pub fn with_transform(root: impl AsRef<Path>, transform: T) -> Result<Self, DatasetError> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(DatasetError::DirectoryNotFound(root));
        }

        let class_dirs = list_class_dirs(&root)?;
        let class_map = ClassLabelMap::from_names(class_dirs.iter().map(|(name, _)| name.clone()));

        let mut samples = Vec::new();
        for (name, dir) in &class_dirs {
            let Some(label) = class_map.label(name) else {
                continue;
            };
            let before = samples.len();
            for path in list_dir(dir)? {
                if is_dataset_image(&path) && path.is_file() {
                    samples.push(SampleEntry { path, label });
                }
            }
            debug!(
                class = %name,
                label,
                count = samples.len() - before,
                "Indexed class directory"
            );
        }

        info!(
            root = %root.display(),
            classes = class_map.len(),
            samples = samples.len(),
            "Indexed image folder dataset"
        );
        Ok(Self {
            root,
            class_map,
            samples,
            transform,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn class_map(&self) -> &ClassLabelMap {
        &self.class_map
    }

    /// Class names sorted by label.
    pub fn class_names(&self) -> &[String] {
        self.class_map.names()
    }

    /// The sample index in positional order.
    pub fn samples(&self) -> &[SampleEntry] {
        &self.samples
    }

    /// Path and label at `index`, without touching the file.
    pub fn sample(&self, index: usize) -> Result<&SampleEntry, DatasetError> {
        check_index(index, self.samples.len())?;
        Ok(&self.samples[index])
    }

    /// Open the image at `index` without decoding or transforming it.
    ///
    /// The returned reader owns the file handle; dropping it closes the file.
    pub fn load_raw(&self, index: usize) -> Result<ImageReader<BufReader<File>>, DatasetError> {
        open_reader(&self.sample(index)?.path)
    }
}

impl<T: Transform> Dataset for ImageFolderDataset<T> {
    type Sample = T::Output;

    fn len(&self) -> usize {
        self.samples.len()
    }

    fn get(&self, index: usize) -> Result<(T::Output, Label), DatasetError> {
        let entry = self.sample(index)?;
        let image = decode_image(&entry.path)?;
        Ok((self.transform.apply(image), entry.label as Label))
    }
}

impl<T> fmt::Debug for ImageFolderDataset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFolderDataset")
            .field("root", &self.root)
            .field("classes", &self.class_map.names())
            .field("samples", &self.samples.len())
            .finish()
    }
}

fn list_dir(dir: &Path) -> Result<Vec<PathBuf>, DatasetError> {
    let entries = fs::read_dir(dir).map_err(|source| DatasetError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| DatasetError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        paths.push(entry.path());
    }
    Ok(paths)
}

fn list_class_dirs(root: &Path) -> Result<Vec<(String, PathBuf)>, DatasetError> {
    let mut class_dirs = Vec::new();
    for path in list_dir(root)? {
        if !path.is_dir() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        let name = file_name.to_string_lossy().into_owned();
        if file_name.to_str().is_none() {
            debug!(path = %path.display(), class = %name, "Class directory name is not UTF-8");
        }
        class_dirs.push((name, path));
    }
    Ok(class_dirs)
}

fn open_reader(path: &Path) -> Result<ImageReader<BufReader<File>>, DatasetError> {
    let io_err = |source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    };
    ImageReader::open(path)
        .map_err(io_err)?
        .with_guessed_format()
        .map_err(io_err)
}

fn decode_image(path: &Path) -> Result<DynamicImage, DatasetError> {
    open_reader(path)?
        .decode()
        .map_err(|source| DatasetError::Decode {
            path: path.to_path_buf(),
            source,
        })
}
