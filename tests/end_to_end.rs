mod support;

use std::path::Path;

use image::DynamicImage;
use imgcurate::config::{self, AppSettings};
use imgcurate::dataset::{
    DataLoader, Dataset, ImageFolderDataset, OffsetDataset, Resize, ToTensor, Transform,
    preview_random,
};
use imgcurate::sanitize;
use support::images::{jpg_count, write_corrupted_jpg, write_test_jpg};
use support::imgcurate_env::ImgcurateEnvGuard;
use tempfile::tempdir;

fn seed_pets(root: &Path) {
    for (class, base) in [("cat", 10u8), ("dog", 100u8)] {
        for i in 0..3u8 {
            write_test_jpg(&root.join(class).join(format!("{class}_{i}.jpg")), base + i * 20);
        }
        write_corrupted_jpg(&root.join(class).join(format!("{class}_broken.jpg")));
    }
}

#[test]
fn cleaned_tree_indexes_into_two_labelled_classes() {
    let temp = tempdir().expect("create tempdir");
    let root = temp.path().join("images");
    seed_pets(&root);

    let report = sanitize::remove_corrupted_images(&root).expect("corruption pass");
    assert_eq!(report.scanned, 8);
    assert_eq!(report.removed, 2);
    assert_eq!(jpg_count(&root.join("cat")), 3);
    assert_eq!(jpg_count(&root.join("dog")), 3);

    let dataset = ImageFolderDataset::new(&root).expect("index dataset");
    assert_eq!(dataset.len(), 6);
    assert_eq!(dataset.class_names(), ["cat".to_string(), "dog".to_string()]);
    let mut labels: Vec<i64> = (0..dataset.len())
        .map(|index| dataset.get(index).expect("load sample").1)
        .collect();
    labels.sort_unstable();
    labels.dedup();
    assert_eq!(labels, vec![0, 1]);
}

#[test]
fn duplicates_across_classes_are_removed_once() {
    let temp = tempdir().expect("create tempdir");
    let root = temp.path().join("images");
    seed_pets(&root);
    std::fs::copy(root.join("cat/cat_0.jpg"), root.join("dog/copied_cat.jpg"))
        .expect("copy duplicate");

    let report = sanitize::remove_duplicate_images(&root).expect("dedup pass");
    assert_eq!(report.corrupted.removed, 2);
    assert_eq!(report.duplicates, 1);
    assert_eq!(jpg_count(&root.join("cat")) + jpg_count(&root.join("dog")), 6);

    let again = sanitize::remove_duplicate_images(&root).expect("second dedup pass");
    assert_eq!(again.duplicates, 0);
    assert_eq!(again.corrupted.removed, 0);
}

#[test]
fn offset_datasets_stack_label_spaces() {
    let temp = tempdir().expect("create tempdir");
    let pets = temp.path().join("pets");
    let birds = temp.path().join("birds");
    for i in 0..2u8 {
        write_test_jpg(&pets.join("cat").join(format!("{i}.jpg")), i);
        write_test_jpg(&pets.join("dog").join(format!("{i}.jpg")), i + 50);
        write_test_jpg(&birds.join("owl").join(format!("{i}.jpg")), i + 90);
    }

    let first = ImageFolderDataset::new(&pets).expect("index pets");
    let second = OffsetDataset::new(
        ImageFolderDataset::new(&birds).expect("index birds"),
        first.class_map().len() as i64,
    );
    let owl_labels: Vec<i64> = (0..second.len())
        .map(|index| second.get(index).expect("load bird").1)
        .collect();
    assert_eq!(owl_labels, vec![2, 2]);
    assert!(second.get(second.len()).is_err());
}

#[test]
fn loader_batches_tensors_from_a_folder() {
    let temp = tempdir().expect("create tempdir");
    let root = temp.path().join("images");
    seed_pets(&root);
    sanitize::remove_corrupted_images(&root).expect("corruption pass");

    let resize = Resize {
        width: 4,
        height: 4,
    };
    let dataset = ImageFolderDataset::with_transform(&root, move |image: DynamicImage| {
        ToTensor.apply(resize.apply(image))
    })
    .expect("index dataset");

    let loader = DataLoader::new(&dataset, 4).expect("loader").shuffled(3);
    assert_eq!(loader.num_batches(), 2);
    let batches: Vec<_> = loader.map(|batch| batch.expect("load batch")).collect();
    assert_eq!(batches[0].len(), 4);
    assert_eq!(batches[1].len(), 2);
    for tensor in batches.iter().flat_map(|batch| &batch.samples) {
        assert_eq!(tensor.shape(), &[3, 4, 4]);
    }
    let total_dogs: usize = batches
        .iter()
        .flat_map(|batch| &batch.labels)
        .filter(|&&label| label == 1)
        .count();
    assert_eq!(total_dogs, 3);
}

#[test]
fn seeded_preview_is_reproducible() {
    let temp = tempdir().expect("create tempdir");
    let root = temp.path().join("images");
    seed_pets(&root);
    sanitize::remove_corrupted_images(&root).expect("corruption pass");
    let dataset = ImageFolderDataset::new(&root).expect("index dataset");

    let first = preview_random(&dataset, 5, Some(42)).expect("preview");
    let second = preview_random(&dataset, 5, Some(42)).expect("preview");
    assert_eq!(first.len(), 5);
    let first_indices: Vec<usize> = first.iter().map(|item| item.index).collect();
    let second_indices: Vec<usize> = second.iter().map(|item| item.index).collect();
    assert_eq!(first_indices, second_indices);
    assert!(first.iter().all(|item| item.original_size == (8, 6)));
    assert!(preview_random(&dataset, 100, None).expect("preview").len() <= 15);
}

#[test]
fn settings_resolve_from_config_home() {
    let temp = tempdir().expect("create tempdir");
    let _env = ImgcurateEnvGuard::set_config_home(temp.path().to_path_buf());

    assert_eq!(config::load_or_default().expect("defaults"), AppSettings::default());

    let mut settings = AppSettings::default();
    settings.preview.count = 7;
    let path = config::config_path().expect("config path");
    assert!(path.starts_with(temp.path()));
    config::save_settings_to_path(&settings, &path).expect("save settings");
    assert_eq!(config::load_or_default().expect("reload").preview.count, 7);
}
