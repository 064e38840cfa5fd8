//! Populate a train/val class layout from image search results.
//!
//! The search itself is an external collaborator behind [`ImageSearch`].
//! Every result URL is fetched exactly once with a bounded timeout; failures
//! skip that image.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::http_client;
use crate::image_support::is_sanitize_target;

mod search;

pub use search::{ImageSearch, UrlListSearch};

/// Subdirectory receiving the training share of each class.
pub const TRAIN_DIR: &str = "train";
/// Subdirectory receiving the validation share of each class.
pub const VAL_DIR: &str = "val";

/// Errors that abort a download run.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Split ratio must be within [0, 1], got {0}")]
    InvalidSplit(f64),
    #[error("Failed to create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Image search failed: {0}")]
    Search(String),
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Per-image fetch failures; these skip the image rather than abort.
#[derive(Debug, Error)]
enum FetchError {
    #[error("request failed: {0}")]
    Request(Box<ureq::Error>),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("failed to read body: {0}")]
    Body(std::io::Error),
}

/// Settings for [`download_class_images`].
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Root receiving `train/` and `val/`.
    pub output_dir: PathBuf,
    /// Maximum number of search results to request.
    pub max_results: usize,
    /// Fraction of results assigned to `train/`.
    pub split: f64,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Largest accepted response body.
    pub max_image_bytes: usize,
    /// Seed for the result shuffle; random when unset.
    pub seed: Option<u64>,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("images"),
            max_results: 5,
            split: 0.8,
            timeout: Duration::from_secs(5),
            max_image_bytes: 20 * 1024 * 1024,
            seed: None,
        }
    }
}

/// Summary of a download run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    pub class_name: String,
    pub requested: usize,
    pub downloaded: usize,
    pub skipped: usize,
    pub train_dir: PathBuf,
    pub val_dir: PathBuf,
}

/// Download images for `query` into `<output>/{train,val}/<query lowercase>`.
///
/// Results are shuffled and split at `floor(len * split)`. File names
/// continue numbering after the `.jpg` files already present and never reuse
/// an existing name, so repeated runs extend a class without overwriting it.
pub fn download_class_images(
    search: &dyn ImageSearch,
    query: &str,
    options: &DownloadOptions,
) -> Result<DownloadReport, DownloadError> {
    if !(0.0..=1.0).contains(&options.split) {
        return Err(DownloadError::InvalidSplit(options.split));
    }
    let class_name = query.to_lowercase();
    let train_dir = options.output_dir.join(TRAIN_DIR).join(&class_name);
    let val_dir = options.output_dir.join(VAL_DIR).join(&class_name);
    create_dir(&train_dir)?;
    create_dir(&val_dir)?;

    let mut urls = search.image_urls(query, options.max_results)?;
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    urls.shuffle(&mut rng);
    let split_index = split_index(urls.len(), options.split);
    let (train_urls, val_urls) = urls.split_at(split_index);

    let agent = http_client::agent(options.timeout);
    let mut report = DownloadReport {
        class_name,
        requested: urls.len(),
        downloaded: 0,
        skipped: 0,
        train_dir,
        val_dir,
    };
    let train_fetched = fetch_into(&agent, train_urls, &report.train_dir, query, options)?;
    let val_fetched = fetch_into(&agent, val_urls, &report.val_dir, query, options)?;
    report.downloaded = train_fetched + val_fetched;
    report.skipped = report.requested - report.downloaded;

    info!(
        "Downloaded {} images for class '{}'",
        report.downloaded, report.class_name
    );
    Ok(report)
}

fn split_index(len: usize, split: f64) -> usize {
    ((len as f64 * split).floor() as usize).min(len)
}

fn create_dir(path: &Path) -> Result<(), DownloadError> {
    fs::create_dir_all(path).map_err(|source| DownloadError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

/// First file number for `query` in `dir`.
///
/// Starts after both the number of `.jpg` files present and the highest
/// `<query>_<n>.jpg` already taken, so gaps left by the sanitizer are never
/// reused.
fn first_file_number(dir: &Path, query: &str) -> Result<usize, DownloadError> {
    let entries = fs::read_dir(dir).map_err(|source| DownloadError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let prefix = format!("{query}_");
    let mut count = 0;
    let mut highest = 0;
    for entry in entries.filter_map(|entry| entry.ok()) {
        let path = entry.path();
        if !entry.file_type().is_ok_and(|ft| ft.is_file()) || !is_sanitize_target(&path) {
            continue;
        }
        count += 1;
        let taken = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| stem.strip_prefix(&prefix))
            .and_then(|n| n.parse::<usize>().ok());
        if let Some(n) = taken {
            highest = highest.max(n);
        }
    }
    Ok(count.max(highest) + 1)
}

/// Write `bytes` to the first unused `<query>_<n>.jpg`, starting at `*next`.
fn write_new_file(
    dir: &Path,
    query: &str,
    next: &mut usize,
    bytes: &[u8],
) -> Result<PathBuf, DownloadError> {
    loop {
        let target = dir.join(format!("{query}_{next}.jpg"));
        *next += 1;
        let file = OpenOptions::new().write(true).create_new(true).open(&target);
        let write_err = |source| DownloadError::Write {
            path: target.clone(),
            source,
        };
        match file {
            Ok(mut file) => {
                file.write_all(bytes).map_err(write_err)?;
                return Ok(target);
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(write_err(err)),
        }
    }
}

/// Fetch `urls` into `dir`, returning how many were written.
fn fetch_into(
    agent: &ureq::Agent,
    urls: &[String],
    dir: &Path,
    query: &str,
    options: &DownloadOptions,
) -> Result<usize, DownloadError> {
    let mut next = first_file_number(dir, query)?;
    let mut written = 0;
    for url in urls {
        let bytes = match fetch(agent, url, options.max_image_bytes) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(url = %url, error = %err, "Skipped image");
                continue;
            }
        };
        let target = write_new_file(dir, query, &mut next, &bytes)?;
        debug!(url = %url, path = %target.display(), "Saved image");
        written += 1;
    }
    Ok(written)
}

fn fetch(agent: &ureq::Agent, url: &str, max_bytes: usize) -> Result<Vec<u8>, FetchError> {
    let response = agent
        .get(url)
        .call()
        .map_err(|err| FetchError::Request(Box::new(err)))?;
    if response.status() != 200 {
        return Err(FetchError::Status(response.status()));
    }
    http_client::read_response_bytes(response, max_bytes).map_err(FetchError::Body)
}
