//! Image classification dataset curation.
//!
//! Index directory-per-class image trees as labelled datasets, clean image
//! directories of corrupted and duplicate files, and fill class folders from
//! image search results.

/// Application directory resolution.
pub mod app_dirs;
/// TOML settings for the command line tools.
pub mod config;
/// Label-indexed datasets, transforms and batching.
pub mod dataset;
/// Train/val downloads from image search results.
pub mod download;
/// Recognized image file extensions.
pub mod image_support;
/// Tracing subscriber setup.
pub mod logging;
/// Corruption and duplicate filtering.
pub mod sanitize;

mod http_client;
