//! Persistent defaults for the command line tools.
//!
//! Settings live in `config.toml` inside the application directory. A missing
//! file or missing keys fall back to defaults; values are clamped into range
//! on load.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs::{self, AppDirError};
use crate::dataset::MAX_PREVIEW_IMAGES;
use crate::download::DownloadOptions;

/// Default filename used to store the settings.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors that may occur while loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The application directory could not be resolved or created.
    #[error("Config directory unavailable: {0}")]
    AppDir(#[from] AppDirError),
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config to TOML at {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
}

/// Top-level settings file layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub download: DownloadSettings,
    pub preview: PreviewSettings,
}

/// Defaults for `imgcurate-download`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadSettings {
    pub output_dir: PathBuf,
    pub max_results: usize,
    pub split: f64,
    pub timeout_secs: u64,
    pub max_image_bytes: usize,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        let defaults = DownloadOptions::default();
        Self {
            output_dir: defaults.output_dir,
            max_results: defaults.max_results,
            split: defaults.split,
            timeout_secs: defaults.timeout.as_secs(),
            max_image_bytes: defaults.max_image_bytes,
        }
    }
}

impl DownloadSettings {
    /// Download options seeded from these settings.
    pub fn to_options(&self) -> DownloadOptions {
        DownloadOptions {
            output_dir: self.output_dir.clone(),
            max_results: self.max_results,
            split: self.split,
            timeout: Duration::from_secs(self.timeout_secs),
            max_image_bytes: self.max_image_bytes,
            seed: None,
        }
    }
}

/// Defaults for `imgcurate-inspect`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    pub count: usize,
    pub seed: Option<u64>,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            count: 3,
            seed: None,
        }
    }
}

impl AppSettings {
    /// Clamp values into the ranges the tools accept.
    pub fn normalized(mut self) -> Self {
        let download = &mut self.download;
        download.split = if download.split.is_finite() {
            download.split.clamp(0.0, 1.0)
        } else {
            DownloadSettings::default().split
        };
        download.timeout_secs = download.timeout_secs.max(1);
        self.preview.count = self.preview.count.min(MAX_PREVIEW_IMAGES);
        self
    }
}

/// Resolve the settings file path inside the application directory.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

/// Load settings from the application directory, returning defaults if missing.
pub fn load_or_default() -> Result<AppSettings, ConfigError> {
    load_settings_from(&config_path()?)
}

/// Load settings from `path`, returning defaults if the file does not exist.
pub fn load_settings_from(path: &Path) -> Result<AppSettings, ConfigError> {
    if !path.exists() {
        return Ok(AppSettings::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str::<AppSettings>(&text)
        .map(AppSettings::normalized)
        .map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
}

/// Write settings to `path` through a temporary file so readers never see a partial file.
pub fn save_settings_to_path(settings: &AppSettings, path: &Path) -> Result<(), ConfigError> {
    let data = toml::to_string_pretty(settings).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|source| ConfigError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let suffix: u32 = rand::rng().random();
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| CONFIG_FILE_NAME.to_string());
    let tmp_path = dir.join(format!("{file_name}.tmp-{suffix:08x}"));
    let write_err = |source| ConfigError::Write {
        path: tmp_path.clone(),
        source,
    };

    let result = std::fs::File::create(&tmp_path)
        .and_then(|mut file| {
            file.write_all(data.as_bytes())?;
            file.sync_all()
        })
        .map_err(write_err)
        .and_then(|()| {
            std::fs::rename(&tmp_path, path).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })
        });
    if result.is_err() {
        let _ = std::fs::remove_file(&tmp_path);
    }
    result
}
