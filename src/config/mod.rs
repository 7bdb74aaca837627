// SPDX-License-Identifier: MPL-2.0
//! This module handles the designer's configuration, including loading and saving
//! preferences to a `settings.toml` file.
//!
//! # Path Resolution Order
//!
//! 1. **Explicit path** passed to [`load_from_path`] / [`save_to_path`]
//! 2. **Environment variable** (`CASE_DESIGNER_CONFIG_DIR`)
//! 3. **Platform default** via the `dirs` crate
//!
//! # Examples
//!
//! ```no_run
//! use case_designer::config::{self, Config};
//!
//! let mut config = config::load().unwrap_or_default();
//! config.catalog_url = Some("https://shop.example/api/products".to_string());
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::compositor::Viewport;
use crate::domain::geometry::PixelSize;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "CaseDesigner";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "CASE_DESIGNER_CONFIG_DIR";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Product catalog endpoint returning the JSON product list.
    #[serde(default)]
    pub catalog_url: Option<String>,
    /// Directory relative template references are resolved against.
    #[serde(default)]
    pub asset_root: Option<PathBuf>,
    #[serde(default)]
    pub container_width: Option<f32>,
    #[serde(default)]
    pub viewport_height: Option<f32>,
    #[serde(default)]
    pub max_height_ratio: Option<f32>,
    #[serde(default)]
    pub placeholder_width: Option<u32>,
    #[serde(default)]
    pub placeholder_height: Option<u32>,
    #[serde(default)]
    pub max_asset_bytes: Option<u64>,
}

impl Config {
    /// Viewport the stage is fitted into, with defaults for missing keys.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            self.container_width.unwrap_or(DEFAULT_CONTAINER_WIDTH),
            self.viewport_height.unwrap_or(DEFAULT_VIEWPORT_HEIGHT),
        )
        .with_max_height_ratio(self.max_height_ratio.unwrap_or(DEFAULT_MAX_HEIGHT_RATIO))
    }

    /// Surface size used while no template pixels are known.
    #[must_use]
    pub fn placeholder_size(&self) -> PixelSize {
        PixelSize::new(
            self.placeholder_width
                .filter(|w| *w > 0)
                .unwrap_or(DEFAULT_PLACEHOLDER_WIDTH),
            self.placeholder_height
                .filter(|h| *h > 0)
                .unwrap_or(DEFAULT_PLACEHOLDER_HEIGHT),
        )
    }

    #[must_use]
    pub fn max_asset_bytes(&self) -> u64 {
        self.max_asset_bytes
            .unwrap_or(DEFAULT_MAX_ASSET_BYTES)
            .clamp(MIN_MAX_ASSET_BYTES, MAX_MAX_ASSET_BYTES)
    }

    #[must_use]
    pub fn asset_root(&self) -> PathBuf {
        self.asset_root.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(ENV_CONFIG_DIR) {
        return Some(PathBuf::from(dir).join(CONFIG_FILE));
    }
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Reads a config file. Unparseable content falls back to defaults.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "invalid settings, using defaults");
            Ok(Config::default())
        }
    }
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
