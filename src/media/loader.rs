// SPDX-License-Identifier: MPL-2.0
//! Asynchronous retrieval of template assets and uploads.
//!
//! References in the catalog are strings that may be data URLs, absolute
//! HTTP(S) URLs or paths relative to the configured asset root. Bytes are
//! fetched on the async runtime and decoded on the blocking pool.

use super::data_url::{self, DataUrl};
use super::image::{decode_image, load_image, RasterImage, UploadedImage};
use crate::config::Config;
use crate::error::{Error, Result};
use futures_util::StreamExt;
use std::path::{Path, PathBuf};

const USER_AGENT: &str = concat!("CaseDesigner/", env!("CARGO_PKG_VERSION"));

/// Resolved location of an image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    DataUrl(String),
    Url(String),
    File(PathBuf),
}

impl ImageSource {
    /// Classifies a catalog reference. Relative paths are joined onto
    /// `asset_root`.
    #[must_use]
    pub fn parse(reference: &str, asset_root: &Path) -> Self {
        if data_url::is_data_url(reference) {
            Self::DataUrl(reference.to_string())
        } else if reference.starts_with("http://") || reference.starts_with("https://") {
            Self::Url(reference.to_string())
        } else {
            let path = Path::new(reference);
            if path.is_absolute() {
                Self::File(path.to_path_buf())
            } else {
                Self::File(asset_root.join(path))
            }
        }
    }
}

/// Fetches and decodes images referenced by the catalog.
#[derive(Debug, Clone)]
pub struct AssetLoader {
    client: reqwest::Client,
    asset_root: PathBuf,
    max_bytes: u64,
}

impl AssetLoader {
    pub fn new(asset_root: impl Into<PathBuf>, max_bytes: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            asset_root: asset_root.into(),
            max_bytes,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.asset_root(), config.max_asset_bytes())
    }

    #[must_use]
    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    /// Reads the raw bytes behind a source.
    pub async fn fetch_bytes(&self, source: &ImageSource) -> Result<Vec<u8>> {
        match source {
            ImageSource::DataUrl(url) => Ok(DataUrl::parse(url)?.bytes),
            ImageSource::File(path) => {
                let path = path.clone();
                tokio::task::spawn_blocking(move || std::fs::read(path))
                    .await
                    .map_err(|e| Error::Io(e.to_string()))?
                    .map_err(Error::from)
            }
            ImageSource::Url(url) => self.download(url).await,
        }
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Network(format!(
                "HTTP status: {}",
                response.status()
            )));
        }

        if let Some(length) = response.content_length() {
            if length > self.max_bytes {
                return Err(Error::Network(format!(
                    "asset too large ({length} bytes, limit {})",
                    self.max_bytes
                )));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            body.extend_from_slice(&chunk);
            if body.len() as u64 > self.max_bytes {
                return Err(Error::Network(format!(
                    "asset exceeded {} bytes",
                    self.max_bytes
                )));
            }
        }
        Ok(body)
    }

    /// Fetches and decodes one reference.
    pub async fn load(&self, reference: &str) -> Result<RasterImage> {
        let source = ImageSource::parse(reference, &self.asset_root);
        if let ImageSource::File(path) = &source {
            let path = path.clone();
            return tokio::task::spawn_blocking(move || load_image(path))
                .await
                .map_err(|e| Error::Image(e.to_string()))?;
        }
        let bytes = self.fetch_bytes(&source).await?;
        tokio::task::spawn_blocking(move || decode_image(&bytes))
            .await
            .map_err(|e| Error::Image(e.to_string()))?
    }

    /// Loads an optional layer asset. A missing reference or a failed load
    /// yields `None`; failures are logged.
    pub async fn load_optional(&self, reference: Option<&str>, slot: &str) -> Option<RasterImage> {
        let reference = reference?;
        match self.load(reference).await {
            Ok(image) => {
                tracing::debug!(slot, reference, width = image.width(), height = image.height(), "asset loaded");
                Some(image)
            }
            Err(err) => {
                tracing::warn!(slot, reference, error = %err, "asset failed to load, layer omitted");
                None
            }
        }
    }

    /// Reads a picked file into an upload (file bytes become a data URL).
    pub async fn read_upload(&self, path: &Path) -> Result<UploadedImage> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || UploadedImage::from_path(&path))
            .await
            .map_err(|e| Error::Io(e.to_string()))?
    }

    /// Decodes an upload that already arrived as a data URL.
    pub async fn decode_upload(&self, data_url: String) -> Result<UploadedImage> {
        tokio::task::spawn_blocking(move || UploadedImage::from_data_url(&data_url))
            .await
            .map_err(|e| Error::Image(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_rs::{Rgba, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn parse_classifies_references() {
        let root = Path::new("/srv/assets");
        assert_eq!(
            ImageSource::parse("templates/a.png", root),
            ImageSource::File(PathBuf::from("/srv/assets/templates/a.png"))
        );
        assert_eq!(
            ImageSource::parse("https://cdn.example/a.png", root),
            ImageSource::Url("https://cdn.example/a.png".into())
        );
        assert_eq!(
            ImageSource::parse("data:image/png;base64,AA==", root),
            ImageSource::DataUrl("data:image/png;base64,AA==".into())
        );
    }

    #[tokio::test]
    async fn load_reads_relative_file_from_root() {
        let temp_dir = tempdir().expect("temp dir");
        RgbaImage::from_pixel(2, 4, Rgba([9, 9, 9, 255]))
            .save(temp_dir.path().join("t.png"))
            .expect("write png");

        let loader = AssetLoader::new(temp_dir.path(), 1024 * 1024).expect("loader");
        let image = loader.load("t.png").await.expect("loads");
        assert_eq!((image.width(), image.height()), (2, 4));
    }

    #[tokio::test]
    async fn load_optional_swallows_failures() {
        let temp_dir = tempdir().expect("temp dir");
        let loader = AssetLoader::new(temp_dir.path(), 1024 * 1024).expect("loader");

        assert!(loader.load_optional(None, "mockup").await.is_none());
        assert!(loader
            .load_optional(Some("missing.png"), "mockup")
            .await
            .is_none());
    }

    #[tokio::test]
    async fn read_upload_produces_data_url() {
        let temp_dir = tempdir().expect("temp dir");
        let path = temp_dir.path().join("photo.png");
        RgbaImage::from_pixel(5, 5, Rgba([1, 2, 3, 255]))
            .save(&path)
            .expect("write png");

        let loader = AssetLoader::new(temp_dir.path(), 1024 * 1024).expect("loader");
        let upload = loader.read_upload(&path).await.expect("upload");
        assert!(upload.data_url.starts_with("data:image/png;base64,"));

        let decoded = loader
            .decode_upload(upload.data_url.clone())
            .await
            .expect("decodes");
        assert_eq!(decoded.image.width(), 5);
    }
}
