// SPDX-License-Identifier: MPL-2.0
//! Image inputs of the designer.
//!
//! This module decodes uploaded photos and template assets into premultiplied
//! pixmaps, converts between files and data URLs, and fetches asset
//! references from disk or the network.

pub mod data_url;
pub mod image;
pub mod loader;

pub use data_url::DataUrl;
pub use image::{decode_image, load_image, RasterImage, UploadedImage};
pub use loader::{AssetLoader, ImageSource};

/// Supported image extensions and their MIME types.
pub mod extensions {
    /// Image file extensions accepted as uploads or template assets.
    pub const IMAGE_EXTENSIONS: &[&str] = &[
        "jpg", "jpeg", "png", "gif", "tiff", "tif", "webp", "bmp", "ico", "svg",
    ];

    /// Returns the MIME type for a file extension, if it is a supported image.
    #[must_use]
    pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some("image/jpeg"),
            "png" => Some("image/png"),
            "gif" => Some("image/gif"),
            "tiff" | "tif" => Some("image/tiff"),
            "webp" => Some("image/webp"),
            "bmp" => Some("image/bmp"),
            "ico" => Some("image/x-icon"),
            "svg" => Some("image/svg+xml"),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_supported_image(ext: &str) -> bool {
        IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
    }
}
