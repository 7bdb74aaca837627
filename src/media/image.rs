// SPDX-License-Identifier: MPL-2.0
//! Image loading and decoding from various formats (PNG, JPEG, GIF, SVG, etc.).
//!
//! Everything is decoded into a premultiplied [`tiny_skia::Pixmap`] so the
//! compositor can draw it directly.

use super::data_url::{self, DataUrl};
use super::extensions;
use crate::domain::geometry::PixelSize;
use crate::error::{Error, Result};
use resvg::usvg;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tiny_skia::{ColorU8, Pixmap};

/// Decoded, premultiplied RGBA pixels.
///
/// The pixmap is stored in an Arc so layers, sessions and stages can share
/// one decode without copying pixel data.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pixmap: Arc<Pixmap>,
}

impl RasterImage {
    #[must_use]
    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        Self {
            pixmap: Arc::new(pixmap),
        }
    }

    /// Creates an image from straight-alpha RGBA pixels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Image`] if the dimensions are zero or do not match
    /// the buffer length.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        if rgba.len() != expected {
            return Err(Error::Image(format!(
                "expected {expected} RGBA bytes for {width}x{height}, got {}",
                rgba.len()
            )));
        }
        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| Error::Image(format!("invalid image size {width}x{height}")))?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(rgba.chunks_exact(4)) {
            *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
        }
        Ok(Self::from_pixmap(pixmap))
    }

    pub fn from_dynamic(image: &image_rs::DynamicImage) -> Result<Self> {
        let rgba = image.to_rgba8();
        Self::from_rgba(rgba.width(), rgba.height(), rgba.as_raw())
    }

    #[must_use]
    pub fn size(&self) -> PixelSize {
        PixelSize::new(self.pixmap.width(), self.pixmap.height())
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    #[must_use]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Straight-alpha RGBA of one pixel.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let color = self.pixmap.pixel(x, y)?.demultiply();
        Some([color.red(), color.green(), color.blue(), color.alpha()])
    }
}

/// A user upload: the decoded pixels plus the data URL it arrived as.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub data_url: String,
    pub image: RasterImage,
}

impl UploadedImage {
    /// Decodes a data URL handed over by the file picker.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let parsed = DataUrl::parse(url)?;
        let image = decode_image(&parsed.bytes)?;
        Ok(Self {
            data_url: url.to_string(),
            image,
        })
    }

    /// Reads a file and turns it into a data URL upload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Image`] for extensions that are not images, besides
    /// the usual read and decode failures.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
        if !extension.is_empty() && !extensions::is_supported_image(extension) {
            return Err(Error::Image(format!("unsupported upload type '.{extension}'")));
        }
        let bytes = fs::read(path)?;
        let mime = extensions::mime_for_extension(extension).unwrap_or("application/octet-stream");
        let image = decode_image(&bytes)?;
        Ok(Self {
            data_url: data_url::encode(mime, &bytes),
            image,
        })
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();
    trimmed.starts_with("<svg") || (trimmed.starts_with("<?xml") && text.contains("<svg"))
}

fn rasterize_svg(bytes: &[u8]) -> Result<RasterImage> {
    let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())
        .map_err(|e| Error::Svg(e.to_string()))?;

    let pixmap_size = tree.size().to_int_size();
    let width = pixmap_size.width();
    let height = pixmap_size.height();
    if width == 0 || height == 0 {
        return Err(Error::Svg("SVG has empty dimensions".into()));
    }

    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| Error::Svg("Failed to allocate SVG pixmap".into()))?;

    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    Ok(RasterImage::from_pixmap(pixmap))
}

/// Decodes encoded image bytes. SVG documents are rasterized at their
/// intrinsic size.
///
/// # Errors
///
/// Returns [`Error::Svg`] for broken SVG and [`Error::Image`] for anything
/// the raster decoders reject.
pub fn decode_image(bytes: &[u8]) -> Result<RasterImage> {
    if looks_like_svg(bytes) {
        return rasterize_svg(bytes);
    }
    let img = image_rs::load_from_memory(bytes)?;
    RasterImage::from_dynamic(&img)
}

/// Load an image from the given path.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read ([`Error::Io`])
/// - The image format is invalid or unsupported ([`Error::Image`])
/// - For SVG files: parsing fails or dimensions are zero ([`Error::Svg`])
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<RasterImage> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

    if extension.eq_ignore_ascii_case("svg") {
        rasterize_svg(&bytes)
    } else {
        decode_image(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_rs::{Rgba, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn load_png_image_returns_expected_dimensions() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let image_path = temp_dir.path().join("sample.png");

        let image = RgbaImage::from_pixel(4, 2, Rgba([255, 0, 0, 255]));
        image
            .save(&image_path)
            .expect("failed to write temporary png");

        let data = load_image(&image_path).expect("png should load successfully");
        assert_eq!(data.size(), PixelSize::new(4, 2));
        assert_eq!(data.pixel(0, 0), Some([255, 0, 0, 255]));
    }

    #[test]
    fn load_svg_image_rasterizes_successfully() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let svg_path = temp_dir.path().join("sample.svg");
        let svg_content = r#"
            <svg xmlns="http://www.w3.org/2000/svg" width="6" height="3">
                <rect width="6" height="3" fill="blue" />
            </svg>
        "#;
        fs::write(&svg_path, svg_content.trim()).expect("failed to write svg");

        let data = load_image(&svg_path).expect("svg should load successfully");
        assert_eq!(data.width(), 6);
        assert_eq!(data.height(), 3);
    }

    #[test]
    fn decode_sniffs_svg_without_extension() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="8" height="16"></svg>"#;
        let data = decode_image(svg).expect("svg bytes decode");
        assert_eq!(data.size(), PixelSize::new(8, 16));
    }

    #[test]
    fn load_missing_image_returns_io_error() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let missing_path = temp_dir.path().join("does_not_exist.png");

        match load_image(&missing_path) {
            Err(Error::Io(_)) => {}
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn load_invalid_png_bytes_returns_image_error() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let bad_path = temp_dir.path().join("invalid.png");
        fs::write(&bad_path, b"not a png").expect("failed to write invalid data");

        match load_image(&bad_path) {
            Err(Error::Image(message)) => assert!(!message.is_empty()),
            other => panic!("expected Image error for invalid png, got {other:?}"),
        }
    }

    #[test]
    fn load_svg_with_zero_dimensions_errors() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let svg_path = temp_dir.path().join("zero.svg");
        let svg = r"<svg xmlns='http://www.w3.org/2000/svg' width='0' height='10'></svg>";
        fs::write(&svg_path, svg).expect("write svg");

        match load_image(&svg_path) {
            Err(Error::Svg(_)) => {}
            other => panic!("expected Svg error, got {other:?}"),
        }
    }

    #[test]
    fn from_rgba_rejects_mismatched_buffer() {
        assert!(matches!(
            RasterImage::from_rgba(2, 2, &[0; 4]),
            Err(Error::Image(_))
        ));
    }

    #[test]
    fn transparent_pixels_survive_premultiplication() {
        let image = RasterImage::from_rgba(1, 1, &[200, 100, 50, 0]).expect("valid");
        assert_eq!(image.pixel(0, 0).map(|p| p[3]), Some(0));
    }

    #[test]
    fn upload_from_path_keeps_data_url() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let image_path = temp_dir.path().join("photo.png");
        RgbaImage::from_pixel(3, 5, Rgba([0, 255, 0, 255]))
            .save(&image_path)
            .expect("write png");

        let upload = UploadedImage::from_path(&image_path).expect("upload decodes");
        assert!(upload.data_url.starts_with("data:image/png;base64,"));
        assert_eq!(upload.image.size(), PixelSize::new(3, 5));

        let again = UploadedImage::from_data_url(&upload.data_url).expect("round trip");
        assert_eq!(again.image.size(), PixelSize::new(3, 5));
    }

    #[test]
    fn upload_rejects_non_image_extension() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join("notes.txt");
        fs::write(&path, b"hello").expect("write file");

        match UploadedImage::from_path(&path) {
            Err(Error::Image(message)) => assert!(message.contains(".txt")),
            other => panic!("expected Image error, got {other:?}"),
        }
    }
}
