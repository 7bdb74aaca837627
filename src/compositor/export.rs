// SPDX-License-Identifier: MPL-2.0
//! Flattening a stage into a single image at native resolution.
//!
//! The cart always receives a PNG data URL. Saving to disk additionally
//! supports JPEG and WebP through the `image` crate.

use super::stage::Stage;
use crate::domain::geometry::PixelSize;
use crate::error::{Error, Result};
use crate::media::data_url;
use image_rs::{ImageBuffer, ImageFormat, Rgba};
use std::path::Path;
use tiny_skia::Pixmap;

const PNG_MIME: &str = "image/png";

/// Supported formats for writing a flattened design to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// PNG format (lossless, keeps transparency).
    #[default]
    Png,
    /// JPEG format (lossy, no alpha).
    Jpeg,
    /// WebP format.
    WebP,
}

impl ExportFormat {
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::WebP => "webp",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            ExportFormat::Png => ImageFormat::Png,
            ExportFormat::Jpeg => ImageFormat::Jpeg,
            ExportFormat::WebP => ImageFormat::WebP,
        }
    }

    /// Detects format from file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<ExportFormat> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ExportFormat::Png),
            "jpg" | "jpeg" => Some(ExportFormat::Jpeg),
            "webp" => Some(ExportFormat::WebP),
            _ => None,
        }
    }

    /// Detects format from file path extension.
    pub fn from_path(path: &Path) -> Option<ExportFormat> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// A flattened design ready for the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenedDesign {
    /// PNG-encoded pixels.
    pub png: Vec<u8>,
    pub size: PixelSize,
    /// Set when no user photo was on the stage.
    pub degraded: bool,
    rgba: Vec<u8>,
}

impl FlattenedDesign {
    #[must_use]
    pub fn width(&self) -> u32 {
        self.size.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// `data:image/png;base64,...`
    #[must_use]
    pub fn to_data_url(&self) -> String {
        data_url::encode(PNG_MIME, &self.png)
    }

    /// Writes the design to `path`.
    ///
    /// The format is determined by the file extension if not specified.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be encoded or written to disk.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P, format: Option<ExportFormat>) -> Result<()> {
        let path = path.as_ref();
        let format = format
            .or_else(|| ExportFormat::from_path(path))
            .unwrap_or_default();

        if format == ExportFormat::Png {
            std::fs::write(path, &self.png)?;
            return Ok(());
        }

        let img: ImageBuffer<Rgba<u8>, _> =
            ImageBuffer::from_raw(self.size.width, self.size.height, self.rgba.clone())
                .ok_or_else(|| Error::Image("flattened pixels do not match size".to_string()))?;

        if format == ExportFormat::Jpeg {
            image_rs::DynamicImage::ImageRgba8(img)
                .to_rgb8()
                .save_with_format(path, format.image_format())?;
        } else {
            img.save_with_format(path, format.image_format())?;
        }
        Ok(())
    }
}

/// Renders `stage` at the template's native resolution and encodes it.
///
/// # Errors
///
/// Returns [`Error::Image`] if rendering or PNG encoding fails.
pub fn flatten(stage: &Stage) -> Result<FlattenedDesign> {
    let geometry = stage.geometry();
    let pixmap = stage.render_native()?;
    let degraded = stage.layer().is_none();

    let png = pixmap
        .encode_png()
        .map_err(|e| Error::Image(format!("PNG encoding failed: {e}")))?;

    tracing::info!(
        width = pixmap.width(),
        height = pixmap.height(),
        multiplier = geometry.export_multiplier(),
        degraded,
        bytes = png.len(),
        "design flattened"
    );

    Ok(FlattenedDesign {
        png,
        size: geometry.native(),
        degraded,
        rgba: straight_rgba(&pixmap),
    })
}

fn straight_rgba(pixmap: &Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::stage::{Backgrounds, Viewport};
    use crate::media::decode_image;
    use crate::test_utils::{solid_image, solid_upload};
    use tempfile::tempdir;

    fn stage_with_template(width: u32, height: u32) -> Stage {
        let backgrounds = Backgrounds {
            template: Some(solid_image(width, height, [200, 120, 40, 255])),
            ..Backgrounds::default()
        };
        Stage::build(backgrounds, PixelSize::new(600, 1200), &Viewport::new(100.0, 300.0))
    }

    #[test]
    fn template_only_export_has_native_size() {
        let stage = stage_with_template(240, 480);
        assert!(stage.geometry().display_scale() < 1.0);

        let design = flatten(&stage).expect("flattens");
        assert!(design.degraded);
        assert_eq!((design.width(), design.height()), (240, 480));

        let decoded = decode_image(&design.png).expect("valid png");
        assert_eq!(decoded.size(), PixelSize::new(240, 480));
    }

    #[test]
    fn export_with_layer_is_not_degraded() {
        let mut stage = stage_with_template(40, 80);
        stage.place_upload(solid_upload(10, 10));
        let design = flatten(&stage).expect("flattens");
        assert!(!design.degraded);
    }

    #[test]
    fn data_url_is_png() {
        let design = flatten(&stage_with_template(4, 8)).expect("flattens");
        assert!(design.to_data_url().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn save_to_file_honours_extension() {
        let temp_dir = tempdir().expect("temp dir");
        let design = flatten(&stage_with_template(4, 8)).expect("flattens");

        let png = temp_dir.path().join("design.png");
        design.save_to_file(&png, None).expect("png saved");
        assert_eq!(std::fs::read(&png).expect("read back"), design.png);

        let jpg = temp_dir.path().join("design.jpg");
        design.save_to_file(&jpg, None).expect("jpeg saved");
        let decoded = image_rs::open(&jpg).expect("valid jpeg");
        assert_eq!((decoded.width(), decoded.height()), (4, 8));
    }

    #[test]
    fn export_format_from_path() {
        assert_eq!(ExportFormat::from_path(Path::new("a.JPEG")), Some(ExportFormat::Jpeg));
        assert_eq!(ExportFormat::from_path(Path::new("a.webp")), Some(ExportFormat::WebP));
        assert_eq!(ExportFormat::from_path(Path::new("a.bmp")), None);
        assert_eq!(ExportFormat::default().extension(), "png");
    }
}
