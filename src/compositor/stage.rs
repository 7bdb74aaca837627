// SPDX-License-Identifier: MPL-2.0
//! The drawing surface.
//!
//! A stage has a native size (the template's pixel size, or the placeholder
//! when no template is known yet) and a display size that fits the
//! viewport. Anything that changes either size produces a new stage;
//! the previous one is simply dropped.

use super::clip::{compute_clip_path, ClipPath};
use super::layer::UserLayer;
use super::render;
use crate::config::{DEFAULT_MAX_HEIGHT_RATIO, MAX_MAX_HEIGHT_RATIO, MIN_CONTAINER_EXTENT, MIN_MAX_HEIGHT_RATIO};
use crate::domain::geometry::{PixelSize, Size};
use crate::error::Result;
use crate::media::{RasterImage, UploadedImage};
use tiny_skia::Pixmap;

/// Space available to the stage on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width of the containing element.
    pub container_width: f32,
    /// Height of the window.
    pub viewport_height: f32,
    /// Share of `viewport_height` the stage may occupy.
    pub max_height_ratio: f32,
}

impl Viewport {
    #[must_use]
    pub fn new(container_width: f32, viewport_height: f32) -> Self {
        Self {
            container_width: container_width.max(MIN_CONTAINER_EXTENT),
            viewport_height: viewport_height.max(MIN_CONTAINER_EXTENT),
            max_height_ratio: DEFAULT_MAX_HEIGHT_RATIO,
        }
    }

    #[must_use]
    pub fn with_max_height_ratio(mut self, ratio: f32) -> Self {
        self.max_height_ratio = if ratio.is_finite() {
            ratio.clamp(MIN_MAX_HEIGHT_RATIO, MAX_MAX_HEIGHT_RATIO)
        } else {
            DEFAULT_MAX_HEIGHT_RATIO
        };
        self
    }

    /// Tallest display height the stage may use.
    #[must_use]
    pub fn max_stage_height(&self) -> f32 {
        self.viewport_height * self.max_height_ratio
    }
}

/// Native and display sizes of a stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageGeometry {
    native: PixelSize,
    display: Size,
    display_scale: f32,
}

impl StageGeometry {
    /// Fits `native` into the viewport, shrinking but never enlarging.
    #[must_use]
    pub fn fit(native: PixelSize, viewport: &Viewport) -> Self {
        let native_size = native.to_size();
        let display_scale = (viewport.container_width / native_size.width)
            .min(viewport.max_stage_height() / native_size.height)
            .min(1.0);

        Self {
            native,
            display: native_size.scaled(display_scale),
            display_scale,
        }
    }

    #[must_use]
    pub fn native(&self) -> PixelSize {
        self.native
    }

    #[must_use]
    pub fn display(&self) -> Size {
        self.display
    }

    /// Display units per native pixel, at most `1.0`.
    #[must_use]
    pub fn display_scale(&self) -> f32 {
        self.display_scale
    }

    /// Factor from display units to native pixels.
    #[must_use]
    pub fn export_multiplier(&self) -> f32 {
        1.0 / self.display_scale
    }
}

/// Decoded background images. Any slot may be empty.
#[derive(Debug, Clone, Default)]
pub struct Backgrounds {
    pub template: Option<RasterImage>,
    pub mockup: Option<RasterImage>,
    pub camera_overlay: Option<RasterImage>,
}

impl Backgrounds {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.template.is_none() && self.mockup.is_none() && self.camera_overlay.is_none()
    }
}

/// Sized drawing surface holding the backgrounds and at most one user layer.
#[derive(Debug, Clone)]
pub struct Stage {
    geometry: StageGeometry,
    clip: ClipPath,
    backgrounds: Backgrounds,
    layer: Option<UserLayer>,
}

impl Stage {
    /// Builds an empty stage. The native size comes from the template
    /// pixels when present, otherwise from `placeholder`.
    #[must_use]
    pub fn build(backgrounds: Backgrounds, placeholder: PixelSize, viewport: &Viewport) -> Self {
        let template_size = backgrounds.template.as_ref().map(RasterImage::size);
        let geometry = StageGeometry::fit(template_size.unwrap_or(placeholder), viewport);
        let clip = compute_clip_path(template_size, geometry.display());

        tracing::debug!(
            native_width = geometry.native().width,
            native_height = geometry.native().height,
            display_scale = geometry.display_scale(),
            placeholder = template_size.is_none(),
            "stage built"
        );

        Self {
            geometry,
            clip,
            backgrounds,
            layer: None,
        }
    }

    #[must_use]
    pub fn geometry(&self) -> &StageGeometry {
        &self.geometry
    }

    #[must_use]
    pub fn clip(&self) -> &ClipPath {
        &self.clip
    }

    #[must_use]
    pub fn backgrounds(&self) -> &Backgrounds {
        &self.backgrounds
    }

    #[must_use]
    pub fn layer(&self) -> Option<&UserLayer> {
        self.layer.as_ref()
    }

    pub fn layer_mut(&mut self) -> Option<&mut UserLayer> {
        self.layer.as_mut()
    }

    /// Replaces any existing layer with `upload` at its initial placement.
    pub fn place_upload(&mut self, upload: UploadedImage) -> &UserLayer {
        self.layer.insert(UserLayer::place(upload, self.geometry.display()))
    }

    /// Installs a layer taken from a previous stage, refitted to this one.
    pub fn carry_layer(&mut self, layer: UserLayer) -> &UserLayer {
        self.layer.insert(layer.refit(self.geometry.display()))
    }

    /// Renders at display size.
    pub fn render_preview(&self) -> Result<Pixmap> {
        render::composite(self, self.geometry.display().to_pixels())
    }

    /// Renders at the native template size.
    pub fn render_native(&self) -> Result<Pixmap> {
        render::composite(self, self.geometry.native())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_abs_diff_eq, solid_image};

    fn template(width: u32, height: u32) -> RasterImage {
        solid_image(width, height, [255, 255, 255, 255])
    }

    #[test]
    fn viewport_clamps_ratio() {
        let viewport = Viewport::new(400.0, 900.0).with_max_height_ratio(5.0);
        assert_abs_diff_eq!(viewport.max_height_ratio, MAX_MAX_HEIGHT_RATIO);
        let viewport = Viewport::new(400.0, 900.0).with_max_height_ratio(f32::NAN);
        assert_abs_diff_eq!(viewport.max_height_ratio, DEFAULT_MAX_HEIGHT_RATIO);
    }

    #[test]
    fn fit_never_scales_up() {
        let geometry = StageGeometry::fit(PixelSize::new(100, 200), &Viewport::new(4000.0, 4000.0));
        assert_abs_diff_eq!(geometry.display_scale(), 1.0);
        assert_eq!(geometry.display(), Size::new(100.0, 200.0));
    }

    #[test]
    fn fit_is_limited_by_width() {
        let geometry = StageGeometry::fit(PixelSize::new(1000, 1000), &Viewport::new(400.0, 2000.0));
        assert_abs_diff_eq!(geometry.display_scale(), 0.4);
        assert_abs_diff_eq!(geometry.display().width, 400.0, epsilon = 1e-3);
    }

    #[test]
    fn fit_is_limited_by_height_ratio() {
        // 900 * 0.7 = 630 high for a 1200 high template.
        let geometry = StageGeometry::fit(PixelSize::new(600, 1200), &Viewport::new(1000.0, 900.0));
        assert_abs_diff_eq!(geometry.display_scale(), 0.525, epsilon = 1e-6);
        assert_abs_diff_eq!(geometry.display().height, 630.0, epsilon = 1e-3);
        assert_abs_diff_eq!(geometry.export_multiplier() * geometry.display().width, 600.0, epsilon = 1e-2);
    }

    #[test]
    fn stage_without_template_uses_placeholder() {
        let stage = Stage::build(Backgrounds::default(), PixelSize::new(600, 1200), &Viewport::new(400.0, 900.0));
        assert_eq!(stage.geometry().native(), PixelSize::new(600, 1200));
        assert!(!stage.clip().is_silhouette());
        assert!(stage.layer().is_none());
    }

    #[test]
    fn stage_with_template_uses_its_size_and_silhouette() {
        let backgrounds = Backgrounds {
            template: Some(template(50, 100)),
            ..Backgrounds::default()
        };
        let stage = Stage::build(backgrounds, PixelSize::new(600, 1200), &Viewport::new(400.0, 900.0));
        assert_eq!(stage.geometry().native(), PixelSize::new(50, 100));
        assert!(stage.clip().is_silhouette());
    }

    #[test]
    fn placing_an_upload_replaces_the_previous_layer() {
        let mut stage = Stage::build(Backgrounds::default(), PixelSize::new(60, 120), &Viewport::new(400.0, 900.0));
        let first = UploadedImage {
            data_url: "first".into(),
            image: template(10, 10),
        };
        let second = UploadedImage {
            data_url: "second".into(),
            image: template(20, 40),
        };

        stage.place_upload(first);
        stage.layer_mut().expect("layer").zoom_in();
        stage.place_upload(second);

        let layer = stage.layer().expect("layer");
        assert_eq!(layer.upload().data_url, "second");
        assert_eq!(layer.transform(), layer.initial_transform());
    }

    #[test]
    fn preview_has_display_size() {
        let stage = Stage::build(Backgrounds::default(), PixelSize::new(600, 1200), &Viewport::new(300.0, 2000.0));
        let preview = stage.render_preview().expect("renders");
        assert_eq!((preview.width(), preview.height()), (300, 600));
    }
}
