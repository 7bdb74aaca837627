// SPDX-License-Identifier: MPL-2.0
//! Clip region for the user layer.
//!
//! The photo is only visible inside the template silhouette. When the
//! product has no template the whole canvas is used instead.

use crate::domain::geometry::{Bounds, PixelSize, Size};
use crate::media::RasterImage;
use tiny_skia::{FillRule, FilterQuality, Mask, MaskType, PathBuilder, Pixmap, PixmapPaint, Rect, Transform};

/// Region the user layer is clipped to, in display units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClipPath {
    /// Template alpha stretched onto the canvas.
    Silhouette {
        template: PixelSize,
        scale_x: f32,
        scale_y: f32,
    },
    /// Plain canvas rectangle.
    Rectangle(Bounds),
}

/// Derives the clip region for a canvas of `canvas` display units.
///
/// Pure function of the two sizes: the template (if any) is scaled to fill
/// the canvas bounds, otherwise the full canvas rectangle is returned.
#[must_use]
pub fn compute_clip_path(template: Option<PixelSize>, canvas: Size) -> ClipPath {
    match template {
        Some(template) if !template.is_empty() => {
            let native = template.to_size();
            ClipPath::Silhouette {
                template,
                scale_x: canvas.width / native.width,
                scale_y: canvas.height / native.height,
            }
        }
        _ => ClipPath::Rectangle(Bounds::of_size(canvas)),
    }
}

impl ClipPath {
    #[must_use]
    pub fn is_silhouette(&self) -> bool {
        matches!(self, Self::Silhouette { .. })
    }

    /// Rasterizes the clip into a mask of `output` pixels.
    ///
    /// `to_output` maps display units onto output pixels. A silhouette
    /// without template pixels degrades to the full output.
    #[must_use]
    pub fn to_mask(
        &self,
        template: Option<&RasterImage>,
        to_output: Transform,
        output: PixelSize,
    ) -> Option<Mask> {
        match (self, template) {
            (Self::Silhouette { scale_x, scale_y, .. }, Some(template)) => {
                let mut alpha = Pixmap::new(output.width, output.height)?;
                let paint = PixmapPaint {
                    quality: FilterQuality::Bilinear,
                    ..PixmapPaint::default()
                };
                alpha.draw_pixmap(
                    0,
                    0,
                    template.pixmap().as_ref(),
                    &paint,
                    to_output.pre_scale(*scale_x, *scale_y),
                    None,
                );
                Some(Mask::from_pixmap(alpha.as_ref(), MaskType::Alpha))
            }
            (Self::Rectangle(bounds), _) => rect_mask(*bounds, to_output, output),
            (Self::Silhouette { .. }, None) => {
                tracing::debug!("silhouette clip without template pixels, using full canvas");
                None
            }
        }
    }
}

fn rect_mask(bounds: Bounds, to_output: Transform, output: PixelSize) -> Option<Mask> {
    let rect = Rect::from_ltrb(bounds.left, bounds.top, bounds.right, bounds.bottom)?;
    let path = PathBuilder::from_rect(rect);
    let mut mask = Mask::new(output.width, output.height)?;
    mask.fill_path(&path, FillRule::Winding, true, to_output);
    Some(mask)
}
