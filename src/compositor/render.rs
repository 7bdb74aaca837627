// SPDX-License-Identifier: MPL-2.0
//! Paints a stage into a pixmap.
//!
//! Paint order is fixed regardless of the order in which assets arrived:
//! template, mockup, user photo (clipped to the template silhouette), then
//! the camera cutout on top.

use super::stage::Stage;
use crate::domain::geometry::{PixelSize, Size};
use crate::error::{Error, Result};
use crate::media::RasterImage;
use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};

/// Renders `stage` into a new pixmap of `output` pixels.
///
/// Stage content lives in display units; it is stretched to `output`.
///
/// # Errors
///
/// Returns [`Error::Image`] if `output` has a zero dimension.
pub fn composite(stage: &Stage, output: PixelSize) -> Result<Pixmap> {
    let mut canvas = Pixmap::new(output.width, output.height).ok_or_else(|| {
        Error::Image(format!(
            "invalid render size {}x{}",
            output.width, output.height
        ))
    })?;

    let display = stage.geometry().display();
    let target = output.to_size();
    let to_output = Transform::from_scale(target.width / display.width, target.height / display.height);
    let paint = PixmapPaint {
        quality: FilterQuality::Bicubic,
        ..PixmapPaint::default()
    };
    let backgrounds = stage.backgrounds();

    if let Some(template) = &backgrounds.template {
        fill(&mut canvas, template, display, to_output, &paint);
    }
    if let Some(mockup) = &backgrounds.mockup {
        fill(&mut canvas, mockup, display, to_output, &paint);
    }
    if let Some(layer) = stage.layer() {
        let mask = stage
            .clip()
            .to_mask(backgrounds.template.as_ref(), to_output, output);
        canvas.draw_pixmap(
            0,
            0,
            layer.upload().image.pixmap().as_ref(),
            &paint,
            to_output.pre_concat(layer.to_canvas()),
            mask.as_ref(),
        );
    }
    if let Some(overlay) = &backgrounds.camera_overlay {
        fill(&mut canvas, overlay, display, to_output, &paint);
    }

    Ok(canvas)
}

/// Draws `image` stretched over the whole display area.
fn fill(canvas: &mut Pixmap, image: &RasterImage, display: Size, to_output: Transform, paint: &PixmapPaint) {
    let size = image.size().to_size();
    canvas.draw_pixmap(
        0,
        0,
        image.pixmap().as_ref(),
        paint,
        to_output.pre_scale(display.width / size.width, display.height / size.height),
        None,
    );
}
