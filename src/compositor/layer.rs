// SPDX-License-Identifier: MPL-2.0
//! Interactive user photo layer.
//!
//! The layer's origin is its geometric center. Position, scale and the
//! canvas are expressed in display units; export multiplies them up to the
//! template's native resolution.
//!
//! After every move, scale or rotate a constraint pass runs:
//!
//! 1. the scale is raised to the cover minimum: never below
//!    `max(cw/iw, ch/ih)`, and large enough that the rotated photo can
//!    hold all four canvas corners
//! 2. each axis of the center is clamped in the photo's own (rotated)
//!    frame: an axis spanning the canvas may not expose a gap ("cover"),
//!    a narrower one may not leave the canvas ("contain")
//!
//! Flipping does not change the covered area and skips the pass.

use crate::config::{ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR};
use crate::domain::design::{LayerScale, RotationDegrees};
use crate::domain::geometry::{Bounds, PixelSize, Point, Size};
use crate::media::UploadedImage;
use std::fmt;
use std::str::FromStr;
use tiny_skia::Transform;

/// Placement of the photo on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerTransform {
    /// Photo center in display units.
    pub center: Point,
    pub scale: LayerScale,
    pub rotation: RotationDegrees,
    /// Mirrored left-to-right.
    pub flipped: bool,
}

impl LayerTransform {
    /// Contain-fit placement: the whole photo visible, centered.
    #[must_use]
    pub fn initial(image: PixelSize, canvas: Size) -> Self {
        Self {
            center: canvas.center(),
            scale: contain_scale(image, canvas),
            rotation: RotationDegrees::ZERO,
            flipped: false,
        }
    }
}

/// Largest scale at which the whole photo fits on the canvas.
#[must_use]
pub fn contain_scale(image: PixelSize, canvas: Size) -> LayerScale {
    let image = image.to_size();
    LayerScale::new((canvas.width / image.width).min(canvas.height / image.height))
}

/// Smallest scale at which the photo, rotated by `rotation`, covers every
/// point of the canvas. Never below `max(cw/iw, ch/ih)`.
///
/// The canvas seen from the photo's frame is the canvas rotated the other
/// way; the photo must span that box on both of its own axes.
#[must_use]
pub fn cover_scale(image: PixelSize, canvas: Size, rotation: RotationDegrees) -> LayerScale {
    let image = image.to_size();
    let (span_w, span_h) = rotated_extent(canvas, rotation);
    let flat = (canvas.width / image.width).max(canvas.height / image.height);
    LayerScale::new(flat.max(span_w / image.width).max(span_h / image.height))
}

/// Width and height of the axis-aligned box around a rotated rectangle.
fn rotated_extent(size: Size, rotation: RotationDegrees) -> (f32, f32) {
    let (sin, cos) = rotation.radians().sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    (
        size.width * cos + size.height * sin,
        size.width * sin + size.height * cos,
    )
}

/// Clamps one axis of the center. `half` is half the bounding box extent.
fn clamp_axis(center: f32, half: f32, extent: f32) -> f32 {
    if 2.0 * half >= extent {
        // cover: left edge at or before 0, right edge at or after extent
        center.min(half).max(extent - half)
    } else {
        // contain: box stays within 0..extent
        center.max(half).min(extent - half)
    }
}

fn span(values: impl Iterator<Item = f32>) -> (f32, f32) {
    values.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

/// The single user photo on the stage.
#[derive(Debug, Clone)]
pub struct UserLayer {
    upload: UploadedImage,
    canvas: Size,
    transform: LayerTransform,
}

impl UserLayer {
    /// Places a fresh upload at its initial contain-fit position.
    #[must_use]
    pub fn place(upload: UploadedImage, canvas: Size) -> Self {
        let transform = LayerTransform::initial(upload.image.size(), canvas);
        tracing::debug!(
            width = upload.image.width(),
            height = upload.image.height(),
            scale = transform.scale.value(),
            "user layer placed"
        );
        Self {
            upload,
            canvas,
            transform,
        }
    }

    /// Moves the layer onto a rebuilt canvas, keeping its edits.
    ///
    /// An unedited layer is placed afresh. Otherwise center and scale
    /// follow the canvas size and the constraint pass runs.
    #[must_use]
    pub fn refit(self, canvas: Size) -> Self {
        if self.transform == self.initial_transform() {
            return Self::place(self.upload, canvas);
        }

        let sx = canvas.width / self.canvas.width;
        let sy = canvas.height / self.canvas.height;
        let center = self.transform.center;
        let transform = LayerTransform {
            center: Point::new(center.x * sx, center.y * sy),
            scale: self.transform.scale.multiplied(sx.min(sy)),
            ..self.transform
        };
        let mut layer = Self {
            upload: self.upload,
            canvas,
            transform,
        };
        layer.constrain();
        layer
    }

    #[must_use]
    pub fn upload(&self) -> &UploadedImage {
        &self.upload
    }

    #[must_use]
    pub fn transform(&self) -> LayerTransform {
        self.transform
    }

    #[must_use]
    pub fn canvas(&self) -> Size {
        self.canvas
    }

    #[must_use]
    pub fn image_size(&self) -> PixelSize {
        self.upload.image.size()
    }

    /// Placement the layer had right after upload.
    #[must_use]
    pub fn initial_transform(&self) -> LayerTransform {
        LayerTransform::initial(self.image_size(), self.canvas)
    }

    #[must_use]
    pub fn cover_minimum(&self) -> LayerScale {
        cover_scale(self.image_size(), self.canvas, self.transform.rotation)
    }

    /// Axis-aligned bounding box in display units.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        let (half_w, half_h) = self.half_extent();
        Bounds::around(self.transform.center, half_w, half_h)
    }

    /// Whether no canvas area is left uncovered.
    ///
    /// Checks the four canvas corners against the rotated photo, not just
    /// its bounding box.
    #[must_use]
    pub fn covers_canvas(&self) -> bool {
        const TOLERANCE: f32 = 1e-3;
        let (half_w, half_h) = self.scaled_half_size();
        let (corners, center) = self.in_photo_frame();
        corners.iter().all(|corner| {
            (corner.x - center.x).abs() <= half_w + TOLERANCE
                && (corner.y - center.y).abs() <= half_h + TOLERANCE
        })
    }

    fn scaled_half_size(&self) -> (f32, f32) {
        let size = self.image_size().to_size().scaled(self.transform.scale.value());
        (size.width / 2.0, size.height / 2.0)
    }

    /// Canvas corners and layer center, rotated into the photo's frame.
    fn in_photo_frame(&self) -> ([tiny_skia::Point; 4], tiny_skia::Point) {
        let Size { width, height } = self.canvas;
        let mut corners = [
            tiny_skia::Point::from_xy(0.0, 0.0),
            tiny_skia::Point::from_xy(width, 0.0),
            tiny_skia::Point::from_xy(width, height),
            tiny_skia::Point::from_xy(0.0, height),
        ];
        let center = self.transform.center;
        let mut center = [tiny_skia::Point::from_xy(center.x, center.y)];

        let to_photo = Transform::from_rotate(-f32::from(self.transform.rotation.degrees()));
        to_photo.map_points(&mut corners);
        to_photo.map_points(&mut center);
        (corners, center[0])
    }

    fn half_extent(&self) -> (f32, f32) {
        let (w, h) = rotated_extent(
            self.image_size().to_size().scaled(self.transform.scale.value()),
            self.transform.rotation,
        );
        (w / 2.0, h / 2.0)
    }

    pub fn zoom_in(&mut self) {
        self.scale_by(ZOOM_IN_FACTOR);
    }

    pub fn zoom_out(&mut self) {
        self.scale_by(ZOOM_OUT_FACTOR);
    }

    pub fn scale_by(&mut self, factor: f32) {
        self.transform.scale = self.transform.scale.multiplied(factor);
        self.constrain();
    }

    pub fn flip_horizontal(&mut self) {
        self.transform.flipped = !self.transform.flipped;
    }

    /// Rotates clockwise by one 15° step.
    pub fn rotate(&mut self) {
        self.transform.rotation = self.transform.rotation.rotate_step();
        self.constrain();
    }

    /// Drops every change since upload.
    pub fn reset(&mut self) {
        self.transform = self.initial_transform();
    }

    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.transform.center = self.transform.center.translated(dx, dy);
        self.constrain();
    }

    pub fn move_to(&mut self, center: Point) {
        self.transform.center = center;
        self.constrain();
    }

    pub fn apply(&mut self, op: LayerOp) {
        match op {
            LayerOp::ZoomIn => self.zoom_in(),
            LayerOp::ZoomOut => self.zoom_out(),
            LayerOp::FlipHorizontal => self.flip_horizontal(),
            LayerOp::Rotate => self.rotate(),
            LayerOp::Reset => self.reset(),
            LayerOp::MoveBy { dx, dy } => self.move_by(dx, dy),
        }
    }

    fn constrain(&mut self) {
        self.transform.scale = self.transform.scale.at_least(self.cover_minimum());

        if !self.transform.rotation.is_rotated() {
            let (half_w, half_h) = self.half_extent();
            let center = self.transform.center;
            self.transform.center = Point::new(
                clamp_axis(center.x, half_w, self.canvas.width),
                clamp_axis(center.y, half_h, self.canvas.height),
            );
            return;
        }

        // Clamp in the photo's frame, where the photo is axis-aligned and
        // the canvas spans [min, max] on each axis.
        let (half_w, half_h) = self.scaled_half_size();
        let (corners, center) = self.in_photo_frame();
        let (min_x, max_x) = span(corners.iter().map(|p| p.x));
        let (min_y, max_y) = span(corners.iter().map(|p| p.y));
        let mut clamped = [tiny_skia::Point::from_xy(
            clamp_axis(center.x - min_x, half_w, max_x - min_x) + min_x,
            clamp_axis(center.y - min_y, half_h, max_y - min_y) + min_y,
        )];

        Transform::from_rotate(f32::from(self.transform.rotation.degrees())).map_points(&mut clamped);
        self.transform.center = Point::new(clamped[0].x, clamped[0].y);
    }

    /// Maps photo pixels onto display units.
    #[must_use]
    pub fn to_canvas(&self) -> Transform {
        let image = self.image_size().to_size();
        let LayerTransform {
            center,
            scale,
            rotation,
            flipped,
        } = self.transform;
        let mirror = if flipped { -1.0 } else { 1.0 };

        Transform::from_translate(center.x, center.y)
            .pre_concat(Transform::from_rotate(f32::from(rotation.degrees())))
            .pre_scale(scale.value() * mirror, scale.value())
            .pre_translate(-image.width / 2.0, -image.height / 2.0)
    }
}

/// Discrete edit applied to the user layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayerOp {
    ZoomIn,
    ZoomOut,
    FlipHorizontal,
    Rotate,
    Reset,
    MoveBy { dx: f32, dy: f32 },
}

impl FromStr for LayerOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "zoom-in" => Ok(Self::ZoomIn),
            "zoom-out" => Ok(Self::ZoomOut),
            "flip" => Ok(Self::FlipHorizontal),
            "rotate" => Ok(Self::Rotate),
            "reset" => Ok(Self::Reset),
            other => {
                let delta = other
                    .strip_prefix("move:")
                    .ok_or_else(|| format!("unknown layer operation '{other}'"))?;
                let (dx, dy) = delta
                    .split_once(',')
                    .ok_or_else(|| format!("expected move:dx,dy, got '{other}'"))?;
                let dx = dx.trim().parse::<f32>().map_err(|e| e.to_string())?;
                let dy = dy.trim().parse::<f32>().map_err(|e| e.to_string())?;
                Ok(Self::MoveBy { dx, dy })
            }
        }
    }
}

impl fmt::Display for LayerOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZoomIn => f.write_str("zoom-in"),
            Self::ZoomOut => f.write_str("zoom-out"),
            Self::FlipHorizontal => f.write_str("flip"),
            Self::Rotate => f.write_str("rotate"),
            Self::Reset => f.write_str("reset"),
            Self::MoveBy { dx, dy } => write!(f, "move:{dx},{dy}"),
        }
    }
}
