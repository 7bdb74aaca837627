// SPDX-License-Identifier: MPL-2.0
//! Plain geometry used by the stage and the user layer.
//!
//! Native sizes are whole pixels ([`PixelSize`]); everything on the
//! displayed stage is expressed in floating-point display units ([`Size`],
//! [`Point`], [`Bounds`]).

/// Size of a raster in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Converts to floating-point units.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn to_size(self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }
}

/// Floating-point size in display units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Uniformly scales both dimensions.
    #[must_use]
    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    #[must_use]
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Rounds to whole pixels, never below one pixel per side.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn to_pixels(self) -> PixelSize {
        PixelSize::new(
            self.width.round().max(1.0) as u32,
            self.height.round().max(1.0) as u32,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn translated(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Axis-aligned edges of a box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Bounds {
    /// Box of the given half extents centered on `center`.
    #[must_use]
    pub fn around(center: Point, half_width: f32, half_height: f32) -> Self {
        Self {
            left: center.x - half_width,
            top: center.y - half_height,
            right: center.x + half_width,
            bottom: center.y + half_height,
        }
    }

    /// Box anchored at the origin with the given size.
    #[must_use]
    pub fn of_size(size: Size) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            right: size.width,
            bottom: size.height,
        }
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_size_empty_detection() {
        assert!(PixelSize::new(0, 10).is_empty());
        assert!(PixelSize::new(10, 0).is_empty());
        assert!(!PixelSize::new(1, 1).is_empty());
    }

    #[test]
    fn size_to_pixels_rounds_and_floors_at_one() {
        assert_eq!(Size::new(10.4, 10.6).to_pixels(), PixelSize::new(10, 11));
        assert_eq!(Size::new(0.1, 0.0).to_pixels(), PixelSize::new(1, 1));
    }

    #[test]
    fn bounds_around_center() {
        let b = Bounds::around(Point::new(50.0, 40.0), 10.0, 5.0);
        assert_eq!(b.left, 40.0);
        assert_eq!(b.right, 60.0);
        assert_eq!(b.top, 35.0);
        assert_eq!(b.bottom, 45.0);
        assert_eq!(b.width(), 20.0);
        assert_eq!(b.height(), 10.0);
    }
}
