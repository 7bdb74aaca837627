// SPDX-License-Identifier: MPL-2.0
//! Design newtypes.
//!
//! This module provides type-safe wrappers for layer values,
//! ensuring they are always within valid ranges.

// =============================================================================
// Layer Scale Bounds
// =============================================================================

/// Layer scale bounds (multiplier applied to the photo's pixel size).
pub mod scale_bounds {
    /// Smallest representable layer scale.
    pub const MIN: f32 = 1e-4;
    /// Largest representable layer scale.
    pub const MAX: f32 = 1e4;
    /// Identity scale.
    pub const DEFAULT: f32 = 1.0;
}

// =============================================================================
// LayerScale
// =============================================================================

/// Uniform scale of the user photo, guaranteed finite and positive.
///
/// A scale of `1.0` draws one photo pixel per display unit. Non-finite
/// inputs collapse to the identity scale.
///
/// # Example
///
/// ```
/// use case_designer::domain::design::LayerScale;
///
/// let scale = LayerScale::new(0.5).multiplied(1.1);
/// assert!((scale.value() - 0.55).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct LayerScale(f32);

impl LayerScale {
    /// Creates a new scale, clamping the value to the valid range.
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_finite() {
            Self(value.clamp(scale_bounds::MIN, scale_bounds::MAX))
        } else {
            Self(scale_bounds::DEFAULT)
        }
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Multiplies the scale by `factor`, staying within bounds.
    #[must_use]
    pub fn multiplied(self, factor: f32) -> Self {
        Self::new(self.0 * factor)
    }

    /// Returns the larger of the two scales.
    #[must_use]
    pub fn at_least(self, floor: LayerScale) -> Self {
        if self.0 < floor.0 {
            floor
        } else {
            self
        }
    }
}

impl Default for LayerScale {
    fn default() -> Self {
        Self(scale_bounds::DEFAULT)
    }
}

// =============================================================================
// RotationDegrees
// =============================================================================

/// Layer rotation in fixed 15° increments.
///
/// This newtype enforces validity at the type level, ensuring the value
/// is always a multiple of [`RotationDegrees::STEP`] within `0..360`.
///
/// # Example
///
/// ```
/// use case_designer::domain::design::RotationDegrees;
///
/// let angle = RotationDegrees::default().rotate_step();
/// assert_eq!(angle.degrees(), 15);
///
/// let full = (0..24).fold(RotationDegrees::ZERO, |a, _| a.rotate_step());
/// assert_eq!(full.degrees(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RotationDegrees(u16);

impl RotationDegrees {
    /// Angle added by one rotate action.
    pub const STEP: u16 = 15;

    /// No rotation (0°).
    pub const ZERO: Self = Self(0);

    /// Creates a rotation, rounding down to the nearest step and wrapping
    /// to the 0–345° range.
    #[must_use]
    pub fn new(degrees: u16) -> Self {
        Self(((degrees / Self::STEP) * Self::STEP) % 360)
    }

    #[must_use]
    pub fn degrees(self) -> u16 {
        self.0
    }

    #[must_use]
    pub fn radians(self) -> f32 {
        f32::from(self.0).to_radians()
    }

    /// Rotates clockwise by one step.
    #[must_use]
    pub fn rotate_step(self) -> Self {
        Self((self.0 + Self::STEP) % 360)
    }

    #[must_use]
    pub fn is_rotated(self) -> bool {
        self.0 != 0
    }
}

// =============================================================================
// TemplateIndex
// =============================================================================

/// Position of a template in a product's ordered template list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct TemplateIndex(usize);

impl TemplateIndex {
    /// The first template.
    pub const FIRST: Self = Self(0);

    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn value(self) -> usize {
        self.0
    }

    /// Returns `self` when it addresses one of `count` templates,
    /// otherwise the first template.
    #[must_use]
    pub fn clamp_to(self, count: usize) -> Self {
        if self.0 < count {
            self
        } else {
            Self::FIRST
        }
    }
}

impl std::fmt::Display for TemplateIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // LayerScale tests
    // -------------------------------------------------------------------------

    #[test]
    fn layer_scale_clamps() {
        assert_eq!(LayerScale::new(0.0).value(), scale_bounds::MIN);
        assert_eq!(LayerScale::new(-3.0).value(), scale_bounds::MIN);
        assert_eq!(LayerScale::new(1e9).value(), scale_bounds::MAX);
        assert!((LayerScale::new(0.25).value() - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn layer_scale_rejects_non_finite() {
        assert_eq!(LayerScale::new(f32::NAN), LayerScale::default());
        assert_eq!(LayerScale::new(f32::INFINITY), LayerScale::default());
    }

    #[test]
    fn layer_scale_at_least_picks_floor() {
        let floor = LayerScale::new(0.5);
        assert_eq!(LayerScale::new(0.3).at_least(floor), floor);
        assert_eq!(LayerScale::new(0.7).at_least(floor).value(), 0.7);
    }

    // -------------------------------------------------------------------------
    // RotationDegrees tests
    // -------------------------------------------------------------------------

    #[test]
    fn rotation_new_normalizes_to_steps() {
        assert_eq!(RotationDegrees::new(0).degrees(), 0);
        assert_eq!(RotationDegrees::new(14).degrees(), 0);
        assert_eq!(RotationDegrees::new(15).degrees(), 15);
        assert_eq!(RotationDegrees::new(44).degrees(), 30);
        assert_eq!(RotationDegrees::new(360).degrees(), 0);
        assert_eq!(RotationDegrees::new(375).degrees(), 15);
    }

    #[test]
    fn rotation_step_wraps_at_360() {
        let angle = RotationDegrees::new(345);
        assert_eq!(angle.rotate_step().degrees(), 0);
        assert!(!angle.rotate_step().is_rotated());
    }

    #[test]
    fn rotation_radians_conversion() {
        use std::f32::consts::PI;
        assert!((RotationDegrees::new(90).radians() - PI / 2.0).abs() < 0.001);
        assert!((RotationDegrees::new(180).radians() - PI).abs() < 0.001);
    }

    // -------------------------------------------------------------------------
    // TemplateIndex tests
    // -------------------------------------------------------------------------

    #[test]
    fn template_index_clamps_out_of_range_to_first() {
        assert_eq!(TemplateIndex::new(2).clamp_to(3), TemplateIndex::new(2));
        assert_eq!(TemplateIndex::new(5).clamp_to(3), TemplateIndex::FIRST);
        assert_eq!(TemplateIndex::new(0).clamp_to(0), TemplateIndex::FIRST);
    }
}
