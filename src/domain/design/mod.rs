// SPDX-License-Identifier: MPL-2.0
//! Design domain types.
//!
//! This module provides pure value objects for the user photo layer:
//! - [`LayerScale`]: Uniform scale of the photo relative to its pixels
//! - [`RotationDegrees`]: Layer rotation in fixed 15° steps
//! - [`TemplateIndex`]: Position in a product's template list

pub mod newtypes;

pub use newtypes::{LayerScale, RotationDegrees, TemplateIndex};
