// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core design values with ZERO external dependencies.
//!
//! This module contains pure value objects and geometry used by the
//! compositor. It has no dependencies on external crates (except `std`) to
//! keep the placement math testable in isolation.
//!
//! # Modules
//!
//! - [`geometry`]: Sizes, points and bounds ([`PixelSize`](geometry::PixelSize),
//!   [`Size`](geometry::Size), [`Point`](geometry::Point), [`Bounds`](geometry::Bounds))
//! - [`design`]: Layer value objects ([`LayerScale`](design::LayerScale),
//!   [`RotationDegrees`](design::RotationDegrees), [`TemplateIndex`](design::TemplateIndex))

pub mod design;
pub mod geometry;
