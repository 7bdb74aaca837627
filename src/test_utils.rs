// SPDX-License-Identifier: MPL-2.0
//! Test utilities for float comparisons and other common test helpers.
//!
//! This module re-exports the `approx` crate's assertion macros for float comparison,
//! which properly handle floating-point precision issues that `assert_eq!` cannot.

// Re-export approx macros for convenient use in tests
pub use approx::assert_abs_diff_eq;

use crate::media::{RasterImage, UploadedImage};

/// Opaque single-color image of the given size.
pub fn solid_image(width: u32, height: u32, rgba: [u8; 4]) -> RasterImage {
    let pixels: Vec<u8> = rgba
        .iter()
        .copied()
        .cycle()
        .take((width * height * 4) as usize)
        .collect();
    RasterImage::from_rgba(width, height, &pixels).expect("valid test image")
}

/// Upload wrapping a solid image, with a placeholder data URL.
pub fn solid_upload(width: u32, height: u32) -> UploadedImage {
    UploadedImage {
        data_url: "data:image/png;base64,AA==".into(),
        image: solid_image(width, height, [255, 255, 255, 255]),
    }
}
