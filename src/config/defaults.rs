// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the crate. Constants are organized by category.
//!
//! # Categories
//!
//! - **Stage**: Viewport fitting and placeholder surface size
//! - **Layer**: Zoom factors of the user photo layer
//! - **Assets**: Limits applied when fetching template assets

// ==========================================================================
// Stage Defaults
// ==========================================================================

/// Placeholder surface width when a product has no template (pixels).
pub const DEFAULT_PLACEHOLDER_WIDTH: u32 = 600;

/// Placeholder surface height when a product has no template (pixels).
pub const DEFAULT_PLACEHOLDER_HEIGHT: u32 = 1200;

/// Default width available to the stage in its container (display pixels).
pub const DEFAULT_CONTAINER_WIDTH: f32 = 400.0;

/// Default viewport height used for the height ceiling (display pixels).
pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 900.0;

/// Share of the viewport height the stage may occupy.
pub const DEFAULT_MAX_HEIGHT_RATIO: f32 = 0.7;

/// Lower bound for the viewport height ratio.
pub const MIN_MAX_HEIGHT_RATIO: f32 = 0.1;

/// Upper bound for the viewport height ratio.
pub const MAX_MAX_HEIGHT_RATIO: f32 = 1.0;

/// Smallest container dimension accepted before fitting (display pixels).
pub const MIN_CONTAINER_EXTENT: f32 = 1.0;

// ==========================================================================
// Layer Defaults
// ==========================================================================

/// Multiplier applied by "zoom in".
pub const ZOOM_IN_FACTOR: f32 = 1.1;

/// Multiplier applied by "zoom out".
pub const ZOOM_OUT_FACTOR: f32 = 0.9;

// ==========================================================================
// Asset Defaults
// ==========================================================================

/// Largest asset body accepted from the network (32 MB).
pub const DEFAULT_MAX_ASSET_BYTES: u64 = 32 * 1024 * 1024;

/// Smallest configurable asset ceiling (1 MB).
pub const MIN_MAX_ASSET_BYTES: u64 = 1024 * 1024;

/// Largest configurable asset ceiling (256 MB).
pub const MAX_MAX_ASSET_BYTES: u64 = 256 * 1024 * 1024;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    // Stage validation
    assert!(DEFAULT_PLACEHOLDER_WIDTH > 0);
    assert!(DEFAULT_PLACEHOLDER_HEIGHT > 0);
    assert!(DEFAULT_CONTAINER_WIDTH >= MIN_CONTAINER_EXTENT);
    assert!(DEFAULT_VIEWPORT_HEIGHT >= MIN_CONTAINER_EXTENT);
    assert!(MIN_MAX_HEIGHT_RATIO > 0.0);
    assert!(MAX_MAX_HEIGHT_RATIO >= MIN_MAX_HEIGHT_RATIO);
    assert!(DEFAULT_MAX_HEIGHT_RATIO >= MIN_MAX_HEIGHT_RATIO);
    assert!(DEFAULT_MAX_HEIGHT_RATIO <= MAX_MAX_HEIGHT_RATIO);

    // Layer validation
    assert!(ZOOM_IN_FACTOR > 1.0);
    assert!(ZOOM_OUT_FACTOR > 0.0);
    assert!(ZOOM_OUT_FACTOR < 1.0);

    // Asset validation
    assert!(MIN_MAX_ASSET_BYTES > 0);
    assert!(MAX_MAX_ASSET_BYTES >= MIN_MAX_ASSET_BYTES);
    assert!(DEFAULT_MAX_ASSET_BYTES >= MIN_MAX_ASSET_BYTES);
    assert!(DEFAULT_MAX_ASSET_BYTES <= MAX_MAX_ASSET_BYTES);
};
