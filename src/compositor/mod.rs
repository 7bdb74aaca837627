// SPDX-License-Identifier: MPL-2.0
//! Design canvas compositor.
//!
//! The compositor turns a product template and a user photo into a single
//! flattened image:
//!
//! - [`template`]: picks the template, mockup and camera-overlay references
//! - [`stage`]: sizes the drawing surface and holds the background slots
//! - [`clip`]: derives the region the photo may be painted in
//! - [`layer`]: places the photo and keeps it covering the canvas
//! - [`render`]: paints everything in a fixed order
//! - [`export`]: flattens the stage at native resolution

pub mod clip;
pub mod export;
pub mod layer;
pub mod render;
pub mod stage;
pub mod template;

pub use clip::{compute_clip_path, ClipPath};
pub use export::{flatten, ExportFormat, FlattenedDesign};
pub use layer::{LayerOp, LayerTransform, UserLayer};
pub use stage::{Backgrounds, Stage, StageGeometry, Viewport};
pub use template::{resolve, ResolvedTemplate, TemplateRefs};
