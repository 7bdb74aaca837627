// SPDX-License-Identifier: MPL-2.0
//! User-facing status messages raised by the design session.

use crate::domain::design::TemplateIndex;
use std::fmt;

/// How prominently a status should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    /// Something was degraded but the session can continue.
    Warning,
    /// The requested action did not happen.
    Error,
}

/// A status the storefront shows next to the designer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    /// The requested template index did not exist.
    TemplateFallback {
        requested: TemplateIndex,
        available: usize,
    },
    ProductNotFound(String),
    /// A design action needs a product first.
    SelectProductFirst,
    ImageLoadFailed(String),
    /// Added to cart without a photo.
    TemplateOnlyExport,
}

impl StatusMessage {
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            StatusMessage::TemplateFallback { .. } | StatusMessage::TemplateOnlyExport => {
                Severity::Warning
            }
            StatusMessage::SelectProductFirst => Severity::Info,
            StatusMessage::ProductNotFound(_) | StatusMessage::ImageLoadFailed(_) => {
                Severity::Error
            }
        }
    }

    /// Stable key for storefront-side translation.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            StatusMessage::TemplateFallback { .. } => "designer-template-fallback",
            StatusMessage::ProductNotFound(_) => "designer-product-not-found",
            StatusMessage::SelectProductFirst => "designer-select-product",
            StatusMessage::ImageLoadFailed(_) => "designer-image-failed",
            StatusMessage::TemplateOnlyExport => "designer-template-only",
        }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusMessage::TemplateFallback {
                requested,
                available,
            } => write!(
                f,
                "Template {requested} is not available ({available} templates), showing the first one"
            ),
            StatusMessage::ProductNotFound(id) => {
                write!(f, "Product '{id}' was not found, please select a phone model")
            }
            StatusMessage::SelectProductFirst => {
                write!(f, "Please select a phone model before designing")
            }
            StatusMessage::ImageLoadFailed(reason) => write!(f, "Image failed to load: {reason}"),
            StatusMessage::TemplateOnlyExport => {
                write!(f, "No photo was added, the design contains the template only")
            }
        }
    }
}
