// SPDX-License-Identifier: MPL-2.0
//! Template resolution for a selected product.

use crate::catalog::ProductModel;
use crate::domain::design::TemplateIndex;

/// The three optional images layered on the stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateRefs {
    /// Template/silhouette image.
    pub template: Option<String>,
    /// Full product mockup drawn above the template.
    pub mockup: Option<String>,
    /// Camera cutout kept above everything else.
    pub camera_overlay: Option<String>,
}

/// Outcome of resolving a template index against a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTemplate {
    pub refs: TemplateRefs,
    /// Index actually used.
    pub index: TemplateIndex,
    /// Index the caller asked for.
    pub requested: TemplateIndex,
    /// Number of templates the product offers.
    pub available: usize,
}

impl ResolvedTemplate {
    /// Whether the requested index was out of range and clamped to the first.
    #[must_use]
    pub fn fell_back(&self) -> bool {
        self.available > 0 && self.index != self.requested
    }

    /// Whether the stage has to use the placeholder size.
    #[must_use]
    pub fn uses_placeholder(&self) -> bool {
        self.refs.template.is_none()
    }
}

/// Resolves the template references for `product` at `requested`.
///
/// An index outside the product's template list resolves to the first
/// template. A product without templates yields no template reference.
#[must_use]
pub fn resolve(product: &ProductModel, requested: TemplateIndex) -> ResolvedTemplate {
    let available = product.template_images.len();
    let index = requested.clamp_to(available);

    if !product.has_templates() {
        tracing::debug!(product = %product.id, "no templates, stage uses the placeholder size");
    } else if index != requested {
        tracing::warn!(
            product = %product.id,
            requested = %requested,
            available,
            "template index out of range, using first template"
        );
    }

    ResolvedTemplate {
        refs: TemplateRefs {
            template: product.template_images.get(index.value()).cloned(),
            mockup: product.mockup_image.clone(),
            camera_overlay: product.camera_overlay.clone(),
        },
        index,
        requested,
        available,
    }
}
