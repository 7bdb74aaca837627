// SPDX-License-Identifier: MPL-2.0
//! Design session state machine.
//!
//! ```text
//! Unconfigured ──select product──▶ TemplateLoaded ──upload──▶ ImageLoaded
//!                                       │                        │
//!                                       └──────add to cart───────┴──▶ Exported
//! ```
//!
//! Selecting a product or a template starts over: the previous layer and
//! upload are dropped and a new [`SessionToken`] is issued. Results of
//! background loads carry the token they were started with; a result whose
//! token is no longer current is discarded.
//!
//! [`Designer`] drives a session from async code.

mod designer;
mod status;

pub use designer::{load_backgrounds, Designer};
pub use status::{Severity, StatusMessage};

use crate::cart::{CartLineItem, CartStore};
use crate::catalog::{Catalog, ProductModel};
use crate::compositor::{
    export, resolve, Backgrounds, FlattenedDesign, LayerOp, ResolvedTemplate, Stage, TemplateRefs,
    UserLayer, Viewport,
};
use crate::config::Config;
use crate::domain::design::TemplateIndex;
use crate::domain::geometry::PixelSize;
use crate::error::{Error, Result};
use crate::media::UploadedImage;
use std::fmt;

/// Identifies one product/template selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SessionToken(u64);

impl SessionToken {
    #[must_use]
    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of a design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Unconfigured,
    TemplateLoaded,
    ImageLoaded,
    /// Terminal.
    Exported,
}

/// Options supplied with "add to cart".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartOptions {
    pub custom_text: Option<String>,
    pub quantity: u32,
}

impl Default for CartOptions {
    fn default() -> Self {
        Self {
            custom_text: None,
            quantity: 1,
        }
    }
}

/// One customer's in-progress design.
#[derive(Debug, Clone)]
pub struct DesignSession {
    viewport: Viewport,
    placeholder: PixelSize,
    token: SessionToken,
    phase: Phase,
    product: Option<ProductModel>,
    resolved: Option<ResolvedTemplate>,
    backgrounds: Backgrounds,
    stage: Stage,
    status: Option<StatusMessage>,
}

impl DesignSession {
    #[must_use]
    pub fn new(viewport: Viewport, placeholder: PixelSize) -> Self {
        let backgrounds = Backgrounds::default();
        let stage = Stage::build(backgrounds.clone(), placeholder, &viewport);
        Self {
            viewport,
            placeholder,
            token: SessionToken::default(),
            phase: Phase::Unconfigured,
            product: None,
            resolved: None,
            backgrounds,
            stage,
            status: None,
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.viewport(), config.placeholder_size())
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Token background loads must present to install their results.
    #[must_use]
    pub fn token(&self) -> SessionToken {
        self.token
    }

    #[must_use]
    pub fn product(&self) -> Option<&ProductModel> {
        self.product.as_ref()
    }

    #[must_use]
    pub fn resolved_template(&self) -> Option<&ResolvedTemplate> {
        self.resolved.as_ref()
    }

    /// References the background loader should fetch for the current token.
    #[must_use]
    pub fn pending_assets(&self) -> Option<TemplateRefs> {
        self.resolved.as_ref().map(|resolved| resolved.refs.clone())
    }

    #[must_use]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Most recent status, if any.
    #[must_use]
    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.phase == Phase::Exported {
            return Err(Error::SessionFinished);
        }
        Ok(())
    }

    fn set_status(&mut self, status: StatusMessage) {
        match status.severity() {
            Severity::Error | Severity::Warning => tracing::warn!(key = status.key(), "{status}"),
            Severity::Info => tracing::info!(key = status.key(), "{status}"),
        }
        self.status = Some(status);
    }

    /// Selects a product by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProductNotFound`] for unknown ids; the session is
    /// then unconfigured and carries a status asking for a model.
    pub fn select_product(&mut self, catalog: &Catalog, id: &str) -> Result<SessionToken> {
        self.ensure_open()?;
        match catalog.find(id) {
            Ok(product) => self.select_product_model(product.clone()),
            Err(err) => {
                self.product = None;
                self.resolved = None;
                self.token = self.token.next();
                self.phase = Phase::Unconfigured;
                self.rebuild_stage(Backgrounds::default(), None);
                self.set_status(StatusMessage::ProductNotFound(id.to_string()));
                Err(err)
            }
        }
    }

    /// Selects an already-resolved product model at its first template.
    pub fn select_product_model(&mut self, product: ProductModel) -> Result<SessionToken> {
        self.ensure_open()?;
        tracing::info!(product = %product.id, name = %product.name, "product selected");
        self.product = Some(product);
        Ok(self.start_template(TemplateIndex::FIRST))
    }

    /// Switches to another template of the selected product.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoProductSelected`] when no product is selected.
    pub fn select_template(&mut self, index: TemplateIndex) -> Result<SessionToken> {
        self.ensure_open()?;
        self.require_product()?;
        Ok(self.start_template(index))
    }

    fn require_product(&mut self) -> Result<()> {
        if self.product.is_none() {
            self.set_status(StatusMessage::SelectProductFirst);
            return Err(Error::NoProductSelected);
        }
        Ok(())
    }

    fn start_template(&mut self, index: TemplateIndex) -> SessionToken {
        self.status = None;
        let resolved = self.product.as_ref().map(|product| resolve(product, index));

        if let Some(resolved) = &resolved {
            if resolved.fell_back() {
                self.set_status(StatusMessage::TemplateFallback {
                    requested: resolved.requested,
                    available: resolved.available,
                });
            }
        }

        self.resolved = resolved;
        self.token = self.token.next();
        self.phase = Phase::TemplateLoaded;
        self.rebuild_stage(Backgrounds::default(), None);
        tracing::debug!(token = %self.token, "template selection started");
        self.token
    }

    fn rebuild_stage(&mut self, backgrounds: Backgrounds, layer: Option<UserLayer>) {
        self.backgrounds = backgrounds;
        self.stage = Stage::build(self.backgrounds.clone(), self.placeholder, &self.viewport);
        if let Some(layer) = layer {
            self.stage.carry_layer(layer);
        }
    }

    fn current_layer(&self) -> Option<UserLayer> {
        self.stage.layer().cloned()
    }

    /// Installs decoded background images loaded for `token`.
    ///
    /// Returns `false` when the token is stale or the session is finished.
    /// A present photo keeps its edits, refitted to the rebuilt stage.
    pub fn install_backgrounds(&mut self, token: SessionToken, backgrounds: Backgrounds) -> bool {
        if token != self.token || self.phase == Phase::Exported || self.product.is_none() {
            tracing::debug!(stale = %token, current = %self.token, "discarding background assets");
            return false;
        }
        let layer = self.current_layer();
        self.rebuild_stage(backgrounds, layer);
        true
    }

    /// Installs a decoded upload for `token`, replacing any previous photo.
    ///
    /// Returns `Ok(false)` when the token is stale.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionFinished`] after export and
    /// [`Error::NoProductSelected`] when no product is selected.
    pub fn install_user_image(&mut self, token: SessionToken, upload: UploadedImage) -> Result<bool> {
        self.ensure_open()?;
        self.require_product()?;
        if token != self.token {
            tracing::debug!(stale = %token, current = %self.token, "discarding upload");
            return Ok(false);
        }
        self.stage.place_upload(upload);
        self.phase = Phase::ImageLoaded;
        Ok(true)
    }

    /// Records a failed upload or asset load for `token`.
    pub fn report_image_failure(&mut self, token: SessionToken, error: &Error) {
        if token == self.token {
            self.set_status(StatusMessage::ImageLoadFailed(error.to_string()));
        }
    }

    /// Applies a layer edit. Without a photo this is a no-op returning
    /// `Ok(false)`.
    pub fn apply(&mut self, op: LayerOp) -> Result<bool> {
        self.ensure_open()?;
        match self.stage.layer_mut() {
            Some(layer) => {
                layer.apply(op);
                tracing::debug!(%op, "layer edited");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Refits the stage into a new viewport. The photo returns to its
    /// initial placement on the resized canvas.
    pub fn resize_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.ensure_open()?;
        if viewport == self.viewport {
            return Ok(());
        }
        self.viewport = viewport;
        let layer = self.current_layer();
        self.rebuild_stage(self.backgrounds.clone(), layer);
        Ok(())
    }

    /// Flattens the current stage at native resolution.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoProductSelected`] when no product is selected.
    pub fn flatten(&mut self) -> Result<FlattenedDesign> {
        self.require_product()?;
        export::flatten(&self.stage)
    }

    /// Flattens the design, hands a line item to `cart` and finishes the
    /// session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionFinished`] if already exported,
    /// [`Error::NoProductSelected`] without a product, or any error from
    /// rendering or the cart store.
    pub fn add_to_cart(&mut self, cart: &mut impl CartStore, options: CartOptions) -> Result<CartLineItem> {
        self.ensure_open()?;
        let design = self.flatten()?;
        if design.degraded {
            self.set_status(StatusMessage::TemplateOnlyExport);
        }

        let Some(product) = self.product.as_ref() else {
            return Err(Error::NoProductSelected);
        };
        let template_image = self
            .resolved
            .as_ref()
            .and_then(|resolved| resolved.refs.template.clone())
            .unwrap_or_default();

        let item = CartLineItem {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            price: product.price,
            design_image: design.to_data_url(),
            template_image,
            user_custom_image: self.stage.layer().map(|layer| layer.upload().data_url.clone()),
            custom_text: options.custom_text.filter(|text| !text.trim().is_empty()),
            quantity: options.quantity.max(1),
            category: product.category.clone(),
        };

        cart.add_item(item.clone())?;
        self.phase = Phase::Exported;
        tracing::info!(product = %item.product_id, degraded = design.degraded, "design added to cart");
        Ok(item)
    }
}
