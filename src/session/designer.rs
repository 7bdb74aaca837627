// SPDX-License-Identifier: MPL-2.0
//! Async driver for a [`DesignSession`].
//!
//! Template assets load on a background task. Switching product or template
//! aborts the task started for the previous selection; should it still
//! finish, its token is stale and the session ignores the result.

use super::{CartOptions, DesignSession, SessionToken};
use crate::cart::{CartLineItem, CartStore};
use crate::catalog::Catalog;
use crate::compositor::{Backgrounds, LayerOp, TemplateRefs, Viewport};
use crate::domain::design::TemplateIndex;
use crate::error::Result;
use crate::media::{AssetLoader, UploadedImage};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Loads the three background slots concurrently. Failed slots stay empty.
pub async fn load_backgrounds(loader: &AssetLoader, refs: &TemplateRefs) -> Backgrounds {
    let (template, mockup, camera_overlay) = tokio::join!(
        loader.load_optional(refs.template.as_deref(), "template"),
        loader.load_optional(refs.mockup.as_deref(), "mockup"),
        loader.load_optional(refs.camera_overlay.as_deref(), "camera_overlay"),
    );
    Backgrounds {
        template,
        mockup,
        camera_overlay,
    }
}

/// Owns a shared session plus the task loading its current backgrounds.
#[derive(Debug)]
pub struct Designer {
    session: Arc<Mutex<DesignSession>>,
    loader: AssetLoader,
    background: Option<JoinHandle<()>>,
}

impl Designer {
    #[must_use]
    pub fn new(session: DesignSession, loader: AssetLoader) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            loader,
            background: None,
        }
    }

    /// Shared handle to the session.
    #[must_use]
    pub fn session(&self) -> Arc<Mutex<DesignSession>> {
        Arc::clone(&self.session)
    }

    pub async fn select_product(&mut self, catalog: &Catalog, id: &str) -> Result<SessionToken> {
        let selected = {
            let mut session = self.session.lock().await;
            session
                .select_product(catalog, id)
                .map(|token| (token, session.pending_assets()))
        };
        match selected {
            Ok((token, refs)) => {
                self.spawn_backgrounds(token, refs);
                Ok(token)
            }
            Err(err) => {
                self.cancel_background();
                Err(err)
            }
        }
    }

    pub async fn select_template(&mut self, index: TemplateIndex) -> Result<SessionToken> {
        let (token, refs) = {
            let mut session = self.session.lock().await;
            let token = session.select_template(index)?;
            (token, session.pending_assets())
        };
        self.spawn_backgrounds(token, refs);
        Ok(token)
    }

    fn cancel_background(&mut self) {
        if let Some(previous) = self.background.take() {
            previous.abort();
        }
    }

    fn spawn_backgrounds(&mut self, token: SessionToken, refs: Option<TemplateRefs>) {
        self.cancel_background();
        let Some(refs) = refs else {
            return;
        };

        let loader = self.loader.clone();
        let session = Arc::clone(&self.session);
        self.background = Some(tokio::spawn(async move {
            let backgrounds = load_backgrounds(&loader, &refs).await;
            if session.lock().await.install_backgrounds(token, backgrounds) {
                tracing::debug!(%token, "background assets installed");
            }
        }));
    }

    /// Waits until the current background load has finished.
    pub async fn wait_for_backgrounds(&mut self) {
        if let Some(handle) = self.background.take() {
            if let Err(err) = handle.await {
                if !err.is_cancelled() {
                    tracing::warn!(error = %err, "background load task failed");
                }
            }
        }
    }

    /// Reads a photo from disk and puts it on the stage.
    ///
    /// A photo that fails to load is reported on the session and returned
    /// as an error; the stage keeps its current content, so the design can
    /// still be exported without it.
    pub async fn upload_file(&mut self, path: &Path) -> Result<bool> {
        let token = self.session.lock().await.token();
        let upload = self.loader.read_upload(path).await;
        self.install_upload(token, upload).await
    }

    /// Decodes a data URL upload and puts it on the stage.
    pub async fn upload_data_url(&mut self, data_url: String) -> Result<bool> {
        let token = self.session.lock().await.token();
        let upload = self.loader.decode_upload(data_url).await;
        self.install_upload(token, upload).await
    }

    async fn install_upload(
        &mut self,
        token: SessionToken,
        upload: Result<UploadedImage>,
    ) -> Result<bool> {
        let mut session = self.session.lock().await;
        match upload {
            Ok(upload) => session.install_user_image(token, upload),
            Err(err) => {
                session.report_image_failure(token, &err);
                Err(err)
            }
        }
    }

    pub async fn apply(&self, op: LayerOp) -> Result<bool> {
        self.session.lock().await.apply(op)
    }

    pub async fn resize_viewport(&self, viewport: Viewport) -> Result<()> {
        self.session.lock().await.resize_viewport(viewport)
    }

    /// Waits for pending assets, then adds the design to `cart`.
    pub async fn add_to_cart(
        &mut self,
        cart: &mut impl CartStore,
        options: CartOptions,
    ) -> Result<CartLineItem> {
        self.wait_for_backgrounds().await;
        self.session.lock().await.add_to_cart(cart, options)
    }
}

impl Drop for Designer {
    fn drop(&mut self) {
        self.cancel_background();
    }
}
