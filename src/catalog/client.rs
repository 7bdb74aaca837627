// SPDX-License-Identifier: MPL-2.0
//! Catalog retrieval over HTTP or from disk.

use super::{Catalog, ProductModel};
use crate::error::{Error, Result};
use std::path::PathBuf;

const USER_AGENT: &str = concat!("CaseDesigner/", env!("CARGO_PKG_VERSION"));

/// Where a catalog is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Url(String),
    File(PathBuf),
}

impl CatalogSource {
    /// Classifies a command-line or config value as URL or file path.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            Self::Url(value.to_string())
        } else {
            Self::File(PathBuf::from(value))
        }
    }

    pub async fn load(&self) -> Result<Catalog> {
        match self {
            Self::Url(url) => CatalogClient::new(url.clone())?.fetch().await,
            Self::File(path) => {
                let path = path.clone();
                tokio::task::spawn_blocking(move || Catalog::load_from_path(&path))
                    .await
                    .map_err(|e| Error::Io(e.to_string()))?
            }
        }
    }
}

/// Read-only client for the product catalog service.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    url: String,
}

impl CatalogClient {
    /// Builds a client for the endpoint returning the product list.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetches the full product list.
    pub async fn fetch(&self) -> Result<Catalog> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Network(format!(
                "HTTP status: {}",
                response.status()
            )));
        }

        let products: Vec<ProductModel> = response.json().await?;
        tracing::info!(url = %self.url, products = products.len(), "catalog fetched");
        Ok(Catalog::new(products))
    }
}
