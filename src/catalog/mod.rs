// SPDX-License-Identifier: MPL-2.0
//! Product catalog as seen by the designer.
//!
//! Products are owned by the storefront's admin side; the designer only
//! reads them. The list arrives as JSON either from the catalog service
//! ([`CatalogClient`]) or from a file on disk ([`Catalog::load_from_path`]).

mod client;

pub use client::{CatalogClient, CatalogSource};

use crate::error::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A phone model or pet product that can carry a custom design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductModel {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub category: String,
    /// Ordered template (silhouette) image references.
    #[serde(default)]
    pub template_images: Vec<String>,
    #[serde(default)]
    pub mockup_image: Option<String>,
    #[serde(default)]
    pub camera_overlay: Option<String>,
    /// Printable area metadata, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_area: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_size: Option<serde_json::Value>,
}

impl ProductModel {
    #[must_use]
    pub fn has_templates(&self) -> bool {
        !self.template_images.is_empty()
    }
}

/// Read-only product list with lookup by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<ProductModel>,
}

impl Catalog {
    #[must_use]
    pub fn new(products: Vec<ProductModel>) -> Self {
        Self { products }
    }

    /// Parses the JSON array served by the catalog service.
    pub fn from_json(json: &str) -> Result<Self> {
        let products: Vec<ProductModel> = serde_json::from_str(json)?;
        Ok(Self::new(products))
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;
        tracing::debug!(path = %path.display(), products = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    /// Looks up a product by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProductNotFound`] when no product has that id.
    pub fn find(&self, id: &str) -> Result<&ProductModel> {
        self.products
            .iter()
            .find(|product| product.id == id)
            .ok_or_else(|| Error::ProductNotFound(id.to_string()))
    }

    #[must_use]
    pub fn products(&self) -> &[ProductModel] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"[
        {
            "_id": "iphone-15",
            "name": "iPhone 15",
            "price": 1200,
            "category": "phone",
            "templateImages": ["templates/iphone15-a.png", "templates/iphone15-b.png"],
            "mockupImage": "mockups/iphone15.png",
            "cameraOverlay": "overlays/iphone15-camera.png",
            "coverArea": {"x": 10, "y": 10}
        },
        {
            "id": "pet-tag",
            "name": "Pet Tag",
            "price": "19.99",
            "category": "pet"
        }
    ]"#;

    #[test]
    fn parses_camel_case_products() {
        let catalog = Catalog::from_json(SAMPLE).expect("sample should parse");
        assert_eq!(catalog.len(), 2);

        let phone = catalog.find("iphone-15").expect("phone present");
        assert_eq!(phone.name, "iPhone 15");
        assert_eq!(phone.price, Decimal::new(1200, 0));
        assert_eq!(phone.template_images.len(), 2);
        assert_eq!(phone.mockup_image.as_deref(), Some("mockups/iphone15.png"));
        assert!(phone.cover_area.is_some());
        assert!(phone.cover_size.is_none());
    }

    #[test]
    fn optional_fields_default_when_missing() {
        let catalog = Catalog::from_json(SAMPLE).expect("sample should parse");
        let tag = catalog.find("pet-tag").expect("pet tag present");
        assert_eq!(tag.price, Decimal::new(1999, 2));
        assert!(!tag.has_templates());
        assert!(tag.mockup_image.is_none());
        assert!(tag.camera_overlay.is_none());
    }

    #[test]
    fn find_unknown_product_errors() {
        let catalog = Catalog::from_json(SAMPLE).expect("sample should parse");
        match catalog.find("galaxy-s24") {
            Err(Error::ProductNotFound(id)) => assert_eq!(id, "galaxy-s24"),
            other => panic!("expected ProductNotFound, got {other:?}"),
        }
    }

    #[test]
    fn invalid_json_is_a_json_error() {
        match Catalog::from_json("{not json") {
            Err(Error::Json(_)) => {}
            other => panic!("expected Json error, got {other:?}"),
        }
    }

    #[test]
    fn load_from_path_reads_file() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join("products.json");
        std::fs::write(&path, SAMPLE).expect("write catalog");

        let catalog = Catalog::load_from_path(&path).expect("catalog loads");
        assert_eq!(catalog.products()[0].id, "iphone-15");
    }
}
