// SPDX-License-Identifier: MPL-2.0
//! Cart line items and the stores that accept them.
//!
//! The compositor only ever adds items. Each design is unique, so two items
//! for the same product are never merged into one line.
//!
//! # Available Stores
//!
//! - [`InMemoryCart`]: a plain list, used by tests and embedding callers
//! - [`JsonFileCart`]: appends items to a JSON array on disk

use crate::error::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Payload handed to the cart when a design is added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub product_id: String,
    pub product_name: String,
    /// Unit price, written as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Flattened design as a PNG data URL.
    pub design_image: String,
    /// Template reference the design was built on. Empty for placeholder
    /// designs.
    pub template_image: String,
    /// Original upload as a data URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_custom_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_text: Option<String>,
    pub quantity: u32,
    pub category: String,
}

impl CartLineItem {
    /// `price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Something that accepts cart line items.
pub trait CartStore {
    /// Adds one line item.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot persist the item.
    fn add_item(&mut self, item: CartLineItem) -> Result<()>;
}

/// Cart kept in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCart {
    items: Vec<CartLineItem>,
}

impl InMemoryCart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Removes the item at `index`, if any.
    pub fn remove(&mut self, index: usize) -> Option<CartLineItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartLineItem::line_total).sum()
    }
}

impl CartStore for InMemoryCart {
    fn add_item(&mut self, item: CartLineItem) -> Result<()> {
        tracing::debug!(product = %item.product_id, quantity = item.quantity, "cart item added");
        self.items.push(item);
        Ok(())
    }
}

/// Cart persisted as a pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct JsonFileCart {
    path: PathBuf,
}

impl JsonFileCart {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored items. A missing file is an empty cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Vec<CartLineItem>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl CartStore for JsonFileCart {
    fn add_item(&mut self, item: CartLineItem) -> Result<()> {
        let mut items = self.load()?;
        items.push(item);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(&items)?)?;
        tracing::info!(path = %self.path.display(), items = items.len(), "cart saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn item(product_id: &str, price: i64, quantity: u32) -> CartLineItem {
        CartLineItem {
            product_id: product_id.into(),
            product_name: "iPhone 15".into(),
            price: Decimal::new(price, 0),
            design_image: "data:image/png;base64,AA==".into(),
            template_image: "templates/iphone15.png".into(),
            user_custom_image: None,
            custom_text: None,
            quantity,
            category: "phone".into(),
        }
    }

    #[test]
    fn serializes_camel_case_and_skips_empty_optionals() {
        let json = serde_json::to_value(item("p1", 1200, 1)).expect("serializes");
        assert_eq!(json["productId"], "p1");
        assert_eq!(json["designImage"], "data:image/png;base64,AA==");
        assert_eq!(json["templateImage"], "templates/iphone15.png");
        assert!(json.get("userCustomImage").is_none());
        assert!(json.get("customText").is_none());
        assert_eq!(json["price"].as_f64(), Some(1200.0));
    }

    #[test]
    fn price_reads_back_from_a_number() {
        let mut json = serde_json::to_value(item("p1", 1200, 1)).expect("serializes");
        json["price"] = serde_json::json!(19.5);
        let parsed: CartLineItem = serde_json::from_value(json).expect("parses");
        assert_eq!(parsed.price, Decimal::new(195, 1));
    }

    #[test]
    fn same_product_is_not_merged() {
        let mut cart = InMemoryCart::new();
        cart.add_item(item("p1", 1200, 1)).expect("added");
        cart.add_item(item("p1", 1200, 2)).expect("added");
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.subtotal(), Decimal::new(3600, 0));
    }

    #[test]
    fn remove_out_of_range_is_none() {
        let mut cart = InMemoryCart::new();
        cart.add_item(item("p1", 10, 1)).expect("added");
        assert!(cart.remove(3).is_none());
        assert_eq!(cart.remove(0).map(|i| i.product_id), Some("p1".to_string()));
        assert!(cart.is_empty());
    }

    #[test]
    fn json_file_cart_appends() {
        let temp_dir = tempdir().expect("temp dir");
        let mut cart = JsonFileCart::new(temp_dir.path().join("nested").join("cart.json"));
        assert!(cart.load().expect("empty").is_empty());

        cart.add_item(item("p1", 5, 1)).expect("first");
        cart.add_item(item("p2", 7, 3)).expect("second");

        let items = cart.load().expect("reload");
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].product_id, "p2");
        assert_eq!(items[1].line_total(), Decimal::new(21, 0));
    }
}
