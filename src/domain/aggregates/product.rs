//! Product Aggregate
//!
//! The catalog record the shop pages filter and sort. Field names follow the
//! JSON the catalog is served in.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::domain::value_objects::Gender;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub original_price: Option<f64>,
    /// Discount percentage, absent when the product is full price.
    #[serde(default)]
    pub discount: Option<f64>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_bestseller: bool,
    #[serde(default)]
    pub image: Option<String>,
}

fn default_in_stock() -> bool { true }

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(), name: name.into(), price, original_price: None, discount: None,
            categories: vec![], brand: None, colors: vec![], sizes: vec![], attributes: BTreeMap::new(),
            rating: 0.0, review_count: 0, in_stock: true, gender: None, is_new: false, is_bestseller: false, image: None,
        }
    }

    pub fn has_discount(&self) -> bool { self.discount.is_some_and(|d| d > 0.0) }

    /// Values for an attribute type. `color`/`size` (and plurals) resolve to
    /// the dedicated lists; other names are looked up case-insensitively.
    pub fn attribute_values(&self, name: &str) -> &[String] {
        let key = name.trim().to_ascii_lowercase();
        match key.as_str() {
            "color" | "colors" | "colour" | "colours" => &self.colors,
            "size" | "sizes" => &self.sizes,
            _ => self.attributes.iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(&key))
                .map(|(_, v)| v.as_slice())
                .unwrap_or(&[]),
        }
    }

    /// Case-insensitive substring match on name, brand and categories.
    pub fn matches_text(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term)
            || self.brand.as_deref().is_some_and(|b| b.to_lowercase().contains(&term))
            || self.categories.iter().any(|c| c.to_lowercase().contains(&term))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_product_deserialize_defaults() {
        let p: Product = serde_json::from_str(r#"{"id":"p1","name":"Runner","price":59.5,"isBestseller":true}"#).unwrap();
        assert!(p.in_stock);
        assert!(p.is_bestseller);
        assert!(!p.has_discount());
    }
    #[test]
    fn test_attribute_lookup() {
        let mut p = Product::new("p1", "Tee", 20.0);
        p.colors = vec!["Red".into()];
        p.attributes.insert("Material".into(), vec!["Cotton".into()]);
        assert_eq!(p.attribute_values("Color"), ["Red".to_string()]);
        assert_eq!(p.attribute_values("material"), ["Cotton".to_string()]);
        assert!(p.attribute_values("Fit").is_empty());
    }
}
