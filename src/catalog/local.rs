//! In-memory catalog used when no search backend is configured.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::Path;
use crate::api::{ApiError, CatalogApi};
use crate::domain::aggregates::{CategoryNode, FilterState, Product, MAX_CATEGORY_DEPTH};
use crate::domain::value_objects::SortOption;
use super::{search, ShopResults};

const SAMPLE_CATALOG: &str = include_str!("../../data/catalog.json");

#[derive(Clone, Debug, Default)]
pub struct LocalCatalog {
    products: Vec<Product>,
}

impl LocalCatalog {
    pub fn new(products: Vec<Product>) -> Self { Self { products } }

    /// The bundled sample catalog.
    pub fn sample() -> crate::Result<Self> {
        Ok(Self::new(serde_json::from_str(SAMPLE_CATALOG)?))
    }

    pub async fn from_path(path: impl AsRef<Path>) -> crate::Result<Self> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        let products: Vec<Product> = serde_json::from_str(&raw)?;
        tracing::info!(path = %path.as_ref().display(), products = products.len(), "catalog loaded");
        Ok(Self::new(products))
    }

    pub fn products(&self) -> &[Product] { &self.products }
    pub fn find(&self, id: &str) -> Option<&Product> { self.products.iter().find(|p| p.id == id) }

    pub fn category_tree(&self) -> Vec<CategoryNode> {
        CategoryNode::from_paths(self.products.iter().flat_map(|p| p.categories.iter().map(String::as_str)), MAX_CATEGORY_DEPTH)
    }

    pub fn brand_names(&self) -> Vec<String> {
        self.products.iter().filter_map(|p| p.brand.clone()).collect::<BTreeSet<_>>().into_iter().collect()
    }
}

#[async_trait]
impl CatalogApi for LocalCatalog {
    async fn search(&self, filters: &FilterState, sort: SortOption, page_size: usize) -> Result<ShopResults, ApiError> {
        Ok(search(&self.products, filters, sort, page_size))
    }

    async fn categories(&self) -> Result<Vec<CategoryNode>, ApiError> {
        Ok(self.category_tree())
    }

    async fn brands(&self) -> Result<Vec<String>, ApiError> {
        Ok(self.brand_names())
    }
}
