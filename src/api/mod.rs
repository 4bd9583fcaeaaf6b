//! Client layer for the commerce backend.
//!
//! The backend owns products, carts, orders and returns. This module only
//! describes the calls the storefront makes (one trait per area) and the
//! shapes it expects back. `HttpBackend` implements every trait over HTTP;
//! `LocalCatalog` implements `CatalogApi` for deployments without search.

pub mod dto;
pub mod http;
pub mod landing;
pub mod orders;

pub use dto::{CartLine, CartView, ListSource, OrderSummary, ReturnRequest, ReturnTicket, WishlistView};
pub use http::HttpBackend;
pub use landing::{load_landing, Landing, Section};
pub use orders::{lookup_order, submit_return, OrderLookup};

use async_trait::async_trait;
use thiserror::Error;
use crate::catalog::ShopResults;
use crate::domain::aggregates::{CategoryNode, FilterState};
use crate::domain::value_objects::SortOption;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found")]
    NotFound,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("Invalid request: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

impl ApiError {
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            404 => Self::NotFound,
            401 | 403 => Self::Unauthorized,
            _ => Self::Status { status, message: message.into() },
        }
    }

    /// Transport failures, the only errors the guest fallback masks.
    pub fn is_network(&self) -> bool { matches!(self, Self::Network(_)) }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => Self::from_status(status.as_u16(), e.to_string()),
            None => Self::Network(e.to_string()),
        }
    }
}

#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn search(&self, filters: &FilterState, sort: SortOption, page_size: usize) -> Result<ShopResults, ApiError>;
    async fn categories(&self) -> Result<Vec<CategoryNode>, ApiError>;
    async fn brands(&self) -> Result<Vec<String>, ApiError>;
}

#[async_trait]
pub trait CartApi: Send + Sync {
    async fn view_cart(&self, token: &str) -> Result<CartView, ApiError>;
    async fn add_to_cart(&self, token: &str, product_id: &str, quantity: u32) -> Result<CartView, ApiError>;
    async fn update_cart_item(&self, token: &str, product_id: &str, quantity: u32) -> Result<CartView, ApiError>;
    async fn remove_from_cart(&self, token: &str, product_id: &str) -> Result<CartView, ApiError>;
    async fn clear_cart(&self, token: &str) -> Result<(), ApiError>;
}

#[async_trait]
pub trait WishlistApi: Send + Sync {
    async fn wishlist(&self, token: &str) -> Result<WishlistView, ApiError>;
    async fn add_to_wishlist(&self, token: &str, product_id: &str) -> Result<WishlistView, ApiError>;
    async fn remove_from_wishlist(&self, token: &str, product_id: &str) -> Result<WishlistView, ApiError>;
}

#[async_trait]
pub trait OrderApi: Send + Sync {
    async fn track_order(&self, token: &str, order_id: &str) -> Result<OrderSummary, ApiError>;
    async fn submit_return(&self, token: &str, request: &ReturnRequest) -> Result<ReturnTicket, ApiError>;
}
