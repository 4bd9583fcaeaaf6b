//! OpenSASE Storefront
//!
//! Customer-facing shop layer for the OpenSASE e-commerce backend.
//!
//! ## Features
//! - Product filter state with a shareable URL form
//! - Client-side facet filtering, sorting and pagination
//! - Guest carts and wishlists with backend fallback
//! - Category tree browsing
//! - Typed client for the commerce backend

pub mod api;
pub mod cart;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod domain;
pub mod http;

use thiserror::Error;

pub use catalog::{LocalCatalog, ShopResults};
pub use config::Config;
pub use domain::aggregates::{FacetChange, FilterState, Product};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Catalog unreadable: {0}")]
    CatalogIo(#[from] std::io::Error),

    #[error("Catalog malformed: {0}")]
    CatalogFormat(#[from] serde_json::Error),

    #[error(transparent)]
    GuestList(#[from] domain::aggregates::GuestListError),

    #[error(transparent)]
    Api(#[from] api::ApiError),

    #[error(transparent)]
    Store(#[from] cart::StoreError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
