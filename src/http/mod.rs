//! HTTP surface of the storefront.

mod lists;
mod orders;
mod shop;

use axum::{http::{header, HeaderMap, StatusCode}, routing::{delete, get, post, put}, Json, Router};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use crate::api::{ApiError, CatalogApi, OrderApi};
use crate::cart::{CartGateway, CartStore, GuestLists, WishlistGateway};
use crate::catalog::LocalCatalog;
use crate::domain::aggregates::GuestListError;
use crate::domain::events::EventBus;
use crate::StorefrontError;

const MAX_SESSION_LEN: usize = 128;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogApi>,
    pub carts: CartGateway,
    pub wishlists: WishlistGateway,
    pub orders: Option<Arc<dyn OrderApi>>,
    pub events: EventBus,
    pub page_size: usize,
    pub shutdown: CancellationToken,
}

impl AppState {
    /// State for a storefront with no backend: local catalog, guest lists only.
    pub fn local(catalog: LocalCatalog, store: Arc<dyn CartStore>, page_size: usize) -> Self {
        let events = EventBus::new();
        let guest = GuestLists::new(store, events.clone());
        Self {
            catalog: Arc::new(catalog),
            carts: CartGateway::new(None, guest.clone()),
            wishlists: WishlistGateway::new(None, guest),
            orders: None,
            events,
            page_size,
            shutdown: CancellationToken::new(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "opensase-storefront"})) }))
        .route("/api/v1/shop", get(shop::search))
        .route("/api/v1/categories", get(shop::categories))
        .route("/api/v1/categories/rows", get(shop::category_rows))
        .route("/api/v1/landing", get(shop::landing))
        .route("/api/v1/sessions", post(lists::new_session))
        .route("/api/v1/cart/:session", get(lists::view).post(lists::add).delete(lists::clear))
        .route("/api/v1/cart/:session/items/:product_id", put(lists::set_quantity).delete(lists::remove))
        .route("/api/v1/cart/:session/events", get(lists::events))
        .route("/api/v1/wishlist/:session", get(lists::wishlist).post(lists::add_to_wishlist))
        .route("/api/v1/wishlist/:session/items/:product_id", delete(lists::remove_from_wishlist))
        .route("/api/v1/orders/:id/track", get(orders::track))
        .layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()).with_state(state)
}

/// Token from an `Authorization: Bearer …` header.
fn bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").or_else(|| value.strip_prefix("bearer "))?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn check_session(session: &str) -> Result<(), (StatusCode, String)> {
    if session.trim().is_empty() || session.len() > MAX_SESSION_LEN {
        return Err((StatusCode::BAD_REQUEST, "Invalid session".to_string()));
    }
    Ok(())
}

fn error_response(e: StorefrontError) -> (StatusCode, String) {
    let status = match &e {
        StorefrontError::GuestList(GuestListError::ItemNotFound) | StorefrontError::Api(ApiError::NotFound) => StatusCode::NOT_FOUND,
        StorefrontError::Api(ApiError::Unauthorized) => StatusCode::UNAUTHORIZED,
        StorefrontError::Api(ApiError::Invalid(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        StorefrontError::Api(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() { tracing::error!(error = %e, "request failed"); }
    (status, e.to_string())
}
