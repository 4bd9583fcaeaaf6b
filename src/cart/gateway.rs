//! Cart and wishlist access that prefers the backend and falls back to the
//! guest store.
//!
//! The backend is used only when it is configured and the caller has a
//! token. A network failure is logged and the same operation is served from
//! the guest lists instead; not-found and unauthorized answers are returned
//! as they are. Nothing is retried.

use std::sync::Arc;
use crate::api::{ApiError, CartApi, CartView, WishlistApi, WishlistView};
use crate::domain::events::StorefrontEvent;
use super::service::GuestLists;

fn masked<T>(result: Result<T, ApiError>, operation: &'static str) -> Result<Option<T>, ApiError> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.is_network() => {
            tracing::warn!(operation, error = %e, "backend unreachable, using guest storage");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[derive(Clone)]
pub struct CartGateway {
    remote: Option<Arc<dyn CartApi>>,
    guest: GuestLists,
}

impl CartGateway {
    pub fn new(remote: Option<Arc<dyn CartApi>>, guest: GuestLists) -> Self { Self { remote, guest } }

    fn remote<'a>(&'a self, token: Option<&'a str>) -> Option<(&'a dyn CartApi, &'a str)> {
        Some((self.remote.as_deref()?, token?))
    }

    fn announce(&self, session: &str) {
        self.guest.events().publish(StorefrontEvent::cart_updated(session));
    }

    pub async fn view(&self, session: &str, token: Option<&str>) -> crate::Result<CartView> {
        if let Some((api, token)) = self.remote(token) {
            if let Some(view) = masked(api.view_cart(token).await, "view_cart")? { return Ok(view); }
        }
        Ok(CartView::guest(self.guest.cart(session).await?.lines()))
    }

    pub async fn add(&self, session: &str, token: Option<&str>, product_id: &str, quantity: u32) -> crate::Result<CartView> {
        if let Some((api, token)) = self.remote(token) {
            if let Some(view) = masked(api.add_to_cart(token, product_id, quantity).await, "add_to_cart")? {
                self.announce(session);
                return Ok(view);
            }
        }
        Ok(CartView::guest(self.guest.add_to_cart(session, product_id, quantity).await?.lines()))
    }

    pub async fn set_quantity(&self, session: &str, token: Option<&str>, product_id: &str, quantity: u32) -> crate::Result<CartView> {
        if let Some((api, token)) = self.remote(token) {
            if let Some(view) = masked(api.update_cart_item(token, product_id, quantity).await, "update_cart_item")? {
                self.announce(session);
                return Ok(view);
            }
        }
        Ok(CartView::guest(self.guest.set_cart_quantity(session, product_id, quantity).await?.lines()))
    }

    pub async fn remove(&self, session: &str, token: Option<&str>, product_id: &str) -> crate::Result<CartView> {
        if let Some((api, token)) = self.remote(token) {
            if let Some(view) = masked(api.remove_from_cart(token, product_id).await, "remove_from_cart")? {
                self.announce(session);
                return Ok(view);
            }
        }
        Ok(CartView::guest(self.guest.remove_from_cart(session, product_id).await?.lines()))
    }

    pub async fn clear(&self, session: &str, token: Option<&str>) -> crate::Result<()> {
        if let Some((api, token)) = self.remote(token) {
            if masked(api.clear_cart(token).await, "clear_cart")?.is_some() {
                self.announce(session);
                return Ok(());
            }
        }
        self.guest.clear_cart(session).await
    }
}

#[derive(Clone)]
pub struct WishlistGateway {
    remote: Option<Arc<dyn WishlistApi>>,
    guest: GuestLists,
}

impl WishlistGateway {
    pub fn new(remote: Option<Arc<dyn WishlistApi>>, guest: GuestLists) -> Self { Self { remote, guest } }

    fn remote<'a>(&'a self, token: Option<&'a str>) -> Option<(&'a dyn WishlistApi, &'a str)> {
        Some((self.remote.as_deref()?, token?))
    }

    fn announce(&self, session: &str) {
        self.guest.events().publish(StorefrontEvent::wishlist_updated(session));
    }

    pub async fn list(&self, session: &str, token: Option<&str>) -> crate::Result<WishlistView> {
        if let Some((api, token)) = self.remote(token) {
            if let Some(view) = masked(api.wishlist(token).await, "wishlist")? { return Ok(view); }
        }
        Ok(WishlistView::guest(self.guest.wishlist(session).await?.into_ids()))
    }

    pub async fn add(&self, session: &str, token: Option<&str>, product_id: &str) -> crate::Result<WishlistView> {
        if let Some((api, token)) = self.remote(token) {
            if let Some(view) = masked(api.add_to_wishlist(token, product_id).await, "add_to_wishlist")? {
                self.announce(session);
                return Ok(view);
            }
        }
        Ok(WishlistView::guest(self.guest.add_to_wishlist(session, product_id).await?.into_ids()))
    }

    pub async fn remove(&self, session: &str, token: Option<&str>, product_id: &str) -> crate::Result<WishlistView> {
        if let Some((api, token)) = self.remote(token) {
            if let Some(view) = masked(api.remove_from_wishlist(token, product_id).await, "remove_from_wishlist")? {
                self.announce(session);
                return Ok(view);
            }
        }
        Ok(WishlistView::guest(self.guest.remove_from_wishlist(session, product_id).await?.into_ids()))
    }
}
