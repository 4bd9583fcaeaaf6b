//! Guest cart and wishlist operations over a `CartStore`.
//!
//! Each mutation is a read-modify-write of the whole list followed by an
//! event on the bus. There is no locking: concurrent writers to the same
//! session race and the last write wins.

use std::sync::Arc;
use crate::domain::aggregates::GuestList;
use crate::domain::events::{EventBus, StorefrontEvent};
use super::store::{CartStore, StoreKey};

#[derive(Clone)]
pub struct GuestLists {
    store: Arc<dyn CartStore>,
    events: EventBus,
}

impl GuestLists {
    pub fn new(store: Arc<dyn CartStore>, events: EventBus) -> Self { Self { store, events } }

    pub fn events(&self) -> &EventBus { &self.events }

    pub async fn cart(&self, session: &str) -> crate::Result<GuestList> {
        Ok(self.store.get(&StoreKey::cart(session)).await?)
    }

    pub async fn add_to_cart(&self, session: &str, product_id: &str, quantity: u32) -> crate::Result<GuestList> {
        self.update_cart(session, |list| { list.add(product_id, quantity); Ok(()) }).await
    }

    pub async fn set_cart_quantity(&self, session: &str, product_id: &str, quantity: u32) -> crate::Result<GuestList> {
        self.update_cart(session, |list| list.set_quantity(product_id, quantity)).await
    }

    pub async fn remove_from_cart(&self, session: &str, product_id: &str) -> crate::Result<GuestList> {
        self.update_cart(session, |list| list.remove(product_id)).await
    }

    pub async fn clear_cart(&self, session: &str) -> crate::Result<()> {
        self.update_cart(session, |list| { list.clear(); Ok(()) }).await.map(|_| ())
    }

    pub async fn wishlist(&self, session: &str) -> crate::Result<GuestList> {
        Ok(self.store.get(&StoreKey::wishlist(session)).await?)
    }

    pub async fn add_to_wishlist(&self, session: &str, product_id: &str) -> crate::Result<GuestList> {
        let key = StoreKey::wishlist(session);
        let mut list = self.store.get(&key).await?;
        if list.add_unique(product_id) {
            self.store.set(&key, &list).await?;
            self.events.publish(StorefrontEvent::wishlist_updated(session));
        }
        Ok(list)
    }

    pub async fn remove_from_wishlist(&self, session: &str, product_id: &str) -> crate::Result<GuestList> {
        let key = StoreKey::wishlist(session);
        let mut list = self.store.get(&key).await?;
        list.remove(product_id)?;
        self.store.set(&key, &list).await?;
        self.events.publish(StorefrontEvent::wishlist_updated(session));
        Ok(list)
    }

    async fn update_cart<F>(&self, session: &str, change: F) -> crate::Result<GuestList>
    where
        F: FnOnce(&mut GuestList) -> Result<(), crate::domain::aggregates::GuestListError>,
    {
        let key = StoreKey::cart(session);
        let mut list = self.store.get(&key).await?;
        change(&mut list)?;
        self.store.set(&key, &list).await?;
        tracing::debug!(session, units = list.total_units(), "guest cart updated");
        self.events.publish(StorefrontEvent::cart_updated(session));
        Ok(list)
    }
}
