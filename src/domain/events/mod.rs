//! Storefront events
//!
//! `EventBus` is handed to whoever mutates guest carts and to whoever needs
//! to refresh when they change. Subscribers reload state themselves; events
//! only say which session changed.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 256;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StorefrontEvent {
    #[serde(rename_all = "camelCase")]
    CartUpdated { session_id: String, at: DateTime<Utc> },
    #[serde(rename_all = "camelCase")]
    WishlistUpdated { session_id: String, at: DateTime<Utc> },
}

impl StorefrontEvent {
    pub fn cart_updated(session_id: impl Into<String>) -> Self {
        Self::CartUpdated { session_id: session_id.into(), at: Utc::now() }
    }
    pub fn wishlist_updated(session_id: impl Into<String>) -> Self {
        Self::WishlistUpdated { session_id: session_id.into(), at: Utc::now() }
    }
    pub fn session_id(&self) -> &str {
        match self { Self::CartUpdated { session_id, .. } | Self::WishlistUpdated { session_id, .. } => session_id }
    }
    /// Name used on the wire (SSE event name, NATS subject suffix).
    pub fn name(&self) -> &'static str {
        match self { Self::CartUpdated { .. } => "cartUpdated", Self::WishlistUpdated { .. } => "wishlistUpdated" }
    }
}

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StorefrontEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Publishing with nobody listening is not an error.
    pub fn publish(&self, event: StorefrontEvent) {
        let delivered = self.sender.send(event).unwrap_or(0);
        tracing::debug!(delivered, "storefront event published");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StorefrontEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self { Self::new() }
}
