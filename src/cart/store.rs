//! Key-value storage for guest carts and wishlists.
//!
//! A stored value is a JSON array of product ids, one entry per unit:
//! `["p-1","p-1","p-7"]`. Readers are lenient: numeric ids become strings,
//! other entries are skipped, and a value that is not an array reads as an
//! empty list.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tokio::sync::RwLock;
use crate::domain::aggregates::GuestList;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListKind { Cart, Wishlist }

impl ListKind {
    pub fn as_str(&self) -> &'static str {
        match self { Self::Cart => "cart", Self::Wishlist => "wishlist" }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StoreKey {
    pub kind: ListKind,
    pub session: String,
}

impl StoreKey {
    pub fn cart(session: impl Into<String>) -> Self { Self { kind: ListKind::Cart, session: session.into() } }
    pub fn wishlist(session: impl Into<String>) -> Self { Self { kind: ListKind::Wishlist, session: session.into() } }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}:{}", self.kind.as_str(), self.session) }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[async_trait]
pub trait CartStore: Send + Sync {
    /// A missing key is an empty list.
    async fn get(&self, key: &StoreKey) -> Result<GuestList, StoreError>;
    async fn set(&self, key: &StoreKey, list: &GuestList) -> Result<(), StoreError>;
}

pub fn encode_list(list: &GuestList) -> Result<String, StoreError> {
    Ok(serde_json::to_string(list.ids())?)
}

pub fn decode_list(raw: &str) -> GuestList {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => list_from_value(value),
        Err(e) => {
            tracing::warn!(error = %e, "discarding unreadable stored list");
            GuestList::default()
        }
    }
}

pub fn list_from_value(value: Value) -> GuestList {
    let Value::Array(items) = value else {
        tracing::warn!("discarding stored list that is not an array");
        return GuestList::default();
    };
    let ids = items.into_iter().filter_map(|item| match item {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }).collect();
    GuestList::from_ids(ids)
}

/// Process-local store holding the serialized text, like browser storage.
#[derive(Default)]
pub struct MemoryCartStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCartStore {
    pub fn new() -> Self { Self::default() }

    /// Writes raw text under a key, bypassing serialization.
    pub async fn put_raw(&self, key: &StoreKey, raw: impl Into<String>) {
        self.entries.write().await.insert(key.to_string(), raw.into());
    }
}

#[async_trait]
impl CartStore for MemoryCartStore {
    async fn get(&self, key: &StoreKey) -> Result<GuestList, StoreError> {
        Ok(self.entries.read().await.get(&key.to_string()).map(|raw| decode_list(raw)).unwrap_or_default())
    }

    async fn set(&self, key: &StoreKey, list: &GuestList) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        if list.is_empty() {
            entries.remove(&key.to_string());
        } else {
            entries.insert(key.to_string(), encode_list(list)?);
        }
        Ok(())
    }
}
