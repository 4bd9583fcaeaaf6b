//! Postgres-backed `CartStore`, used when `DATABASE_URL` is configured.

use async_trait::async_trait;
use sqlx::PgPool;
use crate::domain::aggregates::GuestList;
use super::store::{list_from_value, CartStore, StoreError, StoreKey};

#[derive(Clone)]
pub struct PgCartStore {
    db: PgPool,
}

impl PgCartStore {
    pub fn new(db: PgPool) -> Self { Self { db } }
}

#[async_trait]
impl CartStore for PgCartStore {
    async fn get(&self, key: &StoreKey) -> Result<GuestList, StoreError> {
        let row: Option<(serde_json::Value,)> = sqlx::query_as("SELECT product_ids FROM guest_lists WHERE kind = $1 AND session_id = $2")
            .bind(key.kind.as_str()).bind(&key.session)
            .fetch_optional(&self.db).await?;
        Ok(row.map(|(ids,)| list_from_value(ids)).unwrap_or_default())
    }

    async fn set(&self, key: &StoreKey, list: &GuestList) -> Result<(), StoreError> {
        if list.is_empty() {
            sqlx::query("DELETE FROM guest_lists WHERE kind = $1 AND session_id = $2")
                .bind(key.kind.as_str()).bind(&key.session)
                .execute(&self.db).await?;
            return Ok(());
        }
        sqlx::query("INSERT INTO guest_lists (kind, session_id, product_ids, updated_at) VALUES ($1, $2, $3, NOW()) ON CONFLICT (kind, session_id) DO UPDATE SET product_ids = EXCLUDED.product_ids, updated_at = NOW()")
            .bind(key.kind.as_str()).bind(&key.session).bind(serde_json::to_value(list.ids())?)
            .execute(&self.db).await?;
        Ok(())
    }
}
