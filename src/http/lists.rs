//! Cart and wishlist handlers.

use axum::{extract::{Path, State}, http::{HeaderMap, StatusCode}, response::sse::{Event, KeepAlive, Sse}, Json};
use futures::stream::{self, Stream};
use serde::Deserialize;
use std::convert::Infallible;
use tokio::sync::broadcast::error::RecvError;
use validator::Validate;
use crate::api::{CartView, WishlistView};
use crate::domain::events::StorefrontEvent;
use super::{bearer, check_session, error_response, AppState};

fn default_quantity() -> u32 { 1 }

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    #[validate(length(min = 1, max = 64))]
    pub product_id: String,
    #[serde(default = "default_quantity")]
    #[validate(range(min = 1, max = 99))]
    pub quantity: u32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SetQuantityRequest {
    #[validate(range(max = 99))]
    pub quantity: u32,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItemRequest {
    #[validate(length(min = 1, max = 64))]
    pub product_id: String,
}

/// Fresh guest session id. Time-ordered so stores keyed on it stay clustered.
pub async fn new_session() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::CREATED, Json(serde_json::json!({ "sessionId": uuid::Uuid::now_v7().to_string() })))
}

fn invalid(e: validator::ValidationErrors) -> (StatusCode, String) { (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()) }

pub async fn view(State(s): State<AppState>, Path(session): Path<String>, headers: HeaderMap) -> Result<Json<CartView>, (StatusCode, String)> {
    check_session(&session)?;
    s.carts.view(&session, bearer(&headers).as_deref()).await.map(Json).map_err(error_response)
}

pub async fn add(State(s): State<AppState>, Path(session): Path<String>, headers: HeaderMap, Json(r): Json<AddItemRequest>) -> Result<(StatusCode, Json<CartView>), (StatusCode, String)> {
    check_session(&session)?;
    r.validate().map_err(invalid)?;
    let view = s.carts.add(&session, bearer(&headers).as_deref(), r.product_id.trim(), r.quantity).await.map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn set_quantity(State(s): State<AppState>, Path((session, product_id)): Path<(String, String)>, headers: HeaderMap, Json(r): Json<SetQuantityRequest>) -> Result<Json<CartView>, (StatusCode, String)> {
    check_session(&session)?;
    r.validate().map_err(invalid)?;
    s.carts.set_quantity(&session, bearer(&headers).as_deref(), &product_id, r.quantity).await.map(Json).map_err(error_response)
}

pub async fn remove(State(s): State<AppState>, Path((session, product_id)): Path<(String, String)>, headers: HeaderMap) -> Result<Json<CartView>, (StatusCode, String)> {
    check_session(&session)?;
    s.carts.remove(&session, bearer(&headers).as_deref(), &product_id).await.map(Json).map_err(error_response)
}

pub async fn clear(State(s): State<AppState>, Path(session): Path<String>, headers: HeaderMap) -> Result<StatusCode, (StatusCode, String)> {
    check_session(&session)?;
    s.carts.clear(&session, bearer(&headers).as_deref()).await.map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Server-sent `cartUpdated` notifications for one session. Clients reload
/// the cart when one arrives; wishlist changes are not sent here.
pub async fn events(State(s): State<AppState>, Path(session): Path<String>) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, (StatusCode, String)> {
    check_session(&session)?;
    let rx = s.events.subscribe();
    let shutdown = s.shutdown.clone();
    let stream = stream::unfold((rx, session, shutdown), |(mut rx, session, shutdown)| async move {
        loop {
            let received = tokio::select! {
                _ = shutdown.cancelled() => return None,
                r = rx.recv() => r,
            };
            match received {
                Ok(event @ StorefrontEvent::CartUpdated { .. }) if event.session_id() == session => {
                    let data = serde_json::to_string(&event).unwrap_or_default();
                    let sse = Event::default().event(event.name()).data(data);
                    return Some((Ok(sse), (rx, session, shutdown)));
                }
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "cart event subscriber lagged");
                    continue;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

pub async fn wishlist(State(s): State<AppState>, Path(session): Path<String>, headers: HeaderMap) -> Result<Json<WishlistView>, (StatusCode, String)> {
    check_session(&session)?;
    s.wishlists.list(&session, bearer(&headers).as_deref()).await.map(Json).map_err(error_response)
}

pub async fn add_to_wishlist(State(s): State<AppState>, Path(session): Path<String>, headers: HeaderMap, Json(r): Json<WishlistItemRequest>) -> Result<(StatusCode, Json<WishlistView>), (StatusCode, String)> {
    check_session(&session)?;
    r.validate().map_err(invalid)?;
    let view = s.wishlists.add(&session, bearer(&headers).as_deref(), r.product_id.trim()).await.map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn remove_from_wishlist(State(s): State<AppState>, Path((session, product_id)): Path<(String, String)>, headers: HeaderMap) -> Result<Json<WishlistView>, (StatusCode, String)> {
    check_session(&session)?;
    s.wishlists.remove(&session, bearer(&headers).as_deref(), &product_id).await.map(Json).map_err(error_response)
}
