//! Order tracking handler.

use axum::{extract::{Path, State}, http::{HeaderMap, StatusCode}, Json};
use crate::api::{lookup_order, OrderLookup};
use super::{bearer, error_response, AppState};

pub async fn track(State(s): State<AppState>, Path(id): Path<String>, headers: HeaderMap) -> Result<(StatusCode, Json<OrderLookup>), (StatusCode, String)> {
    let api = s.orders.as_deref().ok_or((StatusCode::SERVICE_UNAVAILABLE, "Order tracking needs a backend".to_string()))?;
    let lookup = lookup_order(api, &id, bearer(&headers).as_deref()).await.map_err(|e| error_response(e.into()))?;
    let status = match lookup {
        OrderLookup::Found(_) => StatusCode::OK,
        OrderLookup::NotFound => StatusCode::NOT_FOUND,
        OrderLookup::LoginRequired => StatusCode::UNAUTHORIZED,
    };
    Ok((status, Json(lookup)))
}
