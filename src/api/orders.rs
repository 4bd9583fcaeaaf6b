//! Order tracking and returns.

use serde::Serialize;
use validator::Validate;
use super::{ApiError, OrderApi, OrderSummary, ReturnRequest, ReturnTicket};

/// What the order page should show. Missing and forbidden orders get their
/// own states so the page can offer "go back" or a login link.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OrderLookup {
    Found(OrderSummary),
    NotFound,
    LoginRequired,
}

pub async fn lookup_order(api: &dyn OrderApi, order_id: &str, token: Option<&str>) -> Result<OrderLookup, ApiError> {
    let Some(token) = token else { return Ok(OrderLookup::LoginRequired) };
    if order_id.trim().is_empty() { return Ok(OrderLookup::NotFound); }
    match api.track_order(token, order_id.trim()).await {
        Ok(order) => Ok(OrderLookup::Found(order)),
        Err(ApiError::NotFound) => Ok(OrderLookup::NotFound),
        Err(ApiError::Unauthorized) => Ok(OrderLookup::LoginRequired),
        Err(e) => Err(e),
    }
}

/// Validates locally, then submits.
pub async fn submit_return(api: &dyn OrderApi, token: &str, request: &ReturnRequest) -> Result<ReturnTicket, ApiError> {
    request.validate()?;
    api.submit_return(token, request).await
}
