//! Shop listing, category and landing handlers.

use axum::{extract::{RawQuery, State}, http::StatusCode, Json};
use serde::Serialize;
use url::form_urlencoded;
use crate::api::{load_landing, Landing};
use crate::catalog::ShopResults;
use crate::codec;
use crate::domain::aggregates::{visible_rows, CategoryNode, CategoryRow, ExpandedPaths, FilterState};
use crate::domain::value_objects::SortOption;
use super::AppState;

const SHOP_PATH: &str = "/shop";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopResponse {
    pub filters: FilterState,
    pub sort: SortOption,
    /// Canonical query for the filters actually applied.
    pub query: String,
    /// Location to swap into the address bar.
    pub href: String,
    pub results: ShopResults,
}

fn param(query: &str, name: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes()).find(|(k, _)| k == name).map(|(_, v)| v.into_owned())
}

pub async fn search(State(s): State<AppState>, RawQuery(query): RawQuery) -> Result<Json<ShopResponse>, (StatusCode, String)> {
    let query = query.unwrap_or_default();
    let filters = codec::decode(&query);
    let sort = param(&query, "sort").map(|v| SortOption::parse(&v)).unwrap_or_default();
    let results = s.catalog.search(&filters, sort, s.page_size).await.map_err(|e| (StatusCode::BAD_GATEWAY, e.to_string()))?;
    let filters = filters.with_page(results.page());
    Ok(Json(ShopResponse { query: codec::encode(&filters), href: codec::href(SHOP_PATH, &filters), filters, sort, results }))
}

pub async fn categories(State(s): State<AppState>) -> Result<Json<Vec<CategoryNode>>, (StatusCode, String)> {
    s.catalog.categories().await.map(Json).map_err(|e| (StatusCode::BAD_GATEWAY, e.to_string()))
}

/// Flattened sidebar rows; `expanded` lists the open paths, comma-separated.
pub async fn category_rows(State(s): State<AppState>, RawQuery(query): RawQuery) -> Result<Json<Vec<CategoryRow>>, (StatusCode, String)> {
    let tree = s.catalog.categories().await.map_err(|e| (StatusCode::BAD_GATEWAY, e.to_string()))?;
    let expanded = param(&query.unwrap_or_default(), "expanded").unwrap_or_default()
        .split(',').map(str::trim).filter(|p| !p.is_empty())
        .fold(ExpandedPaths::default(), |acc, path| acc.toggle(path));
    Ok(Json(visible_rows(&tree, &expanded)))
}

pub async fn landing(State(s): State<AppState>) -> Result<Json<Landing>, (StatusCode, String)> {
    load_landing(s.catalog.as_ref(), s.page_size, &s.shutdown.child_token()).await
        .map(Json)
        .ok_or((StatusCode::SERVICE_UNAVAILABLE, "Shutting down".to_string()))
}
