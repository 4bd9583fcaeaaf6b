//! `reqwest` implementation of the backend traits.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use url::{form_urlencoded, Url};
use validator::Validate;
use crate::catalog::{Page, ShopResults};
use crate::codec;
use crate::domain::aggregates::{CategoryNode, FilterState, Product, MAX_CATEGORY_DEPTH};
use crate::domain::value_objects::SortOption;
use super::{ApiError, CartApi, CartView, CatalogApi, OrderApi, OrderSummary, ReturnRequest, ReturnTicket, WishlistApi, WishlistView};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(ApiError::Endpoint(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, base })
    }

    /// Base URL plus percent-encoded path segments.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Search endpoint carrying the filters in their URL form plus sort and limit.
    pub fn search_url(&self, filters: &FilterState, sort: SortOption, page_size: usize) -> Url {
        let mut url = self.endpoint(&["products", "search"]);
        let extra = form_urlencoded::Serializer::new(String::new())
            .append_pair("sort", sort.as_str())
            .append_pair("limit", &page_size.to_string())
            .finish();
        let filters = codec::encode(filters);
        let query = if filters.is_empty() { extra } else { format!("{}&{}", filters, extra) };
        url.set_query(Some(&query));
        url
    }

    fn request(&self, method: Method, url: Url, token: Option<&str>) -> RequestBuilder {
        let req = self.client.request(method, url);
        match token { Some(t) => req.bearer_auth(t), None => req }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send_raw(req).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn send_raw(&self, req: RequestBuilder) -> Result<String, ApiError> {
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "backend request failed");
            return Err(ApiError::from_status(status.as_u16(), error_message(&body)));
        }
        Ok(body)
    }
}

/// Pulls `message` or `error` out of a JSON error body, else the body itself.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body).ok()
        .and_then(|v| ["message", "error"].iter().find_map(|k| v.get(*k).and_then(|m| m.as_str()).map(str::to_string)))
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl CatalogApi for HttpBackend {
    async fn search(&self, filters: &FilterState, sort: SortOption, page_size: usize) -> Result<ShopResults, ApiError> {
        let url = self.search_url(filters, sort, page_size);
        let page: Page<Product> = self.send(self.request(Method::GET, url, None)).await?;
        Ok(ShopResults::from_page(page))
    }

    async fn categories(&self) -> Result<Vec<CategoryNode>, ApiError> {
        let nodes: Vec<CategoryNode> = self.send(self.request(Method::GET, self.endpoint(&["categories"]), None)).await?;
        Ok(nodes.into_iter().map(|n| n.prune(MAX_CATEGORY_DEPTH)).collect())
    }

    async fn brands(&self) -> Result<Vec<String>, ApiError> {
        self.send(self.request(Method::GET, self.endpoint(&["brands"]), None)).await
    }
}

#[async_trait]
impl CartApi for HttpBackend {
    async fn view_cart(&self, token: &str) -> Result<CartView, ApiError> {
        self.send(self.request(Method::GET, self.endpoint(&["cart"]), Some(token))).await
    }

    async fn add_to_cart(&self, token: &str, product_id: &str, quantity: u32) -> Result<CartView, ApiError> {
        let req = self.request(Method::POST, self.endpoint(&["cart", "items"]), Some(token))
            .json(&json!({ "productId": product_id, "quantity": quantity }));
        self.send(req).await
    }

    async fn update_cart_item(&self, token: &str, product_id: &str, quantity: u32) -> Result<CartView, ApiError> {
        let req = self.request(Method::PUT, self.endpoint(&["cart", "items", product_id]), Some(token))
            .json(&json!({ "quantity": quantity }));
        self.send(req).await
    }

    async fn remove_from_cart(&self, token: &str, product_id: &str) -> Result<CartView, ApiError> {
        self.send(self.request(Method::DELETE, self.endpoint(&["cart", "items", product_id]), Some(token))).await
    }

    async fn clear_cart(&self, token: &str) -> Result<(), ApiError> {
        self.send_raw(self.request(Method::DELETE, self.endpoint(&["cart"]), Some(token))).await.map(|_| ())
    }
}

#[async_trait]
impl WishlistApi for HttpBackend {
    async fn wishlist(&self, token: &str) -> Result<WishlistView, ApiError> {
        self.send(self.request(Method::GET, self.endpoint(&["wishlist"]), Some(token))).await
    }

    async fn add_to_wishlist(&self, token: &str, product_id: &str) -> Result<WishlistView, ApiError> {
        let req = self.request(Method::POST, self.endpoint(&["wishlist"]), Some(token))
            .json(&json!({ "productId": product_id }));
        self.send(req).await
    }

    async fn remove_from_wishlist(&self, token: &str, product_id: &str) -> Result<WishlistView, ApiError> {
        self.send(self.request(Method::DELETE, self.endpoint(&["wishlist", product_id]), Some(token))).await
    }
}

#[async_trait]
impl OrderApi for HttpBackend {
    async fn track_order(&self, token: &str, order_id: &str) -> Result<OrderSummary, ApiError> {
        self.send(self.request(Method::GET, self.endpoint(&["orders", order_id, "track"]), Some(token))).await
    }

    async fn submit_return(&self, token: &str, request: &ReturnRequest) -> Result<ReturnTicket, ApiError> {
        request.validate()?;
        self.send(self.request(Method::POST, self.endpoint(&["returns"]), Some(token)).json(request)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_encodes_segments() {
        let backend = HttpBackend::new("https://shop.example.com/api/v1").unwrap();
        assert_eq!(backend.endpoint(&["cart", "items", "p 1/2"]).as_str(), "https://shop.example.com/api/v1/cart/items/p%201%2F2");
        assert_eq!(backend.endpoint(&["brands"]).as_str(), "https://shop.example.com/api/v1/brands");
    }

    #[test]
    fn test_search_url_carries_filters() {
        let backend = HttpBackend::new("https://shop.example.com/api/").unwrap();
        let filters = FilterState::default().with_brands(["Acme"]).with_page(2);
        let url = backend.search_url(&filters, SortOption::Newest, 12);
        assert_eq!(url.path(), "/api/products/search");
        assert_eq!(url.query(), Some("brands=Acme&page=2&sort=newest&limit=12"));
        let plain = backend.search_url(&FilterState::default(), SortOption::Relevance, 12);
        assert_eq!(plain.query(), Some("sort=relevance&limit=12"));
    }

    #[test]
    fn test_rejects_non_base_url() {
        assert!(matches!(HttpBackend::new("mailto:shop@example.com"), Err(ApiError::Endpoint(_))));
        assert!(HttpBackend::new("not a url").is_err());
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(r#"{"message":"Out of stock"}"#), "Out of stock");
        assert_eq!(error_message(r#"{"error":"Invalid token"}"#), "Invalid token");
        assert_eq!(error_message(" upstream timeout \n"), "upstream timeout");
    }

    #[tokio::test]
    async fn test_invalid_return_is_rejected_before_sending() {
        let backend = HttpBackend::new("http://127.0.0.1:9/").unwrap();
        let request = ReturnRequest { order_id: String::new(), product_id: "p".into(), quantity: 1, reason: "Broken".into() };
        assert!(matches!(backend.submit_return("tok", &request).await, Err(ApiError::Invalid(_))));
    }
}
