use axum::{body::Body, http::{Method, Request, StatusCode}, Router};
use opensase_storefront::cart::MemoryCartStore;
use opensase_storefront::http::{router, AppState};
use opensase_storefront::LocalCatalog;
use serde_json::{json, Value};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn app(page_size: usize) -> Router {
    let catalog = LocalCatalog::sample().unwrap();
    router(AppState::local(catalog, Arc::new(MemoryCartStore::new()), page_size))
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let res = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn ids(results: &Value) -> Vec<String> {
    results["items"].as_array().unwrap().iter().map(|p| p["id"].as_str().unwrap().to_string()).collect()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = call(&app(12), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_shop_applies_query_filters() {
    let app = app(12);
    let uri = "/api/v1/shop?minPrice=20&maxPrice=80&categories=Electronics,Fashion&rating=4&sort=price-low-high";
    let (status, body) = call(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"]["status"], "matches");
    assert_eq!(ids(&body["results"]), vec!["p-1003", "p-2003", "p-2002", "p-1004", "p-1005"]);
    assert_eq!(body["sort"], "price-low-high");
    assert_eq!(body["filters"]["rating"], 4);
    assert!(body["href"].as_str().unwrap().starts_with("/shop?"));
}

#[tokio::test]
async fn test_shop_sentinels_mean_no_filter() {
    let app = app(100);
    let (_, body) = call(&app, Method::GET, "/api/v1/shop?categories=undefined&minPrice=null&brands=", None).await;
    assert_eq!(body["results"]["total"], 16);
    assert_eq!(body["query"], "");
    assert_eq!(body["href"], "/shop");
}

#[tokio::test]
async fn test_shop_no_matches() {
    let (status, body) = call(&app(12), Method::GET, "/api/v1/shop?search=submarine", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], json!({"status": "no_matches"}));
}

#[tokio::test]
async fn test_shop_clamps_page_past_end() {
    let app = app(2);
    let uri = "/api/v1/shop?minPrice=20&maxPrice=80&categories=Electronics,Fashion&rating=4&sort=price-low-high&page=9";
    let (_, body) = call(&app, Method::GET, uri, None).await;
    assert_eq!(body["results"]["page"], 3);
    assert_eq!(body["results"]["totalPages"], 3);
    assert_eq!(ids(&body["results"]), vec!["p-1005"]);
    assert_eq!(body["filters"]["page"], 3);
    assert!(body["query"].as_str().unwrap().ends_with("page=3"));
}

#[tokio::test]
async fn test_category_rows_follow_expanded_paths() {
    let app = app(12);
    let (_, collapsed) = call(&app, Method::GET, "/api/v1/categories/rows", None).await;
    let names: Vec<&str> = collapsed.as_array().unwrap().iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Electronics", "Fashion", "Home", "Sports"]);

    let (_, open) = call(&app, Method::GET, "/api/v1/categories/rows?expanded=Fashion", None).await;
    let names: Vec<&str> = open.as_array().unwrap().iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Electronics", "Fashion", "Bags", "Clothing", "Shoes", "Home", "Sports"]);
}

#[tokio::test]
async fn test_landing_sections_load() {
    let (status, body) = call(&app(4), Method::GET, "/api/v1/landing", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["featured"]["state"], "loaded");
    assert_eq!(body["brands"]["state"], "loaded");
}

#[tokio::test]
async fn test_guest_cart_lifecycle() {
    let app = app(12);
    let (status, cart) = call(&app, Method::POST, "/api/v1/cart/s1", Some(json!({"productId": "p-1001", "quantity": 2}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(cart["source"], "guest");
    assert_eq!(cart["totalItems"], 2);

    call(&app, Method::POST, "/api/v1/cart/s1", Some(json!({"productId": "p-2003"}))).await;
    let (status, cart) = call(&app, Method::PUT, "/api/v1/cart/s1/items/p-1001", Some(json!({"quantity": 5}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["totalItems"], 6);
    assert_eq!(cart["lines"][0]["productId"], "p-1001");

    let (_, cart) = call(&app, Method::DELETE, "/api/v1/cart/s1/items/p-1001", None).await;
    assert_eq!(cart["lines"].as_array().unwrap().len(), 1);

    let (status, _) = call(&app, Method::PUT, "/api/v1/cart/s1/items/p-9999", Some(json!({"quantity": 1}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, Method::DELETE, "/api/v1/cart/s1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, cart) = call(&app, Method::GET, "/api/v1/cart/s1", None).await;
    assert_eq!(cart["totalItems"], 0);
}

#[tokio::test]
async fn test_cart_sessions_are_isolated() {
    let app = app(12);
    call(&app, Method::POST, "/api/v1/cart/a", Some(json!({"productId": "p-1001"}))).await;
    let (_, other) = call(&app, Method::GET, "/api/v1/cart/b", None).await;
    assert_eq!(other["lines"], json!([]));
}

#[tokio::test]
async fn test_cart_rejects_bad_quantity() {
    let (status, _) = call(&app(12), Method::POST, "/api/v1/cart/s1", Some(json!({"productId": "p-1001", "quantity": 0}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_wishlist_is_a_set() {
    let app = app(12);
    call(&app, Method::POST, "/api/v1/wishlist/s1", Some(json!({"productId": "p-3001"}))).await;
    let (status, list) = call(&app, Method::POST, "/api/v1/wishlist/s1", Some(json!({"productId": "p-3001"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(list["productIds"], json!(["p-3001"]));

    let (_, list) = call(&app, Method::DELETE, "/api/v1/wishlist/s1/items/p-3001", None).await;
    assert_eq!(list["productIds"], json!([]));
}

#[tokio::test]
async fn test_new_session_ids_differ() {
    let app = app(12);
    let (status, a) = call(&app, Method::POST, "/api/v1/sessions", None).await;
    let (_, b) = call(&app, Method::POST, "/api/v1/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(a["sessionId"], b["sessionId"]);
}

#[tokio::test]
async fn test_order_tracking_needs_backend() {
    let (status, _) = call(&app(12), Method::GET, "/api/v1/orders/o-1/track", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_cart_events_stream_only_cart_updates() {
    let app = app(12);
    let req = Request::builder().uri("/api/v1/cart/s1/events").body(Body::empty()).unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "text/event-stream");
    let mut frames = res.into_body().into_data_stream();

    call(&app, Method::POST, "/api/v1/wishlist/s1", Some(json!({"productId": "p-3001"}))).await;
    call(&app, Method::POST, "/api/v1/cart/other", Some(json!({"productId": "p-1001"}))).await;
    call(&app, Method::POST, "/api/v1/cart/s1", Some(json!({"productId": "p-1001"}))).await;

    let chunk = tokio::time::timeout(Duration::from_secs(5), frames.next()).await.unwrap().unwrap().unwrap();
    let text = String::from_utf8(chunk.to_vec()).unwrap();
    assert!(text.starts_with("event: cartUpdated\n"), "{}", text);
    assert!(text.contains(r#""sessionId":"s1""#));
    assert!(!text.contains("wishlistUpdated"));
}
