//! Canonical shapes for backend responses.
//!
//! The backend is not consistent about field names (`productId` vs `id`,
//! `url` vs `productImage`) or id types (string vs number). Each DTO here
//! deserializes through a raw mirror that accepts every known spelling, so
//! the rest of the crate sees one name per field.

use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::domain::aggregates::GuestLine;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
enum IdValue { Text(String), Number(u64) }

impl IdValue {
    fn into_string(self) -> String {
        match self { Self::Text(s) => s.trim().to_string(), Self::Number(n) => n.to_string() }
    }
}

fn first_id(candidates: impl IntoIterator<Item = Option<IdValue>>) -> Option<String> {
    candidates.into_iter().flatten().map(IdValue::into_string).find(|s| !s.is_empty())
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListSource {
    #[default]
    Backend,
    Guest,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCartLine {
    product_id: Option<IdValue>,
    id: Option<IdValue>,
    quantity: Option<u32>,
    name: Option<String>,
    product_name: Option<String>,
    price: Option<f64>,
    image_url: Option<String>,
    url: Option<String>,
    product_image: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCartLine", rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,
    pub quantity: u32,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
}

impl TryFrom<RawCartLine> for CartLine {
    type Error = String;
    fn try_from(raw: RawCartLine) -> Result<Self, Self::Error> {
        let product_id = first_id([raw.product_id, raw.id]).ok_or("cart line without a product id")?;
        Ok(Self {
            product_id,
            quantity: raw.quantity.unwrap_or(1),
            name: raw.name.or(raw.product_name),
            price: raw.price,
            image_url: raw.image_url.or(raw.url).or(raw.product_image),
        })
    }
}

impl From<GuestLine> for CartLine {
    fn from(line: GuestLine) -> Self {
        Self { product_id: line.product_id, quantity: line.quantity, name: None, price: None, image_url: None }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCartView {
    items: Option<Vec<CartLine>>,
    cart_items: Option<Vec<CartLine>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCartView", rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub total_items: u32,
    pub source: ListSource,
}

impl CartView {
    pub fn new(lines: Vec<CartLine>, source: ListSource) -> Self {
        let total_items = lines.iter().map(|l| l.quantity).sum();
        Self { lines, total_items, source }
    }

    pub fn guest(lines: Vec<GuestLine>) -> Self {
        Self::new(lines.into_iter().map(CartLine::from).collect(), ListSource::Guest)
    }
}

impl From<RawCartView> for CartView {
    fn from(raw: RawCartView) -> Self {
        Self::new(raw.items.or(raw.cart_items).unwrap_or_default(), ListSource::Backend)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawWishlistEntry {
    Bare(IdValue),
    #[serde(rename_all = "camelCase")]
    Object { product_id: Option<IdValue>, id: Option<IdValue> },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawWishlist {
    List(Vec<RawWishlistEntry>),
    Wrapped { items: Vec<RawWishlistEntry> },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawWishlist", rename_all = "camelCase")]
pub struct WishlistView {
    pub product_ids: Vec<String>,
    pub source: ListSource,
}

impl WishlistView {
    pub fn guest(product_ids: Vec<String>) -> Self { Self { product_ids, source: ListSource::Guest } }
}

impl From<RawWishlist> for WishlistView {
    fn from(raw: RawWishlist) -> Self {
        let entries = match raw { RawWishlist::List(e) | RawWishlist::Wrapped { items: e } => e };
        let product_ids = entries.into_iter().filter_map(|e| match e {
            RawWishlistEntry::Bare(id) => first_id([Some(id)]),
            RawWishlistEntry::Object { product_id, id } => first_id([product_id, id]),
        }).collect();
        Self { product_ids, source: ListSource::Backend }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOrder {
    order_id: Option<IdValue>,
    id: Option<IdValue>,
    order_number: Option<IdValue>,
    status: Option<String>,
    order_status: Option<String>,
    total: Option<f64>,
    total_amount: Option<f64>,
    pickup_token: Option<String>,
    qr_token: Option<String>,
    #[serde(default)]
    items: Vec<CartLine>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawOrder", rename_all = "camelCase")]
pub struct OrderSummary {
    pub order_id: String,
    pub status: String,
    pub total: Option<f64>,
    /// Token encoded into the pickup QR code.
    pub pickup_token: Option<String>,
    pub items: Vec<CartLine>,
}

impl TryFrom<RawOrder> for OrderSummary {
    type Error = String;
    fn try_from(raw: RawOrder) -> Result<Self, Self::Error> {
        let order_id = first_id([raw.order_id, raw.id, raw.order_number]).ok_or("order without an id")?;
        Ok(Self {
            order_id,
            status: raw.status.or(raw.order_status).unwrap_or_else(|| "unknown".to_string()),
            total: raw.total.or(raw.total_amount),
            pickup_token: raw.pickup_token.or(raw.qr_token),
            items: raw.items,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequest {
    #[validate(length(min = 1, max = 64))]
    pub order_id: String,
    #[validate(length(min = 1, max = 64))]
    pub product_id: String,
    #[validate(range(min = 1, max = 99))]
    pub quantity: u32,
    #[validate(length(min = 3, max = 500))]
    pub reason: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReturnTicket {
    return_id: Option<IdValue>,
    id: Option<IdValue>,
    status: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawReturnTicket", rename_all = "camelCase")]
pub struct ReturnTicket {
    pub return_id: String,
    pub status: String,
}

impl TryFrom<RawReturnTicket> for ReturnTicket {
    type Error = String;
    fn try_from(raw: RawReturnTicket) -> Result<Self, Self::Error> {
        Ok(Self {
            return_id: first_id([raw.return_id, raw.id]).ok_or("return without an id")?,
            status: raw.status.unwrap_or_else(|| "submitted".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_line_coalesces_field_names() {
        let a: CartLine = serde_json::from_str(r#"{"productId":"p-1","quantity":2,"url":"/a.jpg"}"#).unwrap();
        let b: CartLine = serde_json::from_str(r#"{"id":1001,"productImage":"/b.jpg","productName":"Boot"}"#).unwrap();
        assert_eq!(a.product_id, "p-1");
        assert_eq!(a.image_url.as_deref(), Some("/a.jpg"));
        assert_eq!(b.product_id, "1001");
        assert_eq!(b.quantity, 1);
        assert_eq!(b.name.as_deref(), Some("Boot"));
        assert_eq!(b.image_url.as_deref(), Some("/b.jpg"));
        assert!(serde_json::from_str::<CartLine>(r#"{"quantity":2}"#).is_err());
    }

    #[test]
    fn test_cart_view_totals() {
        let view: CartView = serde_json::from_str(r#"{"cartItems":[{"productId":"a","quantity":2},{"productId":7,"quantity":3}]}"#).unwrap();
        assert_eq!(view.total_items, 5);
        assert_eq!(view.source, ListSource::Backend);
        let guest = CartView::guest(vec![GuestLine { product_id: "a".into(), quantity: 4 }]);
        assert_eq!(guest.total_items, 4);
        assert_eq!(guest.source, ListSource::Guest);
    }

    #[test]
    fn test_wishlist_shapes() {
        let bare: WishlistView = serde_json::from_str(r#"["a", 12]"#).unwrap();
        let wrapped: WishlistView = serde_json::from_str(r#"{"items":[{"productId":"a"},{"id":12},{}]}"#).unwrap();
        assert_eq!(bare.product_ids, vec!["a", "12"]);
        assert_eq!(wrapped.product_ids, bare.product_ids);
    }

    #[test]
    fn test_order_summary() {
        let o: OrderSummary = serde_json::from_str(r#"{"orderNumber":"ORD-9","orderStatus":"SHIPPED","totalAmount":42.5,"qrToken":"tok"}"#).unwrap();
        assert_eq!(o.order_id, "ORD-9");
        assert_eq!(o.status, "SHIPPED");
        assert_eq!(o.total, Some(42.5));
        assert_eq!(o.pickup_token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_return_request_validation() {
        let mut r = ReturnRequest { order_id: "o1".into(), product_id: "p1".into(), quantity: 1, reason: "Too small".into() };
        assert!(r.validate().is_ok());
        r.reason = "no".into();
        r.quantity = 0;
        let errors = r.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("reason"));
        assert!(errors.field_errors().contains_key("quantity"));
    }
}
