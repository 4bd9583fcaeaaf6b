//! Facet predicates.
//!
//! A product is kept only when it passes every facet that is away from its
//! default. Within a set-valued facet any overlap is enough.

use crate::domain::aggregates::category::PATH_SEPARATOR;
use crate::domain::aggregates::{FilterState, Product};
use crate::domain::value_objects::DiscountRange;

pub fn matches(product: &Product, filters: &FilterState) -> bool {
    price_ok(product, filters)
        && categories_ok(product, filters)
        && brands_ok(product, filters)
        && discount_ok(product, filters)
        && attributes_ok(product, filters)
        && rating_ok(product, filters)
        && stock_ok(product, filters)
        && gender_ok(product, filters)
        && search_ok(product, filters)
}

/// Keeps the matching products, preserving their order.
pub fn filter_products<'a>(products: &'a [Product], filters: &FilterState) -> Vec<&'a Product> {
    products.iter().filter(|p| matches(p, filters)).collect()
}

fn price_ok(p: &Product, f: &FilterState) -> bool {
    f.price_range().contains(p.price)
}

// Selecting `Fashion` also admits `Fashion/Shoes`.
fn categories_ok(p: &Product, f: &FilterState) -> bool {
    f.categories().is_empty() || p.categories.iter().any(|c| f.categories().iter().any(|s| within_category(c, s)))
}

fn within_category(path: &str, selected: &str) -> bool {
    path == selected
        || path.strip_prefix(selected).is_some_and(|rest| rest.starts_with(PATH_SEPARATOR))
}

fn brands_ok(p: &Product, f: &FilterState) -> bool {
    f.brands().is_empty() || p.brand.as_ref().is_some_and(|b| f.brands().contains(b))
}

// Labels that do not parse as a range match nothing.
fn discount_ok(p: &Product, f: &FilterState) -> bool {
    if f.discount_ranges().is_empty() { return true; }
    if !p.has_discount() { return false; }
    let discount = p.discount.unwrap_or_default();
    f.discount_ranges().iter()
        .filter_map(|label| DiscountRange::parse(label).ok())
        .any(|range| range.contains(discount))
}

fn attributes_ok(p: &Product, f: &FilterState) -> bool {
    f.attributes().iter().all(|(name, wanted)| {
        wanted.is_empty() || p.attribute_values(name).iter().any(|v| wanted.contains(v))
    })
}

fn rating_ok(p: &Product, f: &FilterState) -> bool {
    f.rating().map_or(true, |r| p.rating >= f64::from(r.value()))
}

fn stock_ok(p: &Product, f: &FilterState) -> bool {
    !f.in_stock() || p.in_stock
}

fn gender_ok(p: &Product, f: &FilterState) -> bool {
    f.gender().map_or(true, |g| p.gender == Some(g))
}

fn search_ok(p: &Product, f: &FilterState) -> bool {
    f.search_term().map_or(true, |t| p.matches_text(t))
}
