//! URL codec for `FilterState`.
//!
//! `decode` never fails: a parameter that is missing, blank, a sentinel
//! (`undefined`, `null`) or unparseable falls back to that field's default
//! and leaves every other field alone. `encode` writes only fields that
//! differ from their defaults, in a fixed order.

use std::collections::{BTreeMap, HashMap};
use url::form_urlencoded;
use crate::domain::aggregates::FilterState;
use crate::domain::value_objects::{Gender, PriceRange, Rating};

pub const MIN_PRICE: &str = "minPrice";
pub const MAX_PRICE: &str = "maxPrice";
pub const CATEGORIES: &str = "categories";
pub const CATEGORY: &str = "category";
pub const BRANDS: &str = "brands";
pub const DISCOUNT_RANGES: &str = "discountRanges";
pub const ATTRIBUTES: &str = "attributes";
pub const GENDER: &str = "gender";
pub const RATING: &str = "rating";
pub const IN_STOCK: &str = "inStock";
pub const SEARCH: &str = "search";
pub const SEARCH_TERM: &str = "searchTerm";
pub const PAGE: &str = "page";

const SENTINELS: [&str; 2] = ["undefined", "null"];

/// Decodes a raw query string, with or without the leading `?`.
pub fn decode(query: &str) -> FilterState {
    let query = query.strip_prefix('?').unwrap_or(query);
    decode_pairs(form_urlencoded::parse(query.as_bytes()))
}

/// Decodes already-split parameters. When a name repeats, the first value wins.
pub fn decode_pairs<I, K, V>(pairs: I) -> FilterState
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut params: HashMap<String, String> = HashMap::new();
    for (k, v) in pairs {
        params.entry(k.as_ref().to_string()).or_insert_with(|| v.as_ref().to_string());
    }
    let get = |name: &str| params.get(name).and_then(|v| clean(v));

    let min = get(MIN_PRICE).and_then(parse_count).unwrap_or(PriceRange::DEFAULT_MIN);
    let max = get(MAX_PRICE).and_then(parse_count).unwrap_or(PriceRange::DEFAULT_MAX);

    let mut categories = get(CATEGORIES).map(split_list).unwrap_or_default();
    if categories.is_empty() {
        categories = get(CATEGORY).map(split_list).unwrap_or_default();
    }

    let mut state = FilterState::default()
        .with_price_range(PriceRange::new(min, max))
        .with_categories(categories)
        .with_brands(get(BRANDS).map(split_list).unwrap_or_default())
        .with_discount_ranges(get(DISCOUNT_RANGES).map(split_list).unwrap_or_default())
        .with_gender(get(GENDER).and_then(Gender::parse))
        .with_rating(get(RATING).and_then(parse_count).and_then(|r| u8::try_from(r).ok()).and_then(Rating::new))
        .with_in_stock(params.get(IN_STOCK).is_some_and(|v| v == "true"))
        .with_search_term(get(SEARCH).or_else(|| get(SEARCH_TERM)).map(str::to_string))
        .with_page(get(PAGE).and_then(parse_count).unwrap_or(1));

    if let Some(raw) = get(ATTRIBUTES) {
        for (name, values) in parse_attributes(raw) {
            state = state.with_attribute(name, values);
        }
    }
    state
}

/// Encodes the non-default fields of `state` as a query string without `?`.
pub fn encode(state: &FilterState) -> String {
    let mut out = form_urlencoded::Serializer::new(String::new());
    if let Some(term) = state.search_term() {
        out.append_pair(SEARCH, term);
    }
    if !state.categories().is_empty() {
        out.append_pair(CATEGORIES, &join(state.categories().iter()));
    }
    if !state.brands().is_empty() {
        out.append_pair(BRANDS, &join(state.brands().iter()));
    }
    let range = state.price_range();
    if range.min() != PriceRange::DEFAULT_MIN {
        out.append_pair(MIN_PRICE, &range.min().to_string());
    }
    if range.max() != PriceRange::DEFAULT_MAX {
        out.append_pair(MAX_PRICE, &range.max().to_string());
    }
    if !state.discount_ranges().is_empty() {
        out.append_pair(DISCOUNT_RANGES, &join(state.discount_ranges().iter()));
    }
    if !state.attributes().is_empty() {
        if let Ok(json) = serde_json::to_string(state.attributes()) {
            out.append_pair(ATTRIBUTES, &json);
        }
    }
    if let Some(gender) = state.gender() {
        out.append_pair(GENDER, gender.as_str());
    }
    if let Some(rating) = state.rating() {
        out.append_pair(RATING, &rating.value().to_string());
    }
    if state.in_stock() {
        out.append_pair(IN_STOCK, "true");
    }
    if state.page() != 1 {
        out.append_pair(PAGE, &state.page().to_string());
    }
    out.finish()
}

/// The location to replace the current history entry with.
pub fn href(path: &str, state: &FilterState) -> String {
    let query = encode(state);
    if query.is_empty() { path.to_string() } else { format!("{}?{}", path, query) }
}

fn clean(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || SENTINELS.iter().any(|s| trimmed.eq_ignore_ascii_case(s)) {
        None
    } else {
        Some(trimmed)
    }
}

/// Whole non-negative numbers; a fractional value is truncated.
fn parse_count(raw: &str) -> Option<u32> {
    if let Ok(n) = raw.parse::<i64>() {
        return u32::try_from(n).ok();
    }
    let n = raw.parse::<f64>().ok()?;
    (n.is_finite() && n >= 0.0 && n <= f64::from(u32::MAX)).then(|| n.trunc() as u32)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').filter_map(clean).map(str::to_string).collect()
}

fn join<'a, I: Iterator<Item = &'a String>>(values: I) -> String {
    values.filter(|v| !v.is_empty()).map(String::as_str).collect::<Vec<_>>().join(",")
}

/// A JSON object of attribute type to values. A bare string value counts as
/// a single selection. Anything else is logged and ignored.
fn parse_attributes(raw: &str) -> BTreeMap<String, Vec<String>> {
    let value = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring malformed attributes parameter");
            return BTreeMap::new();
        }
    };
    let Some(object) = value.as_object() else {
        tracing::warn!("ignoring attributes parameter that is not a JSON object");
        return BTreeMap::new();
    };
    object.iter().map(|(name, v)| {
        let values = match v {
            serde_json::Value::Array(items) => items.iter().filter_map(|i| i.as_str()).filter_map(clean).map(str::to_string).collect(),
            serde_json::Value::String(s) => clean(s).map(|s| vec![s.to_string()]).unwrap_or_default(),
            _ => vec![],
        };
        (name.clone(), values)
    }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::FacetChange;

    #[test]
    fn test_default_state_encodes_empty() {
        assert_eq!(encode(&FilterState::default()), "");
        assert_eq!(href("/shop", &FilterState::default()), "/shop");
    }

    #[test]
    fn test_sentinels_decode_to_default() {
        let s = decode_pairs([("minPrice", "undefined"), ("rating", "null"), ("categories", "")]);
        assert_eq!(s, FilterState::default());
        let s = decode("maxPrice=%20%20&brands=null,undefined,&gender=undefined&page=null");
        assert!(s.is_default());
    }

    #[test]
    fn test_shop_url_scenario() {
        let s = decode("?minPrice=20&maxPrice=80&categories=Electronics,Fashion&rating=4");
        assert_eq!(s.price_range(), PriceRange::new(20, 80));
        assert_eq!(s.categories().iter().map(String::as_str).collect::<Vec<_>>(), vec!["Electronics", "Fashion"]);
        assert_eq!(s.rating(), Rating::new(4));
        assert_eq!(s.page(), 1);
        assert!(s.brands().is_empty() && !s.in_stock() && s.gender().is_none());

        let query = encode(&s);
        let mut params: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes()).into_owned().collect();
        params.sort();
        assert_eq!(params, vec![
            ("categories".to_string(), "Electronics,Fashion".to_string()),
            ("maxPrice".to_string(), "80".to_string()),
            ("minPrice".to_string(), "20".to_string()),
            ("rating".to_string(), "4".to_string()),
        ]);
        assert_eq!(decode(&query), s);
    }

    #[test]
    fn test_round_trip_full_state() {
        let s = FilterState::default()
            .with_search_term(Some("running shoes".into()))
            .with_brands(["Acme", "Zephyr"])
            .with_discount_ranges(["21% - 40%", "Over 60%"])
            .with_attribute("Color", ["Red", "Blue"])
            .with_attribute("Size", ["M"])
            .with_gender(Some(Gender::Unisex))
            .with_in_stock(true)
            .with_price_range(PriceRange::new(5, 1500))
            .with_page(3);
        let once = decode(&encode(&s));
        assert_eq!(once, s);
        assert_eq!(encode(&once), encode(&s));
    }

    #[test]
    fn test_bad_parameter_does_not_spoil_others() {
        let s = decode("minPrice=-5&maxPrice=abc&rating=9&brands=Acme&attributes=%7Bnot-json&inStock=TRUE");
        assert_eq!(s.price_range(), PriceRange::default());
        assert_eq!(s.rating(), None);
        assert!(s.attributes().is_empty());
        assert!(!s.in_stock());
        assert!(s.brands().contains("Acme"));
    }

    #[test]
    fn test_attributes_json() {
        let s = decode_pairs([("attributes", r#"{"Color":["Red","null"," "],"Material":"Wool","Fit":[]}"#)]);
        assert_eq!(s.attributes().len(), 2);
        assert!(s.attributes()["Color"].contains("Red"));
        assert!(s.attributes()["Material"].contains("Wool"));
        assert!(decode_pairs([("attributes", "[1,2]")]).attributes().is_empty());
    }

    #[test]
    fn test_category_alias_and_search_alias() {
        let s = decode("category=Bags&searchTerm=%20tote%20");
        assert!(s.categories().contains("Bags"));
        assert_eq!(s.search_term(), Some("tote"));
        let s = decode("category=Bags&categories=Shoes");
        assert_eq!(s.categories().len(), 1);
        assert!(s.categories().contains("Shoes"));
    }

    #[test]
    fn test_category_alias_round_trips() {
        let s = decode("category=Tops%2C%20Tees&brands=Acme");
        assert_eq!(s.categories().iter().map(String::as_str).collect::<Vec<_>>(), vec!["Tees", "Tops"]);
        let again = decode(&encode(&s));
        assert_eq!(again, s);
        assert_eq!(encode(&again), encode(&s));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(decode("minPrice=12.9").price_range().min(), 12);
        assert_eq!(decode("minPrice=900&maxPrice=100").price_range(), PriceRange::new(100, 900));
        assert_eq!(decode("page=0").page(), 1);
    }

    #[test]
    fn test_href_after_facet_change() {
        let s = decode("page=4&brands=Acme").apply(FacetChange::SetInStock(true));
        assert_eq!(href("/shop", &s), "/shop?brands=Acme&inStock=true");
    }
}
