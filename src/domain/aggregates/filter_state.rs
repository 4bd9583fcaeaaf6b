//! FilterState Aggregate
//!
//! The active product-query facets plus the page cursor. A state is never
//! edited in place by callers: `apply` and the `with_*` builders hand back a
//! new value.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use crate::domain::value_objects::{Gender, PriceRange, Rating};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    price_range: PriceRange,
    categories: BTreeSet<String>,
    brands: BTreeSet<String>,
    discount_ranges: BTreeSet<String>,
    attributes: BTreeMap<String, BTreeSet<String>>,
    gender: Option<Gender>,
    rating: Option<Rating>,
    in_stock: bool,
    search_term: Option<String>,
    page: u32,
}

/// One interaction with a facet control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FacetChange {
    SetPriceRange(PriceRange),
    ToggleCategory(String),
    ToggleBrand(String),
    ToggleDiscountRange(String),
    ToggleAttribute { name: String, value: String },
    SetGender(Option<Gender>),
    SetRating(Option<Rating>),
    SetInStock(bool),
    SetSearch(Option<String>),
    ClearAll,
    SetPage(u32),
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            price_range: PriceRange::default(), categories: BTreeSet::new(), brands: BTreeSet::new(),
            discount_ranges: BTreeSet::new(), attributes: BTreeMap::new(), gender: None, rating: None,
            in_stock: false, search_term: None, page: 1,
        }
    }
}

impl FilterState {
    pub fn price_range(&self) -> PriceRange { self.price_range }
    pub fn categories(&self) -> &BTreeSet<String> { &self.categories }
    pub fn brands(&self) -> &BTreeSet<String> { &self.brands }
    pub fn discount_ranges(&self) -> &BTreeSet<String> { &self.discount_ranges }
    pub fn attributes(&self) -> &BTreeMap<String, BTreeSet<String>> { &self.attributes }
    pub fn gender(&self) -> Option<Gender> { self.gender }
    pub fn rating(&self) -> Option<Rating> { self.rating }
    pub fn in_stock(&self) -> bool { self.in_stock }
    pub fn search_term(&self) -> Option<&str> { self.search_term.as_deref() }
    pub fn page(&self) -> u32 { self.page }
    pub fn is_default(&self) -> bool { *self == Self::default() }

    pub fn with_price_range(mut self, range: PriceRange) -> Self { self.price_range = range; self }
    pub fn with_categories<I: IntoIterator<Item = S>, S: Into<String>>(mut self, values: I) -> Self { self.categories = clean_set(values); self }
    pub fn with_brands<I: IntoIterator<Item = S>, S: Into<String>>(mut self, values: I) -> Self { self.brands = clean_set(values); self }
    pub fn with_discount_ranges<I: IntoIterator<Item = S>, S: Into<String>>(mut self, values: I) -> Self { self.discount_ranges = clean_set(values); self }
    pub fn with_gender(mut self, gender: Option<Gender>) -> Self { self.gender = gender; self }
    pub fn with_rating(mut self, rating: Option<Rating>) -> Self { self.rating = rating; self }
    pub fn with_in_stock(mut self, in_stock: bool) -> Self { self.in_stock = in_stock; self }
    /// Zero is not a page; it becomes 1.
    pub fn with_page(mut self, page: u32) -> Self { self.page = page.max(1); self }

    /// Trims the term; blank terms clear the search.
    pub fn with_search_term(mut self, term: Option<String>) -> Self {
        self.search_term = term.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
        self
    }

    /// Attribute types whose cleaned value set is empty are dropped.
    pub fn with_attribute<I: IntoIterator<Item = S>, S: Into<String>>(mut self, name: impl Into<String>, values: I) -> Self {
        let name = name.into().trim().to_string();
        let values = clean_set(values);
        if name.is_empty() { return self; }
        if values.is_empty() { self.attributes.remove(&name); } else { self.attributes.insert(name, values); }
        self
    }

    /// Produces the state that follows a facet interaction. Every change other
    /// than `SetPage` sends the cursor back to page 1.
    pub fn apply(&self, change: FacetChange) -> FilterState {
        let next = self.clone();
        let next = match change {
            FacetChange::SetPage(page) => return next.with_page(page),
            FacetChange::ClearAll => FilterState::default(),
            FacetChange::SetPriceRange(range) => next.with_price_range(range),
            FacetChange::ToggleCategory(v) => { let set = toggled(&self.categories, v); next.with_categories(set) }
            FacetChange::ToggleBrand(v) => { let set = toggled(&self.brands, v); next.with_brands(set) }
            FacetChange::ToggleDiscountRange(v) => { let set = toggled(&self.discount_ranges, v); next.with_discount_ranges(set) }
            FacetChange::ToggleAttribute { name, value } => {
                let current = self.attributes.get(name.trim()).cloned().unwrap_or_default();
                let set = toggled(&current, value);
                next.with_attribute(name, set)
            }
            FacetChange::SetGender(g) => next.with_gender(g),
            FacetChange::SetRating(r) => next.with_rating(r),
            FacetChange::SetInStock(b) => next.with_in_stock(b),
            FacetChange::SetSearch(term) => next.with_search_term(term),
        };
        next.with_page(1)
    }
}

fn clean_set<I: IntoIterator<Item = S>, S: Into<String>>(values: I) -> BTreeSet<String> {
    values.into_iter().map(|v| v.into().trim().to_string()).filter(|v| !v.is_empty()).collect()
}

fn toggled(set: &BTreeSet<String>, value: String) -> BTreeSet<String> {
    let value = value.trim().to_string();
    let mut set = set.clone();
    if !set.remove(&value) { set.insert(value); }
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_default_state() {
        let s = FilterState::default();
        assert_eq!(s.page(), 1);
        assert_eq!(s.price_range(), PriceRange::new(0, 1000));
        assert!(s.is_default());
    }
    #[test]
    fn test_facet_change_resets_page() {
        let s = FilterState::default().with_page(4);
        let next = s.apply(FacetChange::ToggleCategory("Shoes".into()));
        assert_eq!(next.page(), 1);
        assert!(next.categories().contains("Shoes"));
        assert_eq!(s.page(), 4); // untouched
        assert_eq!(next.apply(FacetChange::SetPage(3)).page(), 3);
    }
    #[test]
    fn test_toggle_attribute_removes_empty_type() {
        let s = FilterState::default().apply(FacetChange::ToggleAttribute { name: "Color".into(), value: "Red".into() });
        assert_eq!(s.attributes().get("Color").map(|v| v.len()), Some(1));
        let s = s.apply(FacetChange::ToggleAttribute { name: "Color".into(), value: "Red".into() });
        assert!(s.attributes().is_empty());
        assert!(s.is_default());
    }
    #[test]
    fn test_search_term_trimmed() {
        let s = FilterState::default().with_search_term(Some("  boots ".into()));
        assert_eq!(s.search_term(), Some("boots"));
        assert_eq!(s.apply(FacetChange::SetSearch(Some("   ".into()))).search_term(), None);
    }
    #[test]
    fn test_clear_all() {
        let s = FilterState::default().with_in_stock(true).with_brands(["Acme"]).with_page(2);
        assert!(s.apply(FacetChange::ClearAll).is_default());
    }
}
