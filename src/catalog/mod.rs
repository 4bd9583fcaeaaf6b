//! Client-side product search: filter, sort, then page.

pub mod local;
pub mod pagination;
pub mod predicate;
pub mod sort;

pub use local::LocalCatalog;
pub use pagination::{clamp_page, paginate, total_pages, Page};
pub use predicate::{filter_products, matches};
pub use sort::apply_sorting;

use serde::Serialize;
use crate::domain::aggregates::{FilterState, Product};
use crate::domain::value_objects::SortOption;

/// Outcome of a search. An empty result is its own state so callers can show
/// "no matches" instead of an empty grid.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ShopResults {
    NoMatches,
    Matches(Page<Product>),
}

impl ShopResults {
    pub fn from_page(page: Page<Product>) -> Self {
        if page.total == 0 { Self::NoMatches } else { Self::Matches(page) }
    }
    /// The page actually shown, 1 when there are no matches.
    pub fn page(&self) -> u32 {
        match self { Self::NoMatches => 1, Self::Matches(p) => p.page }
    }
    pub fn into_items(self) -> Vec<Product> {
        match self { Self::NoMatches => vec![], Self::Matches(p) => p.items }
    }
}

/// Runs the facets over `products`, orders the survivors and cuts the page the
/// filters ask for, clamped to the last page that exists.
pub fn search(products: &[Product], filters: &FilterState, sort: SortOption, page_size: usize) -> ShopResults {
    let mut hits = filter_products(products, filters);
    if hits.is_empty() { return ShopResults::NoMatches; }
    apply_sorting(&mut hits, sort);
    let page = clamp_page(filters.page(), hits.len(), page_size);
    let cut = paginate(&hits, page, page_size);
    ShopResults::Matches(Page {
        items: cut.items.into_iter().cloned().collect(),
        page: cut.page,
        page_size: cut.page_size,
        total: cut.total,
        total_pages: cut.total_pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::PriceRange;

    fn catalog(n: usize) -> Vec<Product> {
        (1..=n).map(|i| Product::new(format!("p{}", i), format!("Item {}", i), i as f64 * 10.0)).collect()
    }

    #[test]
    fn test_no_matches_is_distinct() {
        let f = FilterState::default().with_categories(["Nothing"]);
        assert_eq!(search(&catalog(3), &f, SortOption::Relevance, 5), ShopResults::NoMatches);
    }

    #[test]
    fn test_page_past_end_is_clamped() {
        let f = FilterState::default().with_page(2);
        let ShopResults::Matches(page) = search(&catalog(5), &f, SortOption::Relevance, 5) else { panic!("expected matches") };
        assert_eq!(page.page, 1);
        assert_eq!(page.items.len(), 5);
        let ShopResults::Matches(page) = search(&catalog(6), &f, SortOption::Relevance, 5) else { panic!("expected matches") };
        assert_eq!(page.page, 2);
        assert_eq!(page.items[0].id, "p6");
    }

    #[test]
    fn test_filter_sort_page_together() {
        let f = FilterState::default().with_price_range(PriceRange::new(20, 60));
        let results = search(&catalog(10), &f, SortOption::PriceHighLow, 2);
        let ShopResults::Matches(page) = results else { panic!("expected matches") };
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(), vec!["p6", "p5"]);
    }
}
