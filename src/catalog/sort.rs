//! Result ordering. Every ordering is stable, so ties keep catalog order.

use std::cmp::Ordering;
use crate::domain::aggregates::Product;
use crate::domain::value_objects::SortOption;

pub fn apply_sorting(products: &mut [&Product], sort: SortOption) {
    match sort {
        SortOption::Relevance => products.sort_by_key(|p| !p.is_bestseller),
        SortOption::Newest => products.sort_by_key(|p| !p.is_new),
        SortOption::PriceLowHigh => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortOption::PriceHighLow => products.sort_by(|a, b| b.price.total_cmp(&a.price)),
        SortOption::Rating => products.sort_by(|a, b| desc(a.rating, b.rating)),
        SortOption::Popularity => products.sort_by(|a, b| b.review_count.cmp(&a.review_count)),
    }
}

fn desc(a: f64, b: f64) -> Ordering { b.total_cmp(&a) }
