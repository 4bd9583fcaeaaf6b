//! Page slicing and cursor clamping.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: u32,
}

/// Number of pages needed for `total` items; an empty list still has page 1.
pub fn total_pages(total: usize, page_size: usize) -> u32 {
    let page_size = page_size.max(1);
    u32::try_from(total.div_ceil(page_size)).unwrap_or(u32::MAX).max(1)
}

/// Pulls a cursor that points past the end back to the last page.
pub fn clamp_page(page: u32, total: usize, page_size: usize) -> u32 {
    page.clamp(1, total_pages(total, page_size))
}

/// Items `(page-1)*page_size .. page*page_size`; a page past the end is empty.
pub fn paginate<T: Clone>(items: &[T], page: u32, page_size: usize) -> Page<T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let start = (page as usize - 1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    Page {
        items: items[start..end].to_vec(),
        page,
        page_size,
        total: items.len(),
        total_pages: total_pages(items.len(), page_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slices() {
        let items: Vec<u32> = (1..=6).collect();
        assert_eq!(paginate(&items, 1, 5).items, vec![1, 2, 3, 4, 5]);
        assert_eq!(paginate(&items, 2, 5).items, vec![6]);
        assert!(paginate(&items, 3, 5).items.is_empty());
        assert_eq!(paginate(&items, 2, 5).total_pages, 2);
    }

    #[test]
    fn test_removing_last_item_clamps_page() {
        let mut items: Vec<u32> = (1..=6).collect();
        assert_eq!(clamp_page(2, items.len(), 5), 2);
        items.pop();
        let page = clamp_page(2, items.len(), 5);
        assert_eq!(page, 1);
        assert_eq!(paginate(&items, page, 5).items.len(), 5);
    }

    #[test]
    fn test_empty_list_has_one_page() {
        assert_eq!(total_pages(0, 12), 1);
        assert_eq!(clamp_page(7, 0, 12), 1);
        assert_eq!(clamp_page(0, 30, 12), 1);
    }
}
