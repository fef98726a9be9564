//! Page slicing for list endpoints.

use serde::Serialize;

/// One page of an already sorted list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

/// Slice `items` into the requested 1-based page.
///
/// `total_pages` is never below 1, and a page past the end yields no items
/// while still reporting the full `total`. A `page` or `page_size` of 0 is
/// treated as 1.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(page_size).max(1);

    let start = (page - 1).saturating_mul(page_size);
    let items: Vec<T> = items.into_iter().skip(start).take(page_size).collect();

    Page {
        items,
        total,
        page,
        page_size,
        total_pages,
    }
}

impl<T> Page<T> {
    /// Convert the items while keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page() {
        let page = paginate((1..=120).collect::<Vec<_>>(), 1, 50);
        assert_eq!(page.items.len(), 50);
        assert_eq!(page.items[0], 1);
        assert_eq!(page.total, 120);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_last_partial_page() {
        let page = paginate((1..=120).collect::<Vec<_>>(), 3, 50);
        assert_eq!(page.items, (101..=120).collect::<Vec<_>>());
    }

    #[test]
    fn test_page_beyond_range_is_empty_with_total() {
        let page = paginate(vec!["a", "b", "c"], 5, 2);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn test_empty_list_has_one_page() {
        let page = paginate(Vec::<u8>::new(), 1, 50);
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_total_pages_formula() {
        for total in [0usize, 1, 9, 10, 11, 99, 100, 101] {
            for size in [1usize, 3, 10, 50] {
                let page = paginate(vec![0u8; total], 1, size);
                let expected = std::cmp::max(1, total.div_ceil(size));
                assert_eq!(page.total_pages, expected, "total={total} size={size}");
            }
        }
    }

    #[test]
    fn test_zero_page_size_treated_as_one() {
        let page = paginate(vec![1, 2, 3], 2, 0);
        assert_eq!(page.page_size, 1);
        assert_eq!(page.items, vec![2]);
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = paginate(vec![1, 2, 3], 1, 2).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages, 2);
    }
}
