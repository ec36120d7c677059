//! Step pagination.
//!
//! Pure window arithmetic over a count of steps. `static_items` are extra
//! columns (such as the trailing "add step" column) that count towards the
//! number of pages but never appear in `visible_item_indexes`.

/// Pagination inputs. Recompute outputs by calling the accessors again
/// after changing any field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Paginate {
    /// 1-based page number. `0` is treated as page 1.
    pub page: usize,
    pub per_page: usize,
    pub items: usize,
    pub static_items: usize,
}

impl Paginate {
    pub fn new(page: usize, per_page: usize, items: usize) -> Self {
        Self {
            page,
            per_page,
            items,
            static_items: 0,
        }
    }

    pub fn with_static_items(mut self, static_items: usize) -> Self {
        self.static_items = static_items;
        self
    }

    /// Index of the first item on the current page.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }

    /// Total number of pages; never less than 1.
    pub fn pages(&self) -> usize {
        if self.items == 0 || self.per_page == 0 {
            return 1;
        }
        self.items.saturating_add(self.static_items).div_ceil(self.per_page).max(1)
    }

    /// Item indexes visible on the current page, in ascending order.
    pub fn visible_item_indexes(&self) -> Vec<usize> {
        let offset = self.offset();
        if offset >= self.items {
            return Vec::new();
        }
        (offset..offset.saturating_add(self.per_page).min(self.items)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn first_page_window() {
        let p = Paginate::new(1, 3, 10);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.visible_item_indexes(), vec![0, 1, 2]);
        assert_eq!(p.pages(), 4);
    }

    #[test]
    fn last_page_is_truncated() {
        let p = Paginate::new(4, 3, 10);
        assert_eq!(p.offset(), 9);
        assert_eq!(p.visible_item_indexes(), vec![9]);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let p = Paginate::new(5, 3, 10);
        assert!(p.visible_item_indexes().is_empty());
    }

    #[test]
    fn huge_page_number_yields_empty_window() {
        let p = Paginate::new(usize::MAX / 2, 3, 10);
        assert_eq!(p.offset(), usize::MAX);
        assert!(p.visible_item_indexes().is_empty());
        assert_eq!(p.pages(), 4);

        let last = Paginate::new(usize::MAX, usize::MAX, usize::MAX);
        assert!(last.visible_item_indexes().is_empty());
    }

    #[test]
    fn static_items_count_towards_pages_only() {
        let p = Paginate::new(1, 4, 4).with_static_items(1);
        assert_eq!(p.pages(), 2);
        assert_eq!(p.visible_item_indexes(), vec![0, 1, 2, 3]);

        let second = Paginate { page: 2, ..p };
        assert!(second.visible_item_indexes().is_empty());
    }

    #[test]
    fn zero_inputs_degrade_to_one_page() {
        assert_eq!(Paginate::new(1, 0, 10).pages(), 1);
        assert_eq!(Paginate::new(1, 5, 0).pages(), 1);
        assert!(Paginate::new(1, 0, 10).visible_item_indexes().is_empty());
        assert!(Paginate::default().visible_item_indexes().is_empty());
    }

    #[test]
    fn page_zero_behaves_as_first_page() {
        let p = Paginate::new(0, 2, 5);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.visible_item_indexes(), vec![0, 1]);
    }

    #[test]
    fn page_count_matches_ceiling_formula() {
        for per_page in 1..6 {
            for items in 1..20 {
                for static_items in 0..3 {
                    let p = Paginate::new(1, per_page, items).with_static_items(static_items);
                    let expected = ((items + static_items) as f64 / per_page as f64).ceil() as usize;
                    assert_eq!(p.pages(), expected.max(1));
                }
            }
        }
    }

    #[test]
    fn window_never_exceeds_page_size_or_item_count() {
        for page in 1..8 {
            let p = Paginate::new(page, 3, 11);
            let window = p.visible_item_indexes();
            assert!(window.len() <= 3);
            assert!(window.iter().all(|&i| i < 11));
        }
    }
}
