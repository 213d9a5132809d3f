//! Client-Side Paginator
//!
//! Fixed-size contiguous pages over an already filtered subset. Each
//! independently paginated sub-list owns its own `PageCursor`.

/// One page of a subset
#[derive(Debug, PartialEq)]
pub struct Page<'a, T> {
    /// Items on this page; empty when the index is out of range
    pub items: &'a [T],
    /// Always at least 1
    pub total_pages: usize,
    pub page_index: usize,
}

pub fn total_pages(len: usize, page_size: usize) -> usize {
    let size = page_size.max(1);
    len.div_ceil(size).max(1)
}

/// Slice `subset[page_index * page_size .. (page_index + 1) * page_size]`.
///
/// Out-of-range indices yield an empty page, never a panic.
pub fn paginate<T>(subset: &[T], page_index: usize, page_size: usize) -> Page<'_, T> {
    let size = page_size.max(1);
    let start = page_index.saturating_mul(size);
    let items = if start >= subset.len() {
        &subset[0..0]
    } else {
        let end = start.saturating_add(size).min(subset.len());
        &subset[start..end]
    };
    Page {
        items,
        total_pages: total_pages(subset.len(), size),
        page_index,
    }
}

/// Current page index of one sub-list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageCursor {
    index: usize,
}

impl PageCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Back to the first page; called whenever the driving subset changes
    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// Keep the index within `[0, total_pages - 1]`
    pub fn clamp(&mut self, total_pages: usize) {
        let last = total_pages.max(1) - 1;
        if self.index > last {
            self.index = last;
        }
    }

    pub fn next(&mut self, total_pages: usize) {
        if self.index + 1 < total_pages {
            self.index += 1;
        }
    }

    pub fn prev(&mut self) {
        self.index = self.index.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_is_at_least_one() {
        let empty: Vec<u32> = vec![];
        assert_eq!(paginate(&empty, 0, 10).total_pages, 1);
        assert!(paginate(&empty, 0, 10).items.is_empty());
    }

    #[test]
    fn test_total_pages_matches_ceiling_for_every_index() {
        for len in [1usize, 9, 10, 11, 20, 21, 95] {
            let data: Vec<usize> = (0..len).collect();
            let expected = ((len + 9) / 10).max(1);
            for page in 0..expected + 2 {
                assert_eq!(paginate(&data, page, 10).total_pages, expected);
            }
        }
    }

    #[test]
    fn test_out_of_range_page_is_empty() {
        let data: Vec<usize> = (0..15).collect();
        let page = paginate(&data, 2, 10);
        assert_eq!(page.total_pages, 2);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_pages_are_contiguous_slices() {
        let data: Vec<usize> = (0..15).collect();
        assert_eq!(paginate(&data, 0, 10).items, &data[0..10]);
        assert_eq!(paginate(&data, 1, 10).items, &data[10..15]);
    }

    #[test]
    fn test_huge_index_does_not_overflow() {
        let data = vec![1, 2, 3];
        assert!(paginate(&data, usize::MAX, 10).items.is_empty());
    }

    #[test]
    fn test_cursor_clamps_when_subset_shrinks() {
        let mut cursor = PageCursor::new();
        for _ in 0..4 {
            cursor.next(5);
        }
        assert_eq!(cursor.index(), 4);
        cursor.clamp(2);
        assert_eq!(cursor.index(), 1);
        cursor.clamp(0);
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn test_cursor_navigation_stays_in_bounds() {
        let mut cursor = PageCursor::new();
        cursor.prev();
        assert_eq!(cursor.index(), 0);
        cursor.next(2);
        cursor.next(2);
        assert_eq!(cursor.index(), 1);
        cursor.reset();
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn test_last_page_is_partial() {
        let data: Vec<usize> = (0..25).collect();
        let page = paginate(&data, 2, 10);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items, &data[20..25]);
    }
}
