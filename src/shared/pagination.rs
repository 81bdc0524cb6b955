//! Page-window arithmetic
//!
//! Listing never answers an over-long page with an empty slice: a page past
//! the end is clamped to the last page that has data.

/// Resolved slice of a filtered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Effective 1-based page after clamping
    pub page: u64,
    pub last_page: u64,
    pub offset: u64,
    pub limit: u64,
}

impl PageWindow {
    /// Clamps `requested_page` into `[1, last_page]`.
    ///
    /// `page_size` must be positive; the HTTP layer rejects zero before we get
    /// here, and zero is treated as one rather than dividing by it.
    ///
    /// `limit` never exceeds the number of rows, so an oversized page size
    /// does not reach the store as-is.
    pub fn clamp(total: u64, page_size: u64, requested_page: u64) -> Self {
        let page_size = page_size.max(1);
        let last_page = if total < page_size {
            1
        } else {
            total.div_ceil(page_size)
        };
        let page = requested_page.clamp(1, last_page);

        Self {
            page,
            last_page,
            offset: (page - 1) * page_size,
            limit: page_size.min(total.max(1)),
        }
    }
}

/// Number of pages reported by the count endpoint. Zero users means zero pages.
pub fn pages_count(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_paging_clamps_to_last_page() {
        let window = PageWindow::clamp(20, 5, 10);
        assert_eq!(window.last_page, 4);
        assert_eq!(window.page, 4);
        assert_eq!(window.offset, 15);
        assert_eq!(window.limit, 5);
    }

    #[test]
    fn fewer_rows_than_a_page_is_one_page() {
        assert_eq!(PageWindow::clamp(3, 10, 5).page, 1);
        assert_eq!(PageWindow::clamp(0, 10, 1).offset, 0);
        assert_eq!(PageWindow::clamp(10, 10, 2).last_page, 1);
        assert_eq!(PageWindow::clamp(11, 10, 2).last_page, 2);
    }

    #[test]
    fn huge_page_size_limits_to_row_count() {
        let window = PageWindow::clamp(20, u64::MAX, 3);
        assert_eq!(window.page, 1);
        assert_eq!(window.offset, 0);
        assert_eq!(window.limit, 20);

        assert_eq!(PageWindow::clamp(0, u64::MAX, 1).limit, 1);
    }

    #[test]
    fn page_zero_reads_first_page() {
        let window = PageWindow::clamp(20, 5, 0);
        assert_eq!(window.page, 1);
        assert_eq!(window.offset, 0);
    }

    #[test]
    fn clamped_page_always_in_range() {
        for total in 0..40u64 {
            for size in 1..12u64 {
                for requested in 0..15u64 {
                    let window = PageWindow::clamp(total, size, requested);
                    let upper = total.div_ceil(size).max(1);
                    assert!(window.page >= 1 && window.page <= upper);
                    if total > 0 {
                        assert!(window.offset < total);
                    }
                }
            }
        }
    }

    #[test]
    fn pages_count_is_not_clamped() {
        assert_eq!(pages_count(20, 5), 4);
        assert_eq!(pages_count(21, 5), 5);
        assert_eq!(pages_count(0, 5), 0);
        assert_eq!(pages_count(7, 0), 0);
    }
}
