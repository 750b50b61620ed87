//! # Pagination
//!
//! Page/offset arithmetic shared by every listing in the catalog.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  page = 3, page_size = 20, total_count = 41                            │
//! │                                                                         │
//! │  offset      = (page - 1) * page_size          = 40                    │
//! │  total_pages = ceil(total_count / page_size)   = 3                     │
//! │                                                                         │
//! │  rows:  [0 ........ 19][20 ....... 39][40]                             │
//! │           page 1         page 2        page 3  (1 item)                │
//! │                                                                         │
//! │  page 4 → offset 60 → zero items, total_count still 41                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::DEFAULT_PAGE_SIZE;

/// A validated page request.
///
/// Construction guarantees `page >= 1` and `page_size >= 1`, so the offset
/// arithmetic below can never underflow. The upper bound on `page_size` is a
/// routing concern, see [`validate_page_request`](crate::validation::validate_page_request).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Creates a page request.
    ///
    /// ## Errors
    /// * `MustBePositive` - `page` or `page_size` is zero
    pub fn new(page: u32, page_size: u32) -> Result<Self, ValidationError> {
        if page == 0 {
            return Err(ValidationError::MustBePositive {
                field: "page".to_string(),
            });
        }
        if page_size == 0 {
            return Err(ValidationError::MustBePositive {
                field: "page_size".to_string(),
            });
        }
        Ok(PageRequest { page, page_size })
    }

    /// First page with the given size. Zero sizes are bumped to 1.
    pub fn first(page_size: u32) -> Self {
        PageRequest {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// 1-based page number.
    #[inline]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[inline]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Row offset: `(page - 1) * page_size`.
    ///
    /// Computed in `i64` (SQLite's integer type), saturating at `i64::MAX`.
    #[inline]
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1).saturating_mul(i64::from(self.page_size))
    }

    /// Row limit for the page fetch.
    #[inline]
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    /// Number of pages needed for `total_count` rows at this page size.
    #[inline]
    pub fn total_pages(&self, total_count: i64) -> i64 {
        total_pages(total_count, self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest::first(DEFAULT_PAGE_SIZE)
    }
}

/// `ceil(total_count / page_size)`, zero for an empty result.
///
/// Negative counts (never produced by `COUNT(*)`) are treated as zero.
pub fn total_pages(total_count: i64, page_size: u32) -> i64 {
    if total_count <= 0 || page_size == 0 {
        return 0;
    }
    let size = i64::from(page_size);
    (total_count + size - 1) / size
}

// =============================================================================
// Unit Tests
// =============================================================================
