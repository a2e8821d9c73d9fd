//! Page-number pagination.

use city_data_database::maintenance::Window;
use city_data_server_models::{Page, PageParams};

/// Results per page when `page_size` is absent or invalid.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Upper bound on `page_size`.
pub const MAX_PAGE_SIZE: usize = 1000;

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: usize,
    /// Number of pages for the result count.
    pub num_pages: usize,
    /// Rows to fetch.
    pub window: Window,
}

/// The requested page does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidPage;

impl PageRequest {
    /// Validates `params` against a result set of `count` rows.
    ///
    /// An empty result set still has one (empty) page.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPage`] if `page` is not a positive integer or lies
    /// past the last page.
    pub fn resolve(params: &PageParams, count: usize) -> Result<Self, InvalidPage> {
        let page_size = params
            .page_size
            .as_deref()
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .map_or(DEFAULT_PAGE_SIZE, |n| n.min(MAX_PAGE_SIZE));

        let page = match params.page.as_deref() {
            None => 1,
            Some(s) => s.trim().parse::<usize>().map_err(|_| InvalidPage)?,
        };

        let num_pages = count.div_ceil(page_size).max(1);
        if page == 0 || page > num_pages {
            return Err(InvalidPage);
        }

        Ok(Self {
            page,
            num_pages,
            window: Window {
                limit: page_size,
                offset: (page - 1) * page_size,
            },
        })
    }

    /// Wraps `results` in the page envelope.
    #[must_use]
    pub fn into_page<T>(self, count: usize, results: Vec<T>) -> Page<T> {
        Page {
            count,
            next: (self.page < self.num_pages).then_some(self.page + 1),
            previous: (self.page > 1).then(|| self.page - 1),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<&str>, page_size: Option<&str>) -> PageParams {
        PageParams {
            page: page.map(str::to_string),
            page_size: page_size.map(str::to_string),
        }
    }

    #[test]
    fn defaults_to_first_page() {
        let req = PageRequest::resolve(&params(None, None), 120).unwrap();
        assert_eq!(req.page, 1);
        assert_eq!(req.num_pages, 3);
        assert_eq!(
            req.window,
            Window {
                limit: 50,
                offset: 0
            }
        );
    }

    #[test]
    fn page_size_is_clamped_and_sanitized() {
        let req = PageRequest::resolve(&params(None, Some("5000")), 10).unwrap();
        assert_eq!(req.window.limit, MAX_PAGE_SIZE);

        let req = PageRequest::resolve(&params(None, Some("abc")), 10).unwrap();
        assert_eq!(req.window.limit, DEFAULT_PAGE_SIZE);

        let req = PageRequest::resolve(&params(None, Some("0")), 10).unwrap();
        assert_eq!(req.window.limit, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn rejects_out_of_range_and_malformed_pages() {
        assert_eq!(
            PageRequest::resolve(&params(Some("4"), Some("50")), 120),
            Err(InvalidPage)
        );
        assert_eq!(
            PageRequest::resolve(&params(Some("0"), None), 120),
            Err(InvalidPage)
        );
        assert_eq!(
            PageRequest::resolve(&params(Some("two"), None), 120),
            Err(InvalidPage)
        );
    }

    #[test]
    fn empty_result_has_one_page() {
        let req = PageRequest::resolve(&params(Some("1"), None), 0).unwrap();
        let page = req.into_page::<i32>(0, vec![]);
        assert_eq!(page.next, None);
        assert_eq!(page.previous, None);
    }

    #[test]
    fn envelope_links_neighbouring_pages() {
        let req = PageRequest::resolve(&params(Some("2"), Some("10")), 25).unwrap();
        assert_eq!(req.window.offset, 10);
        let page = req.into_page(25, vec![1, 2, 3]);
        assert_eq!(page.next, Some(3));
        assert_eq!(page.previous, Some(1));
        assert_eq!(page.count, 25);
    }
}
