//! Page/offset arithmetic for list endpoints.
//!
//! Query values are parsed leniently: anything missing, non-numeric or zero
//! falls back to the default, and oversized pages are capped.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PER_PAGE: u64 = 100;
pub const MAX_PER_PAGE: u64 = 1000;

/// Raw `?page=&per_page=` parameters.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// One-based page number. Defaults to 1.
    #[param(value_type = Option<u64>, example = 1)]
    pub page: Option<String>,
    /// Items per page. Defaults to 100, capped at 1000.
    #[param(value_type = Option<u64>, example = 100)]
    pub per_page: Option<String>,
}

fn parse_or(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

/// Resolved window over `total` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pages {
    page: u64,
    per_page: u64,
    page_count: u64,
    total: u64,
}

impl Pages {
    /// Resolve a request against the current total.
    ///
    /// A page past the end is pulled back to the last page.
    ///
    /// # Examples
    /// ```
    /// use keystone::inbound::http::pagination::{PageQuery, Pages};
    ///
    /// let query = PageQuery { page: Some("9".into()), per_page: Some("10".into()) };
    /// let pages = Pages::resolve(&query, 25);
    /// assert_eq!((pages.page(), pages.offset(), pages.limit()), (3, 20, 10));
    /// ```
    pub fn resolve(query: &PageQuery, total: u64) -> Self {
        let per_page =
            parse_or(query.per_page.as_deref(), DEFAULT_PER_PAGE).min(MAX_PER_PAGE);
        let page_count = total.div_ceil(per_page);
        let page = parse_or(query.page.as_deref(), DEFAULT_PAGE)
            .min(page_count)
            .max(1);
        Self {
            page,
            per_page,
            page_count,
            total,
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn limit(&self) -> u64 {
        self.per_page
    }

    /// Wrap one page of items with the counters.
    pub fn wrap<T>(self, items: Vec<T>) -> Paginated<T> {
        Paginated {
            items,
            page: self.page,
            per_page: self.per_page,
            page_count: self.page_count,
            total_count: self.total,
        }
    }
}

/// `{items, page, perPage, pageCount, totalCount}` list payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub page_count: u64,
    pub total_count: u64,
}
