//! Typed wrappers over [`ApiClient`](crate::ApiClient), one per backend
//! resource.
//!
//! Entities stay opaque: every method is generic over the caller's payload
//! type, so the client does not pin the CMS schema.

mod auth;
mod contact;
mod crud;
mod media;
mod posts;
mod settings;
mod stats;

pub use auth::{AuthApi, LoginRequest};
pub use contact::{ContactApi, UnreadCount};
pub use crud::CrudResource;
pub use media::MediaApi;
pub use posts::PostsApi;
pub use settings::{SettingsApi, keys};
pub use stats::StatsApi;

use pagination::PageMeta;

use crate::query::{QueryParams, QueryValue};

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Pagination metadata, when the endpoint paginates.
    pub meta: Option<PageMeta>,
}

impl<T> Page<T> {
    /// Total number of matching rows, falling back to the item count for
    /// endpoints that do not paginate.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.meta
            .map_or(self.items.len() as u64, |meta| meta.total)
    }
}

/// Filters shared by list endpoints. Unset values are left out of the URL.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    page: Option<u32>,
    limit: Option<u32>,
    search: Option<String>,
    extra: QueryParams,
}

impl ListQuery {
    /// Empty query; the server applies its own defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Page size.
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Free-text search, sent as `q`.
    #[must_use]
    pub fn search(mut self, q: impl Into<String>) -> Self {
        self.search = Some(q.into());
        self
    }

    /// Restrict users to one role.
    #[must_use]
    pub fn role(self, role: impl Into<String>) -> Self {
        self.filter("role", role.into())
    }

    /// Restrict by publication status.
    #[must_use]
    pub fn status(self, status: impl Into<String>) -> Self {
        self.filter("status", status.into())
    }

    /// Restrict to featured (or non-featured) entries.
    #[must_use]
    pub fn featured(self, featured: bool) -> Self {
        self.filter("featured", featured)
    }

    /// Any other endpoint-specific filter.
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.extra.push(key, value);
        self
    }

    pub(crate) fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new()
            .with_opt("page", self.page)
            .with_opt("limit", self.limit)
            .with_opt("q", self.search.as_deref());
        params.extend(self.extra.clone());
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ApiRequest;
    use rstest::rstest;

    #[rstest]
    fn list_query_renders_set_filters_in_order() {
        let query = ListQuery::new()
            .page(2)
            .limit(20)
            .search("")
            .role("editor");
        let url = ApiRequest::get("/users")
            .with_query(query.to_params())
            .url("http://localhost:5000/api")
            .expect("valid url");
        assert_eq!(url.query(), Some("page=2&limit=20&role=editor"));
    }

    #[rstest]
    fn page_total_prefers_meta() {
        let page = Page {
            items: vec![1, 2],
            meta: Some(PageMeta {
                page: 1,
                limit: 2,
                total: 9,
                total_pages: 5,
            }),
        };
        assert_eq!(page.total(), 9);
        assert_eq!(Page::<u8> { items: vec![1], meta: None }.total(), 1);
    }
}
