//! Immutable request description and URL construction.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::ApiError;
use crate::query::QueryParams;

const AUTH_PREFIX: &str = "/auth/";

/// One API call: method, path relative to the base URL, query, optional
/// JSON body, and extra headers.
///
/// Bodies are serialised when attached so a request can be cloned and
/// re-sent unchanged after a session refresh.
///
/// # Examples
/// ```
/// use portfolio_client::{ApiRequest, QueryParams};
///
/// let request = ApiRequest::get("/users")
///     .with_query(QueryParams::new().with("page", 1).with("q", ""));
/// let url = request.url("http://localhost:5000/api/").unwrap();
/// assert_eq!(url.as_str(), "http://localhost:5000/api/users?page=1");
/// ```
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: QueryParams,
    body: Option<Value>,
    headers: Vec<(String, String)>,
    retry: bool,
}

impl ApiRequest {
    /// Request with an explicit method.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: normalise_path(path.into()),
            query: QueryParams::new(),
            body: None,
            headers: Vec::new(),
            retry: false,
        }
    }

    /// `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST` request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// `PUT` request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// `PATCH` request.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// `DELETE` request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Replace the query parameters.
    #[must_use]
    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    /// Returns [`ApiError::Encode`] when `body` cannot be serialised.
    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|error| ApiError::encode(format!("request body is not valid JSON: {error}")))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Attach an extra header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// HTTP method.
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Path relative to the base URL, always starting with `/`.
    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    /// Query parameters.
    pub const fn query(&self) -> &QueryParams {
        &self.query
    }

    /// JSON body to send. Always `None` for `GET` requests.
    pub fn body(&self) -> Option<&Value> {
        if self.method == Method::GET {
            None
        } else {
            self.body.as_ref()
        }
    }

    /// Extra headers.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Whether the path targets an authentication endpoint. A 401 from one
    /// of these never triggers a session refresh.
    pub fn is_auth_endpoint(&self) -> bool {
        self.path.starts_with(AUTH_PREFIX)
    }

    /// Whether this request is the single retry issued after a refresh.
    pub const fn is_retry(&self) -> bool {
        self.retry
    }

    pub(crate) fn as_retry(&self) -> Self {
        Self {
            retry: true,
            ..self.clone()
        }
    }

    /// Absolute URL for this request under `base_url`.
    ///
    /// # Errors
    /// Returns [`ApiError::Encode`] when the combined URL is invalid.
    pub fn url(&self, base_url: &str) -> Result<Url, ApiError> {
        let joined = format!("{}{}", base_url.trim_end_matches('/'), self.path);
        let mut url = Url::parse(&joined)
            .map_err(|error| ApiError::encode(format!("invalid request URL {joined}: {error}")))?;
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in self.query.rendered() {
                pairs.append_pair(key, &value);
            }
        }
        Ok(url)
    }
}

fn normalise_path(path: String) -> String {
    if path.starts_with('/') {
        path
    } else {
        format!("/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn undefined_and_empty_query_values_are_omitted() {
        let request = ApiRequest::get("/projects").with_query(
            QueryParams::new()
                .with("page", 1)
                .with_opt("q", None::<&str>)
                .with("limit", ""),
        );
        let url = request.url("http://localhost:5000/api").expect("valid url");
        assert_eq!(url.query(), Some("page=1"));
    }

    #[rstest]
    fn url_without_params_has_no_question_mark() {
        let request =
            ApiRequest::get("projects").with_query(QueryParams::new().with("q", ""));
        let url = request.url("http://localhost:5000/api/").expect("valid url");
        assert_eq!(url.as_str(), "http://localhost:5000/api/projects");
    }

    #[rstest]
    fn query_values_are_percent_encoded() {
        let request = ApiRequest::get("/users")
            .with_query(QueryParams::new().with("q", "ada lovelace&co"));
        let url = request.url("http://localhost:5000/api").expect("valid url");
        assert_eq!(url.query(), Some("q=ada+lovelace%26co"));
    }

    #[rstest]
    #[case("/auth/login", true)]
    #[case("/auth/refresh", true)]
    #[case("/authors", false)]
    #[case("/users", false)]
    fn detects_auth_endpoints(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(ApiRequest::post(path).is_auth_endpoint(), expected);
    }

    #[rstest]
    fn get_requests_never_carry_a_body() {
        let request = ApiRequest::get("/stats")
            .with_json(&json!({"ignored": true}))
            .expect("serialisable body");
        assert!(request.body().is_none());
    }

    #[rstest]
    fn retry_copy_keeps_everything_but_the_flag() {
        let original = ApiRequest::put("/projects/1")
            .with_json(&json!({"title": "New"}))
            .expect("serialisable body")
            .with_header("X-Request-Source", "admin");
        let retry = original.as_retry();
        assert!(retry.is_retry());
        assert!(!original.is_retry());
        assert_eq!(retry.body(), original.body());
        assert_eq!(retry.headers(), original.headers());
    }
}
