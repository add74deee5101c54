//! Query-string parameters with omission of empty values.

/// A single query-string value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// Free text; omitted from the URL when empty.
    Text(String),
    /// Integer value.
    Integer(i64),
    /// Boolean flag rendered as `true`/`false`.
    Flag(bool),
}

impl QueryValue {
    fn render(&self) -> Option<String> {
        match self {
            Self::Text(text) if text.is_empty() => None,
            Self::Text(text) => Some(text.clone()),
            Self::Integer(value) => Some(value.to_string()),
            Self::Flag(value) => Some(value.to_string()),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for QueryValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

/// Ordered query parameters.
///
/// Absent values (`None`) are never recorded and empty strings are dropped
/// when the URL is rendered, so callers can pass raw form state without
/// producing noise such as `?q=&page=1`.
///
/// # Examples
/// ```
/// use portfolio_client::QueryParams;
///
/// let params = QueryParams::new()
///     .with("page", 1_u32)
///     .with_opt("q", None::<&str>)
///     .with("limit", "");
/// let rendered: Vec<_> = params.rendered().collect();
/// assert_eq!(rendered, vec![("page", "1".to_owned())]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, QueryValue)>,
}

impl QueryParams {
    /// Empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.push(key, value);
        self
    }

    /// Append a parameter only when `value` is present.
    #[must_use]
    pub fn with_opt<V: Into<QueryValue>>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    /// Append a parameter in place.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Append every pair from `other`, keeping its order.
    pub fn extend(&mut self, other: Self) {
        self.pairs.extend(other.pairs);
    }

    /// Pairs that will appear in the URL, in insertion order.
    pub fn rendered(&self) -> impl Iterator<Item = (&str, String)> + '_ {
        self.pairs
            .iter()
            .filter_map(|(key, value)| value.render().map(|rendered| (key.as_str(), rendered)))
    }

    /// Whether no pair would appear in the URL.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rendered().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn empty_text_is_dropped_but_zero_and_false_are_kept() {
        let params = QueryParams::new()
            .with("q", "")
            .with("page", 0_u32)
            .with("featured", false);
        let rendered: Vec<_> = params.rendered().collect();
        assert_eq!(
            rendered,
            vec![("page", "0".to_owned()), ("featured", "false".to_owned())]
        );
    }

    #[rstest]
    fn params_with_only_blank_values_are_empty() {
        let params = QueryParams::new().with("q", "").with_opt("role", None::<String>);
        assert!(params.is_empty());
    }

    #[rstest]
    fn extend_preserves_order() {
        let mut params = QueryParams::new().with("a", 1_i64);
        params.extend(QueryParams::new().with("b", "x").with("c", true));
        let keys: Vec<_> = params.rendered().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }
}
