//! Error mapping and query helpers shared by the Diesel repositories.

use tracing::debug;

use super::pool::PoolError;

/// Map a pool failure through the repository's connection constructor.
pub(crate) fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    connection(error.into_message())
}

/// Map Diesel failures into a repository's query/connection/duplicate
/// constructors.
///
/// Details are logged at debug level and kept out of the returned message.
pub(crate) fn map_diesel_error<E>(
    error: diesel::result::Error,
    query: impl FnOnce(&'static str) -> E,
    connection: impl FnOnce(&'static str) -> E,
    duplicate: impl FnOnce(&'static str) -> E,
) -> E {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            duplicate("unique constraint violated")
        }
        _ => query("database error"),
    }
}

/// `ILIKE` pattern matching `term` anywhere, with wildcards in `term`
/// matched literally.
///
/// # Examples
/// ```ignore
/// assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
/// ```
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Convert a page window into `LIMIT`/`OFFSET` values.
pub(crate) fn limit_offset(page: pagination::PageRequest) -> (i64, i64) {
    (
        i64::from(page.limit()),
        i64::try_from(page.offset()).unwrap_or(i64::MAX),
    )
}

/// Convert a `COUNT(*)` result, treating impossible negatives as zero.
pub(crate) fn count_to_u64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ada", "%ada%")]
    #[case("50%", "%50\\%%")]
    #[case("snake_case", "%snake\\_case%")]
    #[case("back\\slash", "%back\\\\slash%")]
    fn wildcards_are_escaped(#[case] term: &str, #[case] expected: &str) {
        assert_eq!(contains_pattern(term), expected);
    }

    #[rstest]
    fn page_window_maps_to_limit_and_offset() {
        assert_eq!(limit_offset(pagination::PageRequest::new(3, 20)), (20, 40));
    }

    #[rstest]
    #[case(diesel::result::Error::NotFound, "query:record not found")]
    #[case(
        diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::ClosedConnection,
            Box::new("closed".to_owned()),
        ),
        "connection:database connection error"
    )]
    #[case(
        diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            Box::new("dup".to_owned()),
        ),
        "duplicate:unique constraint violated"
    )]
    fn diesel_errors_pick_the_right_constructor(
        #[case] error: diesel::result::Error,
        #[case] expected: &str,
    ) {
        let mapped = map_diesel_error(
            error,
            |message| format!("query:{message}"),
            |message| format!("connection:{message}"),
            |message| format!("duplicate:{message}"),
        );
        assert_eq!(mapped, expected);
    }
}
