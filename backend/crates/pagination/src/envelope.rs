//! Uniform JSON response envelope.

use serde::{Deserialize, Serialize};

use crate::page::{PageMeta, Paginated};

/// Field-level validation failure reported inside an error envelope.
///
/// # Examples
/// ```
/// use pagination::FieldError;
///
/// let err = FieldError::for_field("email", "email is required");
/// assert_eq!(err.field.as_deref(), Some("email"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Offending input field, when the failure is tied to one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Human-readable description of the failure.
    pub message: String,
}

impl FieldError {
    /// Build an error that is not attached to a specific field.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }

    /// Build an error for the named field.
    pub fn for_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }
}

/// Response envelope shared by every endpoint.
///
/// ## Invariants
/// - `success == true` implies `errors` is absent. Envelopes built with
///   [`Envelope::ok`] or [`Envelope::page`] always carry `data`.
/// - `success == false` implies `data` is absent.
///
/// `data` is always serialised (as `null` for acknowledgements without a
/// payload) so clients can rely on the key being present.
///
/// # Examples
/// ```
/// use pagination::Envelope;
///
/// let envelope = Envelope::ok("Fetched", 42);
/// let json = serde_json::to_value(&envelope).unwrap();
/// assert_eq!(json["success"], true);
/// assert_eq!(json["data"], 42);
/// assert!(json.get("errors").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    /// Whether the request succeeded.
    pub success: bool,
    /// Human-readable summary of the outcome.
    #[serde(default)]
    pub message: String,
    /// Response payload; `None` for failures.
    pub data: Option<T>,
    /// Pagination metadata for list responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
    /// Field-level validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl<T> Envelope<T> {
    /// Successful response carrying `data`.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            meta: None,
            errors: None,
        }
    }

    /// Failed response. `errors` is omitted from the JSON when empty.
    pub fn failure(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            meta: None,
            errors: if errors.is_empty() { None } else { Some(errors) },
        }
    }

    /// Field errors carried by the envelope, empty when none were reported.
    pub fn field_errors(&self) -> &[FieldError] {
        self.errors.as_deref().unwrap_or_default()
    }
}

impl<T> Envelope<Vec<T>> {
    /// Successful list response carrying the page items and their metadata.
    pub fn page(message: impl Into<String>, page: Paginated<T>) -> Self {
        let Paginated { items, meta } = page;
        Self {
            success: true,
            message: message.into(),
            data: Some(items),
            meta: Some(meta),
            errors: None,
        }
    }
}

impl Envelope<()> {
    /// Successful acknowledgement without a payload (`"data": null`).
    pub fn acknowledged(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            meta: None,
            errors: None,
        }
    }
}
