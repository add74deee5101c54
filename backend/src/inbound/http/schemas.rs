//! OpenAPI schema definitions for shared response shapes.
//!
//! The envelope and pagination types live in the framework-free
//! `pagination` crate and do not derive `ToSchema`. These wrappers mirror
//! their wire shape for documentation only.

use utoipa::ToSchema;

/// OpenAPI schema for [`pagination::FieldError`].
#[derive(ToSchema)]
#[schema(as = FieldError)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct FieldErrorSchema {
    /// Offending input field.
    #[schema(example = "email")]
    field: Option<String>,
    #[schema(example = "Email already exists")]
    message: String,
}

/// OpenAPI schema for [`pagination::PageMeta`].
#[derive(ToSchema)]
#[schema(as = PageMeta)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PageMetaSchema {
    #[schema(example = 1)]
    page: u32,
    #[schema(example = 10)]
    limit: u32,
    /// Rows matching the filter across all pages.
    #[schema(example = 42)]
    total: u64,
    #[schema(example = 5)]
    total_pages: u64,
}

/// OpenAPI schema for a successful [`pagination::Envelope`].
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct EnvelopeSchema<T: ToSchema> {
    /// Always `true`.
    success: bool,
    #[schema(example = "Fetched")]
    message: String,
    data: T,
}

/// OpenAPI schema for a list [`pagination::Envelope`].
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PageEnvelopeSchema<T: ToSchema> {
    /// Always `true`.
    success: bool,
    #[schema(example = "Fetched")]
    message: String,
    data: Vec<T>,
    meta: PageMetaSchema,
}

/// OpenAPI schema for an envelope carrying a free-form JSON document.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ValueEnvelopeSchema {
    /// Always `true`.
    success: bool,
    #[schema(example = "Setting fetched")]
    message: String,
    #[schema(value_type = Object)]
    data: serde_json::Value,
}

/// OpenAPI schema for an acknowledgement without payload.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct AckSchema {
    /// Always `true`.
    success: bool,
    #[schema(example = "Deleted")]
    message: String,
    /// Always `null`.
    #[schema(value_type = Option<Object>)]
    data: Option<()>,
}
