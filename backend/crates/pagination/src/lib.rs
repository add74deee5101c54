//! Shared response envelope and pagination primitives.
//!
//! Every backend endpoint answers with the same JSON envelope:
//!
//! ```text
//! { "success": true, "message": "...", "data": ..., "meta": {...}, "errors": [...] }
//! ```
//!
//! The backend builds envelopes with the constructors in [`envelope`], and
//! the API client decodes them with the same types so both sides agree on
//! the wire shape. [`PageRequest`] parses untrusted `page`/`limit` query
//! values with safe fallbacks and [`PageMeta`] describes the resulting page.

mod envelope;
mod page;

pub use envelope::{Envelope, FieldError};
pub use page::{DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT, PageMeta, PageRequest, Paginated};
