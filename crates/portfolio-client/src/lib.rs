//! Client for the portfolio CMS REST API.
//!
//! [`ApiClient`] issues requests through a [`Transport`], decodes the shared
//! response [`Envelope`], and turns every failure into an [`ApiError`]. When a
//! request is rejected with `401 Unauthorized` the client refreshes the
//! cookie session once through a [`RefreshCoordinator`], so a burst of
//! expired requests triggers a single `POST /auth/refresh`, and then retries
//! each original request exactly once.
//!
//! Application-wide side effects (session expiry, unread badges,
//! notifications) are delivered through an injected [`ClientEvents`]
//! implementation rather than a global event bus.
//!
//! ```no_run
//! use portfolio_client::{ApiClient, ListQuery};
//! use serde_json::Value;
//!
//! # async fn run() -> Result<(), portfolio_client::ApiError> {
//! let client = ApiClient::builder("http://localhost:5000/api").build()?;
//! let page = client
//!     .projects()
//!     .list::<Value>(&ListQuery::new().page(1).search("rust"))
//!     .await?;
//! println!("{} projects", page.items.len());
//! # Ok(())
//! # }
//! ```

mod client;
pub mod config;
mod error;
mod events;
mod query;
mod refresh;
mod request;
pub mod resources;
mod transport;

pub use client::{ApiClient, ApiClientBuilder, REFRESH_PATH};
pub use config::ClientSettings;
pub use error::{ApiError, NETWORK_ERROR_MESSAGE, error_message};
pub use events::{ClientEvents, NoOpClientEvents, Notification, NotificationKind};
pub use pagination::{Envelope, FieldError, PageMeta};
pub use query::{QueryParams, QueryValue};
pub use refresh::RefreshCoordinator;
pub use request::ApiRequest;
pub use resources::{ListQuery, Page};
pub use transport::{RawResponse, ReqwestTransport, Transport, TransportError};
