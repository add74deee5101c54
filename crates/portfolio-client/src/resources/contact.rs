use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{ListQuery, Page};
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::request::ApiRequest;

/// Data of `GET /contact/unread-count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct UnreadCount {
    /// Number of unread messages.
    pub count: u64,
}

/// Contact form messages.
#[derive(Debug, Clone, Copy)]
pub struct ContactApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ContactApi<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `POST /contact`. Public; a 429 means the sender is rate limited,
    /// see [`ApiError::is_rate_limited`].
    ///
    /// # Errors
    /// Any [`ApiError`] from encoding or the request.
    pub async fn submit<T, B>(&self, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = ApiRequest::post("/contact").with_json(body)?;
        self.client.send(request).await
    }

    /// `GET /contact`.
    ///
    /// # Errors
    /// Any [`ApiError`] from the request.
    pub async fn list<T: DeserializeOwned>(&self, query: &ListQuery) -> Result<Page<T>, ApiError> {
        let request = ApiRequest::get("/contact").with_query(query.to_params());
        self.client.send_page(request).await
    }

    /// `PATCH /contact/{id}/read`, then raise
    /// [`ClientEvents::message_read`](crate::ClientEvents::message_read).
    ///
    /// # Errors
    /// Any [`ApiError`] from the request; no event is raised on failure.
    pub async fn mark_read<T: DeserializeOwned>(&self, id: &str) -> Result<T, ApiError> {
        let message = self
            .client
            .send(ApiRequest::patch(format!("/contact/{id}/read")))
            .await?;
        self.client.events().message_read(id);
        Ok(message)
    }

    /// `DELETE /contact/{id}`.
    ///
    /// # Errors
    /// Any [`ApiError`] from the request.
    pub async fn delete(&self, id: &str) -> Result<String, ApiError> {
        self.client
            .send_ack(ApiRequest::delete(format!("/contact/{id}")))
            .await
    }

    /// `GET /contact/unread-count`.
    ///
    /// # Errors
    /// Any [`ApiError`] from the request.
    pub async fn unread_count(&self) -> Result<u64, ApiError> {
        let unread: UnreadCount = self
            .client
            .send(ApiRequest::get("/contact/unread-count"))
            .await?;
        Ok(unread.count)
    }
}
