use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{ListQuery, Page};
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::request::ApiRequest;

/// List, read, create, update, and delete under one collection path.
#[derive(Debug, Clone, Copy)]
pub struct CrudResource<'a> {
    client: &'a ApiClient,
    base: &'static str,
}

impl<'a> CrudResource<'a> {
    pub(crate) const fn new(client: &'a ApiClient, base: &'static str) -> Self {
        Self { client, base }
    }

    /// Collection path, for example `/projects`.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        self.base
    }

    pub(crate) const fn client(&self) -> &'a ApiClient {
        self.client
    }

    pub(crate) fn item_path(&self, id: &str) -> String {
        format!("{}/{id}", self.base)
    }

    /// `GET {base}` with filters and pagination.
    ///
    /// # Errors
    /// Any [`ApiError`] from the request.
    pub async fn list<T: DeserializeOwned>(&self, query: &ListQuery) -> Result<Page<T>, ApiError> {
        let request = ApiRequest::get(self.base).with_query(query.to_params());
        self.client.send_page(request).await
    }

    /// `GET {base}/{id}`.
    ///
    /// # Errors
    /// Any [`ApiError`] from the request; a missing entity is a 404
    /// [`ApiError::Client`].
    pub async fn get<T: DeserializeOwned>(&self, id: &str) -> Result<T, ApiError> {
        self.client.send(ApiRequest::get(self.item_path(id))).await
    }

    /// `POST {base}`.
    ///
    /// # Errors
    /// Any [`ApiError`] from encoding or the request.
    pub async fn create<T, B>(&self, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = ApiRequest::post(self.base).with_json(body)?;
        self.client.send(request).await
    }

    /// `PUT {base}/{id}`.
    ///
    /// # Errors
    /// Any [`ApiError`] from encoding or the request.
    pub async fn update<T, B>(&self, id: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = ApiRequest::put(self.item_path(id)).with_json(body)?;
        self.client.send(request).await
    }

    /// `DELETE {base}/{id}`. Returns the server's confirmation message.
    ///
    /// # Errors
    /// Any [`ApiError`] from the request.
    pub async fn delete(&self, id: &str) -> Result<String, ApiError> {
        self.client.send_ack(ApiRequest::delete(self.item_path(id))).await
    }
}
