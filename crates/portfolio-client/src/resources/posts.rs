use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{CrudResource, ListQuery, Page};
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::request::ApiRequest;

/// Blog posts: the usual CRUD plus lookup by slug.
#[derive(Debug, Clone, Copy)]
pub struct PostsApi<'a> {
    crud: CrudResource<'a>,
}

impl<'a> PostsApi<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self {
            crud: CrudResource::new(client, "/posts"),
        }
    }

    /// `GET /posts/slug/{slug}`.
    ///
    /// # Errors
    /// Any [`ApiError`] from the request.
    pub async fn get_by_slug<T: DeserializeOwned>(&self, slug: &str) -> Result<T, ApiError> {
        let path = format!("{}/slug/{slug}", self.crud.path());
        self.crud.client().send(ApiRequest::get(path)).await
    }

    /// See [`CrudResource::list`].
    ///
    /// # Errors
    /// Any [`ApiError`] from the request.
    pub async fn list<T: DeserializeOwned>(&self, query: &ListQuery) -> Result<Page<T>, ApiError> {
        self.crud.list(query).await
    }

    /// See [`CrudResource::get`].
    ///
    /// # Errors
    /// Any [`ApiError`] from the request.
    pub async fn get<T: DeserializeOwned>(&self, id: &str) -> Result<T, ApiError> {
        self.crud.get(id).await
    }

    /// See [`CrudResource::create`].
    ///
    /// # Errors
    /// Any [`ApiError`] from encoding or the request.
    pub async fn create<T, B>(&self, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.crud.create(body).await
    }

    /// See [`CrudResource::update`].
    ///
    /// # Errors
    /// Any [`ApiError`] from encoding or the request.
    pub async fn update<T, B>(&self, id: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.crud.update(id, body).await
    }

    /// See [`CrudResource::delete`].
    ///
    /// # Errors
    /// Any [`ApiError`] from the request.
    pub async fn delete(&self, id: &str) -> Result<String, ApiError> {
        self.crud.delete(id).await
    }
}
