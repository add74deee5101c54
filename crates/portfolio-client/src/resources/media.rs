use serde::de::DeserializeOwned;

use super::{CrudResource, ListQuery, Page};
use crate::client::ApiClient;
use crate::error::ApiError;

/// Uploaded media. Uploads go through a multipart endpoint outside this
/// client, so only listing and deletion are exposed.
#[derive(Debug, Clone, Copy)]
pub struct MediaApi<'a> {
    crud: CrudResource<'a>,
}

impl<'a> MediaApi<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self {
            crud: CrudResource::new(client, "/media"),
        }
    }

    /// `GET /media`.
    ///
    /// # Errors
    /// Any [`ApiError`] from the request.
    pub async fn list<T: DeserializeOwned>(&self, query: &ListQuery) -> Result<Page<T>, ApiError> {
        self.crud.list(query).await
    }

    /// `DELETE /media/{id}`.
    ///
    /// # Errors
    /// Any [`ApiError`] from the request.
    pub async fn delete(&self, id: &str) -> Result<String, ApiError> {
        self.crud.delete(id).await
    }
}
