use serde::de::DeserializeOwned;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::request::ApiRequest;

/// Admin dashboard counters.
#[derive(Debug, Clone, Copy)]
pub struct StatsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> StatsApi<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /stats/dashboard`.
    ///
    /// # Errors
    /// Any [`ApiError`] from the request.
    pub async fn dashboard<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        self.client.send(ApiRequest::get("/stats/dashboard")).await
    }
}
