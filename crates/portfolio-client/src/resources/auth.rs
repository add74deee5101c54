use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::client::{ApiClient, REFRESH_PATH};
use crate::error::ApiError;
use crate::request::ApiRequest;

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    /// Account email.
    pub email: &'a str,
    /// Plain-text password.
    pub password: &'a str,
}

/// Cookie-session authentication.
///
/// These paths are never refreshed on 401: a rejected login is a plain
/// [`ApiError::Client`].
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `POST /auth/login`. Returns the signed-in user.
    ///
    /// # Errors
    /// Any [`ApiError`]; bad credentials are a 401 [`ApiError::Client`].
    pub async fn login<T: DeserializeOwned>(
        &self,
        email: &str,
        password: &str,
    ) -> Result<T, ApiError> {
        let request =
            ApiRequest::post("/auth/login").with_json(&LoginRequest { email, password })?;
        self.client.send(request).await
    }

    /// `POST /auth/logout`.
    ///
    /// # Errors
    /// Any [`ApiError`] from the request.
    pub async fn logout(&self) -> Result<String, ApiError> {
        self.client.send_ack(ApiRequest::post("/auth/logout")).await
    }

    /// `POST /auth/refresh`, issued directly rather than through the
    /// refresh coordinator.
    ///
    /// # Errors
    /// Any [`ApiError`] from the request.
    pub async fn refresh(&self) -> Result<String, ApiError> {
        self.client.send_ack(ApiRequest::post(REFRESH_PATH)).await
    }

    /// `GET /auth/me`.
    ///
    /// # Errors
    /// Any [`ApiError`]; no session is a 401 [`ApiError::Client`].
    pub async fn me<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        self.client.send(ApiRequest::get("/auth/me")).await
    }
}
